//! Line parser for the INI-like Git config format.

use super::Config;
use crate::error::{Error, Result};

/// Parses config file text.
pub fn parse(content: &str) -> Result<Config> {
    let mut config = Config::default();
    let mut section: Option<(String, String)> = None;
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let mut line = raw.trim().to_string();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            section = Some(parse_section_header(&line).ok_or_else(|| {
                Error::InvalidConfig(format!("line {}: bad section header", line_no))
            })?);
            continue;
        }

        // A trailing unescaped backslash joins the next line.
        while ends_with_continuation(&line) {
            line.pop();
            match lines.next() {
                Some((_, next)) => line.push_str(next),
                None => break,
            }
        }

        let (name, sub) = section.as_ref().ok_or_else(|| {
            Error::InvalidConfig(format!("line {}: key outside of any section", line_no))
        })?;
        let (key, value) = parse_entry(&line)
            .map_err(|reason| Error::InvalidConfig(format!("line {}: {}", line_no, reason)))?;
        config.set(name, sub, &key, &value);
    }

    Ok(config)
}

/// Parses `[section]`, `[section "sub"]` or the legacy `[section.sub]`.
fn parse_section_header(line: &str) -> Option<(String, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();

    if let Some((name, rest)) = inner.split_once(char::is_whitespace) {
        let quoted = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
        let mut sub = String::with_capacity(quoted.len());
        let mut chars = quoted.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                sub.push(chars.next()?);
            } else {
                sub.push(c);
            }
        }
        return valid_name(name).then(|| (name.to_lowercase(), sub));
    }

    match inner.split_once('.') {
        Some((name, sub)) => valid_name(name).then(|| (name.to_lowercase(), sub.to_lowercase())),
        None => valid_name(inner).then(|| (inner.to_lowercase(), String::new())),
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

fn ends_with_continuation(line: &str) -> bool {
    let slashes = line.chars().rev().take_while(|&c| c == '\\').count();
    slashes % 2 == 1
}

/// Splits `key = value`. A bare `key` means boolean true.
fn parse_entry(line: &str) -> std::result::Result<(String, String), String> {
    let (key, rest) = match line.split_once('=') {
        Some((key, rest)) => (key.trim(), Some(rest)),
        None => (line.split(['#', ';']).next().unwrap_or("").trim(), None),
    };

    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!("invalid key: {}", key));
    }

    let value = match rest {
        Some(rest) => parse_value(rest)?,
        None => "true".to_string(),
    };
    Ok((key.to_lowercase(), value))
}

/// Unquotes and unescapes a value, dropping any trailing comment.
fn parse_value(raw: &str) -> std::result::Result<String, String> {
    let mut value = String::new();
    // Length of `value` up to the last character that must be kept.
    let mut keep = 0;
    let mut in_quotes = false;
    let mut chars = raw.trim_start().chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' => {
                let escaped = match chars.next() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('b') => '\u{8}',
                    Some('\\') => '\\',
                    Some('"') => '"',
                    Some(other) => return Err(format!("unknown escape: \\{}", other)),
                    None => break,
                };
                value.push(escaped);
            }
            '#' | ';' if !in_quotes => break,
            _ => value.push(c),
        }
        if in_quotes || !c.is_whitespace() {
            keep = value.len();
        }
    }

    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    value.truncate(keep);
    Ok(value)
}
