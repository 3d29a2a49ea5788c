//! Read-only access to a repository's `config` file.
//!
//! # Example
//!
//! ```no_run
//! use dotgit::config::Config;
//!
//! let config = Config::from_file(".git/config").unwrap();
//! let version = config.get_int("core", "repositoryformatversion").unwrap();
//! println!("format version: {:?}", version);
//! ```

mod parser;

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::infra::read_file;

/// A parsed Git configuration.
///
/// Section and key names are case-insensitive; subsection names are not.
/// When a key repeats, the last value wins.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// (section, subsection) -> key -> value. Subsection is empty when absent.
    entries: BTreeMap<(String, String), BTreeMap<String, String>>,
}

impl Config {
    /// Parses configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = read_file(path.as_ref())?;
        let text = String::from_utf8(content).map_err(|_| Error::InvalidUtf8)?;
        text.parse()
    }

    /// Gets a value from a section without subsection.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.get_subsection(section, "", key)
    }

    /// Gets a value from `[section "subsection"]`.
    pub fn get_subsection(&self, section: &str, subsection: &str, key: &str) -> Option<&str> {
        self.entries
            .get(&(section.to_lowercase(), subsection.to_string()))
            .and_then(|keys| keys.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    /// Gets a value as a boolean.
    ///
    /// `true`/`yes`/`on`/`1` and `false`/`no`/`off`/`0`/empty are accepted,
    /// case-insensitively. Returns `Ok(None)` if the key is absent.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        self.get(section, key).map(parse_bool).transpose()
    }

    /// Gets a value as an integer, honouring `k`, `m` and `g` suffixes.
    ///
    /// Returns `Ok(None)` if the key is absent.
    pub fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>> {
        self.get(section, key).map(parse_int).transpose()
    }

    pub(crate) fn set(&mut self, section: &str, subsection: &str, key: &str, value: &str) {
        self.entries
            .entry((section.to_lowercase(), subsection.to_string()))
            .or_default()
            .insert(key.to_lowercase(), value.to_string());
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        parser::parse(content)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "invalid boolean value: {}",
            value
        ))),
    }
}

fn parse_int(value: &str) -> Result<i64> {
    let value = value.trim();
    let invalid = || Error::InvalidConfig(format!("invalid integer value: {}", value));

    let (digits, multiplier) = match value.char_indices().last() {
        Some((i, 'k' | 'K')) => (&value[..i], 1i64 << 10),
        Some((i, 'm' | 'M')) => (&value[..i], 1i64 << 20),
        Some((i, 'g' | 'G')) => (&value[..i], 1i64 << 30),
        _ => (value, 1),
    };

    digits
        .parse::<i64>()
        .map_err(|_| invalid())?
        .checked_mul(multiplier)
        .ok_or_else(invalid)
}
