//! Identities and timestamps found in commit and tag headers.
//!
//! A header line such as `Jane Doe <jane@example.com> 1700000000 +0000`
//! is split from the right: the date expression is removed first with
//! [`strip_date`], then the remainder is parsed as a [`Contributor`].

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{Error, Result};

/// A person named in a commit or tag: name and email, no date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    name: String,
    email: String,
}

impl Contributor {
    /// Creates a new Contributor.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Contributor {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Parses `Name <email>`.
    ///
    /// The name may be empty; the angle brackets are mandatory and nothing
    /// but whitespace may follow the closing one.
    pub fn parse(s: &str) -> Result<Self> {
        let email_start = s
            .find('<')
            .ok_or_else(|| Error::parse(format!("contributor without email: {}", s)))?;
        let email_len = s[email_start..]
            .find('>')
            .ok_or_else(|| Error::parse(format!("unterminated email: {}", s)))?;
        let email_end = email_start + email_len;

        if !s[email_end + 1..].trim().is_empty() {
            return Err(Error::parse(format!("trailing data after email: {}", s)));
        }

        Ok(Contributor {
            name: s[..email_start].trim().to_string(),
            email: s[email_start + 1..email_end].to_string(),
        })
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A Git date expression: seconds since the epoch plus a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitTime {
    datetime: DateTime<FixedOffset>,
}

impl GitTime {
    /// Creates a GitTime from epoch seconds and an offset in minutes.
    pub fn new(seconds: i64, offset_minutes: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or_else(|| Error::parse(format!("timezone offset out of range: {}", offset_minutes)))?;
        let utc = DateTime::<Utc>::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::parse(format!("timestamp out of range: {}", seconds)))?;
        Ok(GitTime {
            datetime: utc.with_timezone(&offset),
        })
    }

    /// Parses `<epoch-seconds> <+hhmm|-hhmm>`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let seconds = parts
            .next()
            .ok_or_else(|| Error::parse("missing timestamp"))?;
        let seconds: i64 = seconds
            .parse()
            .map_err(|_| Error::parse(format!("invalid timestamp: {}", seconds)))?;
        let tz = parts
            .next()
            .ok_or_else(|| Error::parse("missing timezone"))?;
        if parts.next().is_some() {
            return Err(Error::parse(format!("trailing data in date: {}", s)));
        }
        GitTime::new(seconds, parse_timezone(tz)?)
    }

    /// Returns the Unix timestamp.
    pub fn seconds(&self) -> i64 {
        self.datetime.timestamp()
    }

    /// Returns the timezone offset in minutes (e.g. +0900 = 540).
    pub fn offset_minutes(&self) -> i32 {
        self.datetime.offset().local_minus_utc() / 60
    }

    /// Returns the date as a chrono value in its original offset.
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.datetime
    }
}

impl fmt::Display for GitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = self.offset_minutes();
        let sign = if offset < 0 { '-' } else { '+' };
        let offset = offset.abs();
        write!(
            f,
            "{} {}{:02}{:02}",
            self.seconds(),
            sign,
            offset / 60,
            offset % 60
        )
    }
}

/// Splits the trailing date expression off a header value.
///
/// Returns the parsed date and the text before it, right-trimmed.
pub fn strip_date(line: &str) -> Result<(GitTime, &str)> {
    let line = line.trim_end();
    let (rest, tz) = line
        .rsplit_once(' ')
        .ok_or_else(|| Error::parse(format!("missing date in: {}", line)))?;
    let (rest, seconds) = rest
        .rsplit_once(' ')
        .ok_or_else(|| Error::parse(format!("missing timestamp in: {}", line)))?;

    let time = GitTime::parse(&format!("{} {}", seconds, tz))?;
    Ok((time, rest.trim_end()))
}

/// Parses a timezone string like "+0900" or "-0500" into minutes offset.
fn parse_timezone(s: &str) -> Result<i32> {
    let invalid = || Error::parse(format!("invalid timezone: {}", s));

    if s.len() != 5 || !s.is_ascii() {
        return Err(invalid());
    }

    let sign = match s.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid()),
    };
    if !s.as_bytes()[1..].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let hours: i32 = s[1..3].parse().map_err(|_| invalid())?;
    let minutes: i32 = s[3..5].parse().map_err(|_| invalid())?;

    Ok(sign * (hours * 60 + minutes))
}

/// An author or committer: who, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    contributor: Contributor,
    when: GitTime,
}

impl Signature {
    /// Creates a new Signature.
    pub fn new(contributor: Contributor, when: GitTime) -> Self {
        Signature { contributor, when }
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        self.contributor.name()
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        self.contributor.email()
    }

    /// Returns the identity part.
    pub fn contributor(&self) -> &Contributor {
        &self.contributor
    }

    /// Returns the date part.
    pub fn when(&self) -> GitTime {
        self.when
    }

    /// Parses `Name <email> timestamp timezone`.
    pub fn parse(s: &str) -> Result<Self> {
        let (when, rest) = strip_date(s)?;
        let contributor = Contributor::parse(rest)?;
        Ok(Signature { contributor, when })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.contributor, self.when)
    }
}
