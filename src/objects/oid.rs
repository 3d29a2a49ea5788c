//! Object IDs and identifier validation.
//!
//! Every trust boundary (the store entry point, identifiers embedded in
//! object payloads, identifiers handed in by callers) goes through
//! [`is_syntactically_valid`] or [`try_normalize`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The length of a SHA-1 hash in bytes.
pub const OID_BYTES: usize = 20;

/// The length of a SHA-1 hash as a hexadecimal string.
pub const OID_HEX_LEN: usize = 40;

/// A Git object ID (SHA-1 hash).
///
/// Parsing is case-insensitive; the rendered form is always lower-case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    bytes: [u8; OID_BYTES],
}

impl Oid {
    /// Creates an Oid from a 40-character hexadecimal string.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotgit::objects::Oid;
    ///
    /// let oid = Oid::from_hex("DA39A3EE5E6B4B0D3255BFEF95601890AFD80709").unwrap();
    /// assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != OID_HEX_LEN {
            return Err(Error::InvalidOid(hex.to_string()));
        }

        let mut bytes = [0u8; OID_BYTES];

        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let high =
                hex_digit_to_value(chunk[0]).ok_or_else(|| Error::InvalidOid(hex.to_string()))?;
            let low =
                hex_digit_to_value(chunk[1]).ok_or_else(|| Error::InvalidOid(hex.to_string()))?;
            bytes[i] = (high << 4) | low;
        }

        Ok(Oid { bytes })
    }

    /// Creates an Oid from a 20-byte array.
    pub fn from_bytes(bytes: [u8; OID_BYTES]) -> Self {
        Oid { bytes }
    }

    /// Creates an Oid from a slice holding exactly 20 raw bytes.
    pub fn from_slice(raw: &[u8]) -> Option<Self> {
        let bytes: [u8; OID_BYTES] = raw.try_into().ok()?;
        Some(Oid { bytes })
    }

    /// Returns the hexadecimal string representation of this Oid.
    ///
    /// The returned string is always lowercase and 40 characters long.
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(OID_HEX_LEN);
        for byte in &self.bytes {
            hex.push(HEX_CHARS[(byte >> 4) as usize]);
            hex.push(HEX_CHARS[(byte & 0x0f) as usize]);
        }
        hex
    }

    /// Returns a short (7-character) hexadecimal representation of this Oid.
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// Returns a reference to the raw 20-byte array.
    pub fn as_bytes(&self) -> &[u8; OID_BYTES] {
        &self.bytes
    }
}

/// Returns true if `s` is exactly 40 ASCII hexadecimal digits, in any case.
pub fn is_syntactically_valid(s: &str) -> bool {
    s.len() == OID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validates `s` and returns its canonical Oid, or `None` if invalid.
pub fn try_normalize(s: &str) -> Option<Oid> {
    if !is_syntactically_valid(s) {
        return None;
    }
    Oid::from_hex(s).ok()
}

const HEX_CHARS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

fn hex_digit_to_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.short())
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Oid::from_hex(s)
    }
}
