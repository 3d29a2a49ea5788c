//! Positional reader over the decompressed bytes of one object.
//!
//! Every object parser drives an [`ObjectReader`]. The reader only moves
//! forward, except for a single [`ObjectReader::rewind`] back to the start
//! of the payload.

use super::oid::Oid;
use crate::error::{Error, Result};
use crate::infra::hash_bytes;

/// The `"<type> <length>\0"` framing at the start of every object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHeader {
    /// The type tag, e.g. `"commit"`. Not validated here.
    pub type_name: String,
    /// The payload length the header declares.
    pub declared_len: usize,
}

/// A cursor over the framed content of a single object.
#[derive(Debug, Clone)]
pub struct ObjectReader<'a> {
    data: &'a [u8],
    pos: usize,
    payload_start: usize,
    rewound: bool,
}

impl<'a> ObjectReader<'a> {
    /// Creates a reader positioned at the first byte of `data`.
    ///
    /// Until [`read_object_header`](Self::read_object_header) runs, the start
    /// of `data` counts as the start of the payload.
    pub fn new(data: &'a [u8]) -> Self {
        ObjectReader {
            data,
            pos: 0,
            payload_start: 0,
            rewound: false,
        }
    }

    /// Returns the current offset into the underlying content.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the full underlying content, header included.
    pub fn content(&self) -> &'a [u8] {
        self.data
    }

    /// Parses `"<type> <length>\0"` and leaves the reader at the payload.
    pub fn read_object_header(&mut self) -> Result<ObjectHeader> {
        let type_bytes = self.take_until(b' ', "object type")?;
        let type_name = std::str::from_utf8(type_bytes)
            .map_err(|_| Error::parse("invalid UTF-8 in object type"))?
            .to_string();

        let len_bytes = self.take_until(0, "object length")?;
        if len_bytes.is_empty() || !len_bytes.iter().all(u8::is_ascii_digit) {
            return Err(Error::parse(format!(
                "invalid object length: {}",
                String::from_utf8_lossy(len_bytes)
            )));
        }
        // Only ASCII digits remain, so the conversion cannot fail.
        let declared_len = std::str::from_utf8(len_bytes)
            .map_err(|_| Error::InvalidUtf8)?
            .parse::<usize>()
            .map_err(|_| Error::parse("object length out of range"))?;

        self.payload_start = self.pos;
        Ok(ObjectHeader {
            type_name,
            declared_len,
        })
    }

    /// Consumes through the next null byte and returns what preceded it.
    pub fn read_to_null(&mut self) -> Result<&'a [u8]> {
        self.take_until(0, "null-terminated field")
    }

    /// Consumes one token ending at a space or a newline.
    ///
    /// A trailing space is consumed with the token; a newline is left in
    /// place for [`read_line`](Self::read_line).
    pub fn read_word(&mut self) -> Result<&'a [u8]> {
        self.ensure_available(1, "word")?;
        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == b' ' || b == b'\n') {
            Some(end) => {
                self.pos += end;
                if rest[end] == b' ' {
                    self.pos += 1;
                }
                Ok(&rest[..end])
            }
            None => {
                self.pos = self.data.len();
                Ok(rest)
            }
        }
    }

    /// Consumes through the next `\n` and returns the line without it.
    ///
    /// A final line without a terminator is returned whole.
    pub fn read_line(&mut self) -> Result<&'a [u8]> {
        self.ensure_available(1, "line")?;
        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                self.pos += end + 1;
                Ok(&rest[..end])
            }
            None => {
                self.pos = self.data.len();
                Ok(rest)
            }
        }
    }

    /// Consumes exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure_available(n, "byte run")?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consumes everything left. Trimming is up to the caller.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    /// Returns the next `n` bytes without consuming them.
    pub fn peek(&self, n: usize) -> Result<&'a [u8]> {
        self.ensure_available(n, "lookahead")?;
        Ok(&self.data[self.pos..self.pos + n])
    }

    /// Moves back to the start of the payload. Allowed once per reader.
    pub fn rewind(&mut self) -> Result<()> {
        if self.rewound {
            return Err(Error::parse("object reader already rewound"));
        }
        self.rewound = true;
        self.pos = self.payload_start;
        Ok(())
    }

    /// Hashes the whole underlying content, header and payload as framed.
    pub fn compute_identifier(&self) -> Oid {
        Oid::from_bytes(hash_bytes(self.data))
    }

    fn take_until(&mut self, delimiter: u8, what: &str) -> Result<&'a [u8]> {
        let rest = &self.data[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == delimiter)
            .ok_or_else(|| Error::parse(format!("truncated object: unterminated {}", what)))?;
        self.pos += end + 1;
        Ok(&rest[..end])
    }

    fn ensure_available(&self, n: usize, what: &str) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::parse(format!(
                "truncated object: {} needs {} bytes, {} left",
                what,
                n,
                self.remaining()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_object_header() {
        let mut reader = ObjectReader::new(b"blob 5\0hello");
        let header = reader.read_object_header().unwrap();
        assert_eq!(header.type_name, "blob");
        assert_eq!(header.declared_len, 5);
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.remaining(), 5);
        assert_eq!(reader.read_to_end(), b"hello");
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_read_object_header_empty_payload() {
        let mut reader = ObjectReader::new(b"tree 0\0");
        let header = reader.read_object_header().unwrap();
        assert_eq!(header.declared_len, 0);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_read_object_header_malformed() {
        // Missing space
        assert!(ObjectReader::new(b"blob5\0").read_object_header().is_err());
        // Missing null
        assert!(ObjectReader::new(b"blob 5").read_object_header().is_err());
        // Non-numeric length
        assert!(ObjectReader::new(b"blob x\0").read_object_header().is_err());
        assert!(ObjectReader::new(b"blob -1\0").read_object_header().is_err());
        // Empty length
        assert!(ObjectReader::new(b"blob \0").read_object_header().is_err());
    }

    #[test]
    fn test_read_to_null() {
        let mut reader = ObjectReader::new(b"abc\0def\0");
        assert_eq!(reader.read_to_null().unwrap(), b"abc");
        assert_eq!(reader.read_to_null().unwrap(), b"def");
        assert!(reader.is_at_end());
        assert!(matches!(reader.read_to_null(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_read_word_then_line() {
        let mut reader = ObjectReader::new(b"object abc def\ntype commit\n");
        assert_eq!(reader.read_word().unwrap(), b"object");
        assert_eq!(reader.read_line().unwrap(), b"abc def");
        assert_eq!(reader.read_word().unwrap(), b"type");
        assert_eq!(reader.read_word().unwrap(), b"commit");
        // The newline is still there
        assert_eq!(reader.read_line().unwrap(), b"");
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_read_line_unterminated() {
        let mut reader = ObjectReader::new(b"first\nlast");
        assert_eq!(reader.read_line().unwrap(), b"first");
        assert_eq!(reader.read_line().unwrap(), b"last");
        assert!(matches!(reader.read_line(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_read_bytes_past_end() {
        let mut reader = ObjectReader::new(b"abc");
        assert_eq!(reader.read_bytes(2).unwrap(), b"ab");
        assert!(matches!(reader.read_bytes(2), Err(Error::Parse(_))));
        // A failed read does not move the cursor
        assert_eq!(reader.read_bytes(1).unwrap(), b"c");
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut reader = ObjectReader::new(b"tag 3\0xyz");
        reader.read_object_header().unwrap();
        assert_eq!(reader.peek(2).unwrap(), b"xy");
        assert_eq!(reader.peek(3).unwrap(), b"xyz");
        assert!(reader.peek(4).is_err());
        assert_eq!(reader.read_to_end(), b"xyz");
    }

    #[test]
    fn test_rewind_returns_to_payload_once() {
        let mut reader = ObjectReader::new(b"tag 7\0one two");
        reader.read_object_header().unwrap();
        assert_eq!(reader.read_word().unwrap(), b"one");

        reader.rewind().unwrap();
        assert_eq!(reader.read_to_end(), b"one two");

        assert!(matches!(reader.rewind(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_compute_identifier_covers_header() {
        let data = b"blob 6\0hello\n";
        let mut reader = ObjectReader::new(data);
        reader.read_object_header().unwrap();
        reader.read_to_end();
        assert_eq!(
            reader.compute_identifier().to_hex(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
    }
}
