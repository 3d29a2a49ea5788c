//! Git commit object implementation.

use std::borrow::Cow;

use super::oid::{try_normalize, Oid};
use super::reader::ObjectReader;
use super::signature::Signature;
use super::store::ObjectStore;
use super::{ObjectType, StorableObject};
use crate::error::{Error, Result};

/// A Git commit object.
///
/// Contains information about a snapshot of the repository including
/// the tree, parent commits, author, committer, and message.
#[derive(Debug, Clone)]
pub struct Commit {
    oid: Oid,
    tree: Oid,
    parents: Vec<Oid>,
    author: Signature,
    committer: Signature,
    /// Every header in stored order, continuation lines joined with `\n`.
    /// Values are raw bytes; `encoding` may name a non-UTF-8 charset.
    headers: Vec<(String, Vec<u8>)>,
    has_body_separator: bool,
    message: Vec<u8>,
}

impl Commit {
    /// Parses a Commit payload.
    ///
    /// Commit format:
    /// ```text
    /// tree <sha1>
    /// parent <sha1>  (zero or more)
    /// author <signature>
    /// committer <signature>
    /// <other headers, continuation lines start with a space>
    ///
    /// <message>
    /// ```
    pub fn parse(oid: Oid, reader: &mut ObjectReader<'_>) -> Result<Self> {
        let mut headers: Vec<(String, Vec<u8>)> = Vec::new();
        let mut has_body_separator = false;

        while !reader.is_at_end() {
            let line = reader.read_line()?;
            if line.is_empty() {
                has_body_separator = true;
                break;
            }

            if let Some(continuation) = line.strip_prefix(b" ") {
                let (_, value) = headers
                    .last_mut()
                    .ok_or_else(|| Error::parse("continuation line before any header"))?;
                value.push(b'\n');
                value.extend_from_slice(continuation);
                continue;
            }

            let (key, value) = match line.iter().position(|&b| b == b' ') {
                Some(space) => (&line[..space], &line[space + 1..]),
                None => (line, &b""[..]),
            };
            let key = std::str::from_utf8(key)
                .map_err(|_| Error::parse("invalid commit header name"))?;
            headers.push((key.to_string(), value.to_vec()));
        }

        let message = reader.read_to_end().to_vec();

        let mut tree: Option<Oid> = None;
        let mut parents = Vec::new();
        let mut author: Option<Signature> = None;
        let mut committer: Option<Signature> = None;

        for (key, value) in &headers {
            match key.as_str() {
                "tree" => tree = Some(embedded_oid("tree", value)?),
                "parent" => parents.push(embedded_oid("parent", value)?),
                "author" => author = Some(Signature::parse(&String::from_utf8_lossy(value))?),
                "committer" => {
                    committer = Some(Signature::parse(&String::from_utf8_lossy(value))?)
                }
                // gpgsig, encoding, mergetag and friends stay in `headers`
                _ => {}
            }
        }

        Ok(Commit {
            oid,
            tree: tree.ok_or_else(|| Error::parse("commit is missing tree"))?,
            parents,
            author: author.ok_or_else(|| Error::parse("commit is missing author"))?,
            committer: committer.ok_or_else(|| Error::parse("commit is missing committer"))?,
            headers,
            has_body_separator,
            message,
        })
    }

    /// Returns the tree object ID.
    pub fn tree(&self) -> &Oid {
        &self.tree
    }

    /// Returns the parent commit IDs.
    pub fn parents(&self) -> &[Oid] {
        &self.parents
    }

    /// Returns the first parent, if any.
    pub fn parent(&self) -> Option<&Oid> {
        self.parents.first()
    }

    /// Returns the author signature.
    pub fn author(&self) -> &Signature {
        &self.author
    }

    /// Returns the committer signature.
    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    /// Returns the raw value of the first header named `key`.
    ///
    /// Multi-line values (such as `gpgsig`) are joined with `\n`.
    pub fn header(&self, key: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the first header named `key` as a string.
    pub fn header_str(&self, key: &str) -> Result<Option<&str>> {
        self.header(key)
            .map(|v| std::str::from_utf8(v).map_err(|_| Error::InvalidUtf8))
            .transpose()
    }

    /// Returns the charset named by the `encoding` header, if any.
    pub fn encoding(&self) -> Option<Cow<'_, str>> {
        self.header("encoding").map(String::from_utf8_lossy)
    }

    /// Returns all headers in the order they were stored.
    pub fn headers(&self) -> &[(String, Vec<u8>)] {
        &self.headers
    }

    /// Returns the full commit message, exactly as stored.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Returns the commit message as a string.
    ///
    /// Fails with `Error::InvalidUtf8` for messages in other encodings.
    pub fn message_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.message).map_err(|_| Error::InvalidUtf8)
    }

    /// Returns the first line of the commit message (the summary).
    ///
    /// Bytes that are not UTF-8 are replaced.
    pub fn summary(&self) -> Cow<'_, str> {
        let line = self.message.split(|&b| b == b'\n').next().unwrap_or(&[]);
        String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(line))
    }

    /// Returns true if this is a root commit (no parents).
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns true if this is a merge commit (multiple parents).
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

impl StorableObject for Commit {
    const KIND: ObjectType = ObjectType::Commit;

    fn oid(&self) -> &Oid {
        &self.oid
    }

    fn deserialize(
        oid: Option<Oid>,
        reader: &mut ObjectReader<'_>,
        _store: &ObjectStore,
    ) -> Result<Self> {
        let oid = oid.unwrap_or_else(|| reader.compute_identifier());
        Commit::parse(oid, reader)
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for (key, value) in &self.headers {
            out.extend_from_slice(key.as_bytes());
            // an empty first line puts the continuation straight after the key
            if !value.is_empty() && !value.starts_with(b"\n") {
                out.push(b' ');
            }
            for &b in value {
                out.push(b);
                if b == b'\n' {
                    out.push(b' ');
                }
            }
            out.push(b'\n');
        }
        if self.has_body_separator {
            out.push(b'\n');
        }
        out.extend_from_slice(&self.message);
        Ok(out)
    }
}

fn embedded_oid(field: &str, value: &[u8]) -> Result<Oid> {
    std::str::from_utf8(value)
        .ok()
        .and_then(try_normalize)
        .ok_or_else(|| {
            Error::parse(format!(
                "invalid {} id: {}",
                field,
                String::from_utf8_lossy(value)
            ))
        })
}
