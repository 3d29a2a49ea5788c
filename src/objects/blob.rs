//! Git blob object implementation.

use super::oid::Oid;
use super::reader::ObjectReader;
use super::store::ObjectStore;
use super::{ObjectType, StorableObject};
use crate::error::{Error, Result};

/// A Git blob object representing file content.
///
/// Blobs store the raw content of files in a Git repository.
/// They do not contain any metadata like filename or permissions;
/// that information is stored in tree objects.
#[derive(Debug, Clone)]
pub struct Blob {
    oid: Oid,
    content: Vec<u8>,
}

impl Blob {
    /// Takes the rest of the reader as the blob content.
    pub fn parse(oid: Oid, reader: &mut ObjectReader<'_>) -> Self {
        Blob {
            oid,
            content: reader.read_to_end().to_vec(),
        }
    }

    /// Returns the raw content of the blob.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content as a UTF-8 string, if valid.
    pub fn content_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|_| Error::InvalidUtf8)
    }

    /// Returns the size of the blob content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the content appears to be binary.
    ///
    /// A file is considered binary if it contains a null byte (0x00)
    /// within the first 8000 bytes, which is the same heuristic
    /// used by Git.
    pub fn is_binary(&self) -> bool {
        let check_len = self.content.len().min(8000);
        self.content[..check_len].contains(&0)
    }
}

impl StorableObject for Blob {
    const KIND: ObjectType = ObjectType::Blob;

    fn oid(&self) -> &Oid {
        &self.oid
    }

    fn deserialize(
        oid: Option<Oid>,
        reader: &mut ObjectReader<'_>,
        _store: &ObjectStore,
    ) -> Result<Self> {
        let oid = oid.unwrap_or_else(|| reader.compute_identifier());
        Ok(Blob::parse(oid, reader))
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        Ok(self.content.clone())
    }
}
