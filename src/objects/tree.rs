//! Git tree object implementation.

use std::borrow::Cow;

use super::oid::{Oid, OID_BYTES};
use super::reader::ObjectReader;
use super::store::ObjectStore;
use super::{ObjectType, StorableObject};
use crate::error::{Error, Result};

/// File mode for tree entries.
///
/// Git uses specific mode values to represent different types of entries
/// in a tree object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Regular file (non-executable): 100644
    Regular,
    /// Executable file: 100755
    Executable,
    /// Symbolic link: 120000
    Symlink,
    /// Subdirectory (tree): 40000
    Directory,
    /// Git submodule (commit): 160000
    Submodule,
}

impl FileMode {
    /// Parses a file mode from its octal string representation.
    pub fn from_octal(s: &str) -> Option<Self> {
        match s {
            "100644" | "644" => Some(FileMode::Regular),
            "100755" | "755" => Some(FileMode::Executable),
            "120000" => Some(FileMode::Symlink),
            "40000" => Some(FileMode::Directory),
            "160000" => Some(FileMode::Submodule),
            _ => None,
        }
    }

    /// Returns the octal string representation of the mode.
    pub fn as_octal(&self) -> &'static str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Executable => "100755",
            FileMode::Symlink => "120000",
            FileMode::Directory => "40000",
            FileMode::Submodule => "160000",
        }
    }

    /// Returns true if this mode represents a file (blob).
    pub fn is_file(&self) -> bool {
        matches!(
            self,
            FileMode::Regular | FileMode::Executable | FileMode::Symlink
        )
    }

    /// Returns true if this mode represents a directory (tree).
    pub fn is_directory(&self) -> bool {
        matches!(self, FileMode::Directory)
    }

    /// Returns true if this mode represents an executable file.
    pub fn is_executable(&self) -> bool {
        matches!(self, FileMode::Executable)
    }
}

/// An entry in a Git tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// The file mode of the entry.
    mode: FileMode,
    /// The name of the entry, as stored. Git does not require UTF-8.
    name: Vec<u8>,
    /// The object ID that this entry points to.
    oid: Oid,
}

impl TreeEntry {
    /// Returns the file mode of the entry.
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Returns the name of the entry, replacing bytes that are not UTF-8.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Returns the name of the entry as stored.
    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    /// Returns the name of the entry, failing if it is not UTF-8.
    pub fn name_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.name).map_err(|_| Error::InvalidUtf8)
    }

    /// Returns the object ID of the entry.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns true if this entry represents a file (blob).
    pub fn is_file(&self) -> bool {
        self.mode.is_file()
    }

    /// Returns true if this entry represents a directory (tree).
    pub fn is_directory(&self) -> bool {
        self.mode.is_directory()
    }
}

/// A Git tree object representing a directory listing.
///
/// Trees contain entries that map names to either blobs (files) or
/// other trees (subdirectories).
#[derive(Debug, Clone)]
pub struct Tree {
    oid: Oid,
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Parses tree entries until the reader is exhausted.
    ///
    /// Each entry is `<mode> <name>\0<20-byte-sha1>`.
    pub fn parse(oid: Oid, reader: &mut ObjectReader<'_>) -> Result<Self> {
        let mut entries = Vec::new();

        while !reader.is_at_end() {
            let mode_bytes = reader.read_word()?;
            let mode_str = std::str::from_utf8(mode_bytes)
                .map_err(|_| Error::parse("invalid UTF-8 in tree entry mode"))?;
            let mode = FileMode::from_octal(mode_str)
                .ok_or_else(|| Error::parse(format!("unknown file mode: {}", mode_str)))?;

            let name = reader.read_to_null()?.to_vec();

            let raw = reader.read_bytes(OID_BYTES)?;
            let entry_oid = Oid::from_slice(raw)
                .ok_or_else(|| Error::parse("truncated SHA-1 in tree entry"))?;

            entries.push(TreeEntry {
                mode,
                name,
                oid: entry_oid,
            });
        }

        Ok(Tree { oid, entries })
    }

    /// Returns a slice of all entries in the tree.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds an entry by its stored name.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&TreeEntry> {
        let name = name.as_ref();
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }
}

impl StorableObject for Tree {
    const KIND: ObjectType = ObjectType::Tree;

    fn oid(&self) -> &Oid {
        &self.oid
    }

    fn deserialize(
        oid: Option<Oid>,
        reader: &mut ObjectReader<'_>,
        _store: &ObjectStore,
    ) -> Result<Self> {
        let oid = oid.unwrap_or_else(|| reader.compute_identifier());
        Tree::parse(oid, reader)
    }

    /// Re-encodes the entries with canonical modes.
    fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_octal().as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        Ok(out)
    }
}
