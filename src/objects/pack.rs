//! Enumeration of pack files under `objects/pack`.
//!
//! Packs are listed so lookups can tell "no such object" apart from "the
//! object may be packed". Reading from a pack is not supported.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::oid::Oid;
use crate::error::{Error, Result};
use crate::infra::list_file_names;

/// Something that may hold a framed object for a given id.
pub trait PackResolver {
    /// Returns the decompressed, framed object bytes if this source has them.
    fn resolve(&self, oid: &Oid) -> Result<Option<Vec<u8>>>;
}

/// One pack in the object directory, named by its shared file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackDescriptor {
    name: String,
    base_path: PathBuf,
}

impl PackDescriptor {
    /// Returns the stem, e.g. `pack-1a2b...`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path without extension; `.pack` and `.idx` sit beside it.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl PackResolver for PackDescriptor {
    fn resolve(&self, oid: &Oid) -> Result<Option<Vec<u8>>> {
        Err(Error::NotImplemented(format!(
            "reading {} from pack {}",
            oid, self.name
        )))
    }
}

/// Lists the packs in `pack_dir`, one entry per stem, sorted by name.
///
/// Only files named `pack-<something>.<ext>` count. A missing directory
/// yields an empty list.
pub fn enumerate_packs(pack_dir: &Path) -> Result<Vec<PackDescriptor>> {
    let mut names: Vec<String> = list_file_names(pack_dir)?
        .into_iter()
        .filter_map(|file| {
            let (stem, _ext) = file.split_once('.')?;
            stem.starts_with("pack-").then(|| stem.to_string())
        })
        .collect();
    names.sort();
    names.dedup();

    debug!(dir = %pack_dir.display(), count = names.len(), "enumerated packs");

    Ok(names
        .into_iter()
        .map(|name| PackDescriptor {
            base_path: pack_dir.join(&name),
            name,
        })
        .collect())
}
