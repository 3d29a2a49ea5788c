//! Inflation of stored loose objects.
//!
//! Loose objects are zlib streams. The two-byte zlib header is always
//! discarded and the remainder is fed to a raw DEFLATE decoder, so the
//! header bytes are never interpreted and the adler-32 trailer is never
//! checked.

use std::path::Path;

use tracing::debug;

use super::fs::read_file;
use crate::error::{Error, Result};

/// Number of stream-header bytes skipped before inflation.
pub const STREAM_PREFIX_LEN: usize = 2;

/// Inflates an in-memory stored object.
///
/// The first [`STREAM_PREFIX_LEN`] bytes are dropped unconditionally.
/// The output buffer grows as needed, there is no upper bound on the
/// decompressed size.
///
/// # Errors
///
/// Returns `Error::DecompressionFailed` if:
/// - The input is shorter than the stream prefix
/// - The DEFLATE data is corrupted or truncated
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < STREAM_PREFIX_LEN {
        debug!(len = data.len(), "stored object shorter than stream prefix");
        return Err(Error::DecompressionFailed);
    }

    miniz_oxide::inflate::decompress_to_vec(&data[STREAM_PREFIX_LEN..]).map_err(|e| {
        debug!(status = ?e.status, "inflate failed");
        Error::DecompressionFailed
    })
}

/// Inflates the stored object at `path`.
///
/// Same semantics as [`decompress`]. The file is read in one go and its
/// handle is closed before inflation starts, so no handle outlives the call
/// whatever the outcome.
pub fn decompress_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let data = read_file(path)?;
    decompress(&data)
}
