//! Infrastructure utilities (hashing, compression, filesystem).

pub mod compression;
pub mod fs;
pub mod hash;

pub use compression::{decompress, decompress_file};
pub use fs::{list_file_names, read_file};
pub use hash::{hash_bytes, hash_object};
