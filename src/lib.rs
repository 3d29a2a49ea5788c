//! # dotgit
//!
//! A read-only, pure Rust accessor for the Git loose object store.
//!
//! Objects are located by id under `.git/objects`, inflated, and parsed into
//! typed values: commits, trees, blobs and tags (both lightweight and
//! annotated). Packed objects are detected but not read.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dotgit::{Object, Repository, Result};
//!
//! fn main() -> Result<()> {
//!     let repo = Repository::open("path/to/repo")?;
//!
//!     let commit = repo.commit("da39a3ee5e6b4b0d3255bfef95601890afd80709")?;
//!     println!("{} by {}", commit.summary(), commit.author().name());
//!
//!     for entry in repo.tree(&commit.tree().to_hex())?.iter() {
//!         println!("{} {}", entry.mode().as_octal(), entry.name());
//!     }
//!
//!     if let Object::Tag(tag) = repo.object("0123456789abcdef0123456789abcdef01234567")? {
//!         println!("annotated: {}", tag.is_annotated());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and Result alias
//! - [`repository`] - `Repository`, the entry point
//! - [`objects`] - Object store, object reader and the object types
//! - [`config`] - Read access to the repository's `config` file

pub mod config;
pub mod error;
pub mod objects;
pub mod repository;

// Internal modules (not part of public API)
pub(crate) mod infra;

pub use config::Config;
pub use error::{Error, Result};
pub use repository::Repository;

pub use objects::{
    Blob, Commit, Contributor, FileMode, GitTime, Object, ObjectStore, ObjectType, Oid,
    Signature, StorableObject, StoreOptions, Tag, Tree, TreeEntry,
};
