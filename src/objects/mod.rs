//! Git object types (blob, tree, commit, tag).

pub mod blob;
pub mod commit;
pub mod oid;
pub mod pack;
pub mod reader;
pub mod signature;
pub mod store;
pub mod tag;
pub mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use oid::{is_syntactically_valid, try_normalize, Oid};
pub use pack::{PackDescriptor, PackResolver};
pub use reader::{ObjectHeader, ObjectReader};
pub use signature::{strip_date, Contributor, GitTime, Signature};
pub use store::{ObjectStore, StoreOptions};
pub use tag::Tag;
pub use tree::{FileMode, Tree, TreeEntry};

use crate::error::{Error, Result};
use crate::infra::hash_object;

/// The type of a Git object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// A blob (file content).
    Blob,
    /// A tree (directory listing).
    Tree,
    /// A commit.
    Commit,
    /// A tag.
    Tag,
}

impl ObjectType {
    /// Returns the type name as used in Git object headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Parses a type name from a Git object header.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(ObjectType::Blob),
            "tree" => Some(ObjectType::Tree),
            "commit" => Some(ObjectType::Commit),
            "tag" => Some(ObjectType::Tag),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The contract shared by every object variant.
///
/// `deserialize` receives a reader positioned at the start of the payload
/// (the header has already been consumed) and the store, which the variant
/// may use to resolve identifiers it refers to. When `oid` is `None` the
/// variant computes its identifier from the reader's content.
pub trait StorableObject: Sized + Into<Object> + TryFrom<Object, Error = Error> {
    /// The header type tag this variant is stored under.
    const KIND: ObjectType;

    /// Returns the identifier this object was loaded under.
    fn oid(&self) -> &Oid;

    /// Populates the variant from an object reader.
    fn deserialize(
        oid: Option<Oid>,
        reader: &mut ObjectReader<'_>,
        store: &ObjectStore,
    ) -> Result<Self>;

    /// Encodes the payload back to bytes (without the header).
    fn serialize(&self) -> Result<Vec<u8>>;

    /// Hashes the serialized payload under this variant's header.
    fn compute_oid(&self) -> Result<Oid> {
        let payload = self.serialize()?;
        Ok(Oid::from_bytes(hash_object(Self::KIND.as_str(), &payload)))
    }
}

/// A unified enum representing any Git object type.
#[derive(Debug, Clone)]
pub enum Object {
    /// A blob object containing file content.
    Blob(Blob),
    /// A tree object containing directory entries.
    Tree(Tree),
    /// A commit object containing commit metadata.
    Commit(Commit),
    /// A tag object, lightweight or annotated.
    Tag(Tag),
}

impl Object {
    /// Returns the type of this object.
    pub fn kind(&self) -> ObjectType {
        match self {
            Object::Blob(_) => ObjectType::Blob,
            Object::Tree(_) => ObjectType::Tree,
            Object::Commit(_) => ObjectType::Commit,
            Object::Tag(_) => ObjectType::Tag,
        }
    }

    /// Returns the identifier of the inner object.
    pub fn oid(&self) -> &Oid {
        match self {
            Object::Blob(blob) => blob.oid(),
            Object::Tree(tree) => tree.oid(),
            Object::Commit(commit) => commit.oid(),
            Object::Tag(tag) => tag.oid(),
        }
    }

    /// Encodes the inner object's payload.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        match self {
            Object::Blob(blob) => blob.serialize(),
            Object::Tree(tree) => tree.serialize(),
            Object::Commit(commit) => commit.serialize(),
            Object::Tag(tag) => tag.serialize(),
        }
    }

    /// Returns a reference to the inner Blob if this is a Blob object.
    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Object::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    /// Returns a reference to the inner Tree if this is a Tree object.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Object::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns a reference to the inner Commit if this is a Commit object.
    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            Object::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    /// Returns a reference to the inner Tag if this is a Tag object.
    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Object::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Consumes this Object and returns the inner Blob if this is a Blob object.
    pub fn into_blob(self) -> Option<Blob> {
        match self {
            Object::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    /// Consumes this Object and returns the inner Tree if this is a Tree object.
    pub fn into_tree(self) -> Option<Tree> {
        match self {
            Object::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Consumes this Object and returns the inner Commit if this is a Commit object.
    pub fn into_commit(self) -> Option<Commit> {
        match self {
            Object::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    /// Consumes this Object and returns the inner Tag if this is a Tag object.
    pub fn into_tag(self) -> Option<Tag> {
        match self {
            Object::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    fn mismatch(&self, expected: ObjectType) -> Error {
        Error::TypeMismatch {
            expected: expected.as_str(),
            actual: self.kind().as_str(),
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Object::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Object::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Object::Commit(commit)
    }
}

impl From<Tag> for Object {
    fn from(tag: Tag) -> Self {
        Object::Tag(tag)
    }
}

impl TryFrom<Object> for Blob {
    type Error = Error;

    fn try_from(object: Object) -> Result<Self> {
        match object {
            Object::Blob(blob) => Ok(blob),
            other => Err(other.mismatch(ObjectType::Blob)),
        }
    }
}

impl TryFrom<Object> for Tree {
    type Error = Error;

    fn try_from(object: Object) -> Result<Self> {
        match object {
            Object::Tree(tree) => Ok(tree),
            other => Err(other.mismatch(ObjectType::Tree)),
        }
    }
}

impl TryFrom<Object> for Commit {
    type Error = Error;

    fn try_from(object: Object) -> Result<Self> {
        match object {
            Object::Commit(commit) => Ok(commit),
            other => Err(other.mismatch(ObjectType::Commit)),
        }
    }
}

impl TryFrom<Object> for Tag {
    type Error = Error;

    fn try_from(object: Object) -> Result<Self> {
        match object {
            Object::Tag(tag) => Ok(tag),
            other => Err(other.mismatch(ObjectType::Tag)),
        }
    }
}
