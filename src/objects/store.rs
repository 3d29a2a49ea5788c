//! Storage gateway over the loose object directory.
//!
//! An id maps to `<objects>/<first 2 hex>/<remaining 38 hex>`. The file is
//! decompressed, its header read, and the payload handed to the variant the
//! header names. Ids with no loose file are offered to the enumerated packs.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::oid::{is_syntactically_valid, try_normalize, Oid};
use super::pack::{enumerate_packs, PackDescriptor, PackResolver};
use super::reader::ObjectReader;
use super::{Blob, Commit, Object, ObjectType, StorableObject, Tag, Tree};
use crate::error::{Error, Result};
use crate::infra::{decompress, decompress_file};

/// Integrity checks applied when an object is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Reject objects whose header length differs from the payload length.
    pub verify_length: bool,
    /// Re-hash objects loaded under a known id and reject mismatches.
    pub verify_hash: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            verify_length: true,
            verify_hash: false,
        }
    }
}

/// Read-only access to the objects of one repository.
///
/// Nothing is cached: every lookup reads and inflates the file again.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
    options: StoreOptions,
    packs: Vec<PackDescriptor>,
}

impl ObjectStore {
    /// Opens the store rooted at `objects_dir`, listing its packs once.
    pub fn new<P: AsRef<Path>>(objects_dir: P, options: StoreOptions) -> Result<Self> {
        let objects_dir = objects_dir.as_ref().to_path_buf();
        let packs = enumerate_packs(&objects_dir.join("pack"))?;
        Ok(ObjectStore {
            objects_dir,
            options,
            packs,
        })
    }

    /// Returns the objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Returns the integrity options in effect.
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Returns the packs found when the store was opened.
    pub fn packs(&self) -> &[PackDescriptor] {
        &self.packs
    }

    /// Converts an Oid to the path of its loose object file.
    ///
    /// For example, `da39a3ee5e6b4b0d3255bfef95601890afd80709` becomes
    /// `objects/da/39a3ee5e6b4b0d3255bfef95601890afd80709`.
    pub fn loose_path(&self, oid: &Oid) -> PathBuf {
        let hex = oid.to_hex();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }

    /// Returns true if a loose file exists for `oid`.
    pub fn contains(&self, oid: &Oid) -> bool {
        self.loose_path(oid).is_file()
    }

    /// Loads the object named by a 40-digit hex id.
    ///
    /// A malformed id fails with `Error::InvalidOid` before the filesystem
    /// is touched.
    pub fn get_object(&self, id: &str) -> Result<Object> {
        self.read(&parse_id(id)?)
    }

    /// Loads the object named by `id` and converts it to `T`.
    ///
    /// Fails with `Error::TypeMismatch` if the stored object is another kind.
    pub fn get<T: StorableObject>(&self, id: &str) -> Result<T> {
        T::try_from(self.get_object(id)?)
    }

    /// Loads the object with the given id.
    pub fn read(&self, oid: &Oid) -> Result<Object> {
        let framed = self.load_framed(oid)?;
        self.parse_object(&framed, Some(*oid))
    }

    /// Returns the type the stored object's header declares.
    pub fn kind_of(&self, oid: &Oid) -> Result<ObjectType> {
        let framed = self.load_framed(oid)?;
        let header = ObjectReader::new(&framed).read_object_header()?;
        parse_kind(&header.type_name)
    }

    /// Decompresses a loose object held in memory and parses it.
    pub fn load_compressed(&self, compressed: &[u8], oid: Option<Oid>) -> Result<Object> {
        let framed = decompress(compressed)?;
        self.parse_object(&framed, oid)
    }

    /// Parses decompressed `"<type> <len>\0<payload>"` bytes.
    ///
    /// A supplied `oid` is trusted unless `verify_hash` is set; without one
    /// the id is computed from the content.
    pub fn parse_object(&self, framed: &[u8], oid: Option<Oid>) -> Result<Object> {
        let mut reader = ObjectReader::new(framed);
        let header = reader.read_object_header()?;
        let kind = parse_kind(&header.type_name)?;

        if self.options.verify_length && header.declared_len != reader.remaining() {
            return Err(Error::parse(format!(
                "length mismatch: header says {} but payload is {} bytes",
                header.declared_len,
                reader.remaining()
            )));
        }

        if let Some(expected) = oid.filter(|_| self.options.verify_hash) {
            let actual = reader.compute_identifier();
            if actual != expected {
                return Err(Error::parse(format!(
                    "hash mismatch: expected {}, content hashes to {}",
                    expected, actual
                )));
            }
        }

        trace!(kind = %kind, len = header.declared_len, "dispatching object");
        match kind {
            ObjectType::Blob => Blob::deserialize(oid, &mut reader, self).map(Object::from),
            ObjectType::Tree => Tree::deserialize(oid, &mut reader, self).map(Object::from),
            ObjectType::Commit => Commit::deserialize(oid, &mut reader, self).map(Object::from),
            ObjectType::Tag => Tag::deserialize(oid, &mut reader, self).map(Object::from),
        }
    }

    fn load_framed(&self, oid: &Oid) -> Result<Vec<u8>> {
        let path = self.loose_path(oid);
        match decompress_file(&path) {
            Err(Error::PathNotFound(_)) => {
                debug!(oid = %oid, "no loose object, trying packs");
                self.resolve_packed(oid)
            }
            other => other,
        }
    }

    fn resolve_packed(&self, oid: &Oid) -> Result<Vec<u8>> {
        for pack in &self.packs {
            if let Some(framed) = pack.resolve(oid)? {
                return Ok(framed);
            }
        }
        Err(Error::ObjectNotFound(oid.to_hex()))
    }
}

fn parse_id(id: &str) -> Result<Oid> {
    if !is_syntactically_valid(id) {
        return Err(Error::InvalidOid(id.to_string()));
    }
    try_normalize(id).ok_or_else(|| Error::InvalidOid(id.to_string()))
}

fn parse_kind(type_name: &str) -> Result<ObjectType> {
    ObjectType::parse(type_name)
        .ok_or_else(|| Error::parse(format!("unknown object type: {}", type_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::hash_object;
    use miniz_oxide::deflate::compress_to_vec_zlib;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a loose object file
    fn create_loose_object(objects_dir: &Path, content: &[u8], object_type: &str) -> Oid {
        let header = format!("{} {}\0", object_type, content.len());
        let mut raw = header.into_bytes();
        raw.extend_from_slice(content);

        let oid = Oid::from_bytes(hash_object(object_type, content));
        write_compressed(objects_dir, &oid, &raw);
        oid
    }

    fn write_compressed(objects_dir: &Path, oid: &Oid, framed: &[u8]) {
        let hex = oid.to_hex();
        let object_path = objects_dir.join(&hex[..2]).join(&hex[2..]);
        fs::create_dir_all(object_path.parent().unwrap()).unwrap();
        fs::write(&object_path, compress_to_vec_zlib(framed, 6)).unwrap();
    }

    fn setup() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let objects_dir = temp_dir.path().join("objects");
        fs::create_dir(&objects_dir).unwrap();
        (temp_dir, objects_dir)
    }

    fn open(objects_dir: &Path) -> ObjectStore {
        ObjectStore::new(objects_dir, StoreOptions::default()).unwrap()
    }

    const MISSING: &str = "0000000000000000000000000000000000000000";

    // S-001: loose_path splits the id after two digits
    #[test]
    fn test_loose_path() {
        let store = open(Path::new("/nonexistent/objects"));
        let oid = Oid::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(
            store.loose_path(&oid),
            Path::new("/nonexistent/objects/da/39a3ee5e6b4b0d3255bfef95601890afd80709")
        );
    }

    // S-002: get_object returns the blob content
    #[test]
    fn test_read_blob() {
        let (_temp, objects_dir) = setup();
        let oid = create_loose_object(&objects_dir, b"Hello, World!", "blob");

        let store = open(&objects_dir);
        let obj = store.get_object(&oid.to_hex()).unwrap();

        assert_eq!(obj.kind(), ObjectType::Blob);
        assert_eq!(obj.oid(), &oid);
        assert_eq!(obj.as_blob().unwrap().content(), b"Hello, World!");
    }

    // S-003: dispatch covers every object type
    #[test]
    fn test_read_different_types() {
        let (_temp, objects_dir) = setup();
        let blob = create_loose_object(&objects_dir, b"blob content", "blob");
        let tree = create_loose_object(&objects_dir, b"", "tree");
        let commit_body = format!(
            "tree {}\nauthor A <a@x> 1 +0000\ncommitter A <a@x> 1 +0000\n\nmsg\n",
            tree
        );
        let commit = create_loose_object(&objects_dir, commit_body.as_bytes(), "commit");
        let tag = create_loose_object(&objects_dir, commit.as_bytes(), "tag");

        let store = open(&objects_dir);
        assert_eq!(store.read(&blob).unwrap().kind(), ObjectType::Blob);
        assert_eq!(store.read(&tree).unwrap().kind(), ObjectType::Tree);
        assert_eq!(store.read(&commit).unwrap().kind(), ObjectType::Commit);

        let tag = store.read(&tag).unwrap().into_tag().unwrap();
        assert_eq!(tag.target(), &commit);
        assert_eq!(tag.target_kind(), ObjectType::Commit);
        assert_eq!(store.kind_of(&tree).unwrap(), ObjectType::Tree);
    }

    // S-004: missing object with no packs is ObjectNotFound
    #[test]
    fn test_read_not_found() {
        let (_temp, objects_dir) = setup();
        fs::create_dir(objects_dir.join("pack")).unwrap();

        let store = open(&objects_dir);
        let result = store.get_object(MISSING);
        assert!(matches!(result, Err(Error::ObjectNotFound(ref id)) if id == MISSING));
    }

    #[test]
    fn test_read_with_packs_not_implemented() {
        let (_temp, objects_dir) = setup();
        let pack_dir = objects_dir.join("pack");
        fs::create_dir(&pack_dir).unwrap();
        fs::write(pack_dir.join("pack-abc.pack"), b"PACK").unwrap();
        fs::write(pack_dir.join("pack-abc.idx"), b"").unwrap();

        let store = open(&objects_dir);
        assert_eq!(store.packs().len(), 1);
        assert!(matches!(
            store.get_object(MISSING),
            Err(Error::NotImplemented(_))
        ));

        // Loose objects still win
        let oid = create_loose_object(&objects_dir, b"loose", "blob");
        assert!(store.read(&oid).is_ok());
    }

    // S-005: contains() checks the loose file
    #[test]
    fn test_contains() {
        let (_temp, objects_dir) = setup();
        let oid = create_loose_object(&objects_dir, b"test", "blob");
        let store = open(&objects_dir);

        assert!(store.contains(&oid));
        assert!(!store.contains(&Oid::from_hex(MISSING).unwrap()));
    }

    #[test]
    fn test_invalid_id_rejected_before_io() {
        // The directory does not exist; only validation can answer.
        let store = open(Path::new("/nonexistent/objects"));
        for id in ["", "abc", "zz39a3ee5e6b4b0d3255bfef95601890afd80709", "../../etc/passwd"] {
            assert!(matches!(store.get_object(id), Err(Error::InvalidOid(_))));
        }
    }

    #[test]
    fn test_uppercase_id_accepted() {
        let (_temp, objects_dir) = setup();
        let oid = create_loose_object(&objects_dir, b"upper", "blob");
        let store = open(&objects_dir);
        let obj = store.get_object(&oid.to_hex().to_uppercase()).unwrap();
        assert_eq!(obj.oid(), &oid);
    }

    #[test]
    fn test_typed_get() {
        let (_temp, objects_dir) = setup();
        let oid = create_loose_object(&objects_dir, b"typed", "blob");
        let store = open(&objects_dir);

        let blob: Blob = store.get(&oid.to_hex()).unwrap();
        assert_eq!(blob.content(), b"typed");

        let result = store.get::<Commit>(&oid.to_hex());
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: "commit",
                actual: "blob"
            })
        ));
    }

    // S-010: malformed framing
    #[test]
    fn test_parse_malformed() {
        let store = open(Path::new("/nonexistent/objects"));

        // Missing null byte
        assert!(matches!(store.parse_object(b"blob 5", None), Err(Error::Parse(_))));

        // Unknown type
        assert!(matches!(
            store.parse_object(b"blurb 5\0abcde", None),
            Err(Error::Parse(_))
        ));

        // Size mismatch
        assert!(matches!(
            store.parse_object(b"blob 10\0hello", None),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_length_check_can_be_disabled() {
        let options = StoreOptions {
            verify_length: false,
            ..StoreOptions::default()
        };
        let store = ObjectStore::new("/nonexistent/objects", options).unwrap();
        let obj = store.parse_object(b"blob 10\0hello", None).unwrap();
        assert_eq!(obj.as_blob().unwrap().content(), b"hello");
    }

    #[test]
    fn test_supplied_oid_trusted() {
        let store = open(Path::new("/nonexistent/objects"));
        let supplied = Oid::from_bytes([9u8; 20]);
        let obj = store.parse_object(b"blob 5\0hello", Some(supplied)).unwrap();
        assert_eq!(obj.oid(), &supplied);

        let computed = store.parse_object(b"blob 6\0hello\n", None).unwrap();
        assert_eq!(
            computed.oid().to_hex(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
    }

    #[test]
    fn test_verify_hash_detects_renamed_file() {
        let (_temp, objects_dir) = setup();
        let wrong = Oid::from_bytes([0xab; 20]);
        write_compressed(&objects_dir, &wrong, b"blob 5\0hello");

        assert!(open(&objects_dir).read(&wrong).is_ok());

        let options = StoreOptions {
            verify_hash: true,
            ..StoreOptions::default()
        };
        let store = ObjectStore::new(&objects_dir, options).unwrap();
        assert!(matches!(store.read(&wrong), Err(Error::Parse(_))));
    }

    #[test]
    fn test_load_compressed() {
        let store = open(Path::new("/nonexistent/objects"));
        let compressed = compress_to_vec_zlib(b"blob 6\0hello\n", 6);
        let obj = store.load_compressed(&compressed, None).unwrap();
        assert_eq!(obj.as_blob().unwrap().content(), b"hello\n");

        assert!(matches!(
            store.load_compressed(&compressed[..compressed.len() / 2], None),
            Err(Error::DecompressionFailed)
        ));
    }

    #[test]
    fn test_corrupt_file() {
        let (_temp, objects_dir) = setup();
        let oid = Oid::from_bytes([0x11; 20]);
        let compressed = compress_to_vec_zlib(b"blob 5\0hello", 6);
        let hex = oid.to_hex();
        fs::create_dir_all(objects_dir.join(&hex[..2])).unwrap();
        fs::write(objects_dir.join(&hex[..2]).join(&hex[2..]), &compressed[..4]).unwrap();

        let store = open(&objects_dir);
        assert!(matches!(store.read(&oid), Err(Error::DecompressionFailed)));
    }

    // S-016: large content
    #[test]
    fn test_read_large_content() {
        let (_temp, objects_dir) = setup();
        let content: Vec<u8> = (0..1024 * 1024).map(|i| (i % 256) as u8).collect();
        let oid = create_loose_object(&objects_dir, &content, "blob");

        let blob = open(&objects_dir).read(&oid).unwrap().into_blob().unwrap();
        assert_eq!(blob.content(), &content[..]);
    }
}
