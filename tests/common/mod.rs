//! Scratch repositories for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dotgit::Oid;
use miniz_oxide::deflate::compress_to_vec_zlib;
use sha1::{Digest, Sha1};
use tempfile::TempDir;

/// A minimal `.git` layout in a temporary directory.
pub struct TestRepo {
    pub temp: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join(".git");
        fs::create_dir_all(git_dir.join("objects")).unwrap();
        fs::create_dir_all(git_dir.join("refs/heads")).unwrap();
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        TestRepo { temp }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.temp.path().join(".git/objects")
    }

    /// Writes a well-formed loose object and returns its id.
    pub fn write_object(&self, kind: &str, content: &[u8]) -> Oid {
        let framed = frame(kind, content);
        let oid = sha1_of(&framed);
        self.write_raw(&oid, &compress_to_vec_zlib(&framed, 6));
        oid
    }

    /// Writes arbitrary bytes at the loose path of `oid`.
    pub fn write_raw(&self, oid: &Oid, bytes: &[u8]) {
        let hex = oid.to_hex();
        let dir = self.objects_dir().join(&hex[..2]);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(&hex[2..]), bytes).unwrap();
    }

    pub fn add_pack_files(&self, stem: &str) {
        let pack_dir = self.objects_dir().join("pack");
        fs::create_dir_all(&pack_dir).unwrap();
        fs::write(pack_dir.join(format!("{}.pack", stem)), b"PACK").unwrap();
        fs::write(pack_dir.join(format!("{}.idx", stem)), b"").unwrap();
    }
}

pub fn sha1_of(bytes: &[u8]) -> Oid {
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&Sha1::digest(bytes));
    Oid::from_bytes(raw)
}

pub fn frame(kind: &str, content: &[u8]) -> Vec<u8> {
    let mut framed = format!("{} {}\0", kind, content.len()).into_bytes();
    framed.extend_from_slice(content);
    framed
}

pub fn commit_payload(tree: &Oid, parents: &[Oid], message: &str) -> String {
    let mut payload = format!("tree {}\n", tree);
    for parent in parents {
        payload.push_str(&format!("parent {}\n", parent));
    }
    payload.push_str("author Jane Doe <jane@example.com> 1700000000 +0000\n");
    payload.push_str("committer Jane Doe <jane@example.com> 1700000000 +0000\n");
    payload.push('\n');
    payload.push_str(message);
    payload
}

pub fn tree_payload(entries: &[(&str, &str, &Oid)]) -> Vec<u8> {
    let mut payload = Vec::new();
    for (mode, name, oid) in entries {
        payload.extend_from_slice(mode.as_bytes());
        payload.push(b' ');
        payload.extend_from_slice(name.as_bytes());
        payload.push(0);
        payload.extend_from_slice(oid.as_bytes());
    }
    payload
}
