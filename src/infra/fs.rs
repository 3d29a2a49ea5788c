//! Filesystem utilities for file reading and directory listing.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads the entire contents of a file as bytes.
///
/// # Arguments
///
/// * `path` - The path to the file to read.
///
/// # Returns
///
/// The file contents as a byte vector, `Error::PathNotFound` if the file
/// does not exist, or `Error::Io` for any other failure.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound(path.as_ref().to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

/// Lists the names of the regular files directly inside `dir`, sorted.
///
/// A missing directory yields an empty list.
pub fn list_file_names<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir.as_ref()) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");
        fs::write(&path, b"Hello, World!").unwrap();

        let content = read_file(&path).unwrap();
        assert_eq!(content, b"Hello, World!");
    }

    #[test]
    fn test_read_file_not_found() {
        let temp = TempDir::new().unwrap();
        let result = read_file(temp.path().join("nonexistent.txt"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_list_file_names_sorted_files_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.idx"), b"").unwrap();
        fs::write(temp.path().join("a.pack"), b"").unwrap();
        fs::create_dir(temp.path().join("subdir")).unwrap();

        let names = list_file_names(temp.path()).unwrap();
        assert_eq!(names, vec!["a.pack", "b.idx"]);
    }

    #[test]
    fn test_list_file_names_missing_dir() {
        let temp = TempDir::new().unwrap();
        let names = list_file_names(temp.path().join("missing")).unwrap();
        assert!(names.is_empty());
    }
}
