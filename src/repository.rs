//! Git repository context.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::objects::{Blob, Commit, Object, ObjectStore, StorableObject, StoreOptions, Tag, Tree};

/// The highest `core.repositoryformatversion` this crate understands.
const MAX_FORMAT_VERSION: i64 = 1;

/// An opened Git repository.
///
/// Holds the repository configuration and its object store. Objects that
/// refer to other objects (such as tags) are resolved through
/// [`store`](Self::store).
#[derive(Debug)]
pub struct Repository {
    /// The directory the repository was opened from.
    path: PathBuf,
    /// The path to the git directory.
    git_dir: PathBuf,
    config: Config,
    store: ObjectStore,
}

impl Repository {
    /// Validates that a directory is a valid Git directory.
    ///
    /// A valid git directory contains at least a `HEAD` file and the
    /// `objects/` and `refs/` directories.
    fn validate_git_dir(git_dir: &Path) -> Result<()> {
        let valid = git_dir.join("HEAD").is_file()
            && git_dir.join("objects").is_dir()
            && git_dir.join("refs").is_dir();
        if !valid {
            return Err(Error::NotARepository(git_dir.to_path_buf()));
        }
        Ok(())
    }

    /// Refuses repositories whose on-disk format differs from loose SHA-1.
    fn check_format(config: &Config) -> Result<()> {
        let version = config
            .get_int("core", "repositoryformatversion")?
            .unwrap_or(0);
        if version > MAX_FORMAT_VERSION {
            return Err(Error::UnsupportedFormat(format!(
                "repositoryformatversion {}",
                version
            )));
        }

        if let Some(format) = config.get("extensions", "objectformat") {
            if !format.eq_ignore_ascii_case("sha1") {
                return Err(Error::UnsupportedFormat(format!("objectformat {}", format)));
            }
        }
        Ok(())
    }

    /// Opens an existing Git repository with default store options.
    ///
    /// The path can point to either:
    /// - The repository root (containing `.git/`)
    /// - The git directory itself (including bare repositories)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dotgit::Repository;
    ///
    /// let repo = Repository::open("path/to/repo").unwrap();
    /// let repo = Repository::open("path/to/repo/.git").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    /// Opens an existing Git repository with explicit store options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        let git_dir = if abs_path.join(".git").is_dir() {
            abs_path.join(".git")
        } else {
            abs_path.clone()
        };
        Self::validate_git_dir(&git_dir)?;

        let config = match Config::from_file(git_dir.join("config")) {
            Ok(config) => config,
            Err(Error::PathNotFound(_)) => Config::default(),
            Err(e) => return Err(e),
        };
        Self::check_format(&config)?;

        let store = ObjectStore::new(git_dir.join("objects"), options)?;
        debug!(
            git_dir = %git_dir.display(),
            packs = store.packs().len(),
            "opened repository"
        );

        Ok(Repository {
            path: abs_path,
            git_dir,
            config,
            store,
        })
    }

    /// Returns the directory the repository was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the git directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Returns the path to the objects directory.
    pub fn objects_dir(&self) -> &Path {
        self.store.objects_dir()
    }

    /// Returns the parsed repository configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Retrieves any object by its 40-digit hex id.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dotgit::{Object, Repository};
    ///
    /// let repo = Repository::open("path/to/repo").unwrap();
    /// match repo.object("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap() {
    ///     Object::Commit(c) => println!("commit: {}", c.summary()),
    ///     Object::Tree(t) => println!("tree with {} entries", t.len()),
    ///     Object::Blob(b) => println!("blob of {} bytes", b.size()),
    ///     Object::Tag(t) => println!("tag on {}", t.target()),
    /// }
    /// ```
    pub fn object(&self, id: &str) -> Result<Object> {
        self.store.get_object(id)
    }

    /// Retrieves an object and converts it to the requested variant.
    pub fn get<T: StorableObject>(&self, id: &str) -> Result<T> {
        self.store.get(id)
    }

    /// Retrieves a commit. Fails with `Error::TypeMismatch` for other kinds.
    pub fn commit(&self, id: &str) -> Result<Commit> {
        self.get(id)
    }

    /// Retrieves a tree.
    pub fn tree(&self, id: &str) -> Result<Tree> {
        self.get(id)
    }

    /// Retrieves a blob.
    pub fn blob(&self, id: &str) -> Result<Blob> {
        self.get(id)
    }

    /// Retrieves a tag.
    pub fn tag(&self, id: &str) -> Result<Tag> {
        self.get(id)
    }
}
