//! Temporary storage for uploaded documents and conversion results.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use uuid::Uuid;

use crate::error::PandocApiError;

/// An uploaded document persisted to the temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Absolute location of the stored bytes.
    pub path: Utf8PathBuf,
    /// File name supplied by the client.
    pub original_name: String,
}

/// Flat directory holding uploads and converter output.
#[derive(Debug)]
pub struct UploadStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl UploadStore {
    /// Opens `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`PandocApiError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(root: &Utf8Path) -> Result<Self, PandocApiError> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(|source| {
            PandocApiError::Io {
                path: root.to_path_buf(),
                source,
            }
        })?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(|source| {
            PandocApiError::Io {
                path: root.to_path_buf(),
                source,
            }
        })?;
        Ok(Self {
            root: root.to_path_buf(),
            dir,
        })
    }

    /// Directory backing the store.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Writes `contents` under a fresh unique name keeping the original
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns [`PandocApiError::Io`] when the file cannot be written.
    pub fn store(&self, original_name: &str, contents: &[u8]) -> Result<StoredUpload, PandocApiError> {
        let file_name = unique_name(original_name);
        let path = self.root.join(&file_name);
        self.dir
            .write(&file_name, contents)
            .map_err(|source| PandocApiError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(StoredUpload {
            path,
            original_name: original_name.to_owned(),
        })
    }

    /// Reads a file previously placed in the store.
    ///
    /// # Errors
    ///
    /// Returns [`PandocApiError::Io`] when `path` lies outside the store or
    /// cannot be read.
    pub fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, PandocApiError> {
        let name = self.entry_name(path)?;
        self.dir.read(name).map_err(|source| PandocApiError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Deletes a file previously placed in the store.
    ///
    /// # Errors
    ///
    /// Returns [`PandocApiError::Io`] when `path` lies outside the store or
    /// cannot be removed.
    pub fn remove(&self, path: &Utf8Path) -> Result<(), PandocApiError> {
        let name = self.entry_name(path)?;
        self.dir.remove_file(name).map_err(|source| PandocApiError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn entry_name<'a>(&self, path: &'a Utf8Path) -> Result<&'a str, PandocApiError> {
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if parent == self.root.as_path() => Ok(name),
            _ => Err(PandocApiError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("path is outside {}", self.root),
                ),
            }),
        }
    }
}

fn unique_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    sanitized_extension(original_name)
        .map_or_else(|| id.to_string(), |extension| format!("{id}.{extension}"))
}

fn sanitized_extension(original_name: &str) -> Option<&str> {
    Utf8Path::new(original_name)
        .extension()
        .filter(|extension| {
            !extension.is_empty() && extension.chars().all(|ch| ch.is_ascii_alphanumeric())
        })
}
