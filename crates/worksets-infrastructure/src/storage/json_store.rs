//! JSON files in a directory.
//!
//! The store knows nothing about sessions or worksets; it reads and writes
//! `serde_json::Value`s and leaves validation to the caller.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use worksets_core::WorksetsError;

use super::file_ops::{ensure_parent, write_atomic};

/// Errors that can occur in the JSON store.
#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
}

impl From<JsonStoreError> for WorksetsError {
    fn from(err: JsonStoreError) -> Self {
        match err {
            JsonStoreError::Io(e) => e.into(),
            JsonStoreError::Json(e) => e.into(),
            JsonStoreError::NotFound(path) => {
                WorksetsError::not_found("file", path.display().to_string())
            }
            JsonStoreError::InvalidName(name) => {
                WorksetsError::contract(format!("invalid file name {name:?}"))
            }
        }
    }
}

/// What [`JsonStore::enumerate_children`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerateOptions {
    pub include_files: bool,
    pub include_directories: bool,
    /// 1 lists only direct children.
    pub max_depth: usize,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            include_files: true,
            include_directories: false,
            max_depth: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub is_dir: bool,
    pub depth: usize,
}

/// A directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    directory: PathBuf,
}

impl JsonStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// A store for a subdirectory.
    pub fn child(&self, name: &str) -> Self {
        Self::new(self.directory.join(name))
    }

    /// Resolves `filename` inside the store, refusing anything that could escape it.
    pub fn path_of(&self, filename: &str) -> Result<PathBuf, JsonStoreError> {
        let escapes = filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\', '\0']);
        if escapes {
            return Err(JsonStoreError::InvalidName(filename.to_string()));
        }
        Ok(self.directory.join(filename))
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path_of(filename).is_ok_and(|path| path.exists())
    }

    /// Serializes `value` with one-space indentation and writes it to `filename`.
    ///
    /// Without `append` the file is replaced atomically. With `append` the
    /// document is added to the end of the file. Missing directories are
    /// created. Returns the full path written.
    pub fn save<T: Serialize + ?Sized>(
        &self,
        value: &T,
        filename: &str,
        append: bool,
    ) -> Result<PathBuf, JsonStoreError> {
        let path = self.path_of(filename)?;
        let bytes = to_pretty_json(value)?;

        if append {
            ensure_parent(&path)?;
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        } else {
            write_atomic(&path, &bytes)?;
        }
        debug!("[JsonStore] saved {}", path.display());
        Ok(path)
    }

    /// Reads and parses `filename`.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the file does not exist
    /// - `Json` when it is not valid JSON
    pub fn load(&self, filename: &str) -> Result<Value, JsonStoreError> {
        let path = self.path_of(filename)?;
        Self::load_path(&path)
    }

    /// Reads and parses a file by full path.
    pub fn load_path(path: &Path) -> Result<Value, JsonStoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(JsonStoreError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies `from` to `to` byte-for-byte, both inside the store.
    pub fn copy(&self, from: &str, to: &str) -> Result<PathBuf, JsonStoreError> {
        let source = self.path_of(from)?;
        let target = self.path_of(to)?;
        if !source.exists() {
            return Err(JsonStoreError::NotFound(source));
        }
        let bytes = fs::read(&source)?;
        write_atomic(&target, &bytes)?;
        Ok(target)
    }

    /// Returns `"<stem>.json"`, or `"<stem>-<n>.json"` for the first `n` not yet taken.
    pub fn available_name(&self, stem: &str) -> String {
        let first = format!("{stem}.json");
        if !self.exists(&first) {
            return first;
        }
        (1..)
            .map(|n| format!("{stem}-{n}.json"))
            .find(|candidate| !self.exists(candidate))
            .unwrap_or(first)
    }

    /// Lists the store's contents down to `options.max_depth`, sorted by path.
    ///
    /// A missing directory yields an empty list. Symlinks are never followed.
    pub fn enumerate_children(
        &self,
        options: &EnumerateOptions,
    ) -> Result<Vec<ChildEntry>, JsonStoreError> {
        let mut entries = Vec::new();
        if self.directory.is_dir() {
            walk(&self.directory, 1, options, &mut entries)?;
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

fn walk(
    directory: &Path,
    depth: usize,
    options: &EnumerateOptions,
    entries: &mut Vec<ChildEntry>,
) -> Result<(), JsonStoreError> {
    if depth > options.max_depth {
        return Ok(());
    }
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            continue;
        }
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }

        if file_type.is_dir() {
            if options.include_directories {
                entries.push(ChildEntry {
                    path: path.clone(),
                    file_name,
                    is_dir: true,
                    depth,
                });
            }
            walk(&path, depth + 1, options, entries)?;
        } else if options.include_files {
            entries.push(ChildEntry {
                path,
                file_name,
                is_dir: false,
                depth,
            });
        }
    }
    Ok(())
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b" "));
    value.serialize(&mut serializer)?;
    Ok(bytes)
}
