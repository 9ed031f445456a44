//! Bundle inventory and path lookup
//!
//! A [`Bundle`] is a snapshot of everything under the bundle root that would
//! be distributed: hidden and system entries, the packaging output folder and
//! configured exclusions are left out. Lookups answer from the snapshot, so a
//! path that exists on disk but would not be packaged counts as missing.

mod inventory;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub use inventory::{FileKind, InventoryEntry, Unreadable};

use crate::config::ValidatorConfig;
use crate::error::{self, Result};
use crate::path_utils;

/// What a bundle-relative path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolvedKind {
    File,
    Directory,
    Missing,
}

/// A bundle directory and its file inventory
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Canonical bundle root
    pub root: PathBuf,
    /// Entry document, relative to the root
    pub entry: String,
    /// Inventoried files sorted by relative path
    pub files: Vec<InventoryEntry>,
    /// Entries the walk could not read
    pub unreadable: Vec<Unreadable>,
    directories: BTreeSet<String>,
}

impl Bundle {
    /// Walk `root` and build the inventory
    ///
    /// `output_dir` is the packaging destination; when it lies inside the
    /// bundle it is excluded like the configured output folder.
    pub fn open(root: &Path, config: &ValidatorConfig, output_dir: Option<&Path>) -> Result<Self> {
        if !root.is_dir() {
            return Err(error::bundle::not_found(root.display().to_string()));
        }
        let root = dunce::canonicalize(root)
            .map_err(|e| error::fs::read_failed(root.display().to_string(), e.to_string()))?;

        let entry_path = root.join(&config.entry_document);
        if !entry_path.is_file() {
            return Err(error::bundle::entry_not_found(
                entry_path.display().to_string(),
            ));
        }

        let excluded_output = output_dir
            .and_then(|dir| dunce::canonicalize(dir).ok())
            .and_then(|dir| path_utils::relative_to(&dir, &root))
            .filter(|rel| !rel.is_empty());

        let walk = inventory::walk(&root, config, excluded_output.as_deref());
        tracing::debug!(
            files = walk.files.len(),
            directories = walk.directories.len(),
            unreadable = walk.unreadable.len(),
            "inventoried {}",
            root.display()
        );

        Ok(Self {
            root,
            entry: path_utils::to_forward_slashes(Path::new(&config.entry_document)),
            files: walk.files,
            unreadable: walk.unreadable,
            directories: walk.directories,
        })
    }

    /// Absolute path of a bundle-relative path
    pub fn absolute(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    /// Absolute path of the entry document
    pub fn entry_path(&self) -> PathBuf {
        self.absolute(&self.entry)
    }

    /// Look up a normalised bundle-relative path in the inventory
    pub fn resolve(&self, relative: &str) -> ResolvedKind {
        let relative = relative.trim_start_matches("./").trim_end_matches('/');
        if relative.is_empty() || relative == "." {
            return ResolvedKind::Directory;
        }
        if self.file(relative).is_some() {
            ResolvedKind::File
        } else if self.directories.contains(relative) {
            ResolvedKind::Directory
        } else {
            ResolvedKind::Missing
        }
    }

    /// Inventory entry for a file path
    pub fn file(&self, relative: &str) -> Option<&InventoryEntry> {
        self.files
            .binary_search_by(|e| e.path.as_str().cmp(relative))
            .ok()
            .map(|idx| &self.files[idx])
    }

    /// Inventoried files of one kind, in inventory order
    pub fn files_of_kind(&self, kind: FileKind) -> impl Iterator<Item = &InventoryEntry> {
        self.files.iter().filter(move |e| e.kind == kind)
    }

    /// Relative paths of every inventoried file, sorted
    pub fn member_paths(&self) -> Vec<String> {
        self.files.iter().map(|e| e.path.clone()).collect()
    }

    /// Name of the bundle directory
    pub fn dir_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bundle".to_string())
    }
}
