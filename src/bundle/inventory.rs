//! Directory walk and file classification

use std::collections::BTreeSet;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};
use wax::{CandidatePath, Glob, Pattern};

use crate::config::ValidatorConfig;
use crate::path_utils;

/// Names that are never part of a bundle, wherever they appear
const SYSTEM_NAMES: &[&str] = &["__pycache__", "node_modules", "Thumbs.db", "desktop.ini"];

/// Role of a file, derived from the folder it lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    Script,
    Reference,
    Asset,
    Other,
}

/// One inventoried file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Bundle-relative path with forward slashes
    pub path: String,
    pub kind: FileKind,
    pub size: u64,
    pub executable: bool,
}

/// An entry the walk could not read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unreadable {
    pub path: String,
    pub reason: String,
}

pub(super) struct Walk {
    pub files: Vec<InventoryEntry>,
    pub directories: BTreeSet<String>,
    pub unreadable: Vec<Unreadable>,
}

/// Classify a bundle-relative path by its first component
pub fn classify(relative: &str, config: &ValidatorConfig) -> FileKind {
    let Some((first, _)) = relative.split_once('/') else {
        return FileKind::Other;
    };
    if first == config.scripts_dir {
        FileKind::Script
    } else if first == config.references_dir {
        FileKind::Reference
    } else if first == config.assets_dir {
        FileKind::Asset
    } else {
        FileKind::Other
    }
}

/// Check if a glob pattern matches a bundle-relative path
fn matches_glob(pattern: &str, relative: &str) -> bool {
    let candidate = CandidatePath::from(relative);
    match Glob::new(pattern) {
        Ok(glob) => glob.matched(&candidate).is_some(),
        Err(_) => pattern == relative,
    }
}

fn is_excluded(relative: &str, config: &ValidatorConfig, output_rel: Option<&str>) -> bool {
    let hidden_or_system = relative
        .split('/')
        .any(|part| part.starts_with('.') || SYSTEM_NAMES.contains(&part));
    if hidden_or_system {
        return true;
    }
    if relative.split('/').next() == Some(config.output_dir.as_str()) {
        return true;
    }
    if let Some(output) = output_rel {
        if relative == output || relative.starts_with(&format!("{output}/")) {
            return true;
        }
    }
    config.exclude.iter().any(|p| matches_glob(p, relative))
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}

pub(super) fn walk(root: &Path, config: &ValidatorConfig, output_rel: Option<&str>) -> Walk {
    let mut files = Vec::new();
    let mut directories = BTreeSet::new();
    let mut unreadable = Vec::new();

    let relative = |entry: &DirEntry| path_utils::relative_to(entry.path(), root);

    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            relative(entry).is_none_or(|rel| !is_excluded(&rel, config, output_rel))
        });

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .and_then(|p| path_utils::relative_to(p, root))
                    .unwrap_or_default();
                tracing::warn!("cannot read {}: {}", path, err);
                unreadable.push(Unreadable {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        let Some(rel) = relative(&entry) else {
            continue;
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            tracing::debug!("skipping symlink {}", rel);
        } else if file_type.is_dir() {
            directories.insert(rel);
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(metadata) => files.push(InventoryEntry {
                    kind: classify(&rel, config),
                    size: metadata.len(),
                    executable: is_executable(&metadata),
                    path: rel,
                }),
                Err(err) => unreadable.push(Unreadable {
                    path: rel,
                    reason: err.to_string(),
                }),
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    unreadable.sort_by(|a, b| a.path.cmp(&b.path));

    Walk {
        files,
        directories,
        unreadable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let config = ValidatorConfig::default();
        assert_eq!(classify("scripts/run.py", &config), FileKind::Script);
        assert_eq!(classify("references/a/b.md", &config), FileKind::Reference);
        assert_eq!(classify("assets/logo.png", &config), FileKind::Asset);
        assert_eq!(classify("scripts", &config), FileKind::Other);
        assert_eq!(classify("SKILL.md", &config), FileKind::Other);
        assert_eq!(classify("docs/scripts/run.py", &config), FileKind::Other);
    }

    #[test]
    fn test_is_excluded() {
        let config = ValidatorConfig::default();
        assert!(is_excluded(".git", &config, None));
        assert!(is_excluded("scripts/.cache/x", &config, None));
        assert!(is_excluded("scripts/__pycache__", &config, None));
        assert!(is_excluded("dist", &config, None));
        assert!(is_excluded("out/a.tar.gz", &config, Some("out")));
        assert!(!is_excluded("outline.md", &config, Some("out")));
        assert!(!is_excluded("scripts/run.py", &config, None));
    }

    #[test]
    fn test_matches_glob() {
        assert!(matches_glob("**/*.bak", "scripts/run.py.bak"));
        assert!(matches_glob("*.bak", "x.bak"));
        assert!(!matches_glob("*.bak", "scripts/x.py"));
    }
}
