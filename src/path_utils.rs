//! Path helpers shared by the resolver, the reference extractor and the packager
//!
//! Bundle-relative paths are always plain strings with forward slashes, so
//! inventory lookups, diagnostics and archive member names agree on every
//! platform.

use std::path::{Component, Path};

/// Characters replaced when a directory name becomes an artifact file name
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', ' '];

/// Convert a path to a forward-slash string
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Relative path of `path` below `root`, with forward slashes
pub fn relative_to(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/")
        })
}

/// Lexically join `target` onto the bundle-relative directory `base`
///
/// `.` segments are dropped and `..` pops a segment. Returns `None` when the
/// result would leave the bundle root, or when `target` is absolute. An empty
/// string means the bundle root itself.
pub fn join_lexical(base: &str, target: &str) -> Option<String> {
    let target = target.replace('\\', "/");
    if target.starts_with('/') || has_drive_prefix(&target) {
        return None;
    }

    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Parent directory of a bundle-relative path (`""` for top-level files)
pub fn parent_of(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Make a directory name safe for use as an artifact file name
///
/// Replaces unsafe characters with hyphens, collapses runs of hyphens and
/// trims them from both ends. Returns "bundle" if nothing is left.
pub fn make_path_safe(name: &str) -> String {
    let key: String = name
        .chars()
        .map(|c| if PATH_UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();

    let mut collapsed = String::with_capacity(key.len());
    for c in key.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        "bundle".to_string()
    } else {
        trimmed.to_string()
    }
}
