//! Bundle and frontmatter errors

use super::SkillpackError;

/// Creates a bundle not found error
pub fn not_found(path: impl Into<String>) -> SkillpackError {
    SkillpackError::BundleNotFound { path: path.into() }
}

/// Creates an entry document not found error
pub fn entry_not_found(path: impl Into<String>) -> SkillpackError {
    SkillpackError::EntryNotFound { path: path.into() }
}

/// Creates a frontmatter parse error pointing at a 1-based line
pub fn frontmatter_parse(
    path: impl Into<String>,
    line: usize,
    message: impl Into<String>,
) -> SkillpackError {
    SkillpackError::FrontmatterParse {
        path: path.into(),
        line,
        message: message.into(),
    }
}
