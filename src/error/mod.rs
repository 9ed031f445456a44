//! Error types and handling for Skillpack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! These are the fatal errors that abort a run. Problems that are collected
//! into a validation report are `report::Diagnostic`s, not errors.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Bundle and frontmatter errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//! - [`package`]: Packaging errors

pub mod bundle;
pub mod config;
pub mod fs;
pub mod package;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Skillpack operations
#[derive(Error, Diagnostic, Debug)]
pub enum SkillpackError {
    // Bundle errors
    #[error("Bundle directory not found: {path}")]
    #[diagnostic(
        code(skillpack::bundle::not_found),
        help("Pass the path of a directory that contains a SKILL.md entry document")
    )]
    BundleNotFound { path: String },

    #[error("Entry document not found: {path}")]
    #[diagnostic(
        code(skillpack::bundle::entry_not_found),
        help("Every bundle needs an entry document at its root (SKILL.md by default)")
    )]
    EntryNotFound { path: String },

    #[error("{path}:{line}: invalid frontmatter: {message}")]
    #[diagnostic(
        code(skillpack::bundle::frontmatter_parse),
        help(
            "The entry document must start with a '---' line, followed by 'key: value' lines and a closing '---'"
        )
    )]
    FrontmatterParse {
        path: String,
        line: usize,
        message: String,
    },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(skillpack::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(skillpack::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(skillpack::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(skillpack::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // Syntax tree errors
    #[error("Failed to load {language} grammar: {reason}")]
    #[diagnostic(code(skillpack::syntax::grammar_failed))]
    GrammarLoadFailed { language: String, reason: String },

    // Packaging errors
    #[error("Refusing to package: validation failed with {errors} error(s)")]
    #[diagnostic(
        code(skillpack::package::refused),
        help("Fix the reported errors, or pass --force to package anyway")
    )]
    PackagingRefused { errors: usize },

    #[error("Packaging failed: {reason}")]
    #[diagnostic(code(skillpack::package::failed))]
    PackagingFailed { reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(skillpack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(skillpack::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },
}

impl From<tempfile::PersistError> for SkillpackError {
    fn from(err: tempfile::PersistError) -> Self {
        SkillpackError::PackagingFailed {
            reason: format!(
                "could not publish {}: {}",
                err.file.path().display(),
                err.error
            ),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SkillpackError>;
