//! Path claims made by bundle documents
//!
//! The entry document body and every markdown file in the references folder
//! are scanned for path-like tokens. Each token becomes a [`ReferenceClaim`]
//! resolved against the bundle inventory, never against the raw filesystem,
//! so excluded and symlinked entries count as missing.

mod scan;

use std::collections::HashMap;

use crate::bundle::{Bundle, FileKind, ResolvedKind};
use crate::config::ValidatorConfig;
use crate::frontmatter::ParsedDocument;
use crate::path_utils;
use crate::report::{Diagnostic, DiagnosticCode};

pub use scan::{RawToken, Scanner};

/// Where in the markdown a token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Markdown link or image target
    Link,
    /// Inline code span
    CodeSpan,
    /// Argument of a shell command line
    Command,
    /// Bare prose mention of a designated folder
    Mention,
}

/// Kind of target a claim implies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    File,
    Directory,
    Any,
}

/// How sure the extractor is that a token names a bundle path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Weak,
    Strong,
}

/// Outcome of resolving a claim against the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Normalised bundle-relative path and what it points at
    Inside { path: String, kind: ResolvedKind },
    /// The path leaves the bundle root or is absolute
    Escapes,
}

/// A document's assertion that a bundle path exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceClaim {
    /// Token as written in the document
    pub claimed: String,
    /// Document making the claim, bundle-relative
    pub document: String,
    pub line: usize,
    pub class: TokenClass,
    pub expected: ExpectedKind,
    pub confidence: Confidence,
    pub resolution: Resolution,
}

#[cfg(test)]
impl ReferenceClaim {
    /// Resolved kind, `None` for escaping claims
    pub fn resolved_kind(&self) -> Option<ResolvedKind> {
        match &self.resolution {
            Resolution::Inside { kind, .. } => Some(*kind),
            Resolution::Escapes => None,
        }
    }
}

/// Claims and read failures from one extraction run
#[derive(Debug, Default)]
pub struct Extraction {
    pub claims: Vec<ReferenceClaim>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract and resolve every claim made by the bundle's documents
pub fn extract_claims(
    bundle: &Bundle,
    config: &ValidatorConfig,
    entry: &ParsedDocument,
) -> Extraction {
    let designated = config.designated_dirs();
    let scanner = Scanner::new(&designated);
    let mut extraction = Extraction::default();

    let tokens = scanner.scan(&entry.body, entry.body_start_line);
    extraction
        .claims
        .extend(build_claims(bundle, &designated, &bundle.entry, tokens));

    for doc in bundle.files_of_kind(FileKind::Reference) {
        if !is_markdown(&doc.path) || doc.path == bundle.entry {
            continue;
        }
        let text = match std::fs::read_to_string(bundle.absolute(&doc.path)) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("cannot read reference document {}: {}", doc.path, err);
                extraction.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::UnreadableFile,
                        format!("cannot read reference document: {err}"),
                    )
                    .in_document(&doc.path, None),
                );
                continue;
            }
        };
        let tokens = scanner.scan(text.trim_start_matches('\u{feff}'), 1);
        extraction
            .claims
            .extend(build_claims(bundle, &designated, &doc.path, tokens));
    }

    tracing::debug!(claims = extraction.claims.len(), "reference extraction finished");
    extraction
}

fn is_markdown(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".md") || lower.ends_with(".markdown")
}

/// Turn raw tokens from one document into resolved claims
///
/// A path claimed twice on the same line becomes a single claim carrying the
/// strongest confidence seen.
pub fn build_claims(
    bundle: &Bundle,
    designated: &[&str],
    document: &str,
    tokens: Vec<RawToken>,
) -> Vec<ReferenceClaim> {
    let mut claims: Vec<ReferenceClaim> = Vec::new();
    let mut seen: HashMap<(String, usize), usize> = HashMap::new();

    for token in tokens {
        let Some(claim) = to_claim(bundle, designated, document, token) else {
            continue;
        };
        let key = (dedup_key(&claim), claim.line);
        match seen.get(&key) {
            Some(&idx) => {
                let existing = &mut claims[idx];
                if claim.confidence > existing.confidence {
                    *existing = claim;
                }
            }
            None => {
                seen.insert(key, claims.len());
                claims.push(claim);
            }
        }
    }

    claims
}

fn dedup_key(claim: &ReferenceClaim) -> String {
    match &claim.resolution {
        Resolution::Inside { path, .. } => path.clone(),
        Resolution::Escapes => claim.claimed.clone(),
    }
}

fn to_claim(
    bundle: &Bundle,
    designated: &[&str],
    document: &str,
    token: RawToken,
) -> Option<ReferenceClaim> {
    let written = token.text.trim();
    let stripped = written.trim_start_matches("./");
    let first_component = stripped.split('/').next().unwrap_or_default();
    let is_designated = designated.contains(&first_component);

    let confidence = match token.class {
        TokenClass::Link | TokenClass::Mention => Confidence::Strong,
        TokenClass::Command if token.is_command_target => Confidence::Strong,
        TokenClass::Command => Confidence::Weak,
        TokenClass::CodeSpan if is_designated => Confidence::Strong,
        TokenClass::CodeSpan => Confidence::Weak,
    };

    let absolute = written.starts_with('/') || written.starts_with('\\');
    if absolute && confidence == Confidence::Weak {
        return None;
    }

    let expected = if written.ends_with('/') {
        ExpectedKind::Directory
    } else if token.is_command_target {
        ExpectedKind::File
    } else if first_component == designated.first().copied().unwrap_or("scripts")
        && has_extension(stripped)
    {
        ExpectedKind::File
    } else {
        ExpectedKind::Any
    };

    // Links and explicit parent traversals are relative to the document
    let base = if token.class == TokenClass::Link || written.starts_with("../") {
        path_utils::parent_of(document)
    } else {
        ""
    };

    let resolution = match path_utils::join_lexical(base, written) {
        Some(path) => {
            let kind = bundle.resolve(&path);
            Resolution::Inside { path, kind }
        }
        None => Resolution::Escapes,
    };

    Some(ReferenceClaim {
        claimed: written.to_string(),
        document: document.to_string(),
        line: token.line,
        class: token.class,
        expected,
        confidence,
        resolution,
    })
}

fn has_extension(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    matches!(name.rsplit_once('.'), Some((stem, ext)) if !stem.is_empty() && !ext.is_empty())
}
