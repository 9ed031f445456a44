//! Dry-run syntax checks for bundled scripts
//!
//! Each script is parsed into a tree-sitter syntax tree and inspected. Nothing
//! is ever executed: no interpreter, subprocess or evaluator touches bundle
//! content. Oversized inputs are refused before they are read.

mod language;

use std::collections::HashMap;

use tree_sitter::{Node, Parser, Point};

pub use language::ScriptLanguage;

use crate::bundle::{Bundle, FileKind};
use crate::error::{Result, SkillpackError};
use crate::report::{Diagnostic, DiagnosticCode};

/// Longest source excerpt quoted in a syntax error message
const SNIPPET_CHARS: usize = 40;

/// Reusable parsers, one per language
pub struct SyntaxChecker {
    max_bytes: u64,
    parsers: HashMap<ScriptLanguage, Parser>,
}

impl SyntaxChecker {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            parsers: HashMap::new(),
        }
    }

    fn parser(&mut self, language: ScriptLanguage) -> Result<&mut Parser> {
        if !self.parsers.contains_key(&language) {
            let mut parser = Parser::new();
            parser
                .set_language(&language.grammar())
                .map_err(|e| SkillpackError::GrammarLoadFailed {
                    language: language.name().to_string(),
                    reason: e.to_string(),
                })?;
            self.parsers.insert(language, parser);
        }
        self.parsers
            .get_mut(&language)
            .ok_or_else(|| SkillpackError::GrammarLoadFailed {
                language: language.name().to_string(),
                reason: "parser cache miss".to_string(),
            })
    }

    /// Check one script's source; `path` is bundle-relative
    ///
    /// Returns no diagnostics for files whose language is not recognised.
    pub fn check_source(&mut self, path: &str, source: &[u8]) -> Result<Vec<Diagnostic>> {
        if source.len() as u64 > self.max_bytes {
            return Ok(vec![too_large(path, source.len() as u64, self.max_bytes)]);
        }
        let Some(language) = ScriptLanguage::detect(path, source) else {
            tracing::debug!("no grammar for {}, skipping", path);
            return Ok(Vec::new());
        };

        let parser = self.parser(language)?;
        let Some(tree) = parser.parse(source, None) else {
            return Ok(vec![
                Diagnostic::new(
                    DiagnosticCode::ParseFailed,
                    format!("{} parser produced no syntax tree", language.name()),
                )
                .in_document(path, None),
            ]);
        };

        let root = tree.root_node();
        if let Some(node) = first_error(root) {
            let (line, column) = location_of(node.start_position(), source);
            let message = format!("{} syntax error: {}", language.name(), describe(node, source));
            return Ok(vec![
                Diagnostic::new(DiagnosticCode::ParseFailed, message)
                    .at(path, line)
                    .with_column(column),
            ]);
        }

        if !language.has_entry_point(root, source) {
            return Ok(vec![
                Diagnostic::new(
                    DiagnosticCode::NoEntryPoint,
                    format!(
                        "no invocable top-level routine found in {} script",
                        language.name()
                    ),
                )
                .in_document(path, None),
            ]);
        }

        Ok(Vec::new())
    }
}

/// Check every inventoried script of a bundle
///
/// Unreadable scripts become diagnostics; only grammar failures are fatal.
pub fn validate_scripts(bundle: &Bundle, max_bytes: u64) -> Result<Vec<Diagnostic>> {
    let mut checker = SyntaxChecker::new(max_bytes);
    let mut diagnostics = Vec::new();

    for entry in bundle.files_of_kind(FileKind::Script) {
        if entry.size > max_bytes {
            diagnostics.push(too_large(&entry.path, entry.size, max_bytes));
            continue;
        }
        let source = match std::fs::read(bundle.absolute(&entry.path)) {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!("cannot read script {}: {}", entry.path, err);
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::UnreadableFile,
                        format!("cannot read script: {err}"),
                    )
                    .in_document(&entry.path, None),
                );
                continue;
            }
        };
        diagnostics.extend(checker.check_source(&entry.path, &source)?);
    }

    tracing::debug!(diagnostics = diagnostics.len(), "syntax check finished");
    Ok(diagnostics)
}

fn too_large(path: &str, size: u64, max_bytes: u64) -> Diagnostic {
    Diagnostic::new(
        DiagnosticCode::ScriptTooLarge,
        format!("script is {size} bytes, over the {max_bytes} byte limit; syntax check skipped"),
    )
    .in_document(path, None)
}

/// Earliest `ERROR` or `MISSING` node in document order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

fn describe(node: Node<'_>, source: &[u8]) -> String {
    if node.is_missing() {
        return format!("missing '{}'", node.kind());
    }
    let text = node.utf8_text(source).unwrap_or_default();
    let first_line = text.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return "unexpected end of input".to_string();
    }
    let snippet: String = first_line.chars().take(SNIPPET_CHARS).collect();
    if snippet.len() < first_line.len() {
        format!("unexpected '{snippet}...'")
    } else {
        format!("unexpected '{snippet}'")
    }
}

/// 1-based line and character column of a tree-sitter point
fn location_of(point: Point, source: &[u8]) -> (usize, usize) {
    let line = source.split(|b| *b == b'\n').nth(point.row).unwrap_or_default();
    let prefix = &line[..point.column.min(line.len())];
    let column = String::from_utf8_lossy(prefix).chars().count() + 1;
    (point.row + 1, column)
}
