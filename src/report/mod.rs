//! Diagnostics and the validation report
//!
//! Every non-fatal problem found by a pipeline stage becomes a [`Diagnostic`].
//! The [`ValidationReport`] owns the sorted, de-duplicated list and derives
//! the verdict from it.

mod aggregate;
mod render;

use std::cmp::Ordering;
use std::fmt;

pub use aggregate::{aggregate, claim_diagnostics};
pub use render::{render_line, summary_line};

/// How bad a diagnostic is; errors sort before warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Error taxonomy a diagnostic code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Schema,
    Reference,
    Syntax,
    Io,
}

/// Specific diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticCode {
    MissingName,
    InvalidName,
    NameTooLong,
    MissingDescription,
    DescriptionTooLong,
    DescriptionAngleBrackets,
    InvalidType,
    MissingType,
    MissingReference,
    WrongKind,
    EscapesRoot,
    UnresolvedReference,
    ParseFailed,
    NoEntryPoint,
    ScriptTooLarge,
    UnreadableFile,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::MissingName => "schema::missing_name",
            DiagnosticCode::InvalidName => "schema::invalid_name",
            DiagnosticCode::NameTooLong => "schema::name_too_long",
            DiagnosticCode::MissingDescription => "schema::missing_description",
            DiagnosticCode::DescriptionTooLong => "schema::description_too_long",
            DiagnosticCode::DescriptionAngleBrackets => "schema::description_angle_brackets",
            DiagnosticCode::InvalidType => "schema::invalid_type",
            DiagnosticCode::MissingType => "schema::missing_type",
            DiagnosticCode::MissingReference => "reference::missing",
            DiagnosticCode::WrongKind => "reference::wrong_kind",
            DiagnosticCode::EscapesRoot => "reference::escapes_root",
            DiagnosticCode::UnresolvedReference => "reference::unresolved",
            DiagnosticCode::ParseFailed => "syntax::parse_failed",
            DiagnosticCode::NoEntryPoint => "syntax::no_entry_point",
            DiagnosticCode::ScriptTooLarge => "syntax::script_too_large",
            DiagnosticCode::UnreadableFile => "io::unreadable_file",
        }
    }

    pub fn category(self) -> Category {
        match self {
            DiagnosticCode::MissingName
            | DiagnosticCode::InvalidName
            | DiagnosticCode::NameTooLong
            | DiagnosticCode::MissingDescription
            | DiagnosticCode::DescriptionTooLong
            | DiagnosticCode::DescriptionAngleBrackets
            | DiagnosticCode::InvalidType
            | DiagnosticCode::MissingType => Category::Schema,
            DiagnosticCode::MissingReference
            | DiagnosticCode::WrongKind
            | DiagnosticCode::EscapesRoot
            | DiagnosticCode::UnresolvedReference => Category::Reference,
            DiagnosticCode::ParseFailed
            | DiagnosticCode::NoEntryPoint
            | DiagnosticCode::ScriptTooLarge => Category::Syntax,
            DiagnosticCode::UnreadableFile => Category::Io,
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::DescriptionAngleBrackets
            | DiagnosticCode::MissingType
            | DiagnosticCode::UnresolvedReference
            | DiagnosticCode::NoEntryPoint
            | DiagnosticCode::ScriptTooLarge => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a diagnostic points; lines and columns are 1-based
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub document: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Point at a document, optionally at a line
    pub fn in_document(mut self, document: impl Into<String>, line: Option<usize>) -> Self {
        self.location = Some(Location {
            document: document.into(),
            line,
            column: None,
        });
        self
    }

    pub fn at(self, document: impl Into<String>, line: usize) -> Self {
        self.in_document(document, Some(line))
    }

    pub fn with_column(mut self, column: usize) -> Self {
        if let Some(location) = self.location.as_mut() {
            location.column = Some(column);
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn sort_key(&self) -> (&str, Option<usize>, Severity, Option<usize>, DiagnosticCode, &str) {
        let (document, line, column) = match &self.location {
            Some(loc) => (loc.document.as_str(), loc.line, loc.column),
            None => ("", None, None),
        };
        (document, line, self.severity, column, self.code, &self.message)
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
        })
    }
}

/// Sorted diagnostics for one bundle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Build a report; diagnostics are sorted and exact duplicates dropped
    pub fn new(mut diagnostics: Vec<Diagnostic>) -> Self {
        diagnostics.sort();
        diagnostics.dedup();
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `Fail` iff any diagnostic is an error
    pub fn verdict(&self) -> Verdict {
        if self.diagnostics.iter().any(Diagnostic::is_error) {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// Strict mode: every warning becomes an error
    pub fn promote_warnings(&mut self) {
        for diagnostic in &mut self.diagnostics {
            diagnostic.severity = Severity::Error;
        }
        self.diagnostics.sort();
        self.diagnostics.dedup();
    }

    /// Diagnostics with the given code
    #[cfg(test)]
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_strings_and_categories() {
        assert_eq!(DiagnosticCode::InvalidName.as_str(), "schema::invalid_name");
        assert_eq!(DiagnosticCode::MissingReference.category(), Category::Reference);
        assert_eq!(DiagnosticCode::UnreadableFile.category(), Category::Io);
        assert_eq!(DiagnosticCode::NoEntryPoint.default_severity(), Severity::Warning);
        assert_eq!(DiagnosticCode::ParseFailed.default_severity(), Severity::Error);
    }

    #[test]
    fn test_verdict_and_counts() {
        let report = ValidationReport::new(vec![
            Diagnostic::new(DiagnosticCode::MissingType, "no type").at("SKILL.md", 1),
        ]);
        assert_eq!(report.verdict(), Verdict::Pass);
        assert_eq!(report.warning_count(), 1);

        let report = ValidationReport::new(vec![
            Diagnostic::new(DiagnosticCode::MissingType, "no type").at("SKILL.md", 1),
            Diagnostic::new(DiagnosticCode::InvalidName, "bad").at("SKILL.md", 2),
        ]);
        assert_eq!(report.verdict(), Verdict::Fail);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_sorted_by_document_line_severity() {
        let report = ValidationReport::new(vec![
            Diagnostic::new(DiagnosticCode::ParseFailed, "x").at("scripts/b.py", 3),
            Diagnostic::new(DiagnosticCode::MissingType, "w").at("SKILL.md", 4),
            Diagnostic::new(DiagnosticCode::MissingReference, "e").at("SKILL.md", 4),
            Diagnostic::new(DiagnosticCode::InvalidName, "n").at("SKILL.md", 2),
            Diagnostic::new(DiagnosticCode::ScriptTooLarge, "big").in_document("scripts/a.py", None),
        ]);
        let order: Vec<_> = report.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(
            order,
            vec![
                DiagnosticCode::InvalidName,
                DiagnosticCode::MissingReference,
                DiagnosticCode::MissingType,
                DiagnosticCode::ScriptTooLarge,
                DiagnosticCode::ParseFailed,
            ]
        );
    }

    #[test]
    fn test_duplicates_dropped() {
        let d = Diagnostic::new(DiagnosticCode::MissingReference, "m").at("SKILL.md", 9);
        let report = ValidationReport::new(vec![d.clone(), d]);
        assert_eq!(report.diagnostics().len(), 1);
    }

    #[test]
    fn test_promote_warnings() {
        let mut report = ValidationReport::new(vec![
            Diagnostic::new(DiagnosticCode::NoEntryPoint, "w").at("scripts/a.sh", 1),
        ]);
        assert_eq!(report.verdict(), Verdict::Pass);
        report.promote_warnings();
        assert_eq!(report.verdict(), Verdict::Fail);
        assert_eq!(report.error_count(), 1);
    }
}
