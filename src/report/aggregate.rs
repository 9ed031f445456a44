use crate::bundle::{Bundle, ResolvedKind};
use crate::references::{Confidence, ExpectedKind, ReferenceClaim, Resolution};

use super::{Category, Diagnostic, DiagnosticCode, ValidationReport};

/// Diagnostics for unresolved, misdirected or escaping claims
pub fn claim_diagnostics(claims: &[ReferenceClaim]) -> Vec<Diagnostic> {
    claims.iter().filter_map(claim_diagnostic).collect()
}

fn claim_diagnostic(claim: &ReferenceClaim) -> Option<Diagnostic> {
    let kind = match &claim.resolution {
        Resolution::Escapes => {
            return Some(
                Diagnostic::new(
                    DiagnosticCode::EscapesRoot,
                    format!("'{}' points outside the bundle root", claim.claimed),
                )
                .at(&claim.document, claim.line),
            );
        }
        Resolution::Inside { kind, .. } => *kind,
    };

    let diagnostic = match (kind, claim.expected) {
        (ResolvedKind::Missing, _) if claim.confidence == Confidence::Strong => Diagnostic::new(
            DiagnosticCode::MissingReference,
            format!("'{}' does not exist in the bundle", claim.claimed),
        ),
        (ResolvedKind::Missing, _) => Diagnostic::new(
            DiagnosticCode::UnresolvedReference,
            format!("'{}' looks like a path but is not in the bundle", claim.claimed),
        ),
        (ResolvedKind::Directory, ExpectedKind::File) => Diagnostic::new(
            DiagnosticCode::WrongKind,
            format!("'{}' is a directory, expected a file", claim.claimed),
        ),
        (ResolvedKind::File, ExpectedKind::Directory) => Diagnostic::new(
            DiagnosticCode::WrongKind,
            format!("'{}' is a file, expected a directory", claim.claimed),
        ),
        _ => return None,
    };

    Some(diagnostic.at(&claim.document, claim.line))
}

/// Diagnostics for inventory entries the walk could not read
fn inventory_diagnostics(bundle: &Bundle) -> Vec<Diagnostic> {
    bundle
        .unreadable
        .iter()
        .map(|u| {
            Diagnostic::new(
                DiagnosticCode::UnreadableFile,
                format!("cannot read: {}", u.reason),
            )
            .in_document(&u.path, None)
        })
        .collect()
}

/// Merge the output of every pipeline stage into one report
///
/// `stages` holds the schema, syntax and reference diagnostics in any order;
/// unreadable inventory entries are added from `bundle`.
pub fn aggregate(bundle: &Bundle, stages: Vec<Vec<Diagnostic>>) -> ValidationReport {
    let mut diagnostics: Vec<Diagnostic> = stages.into_iter().flatten().collect();
    diagnostics.extend(inventory_diagnostics(bundle));

    for category in [
        Category::Schema,
        Category::Reference,
        Category::Syntax,
        Category::Io,
    ] {
        let count = diagnostics
            .iter()
            .filter(|d| d.code.category() == category)
            .count();
        tracing::debug!(?category, count, "collected diagnostics");
    }

    ValidationReport::new(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::TokenClass;

    fn claim(
        claimed: &str,
        expected: ExpectedKind,
        confidence: Confidence,
        resolution: Resolution,
    ) -> ReferenceClaim {
        ReferenceClaim {
            claimed: claimed.to_string(),
            document: "SKILL.md".to_string(),
            line: 7,
            class: TokenClass::CodeSpan,
            expected,
            confidence,
            resolution,
        }
    }

    fn inside(path: &str, kind: ResolvedKind) -> Resolution {
        Resolution::Inside {
            path: path.to_string(),
            kind,
        }
    }

    #[test]
    fn test_strong_missing_is_error() {
        let claims = vec![claim(
            "scripts/run.sh",
            ExpectedKind::File,
            Confidence::Strong,
            inside("scripts/run.sh", ResolvedKind::Missing),
        )];
        let diagnostics = claim_diagnostics(&claims);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::MissingReference);
        assert!(diagnostics[0].is_error());
        assert_eq!(diagnostics[0].location.as_ref().unwrap().line, Some(7));
    }

    #[test]
    fn test_weak_missing_is_warning() {
        let claims = vec![claim(
            "out/x.json",
            ExpectedKind::Any,
            Confidence::Weak,
            inside("out/x.json", ResolvedKind::Missing),
        )];
        let diagnostics = claim_diagnostics(&claims);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnresolvedReference);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_wrong_kind() {
        let claims = vec![
            claim(
                "scripts/lib.py",
                ExpectedKind::File,
                Confidence::Strong,
                inside("scripts/lib.py", ResolvedKind::Directory),
            ),
            claim(
                "assets/logo.png/",
                ExpectedKind::Directory,
                Confidence::Strong,
                inside("assets/logo.png", ResolvedKind::File),
            ),
        ];
        let codes: Vec<_> = claim_diagnostics(&claims).iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagnosticCode::WrongKind, DiagnosticCode::WrongKind]);
    }

    #[test]
    fn test_escape_is_error_even_when_weak() {
        let claims = vec![claim(
            "../x",
            ExpectedKind::Any,
            Confidence::Weak,
            Resolution::Escapes,
        )];
        let diagnostics = claim_diagnostics(&claims);
        assert_eq!(diagnostics[0].code, DiagnosticCode::EscapesRoot);
        assert!(diagnostics[0].is_error());
    }

    #[test]
    fn test_resolved_claims_are_silent() {
        let claims = vec![
            claim(
                "scripts/run.sh",
                ExpectedKind::File,
                Confidence::Strong,
                inside("scripts/run.sh", ResolvedKind::File),
            ),
            claim(
                "assets",
                ExpectedKind::Any,
                Confidence::Strong,
                inside("assets", ResolvedKind::Directory),
            ),
        ];
        assert!(claim_diagnostics(&claims).is_empty());
    }
}
