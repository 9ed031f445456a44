//! Frontmatter schema checks
//!
//! Every check runs on every record, so a single pass reports all schema
//! problems at once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::frontmatter::{FrontmatterRecord, SkillType};
use crate::report::{Diagnostic, DiagnosticCode};

pub const MAX_NAME_CHARS: usize = 64;
pub const MAX_DESCRIPTION_CHARS: usize = 1024;

#[allow(clippy::expect_used)] // literal pattern
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid name regex"));

/// Whether `name` is a valid bundle identifier
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() <= MAX_NAME_CHARS && NAME_PATTERN.is_match(name)
}

/// Validate a parsed record; `document` is the entry document path
pub fn validate_record(record: &FrontmatterRecord, document: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let line = |key: &str| record.line_of(key).unwrap_or(1);

    match record.name.as_deref().map(str::trim) {
        None => diagnostics.push(
            Diagnostic::new(DiagnosticCode::MissingName, "required field 'name' is missing")
                .at(document, 1),
        ),
        Some("") => diagnostics.push(
            Diagnostic::new(DiagnosticCode::MissingName, "field 'name' is empty")
                .at(document, line("name")),
        ),
        Some(_) => {
            let name = record.name.as_deref().unwrap_or_default();
            let chars = name.chars().count();
            if chars > MAX_NAME_CHARS {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::NameTooLong,
                        format!("name is {chars} characters, the limit is {MAX_NAME_CHARS}"),
                    )
                    .at(document, line("name")),
                );
            }
            if !NAME_PATTERN.is_match(name) {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::InvalidName,
                        format!(
                            "name '{name}' must be kebab-case (lowercase letters, digits and hyphens only)"
                        ),
                    )
                    .at(document, line("name")),
                );
            }
        }
    }

    match record.description.as_deref() {
        None => diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::MissingDescription,
                "required field 'description' is missing",
            )
            .at(document, 1),
        ),
        Some(description) if description.trim().is_empty() => diagnostics.push(
            Diagnostic::new(DiagnosticCode::MissingDescription, "field 'description' is empty")
                .at(document, line("description")),
        ),
        Some(description) => {
            let chars = description.chars().count();
            if chars > MAX_DESCRIPTION_CHARS {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DescriptionTooLong,
                        format!(
                            "description is {chars} characters, the limit is {MAX_DESCRIPTION_CHARS}"
                        ),
                    )
                    .at(document, line("description")),
                );
            }
            if description.contains(['<', '>']) {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DescriptionAngleBrackets,
                        "description contains angle brackets, which hosts may read as markup",
                    )
                    .at(document, line("description")),
                );
            }
        }
    }

    match record.skill_type() {
        None => diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::MissingType,
                format!("no 'type' declared, defaulting to '{}'", SkillType::Unspecified),
            )
            .at(document, 1),
        ),
        Some(Ok(_)) => {}
        Some(Err(raw)) => {
            let allowed: Vec<&str> = SkillType::ALL.iter().map(|t| t.as_str()).collect();
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::InvalidType,
                    format!("type '{raw}' is not one of: {}", allowed.join(", ")),
                )
                .at(document, line("type")),
            );
        }
    }

    diagnostics
}
