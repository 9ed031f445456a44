//! Text rendering of diagnostics
//!
//! One line per diagnostic: `path:line[:column]: severity: code: message`.
//! Colour comes from `console`, which switches itself off when the stream is
//! not a terminal, so piped output is plain and byte-stable.

use console::Style;

use super::{Diagnostic, Severity, ValidationReport};

fn location_prefix(diagnostic: &Diagnostic) -> String {
    match &diagnostic.location {
        Some(loc) => match (loc.line, loc.column) {
            (Some(line), Some(column)) => format!("{}:{line}:{column}: ", loc.document),
            (Some(line), None) => format!("{}:{line}: ", loc.document),
            _ => format!("{}: ", loc.document),
        },
        None => String::new(),
    }
}

/// Render one diagnostic without styling
pub fn render_plain(diagnostic: &Diagnostic) -> String {
    format!(
        "{}{}: {}: {}",
        location_prefix(diagnostic),
        diagnostic.severity,
        diagnostic.code,
        diagnostic.message
    )
}

/// Render one diagnostic with terminal styling where supported
pub fn render_line(diagnostic: &Diagnostic) -> String {
    if !console::colors_enabled() {
        return render_plain(diagnostic);
    }
    let severity_style = match diagnostic.severity {
        Severity::Error => Style::new().red().bold(),
        Severity::Warning => Style::new().yellow().bold(),
    };
    format!(
        "{}{}: {}: {}",
        Style::new().bold().apply_to(location_prefix(diagnostic)),
        severity_style.apply_to(diagnostic.severity),
        Style::new().dim().apply_to(diagnostic.code),
        diagnostic.message
    )
}

/// `N error(s), M warning(s)` with the verdict
pub fn summary_line(report: &ValidationReport) -> String {
    format!(
        "{}: {} error(s), {} warning(s)",
        report.verdict(),
        report.error_count(),
        report.warning_count()
    )
}
