//! Command implementations for Skillpack CLI
//!
//! Each `run` returns whether the command succeeded; the caller maps that to
//! the exit code.

pub mod package;
pub mod test;
pub mod validate;

use crate::report::{ValidationReport, Verdict, render_line, summary_line};

/// Print diagnostics to stdout and the summary line to stderr
pub(crate) fn print_report(report: &ValidationReport) {
    for diagnostic in report.diagnostics() {
        println!("{}", render_line(diagnostic));
    }
    eprintln!("{}", summary_line(report));
}

pub(crate) fn passed(report: &ValidationReport) -> bool {
    report.verdict() == Verdict::Pass
}
