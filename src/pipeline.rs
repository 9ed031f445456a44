//! Validation pipeline
//!
//! Parses the entry document, inventories the bundle and runs every check,
//! then folds the results into a single report. Only a missing bundle, a
//! missing or unreadable entry document and a malformed header abort the run.

use std::path::Path;

use crate::bundle::Bundle;
use crate::config::ValidatorConfig;
use crate::error::{self, Result};
use crate::frontmatter::{ParsedDocument, parse_document};
use crate::references;
use crate::report::{self, ValidationReport};
use crate::schema;
use crate::syntax;

/// Which checks to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Schema, syntax and reference checks
    Full,
    /// Schema and syntax checks only
    Quick,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options<'a> {
    pub config: Option<&'a Path>,
    pub strict: bool,
    /// Packaging destination, excluded from the inventory when inside the bundle
    pub output_dir: Option<&'a Path>,
}

/// Everything a command needs after validation
#[derive(Debug)]
pub struct Outcome {
    pub bundle: Bundle,
    pub document: ParsedDocument,
    pub report: ValidationReport,
}

pub fn run(bundle_root: &Path, mode: Mode, options: Options<'_>) -> Result<Outcome> {
    let _span = tracing::debug_span!("validate", bundle = %bundle_root.display()).entered();

    let config = ValidatorConfig::load(options.config, bundle_root)?;
    let bundle = Bundle::open(bundle_root, &config, options.output_dir)?;

    let entry_path = bundle.entry_path();
    let content = std::fs::read_to_string(&entry_path)
        .map_err(|e| error::fs::read_failed(entry_path.display().to_string(), e.to_string()))?;
    let document = parse_document(&content, &bundle.entry)?;
    if let Some(skill_type) = document.record.effective_type() {
        tracing::debug!("bundle type {}", skill_type);
    }

    let mut stages = Vec::with_capacity(4);
    stages.push(schema::validate_record(&document.record, &bundle.entry));
    stages.push(syntax::validate_scripts(&bundle, config.max_script_bytes)?);

    if mode == Mode::Full {
        let extraction = references::extract_claims(&bundle, &config, &document);
        stages.push(report::claim_diagnostics(&extraction.claims));
        stages.push(extraction.diagnostics);
    }

    let mut report = report::aggregate(&bundle, stages);
    if options.strict || config.strict {
        report.promote_warnings();
    }

    tracing::debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "verdict {}",
        report.verdict()
    );

    Ok(Outcome {
        bundle,
        document,
        report,
    })
}
