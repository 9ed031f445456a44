//! Test command implementation
//!
//! Header schema and script syntax only; document references are not
//! cross-checked against the bundle.

use std::path::PathBuf;

use crate::cli::TestArgs;
use crate::error::Result;
use crate::pipeline::{self, Mode, Options};

pub fn run(config: Option<PathBuf>, args: TestArgs) -> Result<bool> {
    let outcome = pipeline::run(
        &args.bundle,
        Mode::Quick,
        Options {
            config: config.as_deref(),
            strict: args.strict,
            output_dir: None,
        },
    )?;

    super::print_report(&outcome.report);
    Ok(super::passed(&outcome.report))
}
