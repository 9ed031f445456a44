//! Validate command implementation

use std::path::PathBuf;

use crate::cli::ValidateArgs;
use crate::error::Result;
use crate::pipeline::{self, Mode, Options};

pub fn run(config: Option<PathBuf>, args: ValidateArgs) -> Result<bool> {
    let outcome = pipeline::run(
        &args.bundle,
        Mode::Full,
        Options {
            config: config.as_deref(),
            strict: args.strict,
            output_dir: None,
        },
    )?;

    super::print_report(&outcome.report);
    Ok(super::passed(&outcome.report))
}
