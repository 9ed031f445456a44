//! Package command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::PackageArgs;
use crate::error::Result;
use crate::package;
use crate::pipeline::{self, Mode, Options};

pub fn run(config: Option<PathBuf>, args: PackageArgs) -> Result<bool> {
    let outcome = pipeline::run(
        &args.bundle,
        Mode::Full,
        Options {
            config: config.as_deref(),
            strict: false,
            output_dir: Some(&args.output),
        },
    )?;
    super::print_report(&outcome.report);

    let name = package::artifact_name(&outcome.bundle, Some(&outcome.document.record));
    let artifact = package::package(
        &outcome.bundle,
        &outcome.report,
        &name,
        &args.output,
        args.force,
    )?;

    let label = if artifact.overridden {
        Style::new().yellow().bold().apply_to("packaged (override)")
    } else {
        Style::new().green().bold().apply_to("packaged")
    };
    println!(
        "{} {} ({} members, {})",
        label,
        artifact.path.display(),
        artifact.members.len(),
        artifact.hash
    );
    Ok(true)
}
