use clap::Parser;
use std::path::PathBuf;

/// Arguments for the package command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Package a bundle into dist/:\n    skillpack package ./pdf-tools dist\n\n\
                  Package despite validation errors:\n    skillpack package ./pdf-tools dist --force")]
pub struct PackageArgs {
    /// Bundle directory containing SKILL.md
    pub bundle: PathBuf,

    /// Directory the archive is written to
    pub output: PathBuf,

    /// Package even when validation fails; the archive is marked as overridden
    #[arg(long)]
    pub force: bool,
}
