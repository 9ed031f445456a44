use clap::Parser;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Validate a bundle:\n    skillpack validate ./pdf-tools\n\n\
                  Treat warnings as errors:\n    skillpack validate ./pdf-tools --strict")]
pub struct ValidateArgs {
    /// Bundle directory containing SKILL.md
    pub bundle: PathBuf,

    /// Promote warnings to errors
    #[arg(long)]
    pub strict: bool,
}
