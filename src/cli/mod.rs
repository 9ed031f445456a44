//! CLI definitions using clap derive API
//!
//! Each subcommand's argument type lives in its own submodule.

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod package;
pub mod validate;

pub use package::PackageArgs;
pub use test::TestArgs;
pub use validate::ValidateArgs;

/// Skillpack - skill bundle validator and packager
///
/// Checks a bundle's header, file references and scripts, and packages
/// passing bundles into deterministic archives.
#[derive(Parser, Debug)]
#[command(
    name = "skillpack",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Validate and package skill bundles",
    long_about = "Skillpack validates skill bundles (a SKILL.md entry document with scripts, \
                  references and assets) without executing anything, and packages passing \
                  bundles into reproducible archives.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  skillpack validate ./pdf-tools           \x1b[90m# Full validation\x1b[0m\n   \
                  skillpack validate ./pdf-tools --strict  \x1b[90m# Warnings fail too\x1b[0m\n   \
                  skillpack test ./pdf-tools               \x1b[90m# Header and syntax only\x1b[0m\n   \
                  skillpack package ./pdf-tools dist       \x1b[90m# Build dist/pdf-tools.skill.tar.gz\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Validator configuration file (defaults to <bundle>/.skillpack.yaml)
    #[arg(long, short = 'c', global = true, env = "SKILLPACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every check on a bundle
    Validate(ValidateArgs),

    /// Check header and script syntax only
    Test(TestArgs),

    /// Validate and write a deterministic archive
    Package(PackageArgs),
}
