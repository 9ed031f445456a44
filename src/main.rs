//! Skillpack - skill bundle validator and packager
//!
//! Validates a skill bundle (an entry document with a key-value header plus
//! scripts, references and assets) without executing any of its content, and
//! packages passing bundles into deterministic archives.

use clap::Parser;

mod bundle;
mod cli;
mod commands;
mod config;
mod error;
mod frontmatter;
mod hash;
mod logging;
mod package;
mod path_utils;
mod pipeline;
mod references;
mod report;
mod schema;
mod syntax;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run(cli.config, args),
        Commands::Test(args) => commands::test::run(cli.config, args),
        Commands::Package(args) => commands::package::run(cli.config, args),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
