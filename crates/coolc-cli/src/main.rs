// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Cool compiler command-line interface.
//!
//! This is the main entry point for the `coolc` command.
//!
//! Logging goes to stderr. Use `RUST_LOG` to override the level chosen by
//! `-v`:
//! ```bash
//! RUST_LOG=coolc_core=trace coolc check program.json
//! ```

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use miette::Result;

mod check;
mod diagnostic;
mod program_file;

use check::{CheckOptions, OutputFormat, Verdict};

/// coolc: static semantic checker for Cool programs
#[derive(Debug, Parser)]
#[command(name = "coolc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Type-check a parsed program
    Check {
        /// Program file (JSON) to check
        path: Utf8PathBuf,

        /// Print the static type of every expression
        #[arg(long)]
        emit_types: bool,

        /// How semantic errors are printed
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
}

/// Default `EnvFilter` directive for a `-v` count.
fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "coolc=info,coolc_core=info",
        1 => "coolc=debug,coolc_core=debug",
        _ => "coolc=trace,coolc_core=trace",
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check {
            path,
            emit_types,
            format,
        } => check::check(&path, CheckOptions { emit_types, format }),
    };

    // Exit with appropriate code
    match result {
        Ok(Verdict::Passed) => std::process::exit(0),
        Ok(Verdict::Halted { .. }) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}
