#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
    process,
};

mod app;
mod interact;

use app::{Config, Shell};
use interact::{LinePrompt, TerminalPrompt};

use shelf::{BookStore, MetadataClient};

use clap::Parser;
use eyre::Result;
use log::trace;

const SUPPORTED_PLATFORMS: [&str; 2] = ["linux", "freebsd"];

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> Result<()> {
    let Cli {
        database,
        debug,
        verbosity,
        quiet,
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet, debug)?;

    if !platform_supported(env::consts::OS) {
        println!(
            "shelf only runs on {}, refusing to start on {}.",
            SUPPORTED_PLATFORMS.join(" and "),
            env::consts::OS
        );
        return Ok(());
    }

    let config = Config { database, debug };
    trace!("Starting with {config:?}");

    // a store that fails to open is reported by the shell, the menu still runs
    let store = BookStore::open(&config.database);
    let metadata = MetadataClient::new();

    let stdin = io::stdin();
    if stdin.is_terminal() {
        Shell::new(
            TerminalPrompt,
            store,
            metadata,
            io::stdout(),
            io::stderr(),
            &config,
        )
        .run()
    } else {
        trace!("Standard input is not a terminal - reading plain lines");
        Shell::new(
            LinePrompt::new(stdin.lock(), io::stdout()),
            store,
            metadata,
            io::stdout(),
            io::stderr(),
            &config,
        )
        .run()
    }
}

fn setup_errlog(verbosity: usize, quiet: bool, debug: bool) -> Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet {
        0
    } else if debug {
        (verbosity + 1).max(3)
    } else {
        verbosity + 1
    };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

fn platform_supported(os: &str) -> bool {
    SUPPORTED_PLATFORMS.contains(&os)
}

#[derive(Parser)]
#[clap(name = "shelf")]
#[clap(about = "Keep a catalog of your books in a local database, with ISBNs found online")]
#[clap(version, author)]
struct Cli {
    /// The database file holding the catalog
    #[clap(long, parse(from_os_str), default_value = "books.db")]
    database: PathBuf,

    /// Print full error details, including their causes, when an operation fails
    #[clap(long)]
    debug: bool,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only log errors to stderr, warnings about failed lookups are hidden.
    #[clap(short, long)]
    quiet: bool,
}

#[test]
fn only_linux_and_freebsd_are_supported() {
    assert!(platform_supported("linux"));
    assert!(platform_supported("freebsd"));
    assert!(!platform_supported("windows"));
    assert!(!platform_supported("macos"));
}
