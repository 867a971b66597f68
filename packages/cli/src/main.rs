mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{blocks, init, inspect, new, replay, InitArgs, InspectArgs, NewArgs, ReplayArgs};
use tracing_subscriber::EnvFilter;

/// Pagesmith CLI - block page documents from the command line
#[derive(Parser, Debug)]
#[command(name = "pagesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor activity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a pagesmith.config.json in the current directory
    Init(InitArgs),

    /// Create an empty document
    New(NewArgs),

    /// List the block types
    Blocks,

    /// Print a document's block outline
    Inspect(InspectArgs),

    /// Play a script of edits against a document
    Replay(ReplayArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::New(args) => new(args, &cwd),
            Command::Blocks => blocks(),
            Command::Inspect(args) => inspect(args, &cwd),
            Command::Replay(args) => replay(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
