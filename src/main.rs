mod reel;
mod ui;

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use reel::cli::ReelCommands;
use ui::prelude::*;

/// Promoreel main parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit events as JSON lines instead of colored text
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print the external commands being executed
    #[arg(long, global = true)]
    verbose: bool,

    /// Alternate config file path
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Reel(ReelCommands),
}

fn main() {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    ui::init(format, !cli.no_color);
    ui::set_debug_mode(cli.verbose);

    let Commands::Reel(command) = cli.command;
    if let Err(e) = reel::handle_command(command, cli.config.as_deref()) {
        emit(Level::Error, "reel.error", &format!("Error: {e:#}"), None);
        std::process::exit(1);
    }
}
