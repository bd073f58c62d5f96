use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use valutatrade_core::TradeHub;

mod commands;
mod repl;

use commands::Command;

#[derive(Parser)]
#[command(
    name = "vtrade",
    version,
    about = "ValutaTrade Hub — a currency trading simulator over flat JSON state"
)]
struct Cli {
    /// Directory holding users.json, portfolios.json and rates.json
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Command to run; omit to start the interactive session
    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let mut hub = TradeHub::new(&cli.data_dir);

    match cli.command {
        Some(command) => match commands::run(&mut hub, &command) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                commands::print_error(&e);
                ExitCode::FAILURE
            }
        },
        None => repl::run(&mut hub),
    }
}

fn init_logging() {
    // RUST_LOG controls verbosity; default keeps the console quiet so log
    // lines don't interleave with command output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
