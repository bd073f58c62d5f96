use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use valutatrade_core::TradeHub;

use crate::commands::{self, Command};

/// Wrapper parser so REPL lines share the exact command grammar with the
/// one-shot CLI (minus the global flags, which make no sense mid-session).
#[derive(Parser)]
#[command(name = "vtrade", disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

/// The interactive session. Login state lives in `hub` and survives across
/// commands until `exit` or EOF.
pub fn run(hub: &mut TradeHub) -> ExitCode {
    println!("Welcome to ValutaTrade Hub!");
    println!("Type 'help' for the command list, 'exit' to quit");

    let stdin = io::stdin();
    loop {
        print!("\nvtrade> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("input error: {e}");
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit" | "q") {
            break;
        }
        if matches!(line, "help" | "--help" | "-h") {
            print_help();
            continue;
        }

        let argv = std::iter::once("vtrade".to_string()).chain(tokenize(line));
        match ReplLine::try_parse_from(argv) {
            Ok(parsed) => {
                if let Err(e) = commands::run(hub, &parsed.command) {
                    commands::print_error(&e);
                }
            }
            // clap renders its own usage/help messages for bad input
            Err(e) => println!("{e}"),
        }
    }

    println!("Leaving ValutaTrade Hub. Goodbye!");
    ExitCode::SUCCESS
}

fn print_help() {
    println!("ValutaTrade Hub — currency trading simulator");
    println!();
    println!("Commands:");
    println!("  register --username <name> --password <pass>    Register a new user");
    println!("  login --username <name> --password <pass>       Log in");
    println!("  show-portfolio [--base <currency>]              Show your portfolio");
    println!("  buy --currency <code> --amount <number>         Buy a currency");
    println!("  sell --currency <code> --amount <number>        Sell a currency");
    println!("  get-rate --from <code> --to <code>              Look up a conversion rate");
    println!("  currencies                                      List known currencies");
    println!("  help                                            Show this help");
    println!("  exit                                            Leave the session");
    println!();
    println!("Examples:");
    println!("  register --username alice --password 1234");
    println!("  login --username alice --password 1234");
    println!("  buy --currency BTC --amount 0.05");
}

/// Split a command line into tokens, honoring single and double quotes so
/// values with spaces survive (`--username "alice smith"`). An unclosed
/// quote runs to the end of the line.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
