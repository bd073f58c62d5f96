use clap::Subcommand;
use owo_colors::OwoColorize;

use valutatrade_core::errors::CoreError;
use valutatrade_core::models::currency::format_grouped;
use valutatrade_core::services::portfolio_service::TradeReceipt;
use valutatrade_core::TradeHub;

/// The command grammar, shared between one-shot invocation and the REPL.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Log in as an existing user (the session lasts for the interactive run)
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Show the logged-in user's portfolio valued in a base currency
    ShowPortfolio {
        /// Currency to express wallet values and the total in
        #[arg(long, default_value = "USD")]
        base: String,
    },

    /// Buy an amount of a currency (the wallet is created on first buy)
    Buy {
        #[arg(long)]
        currency: String,
        #[arg(long)]
        amount: f64,
    },

    /// Sell an amount of a currency from an existing wallet
    Sell {
        #[arg(long)]
        currency: String,
        #[arg(long)]
        amount: f64,
    },

    /// Look up the conversion rate between two currencies
    GetRate {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// List all known currencies
    Currencies,
}

/// Execute one command against the hub and render the result.
pub fn run(hub: &mut TradeHub, command: &Command) -> Result<(), CoreError> {
    match command {
        Command::Register { username, password } => {
            let user = hub.register(username, password)?;
            println!(
                "{}",
                format!(
                    "User '{}' registered (id={}). Log in with: login --username {} --password ****",
                    user.username, user.user_id, user.username
                )
                .green()
            );
        }

        Command::Login { username, password } => {
            let user = hub.login(username, password)?;
            println!("{}", format!("Logged in as '{}'", user.username).green());
        }

        Command::ShowPortfolio { base } => {
            let report = hub.show_portfolio(base)?;
            if report.used_fallback_rates {
                println!(
                    "{}",
                    "Warning: rate snapshot unavailable, using fallback rates".yellow()
                );
            }
            if report.valuation.is_empty() {
                println!("Portfolio is empty");
                return Ok(());
            }
            println!(
                "Portfolio of '{}' (base: {}):",
                report.username, report.valuation.base
            );
            for line in &report.valuation.lines {
                match line.value_in_base {
                    Some(value) => println!(
                        "- {}: {:.4} → {:.2} {}",
                        line.code, line.balance, value, report.valuation.base
                    ),
                    None => println!(
                        "- {}: {:.4} → {}",
                        line.code,
                        line.balance,
                        "rate not found".yellow()
                    ),
                }
            }
            println!("{}", "-".repeat(40));
            println!(
                "TOTAL: {} {}",
                format_grouped(report.valuation.total),
                report.valuation.base
            );
        }

        Command::Buy { currency, amount } => {
            let receipt = hub.buy(currency, *amount)?;
            print_receipt("Purchase executed", "Estimated cost", &receipt);
        }

        Command::Sell { currency, amount } => {
            let receipt = hub.sell(currency, *amount)?;
            print_receipt("Sale executed", "Estimated proceeds", &receipt);
        }

        Command::GetRate { from, to } => {
            let quote = hub.get_rate(from, to)?;
            match &quote.updated_at {
                Some(updated) => println!(
                    "Rate {}→{}: {:.6} ({}, updated: {})",
                    quote.from, quote.to, quote.rate, quote.provenance, updated
                ),
                None => println!(
                    "Rate {}→{}: {:.6} ({})",
                    quote.from, quote.to, quote.rate, quote.provenance
                ),
            }
            if let Some(reverse) = quote.reverse_rate {
                println!("Reverse rate {}→{}: {:.6}", quote.to, quote.from, reverse);
            }
        }

        Command::Currencies => {
            println!("Available currencies:");
            for currency in hub.list_currencies() {
                println!("{}", currency.display_info());
            }
            let counts = hub.currency_counts();
            println!(
                "{} currencies ({} fiat, {} crypto)",
                counts.fiat + counts.crypto,
                counts.fiat,
                counts.crypto
            );
        }
    }
    Ok(())
}

pub fn print_error(e: &CoreError) {
    eprintln!("{}", format!("Error: {e}").red());
}

fn print_receipt(action: &str, estimate_label: &str, receipt: &TradeReceipt) {
    match receipt.unit_rate_usd {
        Some(rate) => {
            println!(
                "{}",
                format!(
                    "{action}: {:.4} {} at {:.2} USD/{}",
                    receipt.amount, receipt.code, rate, receipt.code
                )
                .green()
            );
            if let Some(estimated) = receipt.estimated_usd {
                println!("{estimate_label}: {} USD", format_grouped(estimated));
            }
        }
        None => println!(
            "{}",
            format!(
                "{action}: {:.4} {} (no USD rate, value unknown)",
                receipt.amount, receipt.code
            )
            .green()
        ),
    }
    println!("Portfolio change:");
    println!(
        "- {}: {:.4} → {:.4}",
        receipt.code, receipt.old_balance, receipt.new_balance
    );
}
