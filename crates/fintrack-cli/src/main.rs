//! Fintrack CLI - Personal finance tracker
//!
//! Usage:
//!   fintrack init                              Initialize database
//!   fintrack serve --port 3000                 Start web server
//!   fintrack users promote --email a@b.c       Grant admin role
//!   fintrack alerts --email a@b.c              Budget and goal alerts
//!   fintrack convert 100 USD EUR               One-off conversion

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Promote { email }) => commands::cmd_users_promote(&db, &email),
                Some(UsersAction::Demote { email }) => commands::cmd_users_demote(&db, &email),
            }
        }
        Commands::Alerts { email } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_alerts(&db, &email)
        }
        Commands::Goals { email } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_goals(&db, &email)
        }
        Commands::Report { email, from, to } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_report(&db, &email, &from, &to)
        }
        Commands::Convert { amount, from, to } => {
            let table = commands::load_rates()?;
            commands::cmd_convert(&table, amount, &from, &to).map(|_| ())
        }
    }
}
