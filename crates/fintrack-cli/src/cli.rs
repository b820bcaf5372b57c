//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fintrack - Track spending, budgets and savings goals
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "fintrack.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    ///
    /// Reads FINTRACK_JWT_SECRET (required), FINTRACK_TOKEN_TTL_SECS,
    /// FINTRACK_ALLOWED_ORIGINS and FINTRACK_RATES_FILE from the environment.
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with a prebuilt frontend to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Show budget and goal alerts for a user
    Alerts {
        /// Email of the user
        #[arg(short, long)]
        email: String,
    },

    /// Show savings goal progress for a user
    Goals {
        /// Email of the user
        #[arg(short, long)]
        email: String,
    },

    /// Income vs expense and spending by category over a period
    Report {
        /// Email of the user
        #[arg(short, long)]
        email: String,

        /// First day of the period (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last day of the period (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: String,
    },

    /// Convert an amount between currencies
    Convert {
        amount: f64,

        /// Source currency code (e.g. USD)
        from: String,

        /// Target currency code (e.g. EUR)
        to: String,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List registered users
    List,

    /// Grant the admin role
    Promote {
        #[arg(short, long)]
        email: String,
    },

    /// Revoke the admin role
    Demote {
        #[arg(short, long)]
        email: String,
    },
}
