//! Server command implementation

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fintrack_server::{ServerConfig, DEFAULT_TOKEN_TTL};

use super::{load_rates, open_db, RATES_FILE_ENV};

pub const JWT_SECRET_ENV: &str = "FINTRACK_JWT_SECRET";
pub const TOKEN_TTL_ENV: &str = "FINTRACK_TOKEN_TTL_SECS";
pub const ALLOWED_ORIGINS_ENV: &str = "FINTRACK_ALLOWED_ORIGINS";

/// Shortest accepted signing secret
const MIN_SECRET_LENGTH: usize = 16;

/// Resolve the server configuration from raw environment values
pub fn build_server_config(
    secret: Option<String>,
    ttl_secs: Option<String>,
    allowed_origins: Option<String>,
) -> Result<ServerConfig> {
    let Some(secret) = secret.filter(|s| !s.trim().is_empty()) else {
        bail!("{} must be set to sign bearer tokens", JWT_SECRET_ENV);
    };
    if secret.len() < MIN_SECRET_LENGTH {
        bail!(
            "{} must be at least {} characters",
            JWT_SECRET_ENV,
            MIN_SECRET_LENGTH
        );
    }

    let token_ttl = match ttl_secs.filter(|s| !s.trim().is_empty()) {
        Some(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", TOKEN_TTL_ENV, raw))?;
            if secs == 0 {
                bail!("{} must be greater than zero", TOKEN_TTL_ENV);
            }
            Duration::from_secs(secs)
        }
        None => DEFAULT_TOKEN_TTL,
    };

    let allowed_origins = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let mut config = ServerConfig::new(secret);
    config.token_ttl = token_ttl;
    config.allowed_origins = allowed_origins;
    config.currency = load_rates()?;
    Ok(config)
}

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    let config = build_server_config(
        std::env::var(JWT_SECRET_ENV).ok(),
        std::env::var(TOKEN_TTL_ENV).ok(),
        std::env::var(ALLOWED_ORIGINS_ENV).ok(),
    )?;

    println!("🚀 Starting fintrack web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!("   🔑 Token lifetime: {}s", config.token_ttl.as_secs());
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    match std::env::var(RATES_FILE_ENV) {
        Ok(path) if !path.is_empty() => println!("   💱 Rates: {}", path),
        _ => println!("   💱 Rates: built-in table"),
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let static_dir_str = match static_dir {
        Some(dir) => Some(dir.to_str().context("static_dir path must be valid UTF-8")?),
        None => None,
    };
    fintrack_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
