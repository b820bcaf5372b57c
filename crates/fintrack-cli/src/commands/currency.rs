//! Currency conversion command

use anyhow::{bail, Result};
use fintrack_core::currency::normalize_code;
use fintrack_core::CurrencyTable;

/// Convert and print; returns the converted amount
pub fn cmd_convert(table: &CurrencyTable, amount: f64, from: &str, to: &str) -> Result<f64> {
    if !amount.is_finite() {
        bail!("Amount must be a number");
    }

    let from = normalize_code(from);
    let to = normalize_code(to);
    let converted = table.convert(amount, &from, &to).map_err(|e| {
        anyhow::anyhow!("{} (supported: {})", e, table.codes().join(", "))
    })?;

    println!("{:.2} {} = {:.2} {}", amount, from, converted, to);
    Ok(converted)
}
