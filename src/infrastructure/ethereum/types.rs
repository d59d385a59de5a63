//! Display helpers for values coming back from the node

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use chrono::{DateTime, Utc};

/// Wei rendered as ether with all 18 decimals trimmed of trailing zeros
pub fn format_ether(wei: U256) -> String {
    let formatted = format_units(wei, "ether").unwrap_or_else(|_| wei.to_string());
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => formatted,
    }
}

/// Gas price in gwei, two decimals
pub fn format_gwei(wei: u128) -> String {
    format!("{:.2}", wei as f64 / 1e9)
}

/// Block timestamp as RFC 3339 UTC, or the raw number if out of range
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}
