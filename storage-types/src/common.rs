//! Common utility functions shared across models

use anyhow::Result;
use num_format::{Locale, ToFormattedString};

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

/// Binary units in ascending order, as displayed to the operator.
pub const BYTE_UNITS: [&str; 6] = ["Bytes", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Convert bytes to a human-readable string using base-1024 units.
///
/// Picks the largest unit whose magnitude is at least 1, rounds to `decimals`
/// places (moving up a unit if that reaches 1024) and drops trailing zeros, so `1024` renders as `"1 KiB"` and `1536`
/// as `"1.5 KiB"`. Zero renders as `"0 Bytes"`. Values beyond the PiB range
/// stay in PiB.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut steps = 0;
    let mut val = bytes as f64;

    while val >= 1024. && steps < BYTE_UNITS.len() - 1 {
        val /= 1024.;
        steps += 1;
    }

    // Rounding can carry into the next unit (1023.999 KiB -> "1024 KiB").
    let scale = 10f64.powi(decimals as i32);
    if (val * scale).round() / scale >= 1024. && steps < BYTE_UNITS.len() - 1 {
        val /= 1024.;
        steps += 1;
    }

    let rendered = format!("{:.*}", decimals, val);
    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };

    format!("{} {}", trimmed, BYTE_UNITS[steps])
}

/// Like [`format_bytes`] with two decimals, optionally followed by the exact
/// byte count (e.g. `"1.5 KiB (1,536 bytes)"`).
pub fn bytes_to_pretty(bytes: u64, add_bytes: bool) -> String {
    let pretty = format_bytes(bytes, 2);
    if add_bytes {
        format!("{} ({} bytes)", pretty, bytes.to_formatted_string(&Locale::en))
    } else {
        pretty
    }
}

/// Whole mebibytes contained in `bytes`, rounding down.
pub fn bytes_to_mebibytes(bytes: u64) -> u64 {
    bytes / MIB
}

/// Parse a human-readable size into bytes (e.g. `"20000 MiB"`, `"1.5G"`, `"512"`).
///
/// Units are case-insensitive; a bare number is a byte count.
pub fn parse_size(input: &str) -> Result<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow::anyhow!("Invalid input: empty size"));
    }

    let split_at = input
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split_at);

    let val: f64 = number
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid number '{}': {}", number.trim(), e))?;
    if !val.is_finite() || val < 0. {
        return Err(anyhow::anyhow!("Invalid size: {}", input));
    }

    let steps = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" | "byte" | "bytes" => 0,
        "k" | "kb" | "kib" => 1,
        "m" | "mb" | "mib" => 2,
        "g" | "gb" | "gib" => 3,
        "t" | "tb" | "tib" => 4,
        "p" | "pb" | "pib" => 5,
        other => return Err(anyhow::anyhow!("Invalid unit: {}", other)),
    };

    let bytes = val * 1024_f64.powi(steps);
    if bytes > u64::MAX as f64 {
        return Err(anyhow::anyhow!("Size out of range: {}", input));
    }

    Ok(bytes as u64)
}
