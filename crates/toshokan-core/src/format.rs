//! Display formatting for byte counts.

const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

/// Format a byte count with decimal units and at most two decimals,
/// e.g. `1450000000` → `"1.45 GB"`.
pub fn pretty_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    let number = format!("{value:.2}");
    let number = number.trim_end_matches('0').trim_end_matches('.');
    format!("{number} {}", UNITS[unit])
}
