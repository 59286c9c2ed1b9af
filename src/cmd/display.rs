//! Presentation helpers for pence and basis-point figures.

use takehome::core::Pence;

/// Format pence as pounds with thousands separators, e.g. `£12,570.00`.
pub fn format_gbp(pence: Pence) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let abs = pence.unsigned_abs();
    let whole = (abs / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}£{}.{:02}", sign, grouped, abs % 100)
}

/// Format a basis-point rate as a percentage with two decimals, e.g. `8.75%`.
pub fn format_percent(bps: i64) -> String {
    let sign = if bps < 0 { "-" } else { "" };
    let abs = bps.unsigned_abs();
    format!("{}{}.{:02}%", sign, abs / 100, abs % 100)
}
