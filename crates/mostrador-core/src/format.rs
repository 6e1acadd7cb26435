//! # es-AR Formatting
//!
//! Amounts are typed and shown the Argentine way: `.` groups thousands and
//! `,` separates decimals (`12.345,67`). Dates are shown as `DD/MM/AAAA`.

use chrono::NaiveDate;

use crate::money::Money;

/// Formats an amount without the currency sign, always with two decimals.
///
/// ```rust
/// use mostrador_core::format::format_amount_es;
/// use mostrador_core::Money;
///
/// assert_eq!(format_amount_es(Money::from_cents(1_234_567)), "12.345,67");
/// assert_eq!(format_amount_es(Money::from_cents(5)), "0,05");
/// ```
pub fn format_amount_es(amount: Money) -> String {
    let cents = amount.cents();
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{},{:02}", sign, group_thousands(abs / 100), abs % 100)
}

/// Inserts `.` every three digits from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Parses a typed amount such as `"12.345,67"` or `"$ 1.500"`.
///
/// Thousands dots are dropped, the first comma becomes the decimal point and
/// anything that is not a digit, `.` or `-` is ignored. Returns `None` when
/// nothing numeric remains.
///
/// ```rust
/// use mostrador_core::format::parse_amount_es;
///
/// assert_eq!(parse_amount_es("12.345,67"), Some(12345.67));
/// assert_eq!(parse_amount_es("$ 1.500"), Some(1500.0));
/// assert_eq!(parse_amount_es("abc"), None);
/// ```
pub fn parse_amount_es(text: &str) -> Option<f64> {
    let cleaned: String = text
        .replace('.', "")
        .replacen(',', ".", 1)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a date for tables: `2024-03-09` → `09/03/2024`.
pub fn format_date_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
