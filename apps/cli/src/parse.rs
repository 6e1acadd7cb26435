//! Argument parsers for amounts, dates and payment methods.

use chrono::NaiveDate;
use mostrador_core::format::parse_amount_es;
use mostrador_core::validation::parse_date;
use mostrador_core::PaymentMethod;

/// Amount in Spanish notation: `12.500`, `1.234,50`, `$ 900`.
pub fn amount(s: &str) -> Result<f64, String> {
    parse_amount_es(s)
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("'{s}' is not an amount (use 1.234,50)"))
}

/// Percentage; accepts a decimal comma.
pub fn percentage(s: &str) -> Result<f64, String> {
    s.trim()
        .trim_end_matches('%')
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| format!("'{s}' is not a percentage"))
}

/// Date as `YYYY-MM-DD`.
pub fn date(s: &str) -> Result<NaiveDate, String> {
    parse_date("fecha", s).map_err(|e| e.to_string())
}

pub fn payment(s: &str) -> Result<PaymentMethod, String> {
    if s.trim().is_empty() {
        return Err("payment method cannot be blank".to_string());
    }
    Ok(PaymentMethod::from(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount() {
        assert_eq!(amount("1.234,50"), Ok(1234.5));
        assert_eq!(amount("12.500"), Ok(12500.0));
        assert!(amount("abc").is_err());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage("12,5%"), Ok(12.5));
        assert_eq!(percentage(" 10 "), Ok(10.0));
        assert!(percentage("diez").is_err());
    }

    #[test]
    fn test_payment_and_date() {
        assert_eq!(payment("Débito"), Ok(PaymentMethod::Debito));
        assert!(payment("  ").is_err());
        assert_eq!(date("2024-05-01"), Ok(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
        assert!(date("01/05/2024").is_err());
    }
}
