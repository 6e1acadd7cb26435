//! # Cash Count ("Arqueo de caja")
//!
//! Daily opening and closing amounts of the cash drawer, checked against the
//! day's cash sales.
//!
//! ## Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  closing blank ───────────────────────────► OpeningOnly (save opening) │
//! │  pending sales > 0 ───────────────────────► ClosingBlocked (error)     │
//! │                                                                         │
//! │  expected = opening (0 if blank) + cash sales of the day               │
//! │  |closing − expected| < 1 cent ───────────► Balanced  (save both)      │
//! │  otherwise ───────────────────────────────► Mismatch  (nothing saved)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sale::SaleRecord;

/// A saved count for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashCount {
    pub opening: Option<Money>,
    pub closing: Option<Money>,
    #[ts(as = "String")]
    pub saved_at: DateTime<Utc>,
}

/// Outcome of checking a closing amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CashReconciliation {
    OpeningOnly {
        opening: Option<Money>,
    },
    Balanced {
        opening: Option<Money>,
        closing: Money,
        expected: Money,
    },
    Mismatch {
        declared: Money,
        expected: Money,
        /// declared − expected
        difference: Money,
    },
}

impl CashReconciliation {
    /// The count to persist, if any. Mismatches are not saved.
    pub fn to_record(&self, saved_at: DateTime<Utc>) -> Option<CashCount> {
        match *self {
            CashReconciliation::OpeningOnly { opening } => Some(CashCount {
                opening,
                closing: None,
                saved_at,
            }),
            CashReconciliation::Balanced { opening, closing, .. } => Some(CashCount {
                opening,
                closing: Some(closing),
                saved_at,
            }),
            CashReconciliation::Mismatch { .. } => None,
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, CashReconciliation::Balanced { .. })
    }
}

impl fmt::Display for CashReconciliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashReconciliation::OpeningOnly { .. } => write!(f, "Apertura guardada"),
            CashReconciliation::Balanced { .. } => write!(f, "Arqueo guardado"),
            CashReconciliation::Mismatch {
                declared,
                expected,
                difference,
            } => write!(
                f,
                "No coincide el cierre de caja | Cierre declarado {} | Esperado {} | Diferencia {}",
                declared,
                expected,
                difference.abs()
            ),
        }
    }
}

/// Sum of the line totals of cash sales.
pub fn cash_sales_total(sales: &[SaleRecord]) -> Money {
    sales
        .iter()
        .filter(|s| s.payment.is_cash())
        .filter_map(SaleRecord::line_total)
        .sum()
}

/// Checks a day's count.
///
/// ## Example
/// ```rust
/// use mostrador_core::cash::{reconcile, CashReconciliation};
/// use mostrador_core::Money;
///
/// let outcome = reconcile(
///     Some(Money::from_cents(10_000)),
///     Some(Money::from_cents(25_000)),
///     Money::from_cents(15_000),
///     0,
/// )
/// .unwrap();
/// assert!(outcome.is_balanced());
/// ```
pub fn reconcile(
    opening: Option<Money>,
    closing: Option<Money>,
    cash_sales: Money,
    pending_sales: usize,
) -> CoreResult<CashReconciliation> {
    let Some(closing) = closing else {
        return Ok(CashReconciliation::OpeningOnly { opening });
    };
    if pending_sales > 0 {
        return Err(CoreError::ClosingBlocked {
            pending: pending_sales,
        });
    }

    let expected = opening.unwrap_or_default() + cash_sales;
    if closing == expected {
        Ok(CashReconciliation::Balanced {
            opening,
            closing,
            expected,
        })
    } else {
        Ok(CashReconciliation::Mismatch {
            declared: closing,
            expected,
            difference: closing - expected,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::NaiveDate;

    fn sale(payment: PaymentMethod, price: i64, units: i64, total: Option<i64>) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            id: "A1".into(),
            name: "Aritos".into(),
            unit_price: Money::from_cents(price),
            units,
            payment,
            notes: None,
            total: total.map(Money::from_cents),
        }
    }

    #[test]
    fn test_cash_sales_total() {
        let sales = vec![
            sale(PaymentMethod::Efectivo, 1_000, 2, None),
            sale(PaymentMethod::Other("efectivo usd".into()), 500, 1, Some(600)),
            sale(PaymentMethod::Debito, 9_999, 1, None),
            sale(PaymentMethod::Efectivo, 1_000, -1, None),
        ];
        assert_eq!(cash_sales_total(&sales), Money::from_cents(1_600));
        assert_eq!(cash_sales_total(&[]), Money::zero());
    }

    #[test]
    fn test_opening_only() {
        let outcome = reconcile(Some(Money::from_cents(5_000)), None, Money::zero(), 3).unwrap();
        assert_eq!(
            outcome,
            CashReconciliation::OpeningOnly {
                opening: Some(Money::from_cents(5_000))
            }
        );
        let record = outcome.to_record(Utc::now()).unwrap();
        assert_eq!(record.closing, None);
    }

    #[test]
    fn test_closing_blocked_with_pending_sales() {
        let err = reconcile(None, Some(Money::zero()), Money::zero(), 2).unwrap_err();
        assert!(matches!(err, CoreError::ClosingBlocked { pending: 2 }));
    }

    #[test]
    fn test_balanced_with_blank_opening() {
        let outcome = reconcile(None, Some(Money::from_cents(7_500)), Money::from_cents(7_500), 0).unwrap();
        assert!(outcome.is_balanced());
        let record = outcome.to_record(Utc::now()).unwrap();
        assert_eq!(record.closing, Some(Money::from_cents(7_500)));
        assert_eq!(record.opening, None);
    }

    #[test]
    fn test_mismatch() {
        let outcome = reconcile(
            Some(Money::from_cents(10_000)),
            Some(Money::from_cents(24_000)),
            Money::from_cents(15_000),
            0,
        )
        .unwrap();
        assert_eq!(
            outcome,
            CashReconciliation::Mismatch {
                declared: Money::from_cents(24_000),
                expected: Money::from_cents(25_000),
                difference: Money::from_cents(-1_000),
            }
        );
        assert!(outcome.to_record(Utc::now()).is_none());
        assert_eq!(
            outcome.to_string(),
            "No coincide el cierre de caja | Cierre declarado $240,00 | Esperado $250,00 | Diferencia $10,00"
        );
    }
}
