//! # Sales
//!
//! The pending sales list: records as the backend stores them, the form
//! input that produces them, and the day summary shown above the table.
//!
//! ## Sale Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleInput (date, id, units, payment, notes)  +  PriceForm             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleInput::build                                                      │
//! │       ├── missing date / id / payment     → ValidationError::Required  │
//! │       ├── id not in catalog               → CoreError::ProductNotFound │
//! │       ├── no unit price                   → ValidationError::Required  │
//! │       ├── units <= 0                      → MustBePositive             │
//! │       └── Exchange mode                   → units = −|units|           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRecord ──► POST /api/ventas  (or PUT /api/ventas/{index})         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{self, Money};
use crate::pricing::PriceForm;
use crate::types::{PaymentMethod, SaleMode};
use crate::validation::{validate_positive_count, validate_required};
use crate::wire;
use crate::EXCHANGE_NOTES_PREFIX;

// =============================================================================
// Sale Record
// =============================================================================

/// One sale as exchanged with the backend.
///
/// Amounts travel as decimal numbers; `total` is computed by the backend
/// and absent on records we send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRecord {
    #[serde(rename = "fecha")]
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Catalog ID, upper-cased.
    pub id: String,

    #[serde(rename = "nombre", default)]
    pub name: String,

    /// Unit price after discount.
    #[serde(
        rename = "precio",
        serialize_with = "money::decimal::serialize",
        deserialize_with = "wire::amount"
    )]
    #[ts(as = "f64")]
    pub unit_price: Money,

    /// Negative for exchanges.
    #[serde(rename = "unidades", deserialize_with = "wire::count")]
    pub units: i64,

    #[serde(rename = "pago")]
    #[ts(as = "String")]
    pub payment: PaymentMethod,

    #[serde(rename = "notas", default)]
    pub notes: Option<String>,

    #[serde(
        default,
        serialize_with = "money::decimal_opt::serialize",
        deserialize_with = "wire::amount_opt",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<f64>")]
    pub total: Option<Money>,
}

impl SaleRecord {
    /// Line total: the backend's `total` when present, else price × units.
    /// `None` when price × units overflows.
    pub fn line_total(&self) -> Option<Money> {
        self.total
            .or_else(|| self.unit_price.multiply_quantity(self.units))
    }

    pub fn is_exchange(&self) -> bool {
        self.units < 0
    }
}

// =============================================================================
// Sale Input
// =============================================================================

/// Non-price fields of the sale form.
#[derive(Debug, Clone, Default)]
pub struct SaleInput {
    pub date: Option<NaiveDate>,
    pub id: String,
    /// Display name; the catalog name is used when blank.
    pub name: String,
    pub units: Option<i64>,
    pub payment: Option<PaymentMethod>,
    pub notes: String,
}

impl SaleInput {
    /// Validates the form and produces the record to send.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use mostrador_core::catalog::{Catalog, ProductRecord};
    /// use mostrador_core::sale::SaleInput;
    /// use mostrador_core::{Money, PaymentMethod, PriceForm, SaleMode};
    ///
    /// let catalog = Catalog::from_entries([("A1", ProductRecord { nombre: "Aritos 1".into(), tipo: None })]);
    /// let mut form = PriceForm::new();
    /// form.on_mode_changed(SaleMode::Exchange);
    /// form.on_base_price_edited(90.0);
    ///
    /// let input = SaleInput {
    ///     date: NaiveDate::from_ymd_opt(2024, 5, 1),
    ///     id: "a1".into(),
    ///     units: Some(2),
    ///     payment: Some(PaymentMethod::Efectivo),
    ///     ..Default::default()
    /// };
    /// let sale = input.build(&form, &catalog).unwrap();
    /// assert_eq!(sale.id, "A1");
    /// assert_eq!(sale.units, -2);
    /// assert_eq!(sale.unit_price, Money::from_cents(9_000));
    /// ```
    pub fn build(&self, form: &PriceForm, catalog: &Catalog) -> CoreResult<SaleRecord> {
        let date = self.date.ok_or_else(|| ValidationError::required("fecha"))?;

        let id = validate_required("id", &self.id)?.to_uppercase();
        if !catalog.contains(&id) {
            return Err(CoreError::ProductNotFound(id));
        }

        let unit_price = form
            .unit_price()
            .ok_or_else(|| ValidationError::required("precio"))?;
        if unit_price.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "precio".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        let units = self.units.ok_or_else(|| ValidationError::required("unidades"))?;
        let units = validate_positive_count("unidades", units)?;
        let units = if form.is_exchange_mode() { -units } else { units };
        if unit_price.multiply_quantity(units).is_none() {
            return Err(ValidationError::TooLarge {
                field: "total".to_string(),
            }
            .into());
        }

        let payment = self
            .payment
            .clone()
            .filter(|p| !p.label().trim().is_empty())
            .ok_or_else(|| ValidationError::required("pago"))?;

        let name = match self.name.trim() {
            "" => catalog.display_name(&id).to_string(),
            typed => typed.to_string(),
        };

        let notes = self.notes.trim();
        Ok(SaleRecord {
            date,
            id,
            name,
            unit_price,
            units,
            payment,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            total: None,
        })
    }
}

/// Adjusts the notes field when the form switches mode.
///
/// Entering Exchange prefixes the notes with `"CAMBIO - "` unless already
/// prefixed. Leaving Exchange clears notes that hold only the prefix.
/// Existing notes are kept after the prefix rather than replaced by it.
///
/// ```rust
/// use mostrador_core::sale::notes_for_mode;
/// use mostrador_core::SaleMode;
///
/// assert_eq!(notes_for_mode("talle M", SaleMode::Exchange), "CAMBIO - talle M");
/// assert_eq!(notes_for_mode("CAMBIO - ", SaleMode::Sale), "");
/// ```
pub fn notes_for_mode(notes: &str, mode: SaleMode) -> String {
    match mode {
        SaleMode::Exchange if notes.starts_with(EXCHANGE_NOTES_PREFIX) => notes.to_string(),
        SaleMode::Exchange => format!("{EXCHANGE_NOTES_PREFIX}{notes}"),
        SaleMode::Sale if notes == EXCHANGE_NOTES_PREFIX => String::new(),
        SaleMode::Sale => notes.to_string(),
    }
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Figures shown above the pending sales table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    /// Sales recorded for the day.
    pub count: usize,
    /// Sum of the day's line totals.
    pub revenue: Money,
    /// Revenue / count, zero when there are no sales.
    pub average: Money,
    /// Sum of every pending line total, any day.
    pub pending_total: Money,
    /// Number of pending sales, any day.
    pub pending_count: usize,
}

impl SalesSummary {
    pub fn compute(sales: &[SaleRecord], day: NaiveDate) -> Self {
        let todays: Vec<&SaleRecord> = sales.iter().filter(|s| s.date == day).collect();
        let revenue: Money = todays.iter().filter_map(|s| s.line_total()).sum();
        SalesSummary {
            count: todays.len(),
            revenue,
            average: revenue.average_over(todays.len()),
            pending_total: sales.iter().filter_map(SaleRecord::line_total).sum(),
            pending_count: sales.len(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductRecord;

    fn catalog() -> Catalog {
        Catalog::from_entries([
            ("A1", ProductRecord { nombre: "Aritos 1".into(), tipo: None }),
            ("C2", ProductRecord { nombre: "Collar 2".into(), tipo: None }),
        ])
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn input() -> SaleInput {
        SaleInput {
            date: Some(day(1)),
            id: "C2".into(),
            name: String::new(),
            units: Some(3),
            payment: Some(PaymentMethod::Debito),
            notes: "  regalo ".into(),
        }
    }

    fn priced(base: f64, discount: f64) -> PriceForm {
        let mut form = PriceForm::new();
        form.on_base_price_edited(base);
        form.on_discount_edited(discount);
        form
    }

    #[test]
    fn test_build_sale() {
        let sale = input().build(&priced(100.0, 10.0), &catalog()).unwrap();
        assert_eq!(sale.id, "C2");
        assert_eq!(sale.name, "Collar 2");
        assert_eq!(sale.unit_price, Money::from_cents(9_000));
        assert_eq!(sale.units, 3);
        assert_eq!(sale.notes.as_deref(), Some("regalo"));
        assert_eq!(sale.line_total(), Some(Money::from_cents(27_000)));
    }

    #[test]
    fn test_build_requires_fields() {
        let form = priced(100.0, 0.0);

        let mut missing_date = input();
        missing_date.date = None;
        assert!(matches!(
            missing_date.build(&form, &catalog()),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let mut missing_payment = input();
        missing_payment.payment = None;
        assert!(missing_payment.build(&form, &catalog()).is_err());

        let mut zero_units = input();
        zero_units.units = Some(0);
        assert!(matches!(
            zero_units.build(&form, &catalog()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        assert!(input().build(&PriceForm::new(), &catalog()).is_err());
    }

    #[test]
    fn test_build_rejects_unknown_id() {
        let mut unknown = input();
        unknown.id = "Z9".into();
        let err = unknown.build(&priced(10.0, 0.0), &catalog()).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(ref id) if id == "Z9"));
    }

    #[test]
    fn test_build_exchange_negates_units() {
        let mut form = priced(100.0, 0.0);
        form.on_mode_changed(SaleMode::Exchange);
        let sale = input().build(&form, &catalog()).unwrap();
        assert_eq!(sale.units, -3);
        assert!(sale.is_exchange());
        assert_eq!(sale.line_total(), Some(Money::from_cents(-30_000)));
    }

    #[test]
    fn test_build_uses_typed_final_price() {
        let mut form = priced(100.0, 10.0);
        form.on_final_price_edited(85.0);
        let sale = input().build(&form, &catalog()).unwrap();
        assert_eq!(sale.unit_price, Money::from_cents(8_500));
    }

    #[test]
    fn test_notes_for_mode() {
        assert_eq!(notes_for_mode("", SaleMode::Exchange), "CAMBIO - ");
        assert_eq!(notes_for_mode("CAMBIO - roto", SaleMode::Exchange), "CAMBIO - roto");
        assert_eq!(notes_for_mode("CAMBIO - roto", SaleMode::Sale), "CAMBIO - roto");
        assert_eq!(notes_for_mode("x", SaleMode::Sale), "x");
    }

    #[test]
    fn test_sale_record_wire_format() {
        let json = r#"{"fecha":"2024-05-01","id":"A1","nombre":"Aritos","precio":90.5,
                       "unidades":2,"total":181.0,"pago":"Efectivo","notas":""}"#;
        let sale: SaleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(sale.unit_price, Money::from_cents(9_050));
        assert_eq!(sale.total, Some(Money::from_cents(18_100)));
        assert_eq!(sale.payment, PaymentMethod::Efectivo);

        let sent = SaleRecord { total: None, ..sale };
        let value = serde_json::to_value(&sent).unwrap();
        assert_eq!(value["precio"], 90.5);
        assert_eq!(value["fecha"], "2024-05-01");
        assert!(value.get("total").is_none());
    }

    #[test]
    fn test_sales_summary() {
        let mut sales = vec![
            input().build(&priced(100.0, 0.0), &catalog()).unwrap(),
            input().build(&priced(50.0, 0.0), &catalog()).unwrap(),
        ];
        let mut other_day = input();
        other_day.date = Some(day(2));
        other_day.units = Some(1);
        sales.push(other_day.build(&priced(10.0, 0.0), &catalog()).unwrap());

        let summary = SalesSummary::compute(&sales, day(1));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.revenue, Money::from_cents(45_000));
        assert_eq!(summary.average, Money::from_cents(22_500));
        assert_eq!(summary.pending_count, 3);
        assert_eq!(summary.pending_total, Money::from_cents(46_000));

        let empty = SalesSummary::compute(&[], day(1));
        assert_eq!(empty.average, Money::zero());
    }

    #[test]
    fn test_line_total_overflow() {
        let json = r#"{"fecha":"2024-05-01","id":"A1","precio":1e15,"unidades":1e6,"pago":"Efectivo"}"#;
        let huge: SaleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(huge.line_total(), None);

        let normal = input().build(&priced(10.0, 0.0), &catalog()).unwrap();
        let summary = SalesSummary::compute(&[normal, huge], day(1));
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.pending_total, Money::from_cents(3_000));

        let mut too_many = input();
        too_many.units = Some(i64::MAX / 10);
        assert!(matches!(
            too_many.build(&priced(1_000.0, 0.0), &catalog()),
            Err(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
    }
}
