//! # Dashboard
//!
//! Aggregates the exported sales history (`GET /api/historial`) over a date
//! range: revenue, units sold, a per-day timeline and breakdowns by payment
//! method, product and product group.
//!
//! ## History Shape
//! ```text
//! {
//!   "2024-05-01": [ {fecha, id, nombre, precio, unidades, total, pago, notas}, ... ],
//!   "2024-05-02": [ ... ]
//! }
//! ```
//!
//! Keys that are not dates are skipped, as are rows that cannot be read or
//! whose line total overflows.

use chrono::{Months, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::catalog::id_prefix;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sale::SaleRecord;

/// Label for sales whose id has no letter prefix.
pub const OTHER_GROUP: &str = "OTROS";

/// Friendly name of a product group, by id prefix. Unknown prefixes are
/// returned as-is.
pub fn group_label(prefix: &str) -> &str {
    match prefix {
        "A" => "Aritos",
        "AN" => "Anillos",
        "C" => "Collar",
        "P" => "Pulsera",
        "G" => "Gafas",
        "N" => "Neceseres",
        "R" => "Ropa",
        "V" => "Varios",
        other => other,
    }
}

// =============================================================================
// History
// =============================================================================

/// Exported sales, by day.
#[derive(Debug, Clone, Default)]
pub struct History {
    days: BTreeMap<NaiveDate, Vec<SaleRecord>>,
    /// Rows or keys that could not be read.
    pub skipped: usize,
}

impl History {
    pub fn from_days(days: BTreeMap<NaiveDate, Vec<SaleRecord>>) -> Self {
        History { days, skipped: 0 }
    }

    /// Interprets a `/api/historial` response body.
    pub fn from_response(body: &Value) -> CoreResult<Self> {
        let map = body.as_object().ok_or_else(|| {
            CoreError::UnexpectedPayload("history response is not a JSON object".to_string())
        })?;
        if let Some(message) = map.get("error").and_then(Value::as_str) {
            return Err(CoreError::Backend(message.to_string()));
        }

        let mut history = History::default();
        for (key, rows) in map {
            let date = key
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            let (Some(date), Some(rows)) = (date, rows.as_array()) else {
                history.skipped += 1;
                continue;
            };

            let mut day = Vec::with_capacity(rows.len());
            for row in rows {
                let mut row = row.clone();
                if let Some(obj) = row.as_object_mut() {
                    obj.entry("fecha")
                        .or_insert_with(|| Value::String(date.to_string()));
                }
                match serde_json::from_value::<SaleRecord>(row) {
                    Ok(sale) if sale.line_total().is_some() => day.push(sale),
                    _ => history.skipped += 1,
                }
            }
            if !day.is_empty() {
                history.days.entry(date).or_default().extend(day);
            }
        }
        Ok(history)
    }

    /// Sales of one day; empty when none were exported.
    pub fn sales_on(&self, date: NaiveDate) -> &[SaleRecord] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[SaleRecord])> {
        self.days.iter().map(|(d, s)| (*d, s.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive date range; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "Option<String>")]
    pub start: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange { start, end }
    }

    /// Every day.
    pub fn all() -> Self {
        DateRange::default()
    }

    /// From the same day last month up to `today`.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use mostrador_core::dashboard::DateRange;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    /// let range = DateRange::last_month(today);
    /// assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 29));
    /// assert_eq!(range.end, Some(today));
    /// ```
    pub fn last_month(today: NaiveDate) -> Self {
        DateRange {
            start: today.checked_sub_months(Months::new(1)),
            end: Some(today),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

// =============================================================================
// Summary
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DayTotal {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Breakdown {
    pub label: String,
    pub total: Money,
}

/// Everything the dashboard shows for a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub revenue: Money,
    /// Units sold; exchange rows (negative units) count as zero.
    pub units_sold: i64,
    /// One entry per day in range, ascending.
    pub timeline: Vec<DayTotal>,
    pub by_payment: Vec<Breakdown>,
    pub by_product: Vec<Breakdown>,
    pub by_group: Vec<Breakdown>,
}

impl DashboardSummary {
    /// Aggregates the history over `range`. Breakdowns are sorted by total,
    /// largest first.
    pub fn compute(history: &History, range: &DateRange) -> Self {
        let mut summary = DashboardSummary::default();
        let mut by_payment: HashMap<String, Money> = HashMap::new();
        let mut by_product: HashMap<String, Money> = HashMap::new();
        let mut by_group: HashMap<String, Money> = HashMap::new();

        for (date, sales) in history.days().filter(|(d, _)| range.contains(*d)) {
            let mut day_total = Money::zero();
            for sale in sales {
                let Some(total) = sale.line_total() else {
                    continue;
                };
                summary.revenue += total;
                summary.units_sold += sale.units.max(0);
                day_total += total;

                let payment = match sale.payment.label().trim() {
                    "" => "Otro".to_string(),
                    label => label.to_string(),
                };
                *by_payment.entry(payment).or_default() += total;

                let product = [sale.name.trim(), sale.id.trim()]
                    .into_iter()
                    .find(|s| !s.is_empty())
                    .unwrap_or("Producto")
                    .to_string();
                *by_product.entry(product).or_default() += total;

                let group = id_prefix(&sale.id)
                    .map(|p| group_label(&p).to_string())
                    .unwrap_or_else(|| OTHER_GROUP.to_string());
                *by_group.entry(group).or_default() += total;
            }
            summary.timeline.push(DayTotal {
                date,
                total: day_total,
            });
        }

        summary.by_payment = sorted_breakdown(by_payment);
        summary.by_product = sorted_breakdown(by_product);
        summary.by_group = sorted_breakdown(by_group);
        summary
    }

    /// The `n` best-selling products.
    pub fn top_products(&self, n: usize) -> &[Breakdown] {
        &self.by_product[..n.min(self.by_product.len())]
    }
}

fn sorted_breakdown(totals: HashMap<String, Money>) -> Vec<Breakdown> {
    let mut rows: Vec<Breakdown> = totals
        .into_iter()
        .map(|(label, total)| Breakdown { label, total })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.label.cmp(&b.label)));
    rows
}

// =============================================================================
// Unit Tests
// =============================================================================
