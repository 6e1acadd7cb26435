//! # Stock
//!
//! Current stock per article, its reorder status, and stock-ingress entries.
//!
//! ## Status Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity <= 0                 → OutOfStock      ("Agotado")            │
//! │  0 < quantity <= reorder point → ReorderNeeded   ("Necesario volver a  │
//! │                                                    comprar")           │
//! │  otherwise                     → InStock         ("En stock")          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status is always derived from the quantity reported by
//! `/api/stock/actual`, kept on each report row. Editing a reorder point
//! recomputes the row from that quantity.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{self, Money};
use crate::validation::{validate_positive_count, validate_required};
use crate::wire;

// =============================================================================
// Stock Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockStatus {
    #[serde(rename = "AGOTADO")]
    OutOfStock,
    #[serde(rename = "NECESARIO")]
    ReorderNeeded,
    #[serde(rename = "OK")]
    InStock,
}

impl StockStatus {
    /// Derives the status from a quantity and a reorder point.
    ///
    /// ```rust
    /// use mostrador_core::stock::StockStatus;
    ///
    /// assert_eq!(StockStatus::from_levels(0, 5), StockStatus::OutOfStock);
    /// assert_eq!(StockStatus::from_levels(5, 5), StockStatus::ReorderNeeded);
    /// assert_eq!(StockStatus::from_levels(6, 5), StockStatus::InStock);
    /// ```
    pub fn from_levels(quantity: i64, reorder_point: u32) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity <= i64::from(reorder_point) {
            StockStatus::ReorderNeeded
        } else {
            StockStatus::InStock
        }
    }

    /// Label shown to the shop.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Agotado",
            StockStatus::ReorderNeeded => "Necesario volver a comprar",
            StockStatus::InStock => "En stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Wire helpers
// =============================================================================

/// Reads the `rows` of a `{success?, rows, error?}` envelope.
///
/// `success: false` or an `error` key is a backend failure; a missing
/// `rows` key is an empty list.
pub fn rows_from_response<T: DeserializeOwned>(body: &Value) -> CoreResult<Vec<T>> {
    let map = body.as_object().ok_or_else(|| {
        CoreError::UnexpectedPayload("expected a JSON object with rows".to_string())
    })?;

    let failed = map.get("success").and_then(Value::as_bool) == Some(false);
    if let Some(message) = map.get("error").and_then(Value::as_str) {
        return Err(CoreError::Backend(message.to_string()));
    }
    if failed {
        return Err(CoreError::Backend("request was not successful".to_string()));
    }

    match map.get("rows") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(rows) => serde_json::from_value(rows.clone())
            .map_err(|e| CoreError::UnexpectedPayload(format!("invalid rows: {e}"))),
    }
}

// =============================================================================
// Stock Level
// =============================================================================

/// One row of `/api/stock/actual`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockLevel {
    #[serde(rename = "id_articulo", default)]
    pub article_id: String,

    #[serde(rename = "cantidad_total", default, deserialize_with = "wire::count")]
    pub quantity: i64,

    #[serde(
        rename = "costo_promedio",
        default,
        serialize_with = "money::decimal::serialize",
        deserialize_with = "wire::amount"
    )]
    #[ts(as = "f64")]
    pub average_cost: Money,

    #[serde(rename = "tipo", default)]
    pub product_type: Option<String>,
}

// =============================================================================
// Stock Report
// =============================================================================

/// One line of the current-stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct StockReportRow {
    pub id: String,
    pub name: String,
    pub product_type: String,
    pub quantity: i64,
    pub average_cost: Money,
    pub reorder_point: u32,
    pub status: StockStatus,
}

/// Current stock joined with the catalog and local reorder points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct StockReport {
    pub rows: Vec<StockReportRow>,
}

impl StockReport {
    /// Builds the report.
    ///
    /// ## Rows
    /// - One per catalog id, sorted, including ids with no stock (quantity 0)
    /// - When the catalog is empty, one per stock row instead
    /// - Stock rows without an article id are ignored
    pub fn build(
        catalog: &Catalog,
        levels: &[StockLevel],
        reorder_points: &HashMap<String, u32>,
    ) -> Self {
        let by_id: HashMap<&str, &StockLevel> = levels
            .iter()
            .filter(|l| !l.article_id.trim().is_empty())
            .map(|l| (l.article_id.as_str(), l))
            .collect();

        let mut ids: Vec<&str> = if catalog.is_empty() {
            by_id.keys().copied().collect()
        } else {
            catalog.iter().map(|(id, _)| id).collect()
        };
        ids.sort_unstable();

        let rows = ids
            .into_iter()
            .map(|id| {
                let level = by_id.get(id);
                let product = catalog.get(id);
                let quantity = level.map(|l| l.quantity).unwrap_or(0);
                let reorder_point = reorder_points.get(id).copied().unwrap_or(0);
                let product_type = level
                    .and_then(|l| l.product_type.clone())
                    .filter(|t| !t.is_empty())
                    .or_else(|| product.and_then(|p| p.tipo.clone()))
                    .unwrap_or_default();
                StockReportRow {
                    id: id.to_string(),
                    name: product.map(|p| p.nombre.clone()).unwrap_or_default(),
                    product_type,
                    quantity,
                    average_cost: level.map(|l| l.average_cost).unwrap_or_default(),
                    reorder_point,
                    status: StockStatus::from_levels(quantity, reorder_point),
                }
            })
            .collect();

        StockReport { rows }
    }

    pub fn get(&self, id: &str) -> Option<&StockReportRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Updates a row's reorder point and recomputes its status from the
    /// row's reported quantity. Returns the new status, or `None` for ids
    /// not in the report.
    pub fn set_reorder_point(&mut self, id: &str, reorder_point: u32) -> Option<StockStatus> {
        let row = self.rows.iter_mut().find(|r| r.id == id)?;
        row.reorder_point = reorder_point;
        row.status = StockStatus::from_levels(row.quantity, reorder_point);
        Some(row.status)
    }

    /// Rows that are out of stock or at/below their reorder point.
    pub fn needing_attention(&self) -> impl Iterator<Item = &StockReportRow> {
        self.rows.iter().filter(|r| r.status != StockStatus::InStock)
    }
}

// =============================================================================
// Stock Ingress
// =============================================================================

/// A stock-ingress entry, as sent to and listed by `/api/stock/ingresos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockIngress {
    /// Backend row id; absent on entries being created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "fecha")]
    #[ts(as = "String")]
    pub date: NaiveDate,

    #[serde(rename = "id_articulo")]
    pub article_id: String,

    #[serde(rename = "tipo", default)]
    pub product_type: String,

    /// Reference sale price.
    #[serde(rename = "precio_individual", default, with = "money::decimal_opt")]
    #[ts(as = "Option<f64>")]
    pub unit_price: Option<Money>,

    #[serde(rename = "costo_individual", with = "money::decimal")]
    #[ts(as = "f64")]
    pub unit_cost: Money,

    #[serde(rename = "cantidad")]
    pub quantity: i64,

    #[serde(rename = "costo_total", with = "money::decimal")]
    #[ts(as = "f64")]
    pub total_cost: Money,

    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
}

/// Fields of the stock-ingress form.
#[derive(Debug, Clone, Default)]
pub struct StockIngressInput {
    pub date: Option<NaiveDate>,
    pub article_id: String,
    pub product_type: String,
    pub unit_price: Option<f64>,
    pub unit_cost: Option<f64>,
    pub quantity: i64,
    /// Typed total; used only when positive.
    pub total_cost: Option<f64>,
    pub notes: String,
}

impl StockIngressInput {
    /// Validates the form and produces the payload.
    ///
    /// ## Rules
    /// - date, article id and a finite unit cost are required
    /// - quantity must be `> 0`
    /// - total cost is the typed total when positive, else cost × quantity
    pub fn build(&self) -> CoreResult<StockIngress> {
        let date = self.date.ok_or_else(|| ValidationError::required("fecha"))?;
        let article_id = validate_required("id_articulo", &self.article_id)?.to_uppercase();
        let unit_cost = self
            .unit_cost
            .and_then(Money::from_decimal)
            .ok_or_else(|| ValidationError::required("costo_individual"))?;
        let quantity = validate_positive_count("cantidad", self.quantity)?;

        let total_cost = self
            .total_cost
            .and_then(Money::from_decimal)
            .filter(Money::is_positive)
            .or_else(|| unit_cost.multiply_quantity(quantity))
            .ok_or_else(|| ValidationError::TooLarge {
                field: "costo_total".to_string(),
            })?;

        let notes = self.notes.trim();
        Ok(StockIngress {
            id: None,
            date,
            article_id,
            product_type: self.product_type.trim().to_string(),
            unit_price: self.unit_price.and_then(Money::from_decimal),
            unit_cost,
            quantity,
            total_cost,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
