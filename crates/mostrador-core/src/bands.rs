//! # Price Bands
//!
//! Maps a (product type, price) pair to a catalog ID using per-group price
//! thresholds.
//!
//! ## How a Band Is Chosen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Group A:  ids        [ A1      A2       A3      ]                     │
//! │            thresholds [ 0       8000     11600   ]                     │
//! │                         │        │        │                            │
//! │  price ──────────────── ┼────────┼────────┼──────────►                 │
//! │                         │  A1    │   A2   │   A3                       │
//! │                                                                         │
//! │  LowerBoundInclusive (canonical):                                      │
//! │    index = largest i with price >= thresholds[i], else 0               │
//! │    5000 → A1    8000 → A2    9000 → A2    20000 → A3                   │
//! │                                                                         │
//! │  UpperBoundInclusive (stock ingress, legacy):                          │
//! │    index = first i with price <= thresholds[i], else last              │
//! │    5000 → A2    8000 → A2    9000 → A3    20000 → A3                   │
//! │                                                                         │
//! │  Either way: index is clamped to ids.len() - 1                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load-Time Validation
//! Threshold lists are checked once, when `/api/rangos` is read: each must be
//! non-empty, finite, non-negative and non-decreasing. A group that fails is
//! rejected (it then behaves as "no ranges"). Lists whose length differs from
//! the group's id count are legal and reported as [`RangeMismatch`]; the
//! clamp above is the documented fallback.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::catalog::CatalogIndex;
use crate::error::{AssignError, CoreError, CoreResult};

// =============================================================================
// Band Rule
// =============================================================================

/// Direction in which thresholds bound a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BandRule {
    /// Threshold `i` is the inclusive lower bound of band `i`.
    /// Used when recording sales.
    #[default]
    LowerBoundInclusive,
    /// Threshold `i` is the inclusive upper bound of band `i`.
    /// Used by the stock-ingress form; kept for parity until confirmed.
    UpperBoundInclusive,
}

impl BandRule {
    /// Selects the band index for a price before clamping to the id count.
    ///
    /// `thresholds` must be non-empty.
    pub fn select_band(&self, thresholds: &[f64], price: f64) -> usize {
        match self {
            BandRule::LowerBoundInclusive => {
                let mut index = 0;
                for (i, threshold) in thresholds.iter().enumerate() {
                    if price >= *threshold {
                        index = i;
                    } else {
                        break;
                    }
                }
                index
            }
            BandRule::UpperBoundInclusive => thresholds
                .iter()
                .position(|threshold| price <= *threshold)
                .unwrap_or(thresholds.len().saturating_sub(1)),
        }
    }
}

impl FromStr for BandRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lower" | "lower_bound_inclusive" | "sales" => Ok(BandRule::LowerBoundInclusive),
            "upper" | "upper_bound_inclusive" | "stock" => Ok(BandRule::UpperBoundInclusive),
            other => Err(format!("Invalid band rule: {other}. Use 'lower' or 'upper'")),
        }
    }
}

impl fmt::Display for BandRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandRule::LowerBoundInclusive => write!(f, "lower"),
            BandRule::UpperBoundInclusive => write!(f, "upper"),
        }
    }
}

// =============================================================================
// Price Ranges
// =============================================================================

/// Validated thresholds per group prefix, as decimal amounts.
///
/// Thresholds are compared against the raw price, without rounding to cents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRanges {
    groups: HashMap<String, Vec<f64>>,
}

/// Result of reading `/api/rangos`: the accepted groups plus one error per
/// rejected group.
#[derive(Debug, Default)]
pub struct LoadedRanges {
    pub ranges: PriceRanges,
    pub rejected: Vec<CoreError>,
}

/// A group whose threshold count differs from its id count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMismatch {
    pub group: String,
    pub thresholds: usize,
    pub ids: usize,
}

impl fmt::Display for RangeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "group {} has {} thresholds for {} ids; bands past the last id map to it",
            self.group, self.thresholds, self.ids
        )
    }
}

impl PriceRanges {
    pub fn new() -> Self {
        PriceRanges::default()
    }

    /// Validates and stores one group's thresholds (decimal amounts).
    ///
    /// ```rust
    /// use mostrador_core::bands::PriceRanges;
    ///
    /// let mut ranges = PriceRanges::new();
    /// assert!(ranges.insert("A", &[0.0, 8000.0, 11600.0]).is_ok());
    /// assert!(ranges.insert("AN", &[8000.0, 7600.0]).is_err());
    /// assert!(ranges.insert("C", &[]).is_err());
    /// ```
    pub fn insert(&mut self, group: &str, thresholds: &[f64]) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidPriceRanges {
            group: group.to_string(),
            reason: reason.to_string(),
        };

        if thresholds.is_empty() {
            return Err(invalid("threshold list is empty"));
        }

        let mut previous: Option<f64> = None;
        for &value in thresholds {
            if !value.is_finite() {
                return Err(invalid("thresholds must be finite"));
            }
            if value < 0.0 {
                return Err(invalid("thresholds must not be negative"));
            }
            if previous.is_some_and(|prev| value < prev) {
                return Err(invalid("thresholds must be ascending"));
            }
            previous = Some(value);
        }

        self.groups.insert(group.to_string(), thresholds.to_vec());
        Ok(())
    }

    /// Interprets a `/api/rangos` response body.
    ///
    /// A missing or non-object `rangos` key yields an empty table. Groups
    /// whose value is not a list of numbers, or fails validation, are
    /// rejected individually.
    pub fn from_response(body: &Value) -> CoreResult<LoadedRanges> {
        let map = body.as_object().ok_or_else(|| {
            CoreError::UnexpectedPayload("ranges response is not a JSON object".to_string())
        })?;
        if let Some(message) = map.get("error").and_then(Value::as_str) {
            return Err(CoreError::Backend(message.to_string()));
        }

        let mut loaded = LoadedRanges::default();
        let Some(groups) = map.get("rangos").and_then(Value::as_object) else {
            return Ok(loaded);
        };

        for (group, value) in groups {
            let numbers: Option<Vec<f64>> = value
                .as_array()
                .and_then(|items| items.iter().map(Value::as_f64).collect());
            let result = match numbers {
                Some(numbers) => loaded.ranges.insert(group, &numbers),
                None => Err(CoreError::InvalidPriceRanges {
                    group: group.clone(),
                    reason: "expected a list of numbers".to_string(),
                }),
            };
            if let Err(err) = result {
                loaded.rejected.push(err);
            }
        }
        Ok(loaded)
    }

    /// Thresholds of a group; empty for unknown groups.
    pub fn thresholds(&self, group: &str) -> &[f64] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Lists groups whose threshold count differs from their id count,
    /// sorted by group.
    pub fn validate_against(&self, index: &CatalogIndex) -> Vec<RangeMismatch> {
        let mut mismatches: Vec<RangeMismatch> = self
            .groups
            .iter()
            .filter_map(|(group, thresholds)| {
                let ids = index.ids_for(group).len();
                (ids != thresholds.len()).then(|| RangeMismatch {
                    group: group.clone(),
                    thresholds: thresholds.len(),
                    ids,
                })
            })
            .collect();
        mismatches.sort_by(|a, b| a.group.cmp(&b.group));
        mismatches
    }
}

// =============================================================================
// Assigner
// =============================================================================

/// A successful assignment with the details the form displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandAssignment<'a> {
    pub id: &'a str,
    pub group: &'a str,
    pub band: usize,
    /// True when the band index ran past the id list and was clamped.
    pub clamped: bool,
}

/// Resolves catalog IDs from product type and price.
///
/// Borrows the session tables; build one whenever needed, it is free.
#[derive(Debug, Clone, Copy)]
pub struct PriceBandAssigner<'a> {
    index: &'a CatalogIndex,
    ranges: &'a PriceRanges,
    rule: BandRule,
}

impl<'a> PriceBandAssigner<'a> {
    /// Creates an assigner with the canonical rule.
    pub fn new(index: &'a CatalogIndex, ranges: &'a PriceRanges) -> Self {
        PriceBandAssigner {
            index,
            ranges,
            rule: BandRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: BandRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> BandRule {
        self.rule
    }

    /// Maps `(product_type, price)` to a catalog ID.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::bands::{PriceBandAssigner, PriceRanges};
    /// use mostrador_core::catalog::{Catalog, CatalogIndex, ProductRecord};
    ///
    /// let catalog = Catalog::from_entries(["A1", "A2", "A3"].map(|id| {
    ///     let band = &id[1..];
    ///     (id, ProductRecord { nombre: format!("Aritos Rango de precio {band}"), tipo: None })
    /// }));
    /// let index = CatalogIndex::build(&catalog);
    /// let mut ranges = PriceRanges::new();
    /// ranges.insert("A", &[0.0, 8000.0, 11600.0]).unwrap();
    ///
    /// let assigner = PriceBandAssigner::new(&index, &ranges);
    /// assert_eq!(assigner.assign("Aritos", 9000.0), Ok("A2"));
    /// ```
    pub fn assign(&self, product_type: &str, price: f64) -> Result<&'a str, AssignError> {
        self.assign_detailed(product_type, price).map(|a| a.id)
    }

    /// Same as [`assign`](Self::assign), returning the band details.
    pub fn assign_detailed(
        &self,
        product_type: &str,
        price: f64,
    ) -> Result<BandAssignment<'a>, AssignError> {
        let index: &'a CatalogIndex = self.index;
        let ranges: &'a PriceRanges = self.ranges;

        let group = index
            .group_for(product_type)
            .ok_or_else(|| AssignError::UnknownType(product_type.to_string()))?;

        if !(price.is_finite() && price > 0.0) {
            return Err(AssignError::InvalidPrice(price));
        }

        let ids = index.ids_for(group);
        if ids.is_empty() {
            return Err(AssignError::NoIds(group.to_string()));
        }
        let thresholds = ranges.thresholds(group);
        if thresholds.is_empty() {
            return Err(AssignError::NoRanges(group.to_string()));
        }

        let band = self.rule.select_band(thresholds, price);
        let last = ids.len() - 1;
        let selected = band.min(last);
        Ok(BandAssignment {
            id: ids[selected].as_str(),
            group,
            band: selected,
            clamped: band > last,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ProductRecord};
    use crate::error::FailureKind;
    use proptest::prelude::*;
    use serde_json::json;

    fn aritos_index(count: usize) -> CatalogIndex {
        let catalog = Catalog::from_entries((1..=count).map(|n| {
            (
                format!("A{n}"),
                ProductRecord {
                    nombre: format!("Aritos Rango de precio {n}"),
                    tipo: None,
                },
            )
        }));
        CatalogIndex::build(&catalog)
    }

    fn ranges(group: &str, thresholds: &[f64]) -> PriceRanges {
        let mut ranges = PriceRanges::new();
        ranges.insert(group, thresholds).unwrap();
        ranges
    }

    #[test]
    fn test_assign_scenario() {
        let index = aritos_index(3);
        let ranges = ranges("A", &[0.0, 8000.0, 11600.0]);
        let assigner = PriceBandAssigner::new(&index, &ranges);

        assert_eq!(assigner.assign("Aritos", 5000.0), Ok("A1"));
        assert_eq!(assigner.assign("Aritos", 9000.0), Ok("A2"));
        assert_eq!(assigner.assign("Aritos", 20000.0), Ok("A3"));
        // Thresholds are inclusive lower bounds
        assert_eq!(assigner.assign("Aritos", 8000.0), Ok("A2"));
        assert_eq!(assigner.assign("Aritos", 11600.0), Ok("A3"));
    }

    #[test]
    fn test_price_below_first_threshold_selects_first_band() {
        let index = aritos_index(3);
        let ranges = ranges("A", &[5000.0, 8000.0, 11600.0]);
        let assigner = PriceBandAssigner::new(&index, &ranges);
        assert_eq!(assigner.assign("Aritos", 100.0), Ok("A1"));
    }

    #[test]
    fn test_upper_bound_rule() {
        let index = aritos_index(3);
        let ranges = ranges("A", &[0.0, 8000.0, 11600.0]);
        let assigner = PriceBandAssigner::new(&index, &ranges).with_rule(BandRule::UpperBoundInclusive);

        assert_eq!(assigner.assign("Aritos", 5000.0), Ok("A2"));
        assert_eq!(assigner.assign("Aritos", 8000.0), Ok("A2"));
        assert_eq!(assigner.assign("Aritos", 9000.0), Ok("A3"));
        assert_eq!(assigner.assign("Aritos", 20000.0), Ok("A3"));
    }

    #[test]
    fn test_compares_raw_price_without_rounding() {
        let index = aritos_index(3);
        let ranges = ranges("A", &[0.0, 8000.0, 11600.0]);
        let assigner = PriceBandAssigner::new(&index, &ranges);

        // Just under a threshold stays in the lower band
        assert_eq!(assigner.assign("Aritos", 7999.996), Ok("A1"));
        // Sub-cent prices are still positive
        assert_eq!(assigner.assign("Aritos", 0.004), Ok("A1"));

        let upper = assigner.with_rule(BandRule::UpperBoundInclusive);
        assert_eq!(upper.assign("Aritos", 8000.004), Ok("A3"));
    }

    #[test]
    fn test_clamps_to_last_id() {
        let index = aritos_index(2);
        let ranges = ranges("A", &[0.0, 8000.0, 11600.0, 15000.0]);
        let assigner = PriceBandAssigner::new(&index, &ranges);

        let assignment = assigner.assign_detailed("Aritos", 20000.0).unwrap();
        assert_eq!(assignment.id, "A2");
        assert_eq!(assignment.band, 1);
        assert!(assignment.clamped);

        let assignment = assigner.assign_detailed("Aritos", 9000.0).unwrap();
        assert!(!assignment.clamped);
    }

    #[test]
    fn test_assign_failures() {
        let index = aritos_index(3);
        let ranges = ranges("A", &[0.0, 8000.0]);
        let assigner = PriceBandAssigner::new(&index, &ranges);

        let err = assigner.assign("Relojes", 5000.0).unwrap_err();
        assert_eq!(err, AssignError::UnknownType("Relojes".to_string()));
        assert_eq!(err.kind(), FailureKind::InvalidInput);

        assert_eq!(assigner.assign("Aritos", 0.0), Err(AssignError::InvalidPrice(0.0)));
        assert!(matches!(assigner.assign("Aritos", -3.0), Err(AssignError::InvalidPrice(_))));
        assert!(matches!(assigner.assign("Aritos", f64::NAN), Err(AssignError::InvalidPrice(_))));

        let empty = PriceRanges::new();
        let assigner = PriceBandAssigner::new(&index, &empty);
        let err = assigner.assign("Aritos", 5000.0).unwrap_err();
        assert_eq!(err, AssignError::NoRanges("A".to_string()));
        assert_eq!(err.kind(), FailureKind::NotFound);
    }

    #[test]
    fn test_insert_validation() {
        let mut ranges = PriceRanges::new();
        assert!(ranges.insert("A", &[0.0, 0.0, 100.0]).is_ok());
        assert!(ranges.insert("B", &[-1.0, 100.0]).is_err());
        assert!(ranges.insert("C", &[0.0, f64::INFINITY]).is_err());
        assert!(ranges.insert("D", &[100.0, 50.0]).is_err());
        assert!(ranges.insert("E", &[]).is_err());
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_from_response() {
        let body = json!({
            "rangos": {
                "A": [0, 8000, 11600],
                "AN": [0, 7600, 8000],
                "C": [9000, 100],
                "P": "nope"
            }
        });
        let loaded = PriceRanges::from_response(&body).unwrap();
        assert_eq!(loaded.ranges.len(), 2);
        assert_eq!(loaded.ranges.thresholds("AN"), &[0.0, 7600.0, 8000.0]);
        assert_eq!(loaded.rejected.len(), 2);

        let loaded = PriceRanges::from_response(&json!({})).unwrap();
        assert!(loaded.ranges.is_empty());

        assert!(PriceRanges::from_response(&json!({"error": "x"})).is_err());
    }

    #[test]
    fn test_validate_against() {
        let index = aritos_index(3);
        let mut ranges = ranges("A", &[0.0, 8000.0]);
        ranges.insert("Z", &[0.0]).unwrap();

        let mismatches = ranges.validate_against(&index);
        assert_eq!(
            mismatches,
            vec![
                RangeMismatch { group: "A".into(), thresholds: 2, ids: 3 },
                RangeMismatch { group: "Z".into(), thresholds: 1, ids: 0 },
            ]
        );
    }

    #[test]
    fn test_band_rule_parse() {
        assert_eq!("lower".parse::<BandRule>().unwrap(), BandRule::LowerBoundInclusive);
        assert_eq!("STOCK".parse::<BandRule>().unwrap(), BandRule::UpperBoundInclusive);
        assert!("middle".parse::<BandRule>().is_err());
    }

    fn sorted_thresholds() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0u32..50_000, 1..6).prop_map(|mut v| {
            v.sort_unstable();
            v.into_iter().map(f64::from).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_band_never_decreases_with_price(
            thresholds in sorted_thresholds(),
            id_count in 1usize..6,
            low in 1u32..60_000,
            delta in 0u32..60_000,
            upper in any::<bool>(),
        ) {
            let index = aritos_index(id_count);
            let ranges = ranges("A", &thresholds);
            let rule = if upper { BandRule::UpperBoundInclusive } else { BandRule::LowerBoundInclusive };
            let assigner = PriceBandAssigner::new(&index, &ranges).with_rule(rule);

            let a = assigner.assign_detailed("Aritos", f64::from(low)).unwrap();
            let b = assigner.assign_detailed("Aritos", f64::from(low + delta)).unwrap();

            prop_assert!(a.band <= b.band);
            prop_assert!(index.ids_for("A").iter().any(|id| id == a.id));
            prop_assert!(index.ids_for("A").iter().any(|id| id == b.id));
        }
    }
}
