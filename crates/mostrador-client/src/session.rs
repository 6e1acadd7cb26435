//! # Catalog Session
//!
//! Catalog, derived index and price ranges, loaded once and then used for
//! every price-band assignment.
//!
//! ## Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /api/catalogo ──► Catalog ──► CatalogIndex     (failure: error)    │
//! │  GET /api/rangos   ──► PriceRanges                  (failure: warn,     │
//! │                                                      empty ranges)      │
//! │  ranges × index    ──► mismatches                   (warn each)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mostrador_core::bands::LoadedRanges;
use mostrador_core::{
    AssignError, BandRule, Catalog, CatalogIndex, PriceBandAssigner, PriceRanges,
};
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Everything needed to assign identifiers, for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct CatalogSession {
    catalog: Catalog,
    index: CatalogIndex,
    ranges: PriceRanges,
    rule: BandRule,
}

impl CatalogSession {
    /// Loads catalog and ranges from the backend.
    ///
    /// The catalog is required. A failure to load ranges leaves the session
    /// without ranges: every assignment then fails with `NoRanges`.
    pub async fn load(client: &ApiClient, rule: BandRule) -> ClientResult<Self> {
        let catalog = client.catalog().await?;
        let ranges = match client.price_ranges().await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "Could not load price ranges, continuing without them");
                LoadedRanges::default()
            }
        };
        Ok(Self::from_parts(catalog, ranges, rule))
    }

    /// Builds a session from already-fetched data.
    pub fn from_parts(catalog: Catalog, loaded: LoadedRanges, rule: BandRule) -> Self {
        for rejected in &loaded.rejected {
            warn!(error = %rejected, "Ignoring invalid price range");
        }

        let index = CatalogIndex::build(&catalog);
        for mismatch in loaded.ranges.validate_against(&index) {
            warn!(%mismatch, "Price range does not match catalog ids");
        }

        info!(
            products = catalog.len(),
            types = index.product_types().len(),
            groups = loaded.ranges.len(),
            %rule,
            "Catalog session ready"
        );

        CatalogSession {
            catalog,
            index,
            ranges: loaded.ranges,
            rule,
        }
    }

    fn assigner(&self, rule: BandRule) -> PriceBandAssigner<'_> {
        PriceBandAssigner::new(&self.index, &self.ranges).with_rule(rule)
    }

    /// Assigns an identifier with the session's band rule.
    pub fn assign(&self, product_type: &str, price: f64) -> Result<&str, AssignError> {
        self.assign_with(self.rule, product_type, price)
    }

    /// Assigns an identifier with an explicit band rule.
    pub fn assign_with(
        &self,
        rule: BandRule,
        product_type: &str,
        price: f64,
    ) -> Result<&str, AssignError> {
        self.assigner(rule).assign(product_type, price)
    }

    /// Product types offered in the type selector.
    pub fn product_types(&self) -> Vec<&str> {
        self.index.product_types()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn ranges(&self) -> &PriceRanges {
        &self.ranges
    }

    pub fn rule(&self) -> BandRule {
        self.rule
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::ProductRecord;

    fn record(name: &str) -> ProductRecord {
        ProductRecord {
            nombre: name.into(),
            tipo: None,
        }
    }

    fn session(rule: BandRule) -> CatalogSession {
        let catalog = Catalog::from_entries([
            ("A1", record("Aritos Rango de precio 1")),
            ("A2", record("Aritos Rango de precio 2")),
            ("A3", record("Aritos Rango de precio 3")),
        ]);
        let mut ranges = PriceRanges::new();
        ranges.insert("A", &[0.0, 8000.0, 11600.0]).unwrap();
        CatalogSession::from_parts(
            catalog,
            LoadedRanges {
                ranges,
                rejected: Vec::new(),
            },
            rule,
        )
    }

    #[test]
    fn test_assign_uses_session_rule() {
        let lower = session(BandRule::LowerBoundInclusive);
        assert_eq!(lower.product_types(), vec!["Aritos"]);
        assert_eq!(lower.assign("Aritos", 5000.0), Ok("A1"));
        assert_eq!(lower.assign("Aritos", 9000.0), Ok("A2"));
        assert_eq!(upper_of(&lower, 9000.0), Ok("A3"));

        let upper = session(BandRule::UpperBoundInclusive);
        assert_eq!(upper.rule(), BandRule::UpperBoundInclusive);
        assert_eq!(
            upper.assign_with(BandRule::LowerBoundInclusive, "Aritos", 20000.0),
            Ok("A3")
        );
    }

    fn upper_of(session: &CatalogSession, price: f64) -> Result<&str, AssignError> {
        session.assign_with(BandRule::UpperBoundInclusive, "Aritos", price)
    }

    #[test]
    fn test_missing_ranges_fail_assignment() {
        let catalog = Catalog::from_entries([("A1", record("Aritos Rango de precio 1"))]);
        let session =
            CatalogSession::from_parts(catalog, LoadedRanges::default(), BandRule::default());
        assert_eq!(
            session.assign("Aritos", 100.0),
            Err(AssignError::NoRanges("A".to_string()))
        );
        assert_eq!(session.product_types(), vec!["Aritos"]);
    }
}
