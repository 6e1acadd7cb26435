//! # Price Form Reconciler
//!
//! Keeps base price, discount and final price consistent while the cashier
//! edits any of them:
//!
//! ```text
//!   final = base × (1 − discount)
//! ```
//!
//! ## Which Field Wins
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Edit               │ Sale mode                   │ Exchange mode       │
//! │─────────────────────┼─────────────────────────────┼─────────────────────│
//! │  base price         │ final = base × (1 − d)      │ final = base        │
//! │                     │ touched = false             │ touched = false     │
//! │  discount           │ touched: base = final/(1−d) │ ignored (d = 0)     │
//! │                     │ else:    final = base×(1−d) │ final = base        │
//! │  final price        │ base = final / (1 − d)      │ base = final        │
//! │                     │ touched = true              │ touched = true      │
//! │  mode → Exchange    │             d = 0, final = base (or base = final │
//! │                     │             when the final price was typed)     │
//! │  mode → Sale        │ final = base × (1 − d) unless touched             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every derived amount is rounded to cents once, from the authoritative
//! field, so repeated edits never drift. When `1 − d` is zero the base price
//! is taken to be the final price.
//!
//! Unusable input (NaN, infinities) blanks the edited field instead of
//! failing; the form stays usable.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DiscountRate, SaleMode};

/// Serializable view of the form, for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceSnapshot {
    pub base_price: Option<Money>,
    pub discount: DiscountRate,
    pub final_price: Option<Money>,
    pub mode: SaleMode,
    pub final_touched: bool,
}

/// Price fields of the sale form, owned by a single form controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceForm {
    base_price: Option<Money>,
    discount: DiscountRate,
    final_price: Option<Money>,
    mode: SaleMode,
    final_touched: bool,
}

impl PriceForm {
    /// Empty form in Sale mode.
    pub fn new() -> Self {
        PriceForm::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn base_price(&self) -> Option<Money> {
        self.base_price
    }

    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    pub fn final_price(&self) -> Option<Money> {
        self.final_price
    }

    pub fn mode(&self) -> SaleMode {
        self.mode
    }

    pub fn is_exchange_mode(&self) -> bool {
        self.mode.is_exchange()
    }

    /// True iff the last price edit was to the final price.
    pub fn is_final_touched(&self) -> bool {
        self.final_touched
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// The cashier typed a base price.
    pub fn on_base_price_edited(&mut self, value: f64) {
        self.base_price = Money::from_decimal(value);
        self.final_touched = false;
        self.final_price = self.derived_final();
    }

    /// The cashier typed a discount percentage (clamped to `[0, 100]`).
    ///
    /// ```rust
    /// use mostrador_core::PriceForm;
    ///
    /// let mut form = PriceForm::new();
    /// form.on_discount_edited(150.0);
    /// assert_eq!(form.discount().bps(), 10_000);
    /// ```
    pub fn on_discount_edited(&mut self, value: f64) {
        if self.mode.is_exchange() {
            self.discount = DiscountRate::zero();
            self.final_touched = false;
            self.final_price = self.base_price;
            return;
        }

        self.discount = DiscountRate::from_percentage(value);
        match self.final_price {
            Some(final_price) if self.final_touched => {
                self.base_price = final_price.remove_discount(self.discount);
            }
            _ => self.final_price = self.derived_final(),
        }
    }

    /// The cashier typed the final price directly.
    ///
    /// A blank final price leaves the base price as it was. A base price
    /// too large to represent is left blank.
    pub fn on_final_price_edited(&mut self, value: f64) {
        self.final_price = Money::from_decimal(value);
        self.final_touched = true;
        if let Some(final_price) = self.final_price {
            self.base_price = if self.mode.is_exchange() {
                Some(final_price)
            } else {
                final_price.remove_discount(self.discount)
            };
        }
    }

    /// Switches between Sale and Exchange.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::{Money, PriceForm, SaleMode};
    ///
    /// let mut form = PriceForm::new();
    /// form.on_base_price_edited(500.0);
    /// form.on_discount_edited(20.0);
    /// form.on_mode_changed(SaleMode::Exchange);
    ///
    /// assert!(form.discount().is_zero());
    /// assert_eq!(form.final_price(), Some(Money::from_cents(50_000)));
    /// ```
    pub fn on_mode_changed(&mut self, mode: SaleMode) {
        self.mode = mode;
        match mode {
            SaleMode::Exchange => {
                self.discount = DiscountRate::zero();
                if self.final_touched && self.final_price.is_some() {
                    self.base_price = self.final_price;
                } else {
                    self.final_price = self.base_price;
                }
            }
            SaleMode::Sale => {
                if !self.final_touched {
                    self.final_price = self.derived_final();
                }
            }
        }
    }

    /// Back to an empty Sale form.
    pub fn reset(&mut self) {
        *self = PriceForm::default();
    }

    /// Loads a stored sale for editing: both prices take the stored unit
    /// price and the final price counts as typed.
    pub fn load_existing(&mut self, unit_price: Money) {
        self.base_price = Some(unit_price);
        self.final_price = Some(unit_price);
        self.final_touched = true;
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Unit price to record: the final price if present, else derived from
    /// base and discount. `None` while both prices are blank.
    pub fn unit_price(&self) -> Option<Money> {
        self.final_price.or_else(|| self.derived_final())
    }

    pub fn snapshot(&self) -> PriceSnapshot {
        PriceSnapshot {
            base_price: self.base_price,
            discount: self.discount,
            final_price: self.final_price,
            mode: self.mode,
            final_touched: self.final_touched,
        }
    }

    fn derived_final(&self) -> Option<Money> {
        let base = self.base_price?;
        if self.mode.is_exchange() {
            Some(base)
        } else {
            Some(base.apply_discount(self.discount))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Option<Money> {
        Some(Money::from_cents(c))
    }

    #[test]
    fn test_base_then_discount() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(100.0);
        assert_eq!(form.final_price(), cents(10_000));

        form.on_discount_edited(10.0);
        assert_eq!(form.final_price(), cents(9_000));
        assert!(!form.is_final_touched());
    }

    #[test]
    fn test_discount_idempotent() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(99.99);
        form.on_discount_edited(33.0);
        let once = form.final_price();
        form.on_discount_edited(33.0);
        assert_eq!(form.final_price(), once);

        // Also when the final price is authoritative
        form.on_final_price_edited(70.0);
        form.on_discount_edited(33.0);
        let base_once = form.base_price();
        form.on_discount_edited(33.0);
        assert_eq!(form.base_price(), base_once);
        assert_eq!(form.final_price(), cents(7_000));
    }

    #[test]
    fn test_round_trip_has_no_drift() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(100.0);
        form.on_discount_edited(10.0);
        assert_eq!(form.final_price(), cents(9_000));

        form.on_final_price_edited(90.0);
        assert_eq!(form.base_price(), cents(10_000));
        assert!(form.is_final_touched());
    }

    #[test]
    fn test_final_price_derives_base() {
        let mut form = PriceForm::new();
        form.on_discount_edited(20.0);
        form.on_final_price_edited(80.0);
        assert_eq!(form.base_price(), cents(10_000));
    }

    #[test]
    fn test_discount_clamps() {
        let mut form = PriceForm::new();
        form.on_discount_edited(150.0);
        assert_eq!(form.discount().bps(), 10_000);
        form.on_discount_edited(-5.0);
        assert_eq!(form.discount().bps(), 0);
        form.on_discount_edited(f64::NAN);
        assert_eq!(form.discount().bps(), 0);
    }

    #[test]
    fn test_touched_final_survives_discount_change() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(100.0);
        form.on_final_price_edited(75.0);
        assert_eq!(form.base_price(), cents(7_500));

        form.on_discount_edited(25.0);
        assert_eq!(form.final_price(), cents(7_500));
        assert_eq!(form.base_price(), cents(10_000));
    }

    #[test]
    fn test_full_discount_guard() {
        let mut form = PriceForm::new();
        form.on_final_price_edited(50.0);
        form.on_discount_edited(100.0);
        assert_eq!(form.base_price(), cents(5_000));
        assert_eq!(form.final_price(), cents(5_000));
    }

    #[test]
    fn test_base_edit_clears_touched() {
        let mut form = PriceForm::new();
        form.on_discount_edited(10.0);
        form.on_final_price_edited(45.0);
        form.on_base_price_edited(200.0);
        assert!(!form.is_final_touched());
        assert_eq!(form.final_price(), cents(18_000));
    }

    #[test]
    fn test_invalid_input_blanks_field() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(100.0);
        form.on_base_price_edited(f64::NAN);
        assert_eq!(form.base_price(), None);
        assert_eq!(form.final_price(), None);

        form.on_base_price_edited(100.0);
        form.on_final_price_edited(f64::INFINITY);
        assert_eq!(form.final_price(), None);
        assert_eq!(form.base_price(), cents(10_000));
        // Unit price falls back to the base price
        assert_eq!(form.unit_price(), cents(10_000));
    }

    #[test]
    fn test_unrepresentable_base_is_blank() {
        let mut form = PriceForm::new();
        form.on_discount_edited(99.99);
        form.on_final_price_edited(1e15);
        assert_eq!(form.final_price(), Money::from_decimal(1e15));
        assert_eq!(form.base_price(), None);

        form.on_final_price_edited(100.0);
        form.on_discount_edited(99.999);
        assert!(form.base_price().is_some());
        form.on_final_price_edited(1e15);
        form.on_discount_edited(99.99);
        assert_eq!(form.base_price(), None);
    }

    #[test]
    fn test_enter_exchange_mode() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(500.0);
        form.on_discount_edited(20.0);
        assert_eq!(form.final_price(), cents(40_000));

        form.on_mode_changed(SaleMode::Exchange);
        assert!(form.is_exchange_mode());
        assert!(form.discount().is_zero());
        assert_eq!(form.final_price(), cents(50_000));
    }

    #[test]
    fn test_enter_exchange_mode_with_blank_base() {
        let mut form = PriceForm::new();
        form.on_mode_changed(SaleMode::Exchange);
        assert_eq!(form.final_price(), None);
    }

    #[test]
    fn test_exchange_mode_ignores_discount() {
        let mut form = PriceForm::new();
        form.on_mode_changed(SaleMode::Exchange);
        form.on_base_price_edited(300.0);
        form.on_discount_edited(50.0);
        assert!(form.discount().is_zero());
        assert_eq!(form.final_price(), cents(30_000));

        form.on_final_price_edited(250.0);
        assert_eq!(form.base_price(), cents(25_000));
    }

    #[test]
    fn test_exchange_mode_keeps_typed_final() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(100.0);
        form.on_final_price_edited(80.0);
        form.on_mode_changed(SaleMode::Exchange);
        assert_eq!(form.final_price(), cents(8_000));
        assert_eq!(form.base_price(), cents(8_000));
    }

    #[test]
    fn test_leave_exchange_mode_recomputes() {
        let mut form = PriceForm::new();
        form.on_mode_changed(SaleMode::Exchange);
        form.on_base_price_edited(120.0);
        form.on_mode_changed(SaleMode::Sale);
        form.on_discount_edited(50.0);
        assert_eq!(form.final_price(), cents(6_000));
    }

    #[test]
    fn test_reset() {
        let mut form = PriceForm::new();
        form.on_mode_changed(SaleMode::Exchange);
        form.on_final_price_edited(10.0);
        form.reset();
        assert_eq!(form, PriceForm::new());
        assert_eq!(form.mode(), SaleMode::Sale);
    }

    #[test]
    fn test_load_existing() {
        let mut form = PriceForm::new();
        form.load_existing(Money::from_cents(4_550));
        assert!(form.is_final_touched());
        assert_eq!(form.unit_price(), cents(4_550));
        assert_eq!(form.base_price(), cents(4_550));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut form = PriceForm::new();
        form.on_base_price_edited(10.0);
        let json = serde_json::to_value(form.snapshot()).unwrap();
        assert_eq!(json["base_price"], 1000);
        assert_eq!(json["mode"], "sale");
        assert_eq!(json["final_touched"], false);
    }
}
