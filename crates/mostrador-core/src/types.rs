//! # Domain Types
//!
//! Small value types shared by the pricing form, sales and the dashboard.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountRate   │   │    SaleMode     │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Sale           │   │  Efectivo       │       │
//! │  │  1000 = 10%     │   │  Exchange       │   │  Debito         │       │
//! │  │  0..=10000      │   │  ("Cambio")     │   │  Credito        │       │
//! │  └─────────────────┘   └─────────────────┘   │  Transferencia  │       │
//! │                                              │  Other(String)  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount represented in basis points (bps), always within `0..=10000`.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%. The cashier types percentages with at most two
/// decimals, so nothing is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Upper bound: 100%.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points, clamping to 100%.
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        DiscountRate(bps.min(Self::MAX_BPS))
    }

    /// Creates a rate from a typed percentage.
    ///
    /// Clamps to `[0, 100]`; NaN and infinities become 0.
    ///
    /// ```rust
    /// use mostrador_core::types::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percentage(150.0).bps(), 10_000);
    /// assert_eq!(DiscountRate::from_percentage(-5.0).bps(), 0);
    /// assert_eq!(DiscountRate::from_percentage(f64::NAN).bps(), 0);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() {
            return DiscountRate(0);
        }
        let clamped = pct.clamp(0.0, 100.0);
        DiscountRate::from_bps((clamped * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the discount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the discount is the full price.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.0 >= Self::MAX_BPS
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Sale Mode
// =============================================================================

/// Whether the form records a regular sale or a product exchange.
///
/// In Exchange mode the price is not discounted, units are stored as a
/// negative count and the notes carry the exchange prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleMode {
    #[default]
    Sale,
    Exchange,
}

impl SaleMode {
    /// Checks if this is the exchange ("Cambio") mode.
    #[inline]
    pub const fn is_exchange(&self) -> bool {
        matches!(self, SaleMode::Exchange)
    }
}

impl FromStr for SaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" | "venta" => Ok(SaleMode::Sale),
            "exchange" | "cambio" => Ok(SaleMode::Exchange),
            other => Err(format!("Invalid sale mode: {other}. Use 'sale' or 'exchange'")),
        }
    }
}

impl fmt::Display for SaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleMode::Sale => write!(f, "sale"),
            SaleMode::Exchange => write!(f, "exchange"),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// The backend stores the label as free text, so anything outside the four
/// known methods is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Efectivo,
    Debito,
    Credito,
    Transferencia,
    Other(String),
}

impl PaymentMethod {
    /// Wire label as the backend stores it.
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Efectivo => "Efectivo",
            PaymentMethod::Debito => "Debito",
            PaymentMethod::Credito => "Credito",
            PaymentMethod::Transferencia => "Transferencia",
            PaymentMethod::Other(label) => label,
        }
    }

    /// Checks if the payment counts toward the cash drawer.
    ///
    /// Matches any label containing "efect", so free-text variants such as
    /// "Efectivo USD" are counted as cash too.
    pub fn is_cash(&self) -> bool {
        self.label().to_lowercase().contains("efect")
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Efectivo" => PaymentMethod::Efectivo,
            "Debito" | "Débito" => PaymentMethod::Debito,
            "Credito" | "Crédito" => PaymentMethod::Credito,
            "Transferencia" => PaymentMethod::Transferencia,
            _ => PaymentMethod::Other(raw),
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(raw: &str) -> Self {
        PaymentMethod::from(raw.to_string())
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
