//! # mostrador-core: Pure Business Logic for Mostrador
//!
//! This crate holds every rule of the sales counter that can be expressed
//! without I/O: how a product type plus a price becomes a catalog ID, how
//! base price, discount and final price stay consistent while the cashier
//! types, and the small derivations around stock, cash and the dashboard.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mostrador Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (web form / `mostrador` CLI)             │   │
//! │  │     Type + Price ──► ID      Base ◄──► Discount ◄──► Final      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ mostrador-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐  │   │
//! │  │   │ catalog  │  │  bands   │  │ pricing  │  │ sale / stock │  │   │
//! │  │   │  Index   │─►│ Assigner │  │PriceForm │  │ cash / dash  │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │         ┌──────────────────────┴──────────────────────┐                │
//! │  ┌──────▼───────┐                            ┌────────▼─────────┐      │
//! │  │ mostrador-db │  reorder points, cash      │ mostrador-client │      │
//! │  │   (SQLite)   │  counts                    │  REST backend    │      │
//! │  └──────────────┘                            └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer cents
//! - [`types`] - Small value types (DiscountRate, SaleMode, PaymentMethod)
//! - [`catalog`] - Catalog IDs, product records, type/group index
//! - [`bands`] - Price thresholds and the band-to-ID assigner
//! - [`pricing`] - Base / discount / final price reconciler
//! - [`sale`] - Sale records and the sale form builder
//! - [`stock`] - Stock status, stock report, stock ingress
//! - [`cash`] - Daily cash count reconciliation
//! - [`dashboard`] - Sales history aggregation
//! - [`format`] - es-AR amount parsing and formatting
//! - [`validation`] - Input validation helpers
//! - [`wire`] - Tolerant deserializers for backend rows
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mostrador_core::pricing::PriceForm;
//! use mostrador_core::Money;
//!
//! let mut form = PriceForm::new();
//! form.on_base_price_edited(100.0);
//! form.on_discount_edited(10.0);
//! assert_eq!(form.final_price(), Some(Money::from_cents(9000)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bands;
pub mod cash;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod money;
pub mod pricing;
pub mod sale;
pub mod stock;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bands::{BandRule, PriceBandAssigner, PriceRanges};
pub use catalog::{Catalog, CatalogId, CatalogIndex, ProductRecord};
pub use error::{AssignError, CoreError, CoreResult, FailureKind, ValidationError};
pub use money::Money;
pub use pricing::PriceForm;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of sales that may sit in the pending list before they
/// must be exported.
///
/// ## Business Reason
/// The export target (a spreadsheet) is written in one batch; the shop
/// exports every 20 items to keep each batch small.
pub const MAX_PENDING_SALES: usize = 20;

/// Prefix written into the notes of an exchange ("Cambio") sale.
pub const EXCHANGE_NOTES_PREFIX: &str = "CAMBIO - ";
