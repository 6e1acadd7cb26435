//! # mostrador-db: Local State
//!
//! SQLite storage for the data that never leaves the counter machine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          mostrador-db                                   │
//! │                                                                         │
//! │   ┌────────────────┐      ┌────────────────────────────────────────┐   │
//! │   │   DbConfig     │─────►│  Database (SqlitePool, WAL)            │   │
//! │   └────────────────┘      │                                        │   │
//! │                           │  reorder_points() ─► ReorderPointRepo  │   │
//! │                           │  cash_counts()    ─► CashCountRepo     │   │
//! │                           └───────────────────┬────────────────────┘   │
//! │                                               │                        │
//! │                                               ▼                        │
//! │                                    mostrador.db (SQLite file)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`pool`] - Connection pool and configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`error`] - Database error types
//! - [`repository`] - Reorder points and cash counts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mostrador_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("mostrador.db")).await?;
//!
//! db.reorder_points().set("A1", 5).await?;
//! let points = db.reorder_points().all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::cash_count::CashCountRepository;
pub use repository::reorder::ReorderPointRepository;
