//! # Repositories
//!
//! One repository per table, each holding a clone of the pool.
//!
//! ```text
//! ┌────────────────────────┐      ┌────────────────────┐
//! │ ReorderPointRepository │─────►│ reorder_points     │
//! └────────────────────────┘      └────────────────────┘
//! ┌────────────────────────┐      ┌────────────────────┐
//! │ CashCountRepository    │─────►│ cash_counts        │
//! └────────────────────────┘      └────────────────────┘
//! ```
//!
//! ## Available Repositories
//! - [`reorder::ReorderPointRepository`] - Reorder point per article
//! - [`cash_count::CashCountRepository`] - Opening/closing amounts per day

pub mod cash_count;
pub mod reorder;
