//! # Validation Module
//!
//! Input checks shared by the sale form, the stock-ingress form and the
//! reorder-point editor.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Front end (web form / CLI arguments)                          │
//! │  └── Parsing typed text into numbers and dates                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields                                                   │
//! │  ├── Positive counts, reorder-point bounds                             │
//! │  └── Pending-list capacity                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Catalog membership, persistence                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::MAX_PENDING_SALES;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest reorder point accepted.
pub const MAX_REORDER_POINT: u32 = 100_000;

// =============================================================================
// String Validators
// =============================================================================

/// Returns the trimmed value, or `Required` when blank.
pub fn validate_required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value)
}

/// Parses an ISO date (`YYYY-MM-DD`).
///
/// ```rust
/// use mostrador_core::validation::parse_date;
///
/// assert!(parse_date("fecha", "2024-03-09").is_ok());
/// assert!(parse_date("fecha", "09/03/2024").is_err());
/// assert!(parse_date("fecha", "").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = validate_required(field, value)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit or quantity count: must be `> 0`.
pub fn validate_positive_count(field: &str, value: i64) -> ValidationResult<i64> {
    if value <= 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(value)
}

/// Validates a reorder point typed by the user.
///
/// ## Rules
/// - Must be between 0 and [`MAX_REORDER_POINT`]
///
/// ```rust
/// use mostrador_core::validation::validate_reorder_point;
///
/// assert_eq!(validate_reorder_point(3).unwrap(), 3);
/// assert!(validate_reorder_point(-1).is_err());
/// ```
pub fn validate_reorder_point(value: i64) -> ValidationResult<u32> {
    if value < 0 || value > MAX_REORDER_POINT as i64 {
        return Err(ValidationError::OutOfRange {
            field: "reorder point".to_string(),
            min: 0,
            max: MAX_REORDER_POINT as i64,
        });
    }
    Ok(value as u32)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Fails when a new sale would exceed the pending list cap.
///
/// ## User Workflow
/// ```text
/// pending = 20 ──► add sale ──► PendingLimitReached ──► export, then retry
/// ```
pub fn validate_pending_capacity(pending: usize) -> CoreResult<()> {
    if pending >= MAX_PENDING_SALES {
        return Err(CoreError::PendingLimitReached {
            max: MAX_PENDING_SALES,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
