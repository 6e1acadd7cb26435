//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mostrador-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── AssignError      - Price band → catalog ID failures               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mostrador-db errors (separate crate)                                  │
//! │  └── DbError          - Local SQLite failures                          │
//! │                                                                         │
//! │  mostrador-client errors (separate crate)                              │
//! │  └── ClientError      - Backend / config failures                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → CLI (anyhow)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ID, group, type)
//! 3. Errors are enum variants, never String
//! 4. Assignment failures are advisory: the caller shows a message and the
//!    form session continues

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog ID is not present in the loaded catalog.
    #[error("Product not found in catalog: {0}")]
    ProductNotFound(String),

    /// A group's price thresholds failed load-time validation.
    ///
    /// ## When This Occurs
    /// - Empty threshold list
    /// - Negative or non-finite threshold
    /// - Thresholds not in ascending order
    #[error("Invalid price ranges for group {group}: {reason}")]
    InvalidPriceRanges { group: String, reason: String },

    /// The pending sales list is full and must be exported first.
    #[error("Pending sales limit reached ({max}); export before adding more")]
    PendingLimitReached { max: usize },

    /// Closing amount cannot be recorded while unexported sales exist.
    #[error("Cannot record the closing count with {pending} pending sales; export first")]
    ClosingBlocked { pending: usize },

    /// Backend returned a payload this crate cannot interpret.
    #[error("Unexpected backend payload: {0}")]
    UnexpectedPayload(String),

    /// Backend reported an application-level error (`{"error": ...}`).
    #[error("Backend error: {0}")]
    Backend(String),

    /// Price band assignment failed.
    #[error(transparent)]
    Assign(#[from] AssignError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Assignment Error
// =============================================================================

/// Coarse classification of a failure, as seen by the form.
///
/// Both kinds are handled the same way by callers (blank result plus an
/// advisory message); the kind only chooses the wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No mapping exists for the type, group or band.
    NotFound,
    /// The price or type typed by the user is unusable.
    InvalidInput,
}

/// Reasons a (product type, price) pair does not resolve to a catalog ID.
///
/// ## User Workflow
/// ```text
/// Type: "Aritos"   Price: 9000
///      │
///      ▼
/// PriceBandAssigner::assign
///      │
///      ├── type unknown          → UnknownType
///      ├── price ≤ 0 / NaN       → InvalidPrice
///      ├── group has no IDs      → NoIds
///      ├── group has no ranges   → NoRanges
///      │
///      ▼
/// "A2"
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignError {
    #[error("Unknown product type: '{0}'")]
    UnknownType(String),

    #[error("Invalid price: {0} (must be a finite amount greater than zero)")]
    InvalidPrice(f64),

    #[error("Group {0} has no catalog IDs")]
    NoIds(String),

    #[error("Group {0} has no price ranges")]
    NoRanges(String),
}

impl AssignError {
    /// Classifies the failure for the caller.
    pub fn kind(&self) -> FailureKind {
        match self {
            AssignError::UnknownType(_) | AssignError::InvalidPrice(_) => FailureKind::InvalidInput,
            AssignError::NoIds(_) | AssignError::NoRanges(_) => FailureKind::NotFound,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A derived amount does not fit in the money range.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed catalog ID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
