//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Business configuration failures                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-client errors (separate crate)                             │
//! │  ├── ClientError      - Configuration / transport / session failures   │
//! │  └── ApiError         - Normalized {message, status, code} for the UI  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → ApiError → UI       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Price parsing is deliberately absent from this hierarchy: malformed
//! prices degrade to zero and never produce an error.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Currency code is not a three-letter ISO 4217 code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Locale tag is not of the form `ll` or `ll-RR`.
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
