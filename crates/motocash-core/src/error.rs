//! # Error Types
//!
//! Domain-specific error types for motocash-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  motocash-core errors (this file)                                      │
//! │  ├── CoreError        - Record store mutations that cannot apply       │
//! │  └── ValidationError  - Input validation failures at record entry      │
//! │                                                                         │
//! │  motocash-store errors (separate crate)                                │
//! │  └── StoreError       - Database / file / document failures            │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Note
//! The derivation modules (consumption, profitability, maintenance,
//! metrics) never return errors. Only mutations of [`crate::AppState`] and
//! the validators do.

use thiserror::Error;

use crate::types::RecordId;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by record store mutations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No record with the given id exists.
    ///
    /// ## When This Occurs
    /// - Editing or deleting a record that was removed in the meantime
    /// - A stale id coming back from the presentation layer
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// A record with this id already exists.
    #[error("Record {0} already exists")]
    DuplicateRecord(RecordId),

    /// Category does not exist in the given list.
    #[error("{kind} category not found: {name}")]
    CategoryNotFound { kind: String, name: String },

    /// Category already exists in the given list.
    #[error("{kind} category '{name}' already exists")]
    DuplicateCategory { kind: String, name: String },

    /// No fixed expense with the given id exists.
    #[error("Fixed expense not found: {0}")]
    FixedExpenseNotFound(i64),

    /// No maintenance plan item with the given id exists.
    #[error("Maintenance item not found: {0}")]
    MaintenanceItemNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the rules in [`crate::validation`] before a record or setting
/// is accepted into the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format (e.g. non-finite number, bad time string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. duplicate category name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Final odometer reading is not greater than the initial one.
    ///
    /// ## User Workflow
    /// ```text
    /// Day form: km initial 15200, km final 15100
    ///      │
    ///      ▼
    /// validate_record() ← rejects the entry
    ///      │
    ///      ▼
    /// UI shows: "Final km (15100) must be greater than initial km (15200)"
    /// ```
    #[error("Final km ({km_final}) must be greater than initial km ({km_initial})")]
    OdometerNotIncreasing { km_initial: f64, km_final: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
