//! # Validation Module
//!
//! Entry rules for records and settings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Rules Apply                                  │
//! │                                                                         │
//! │  Day form / CLI input                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  THIS MODULE: validate_record, validate_fixed_expense, ...             │
//! │  (called by AppState mutations before anything is stored)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  AppState (record store)                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Derivations: NEVER validate. Imported legacy data may break these     │
//! │  rules and must still produce a snapshot without panicking.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use motocash_core::validation::validate_record;
//! use motocash_core::Record;
//!
//! let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! assert!(validate_record(&Record::new(1, day, 100.0, 250.0)).is_ok());
//! assert!(validate_record(&Record::new(2, day, 250.0, 250.0)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{FixedExpense, LineItem, MaintenanceItem, Record};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted category / item name.
pub const MAX_NAME_LEN: usize = 60;

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a work-session record before it enters the store.
///
/// ## Rules
/// - Odometer readings are finite and `km_final > km_initial`
/// - Every line item has a category and a positive amount
/// - Fuel lines have positive liters and a non-negative unit price
pub fn validate_record(record: &Record) -> ValidationResult<()> {
    validate_finite("km_initial", record.km_initial)?;
    validate_finite("km_final", record.km_final)?;

    if record.km_final <= record.km_initial {
        return Err(ValidationError::OdometerNotIncreasing {
            km_initial: record.km_initial,
            km_final: record.km_final,
        });
    }

    for item in record.incomes.iter().chain(record.expenses.iter()) {
        validate_line_item(item)?;
    }

    Ok(())
}

/// Validates a single income or expense line.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    if item.category.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if !item.amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: format!("{} amount", item.category),
        });
    }

    if item.is_fuel() {
        let liters = item.liters.unwrap_or(0.0);
        validate_finite("liters", liters)?;
        if liters <= 0.0 {
            return Err(ValidationError::MustBePositive {
                field: "liters".to_string(),
            });
        }

        let price = item.price_per_liter.unwrap_or(0.0);
        validate_finite("price_per_liter", price)?;
        if price < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "price_per_liter".to_string(),
                min: 0.0,
                max: f64::MAX,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Settings Validators
// =============================================================================

/// Validates a category name and returns it trimmed.
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "category".to_string(),
            reason: format!("must be at most {} characters", MAX_NAME_LEN),
        });
    }

    Ok(name.to_string())
}

/// Validates a recurring monthly cost.
pub fn validate_fixed_expense(expense: &FixedExpense) -> ValidationResult<()> {
    if expense.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if !expense.amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a maintenance plan item.
///
/// ## Rules
/// - Name is required
/// - `interval` is finite and positive
/// - `last_km` is finite and not negative
pub fn validate_maintenance_item(item: &MaintenanceItem) -> ValidationResult<()> {
    if item.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    validate_finite("interval", item.interval)?;
    if item.interval <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "interval".to_string(),
        });
    }

    validate_finite("last_km", item.last_km)?;
    if item.last_km < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "last_km".to_string(),
            min: 0.0,
            max: f64::MAX,
        });
    }

    Ok(())
}

/// Validates the monthly goal (zero disables it).
pub fn validate_monthly_goal(goal: Money) -> ValidationResult<()> {
    if goal.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "monthly_goal".to_string(),
            min: 0.0,
            max: f64::MAX,
        });
    }

    Ok(())
}

fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(km_initial: f64, km_final: f64) -> Record {
        Record::new(1, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), km_initial, km_final)
    }

    #[test]
    fn test_validate_record_odometer() {
        assert!(validate_record(&record(0.0, 0.1)).is_ok());

        let err = validate_record(&record(200.0, 150.0)).unwrap_err();
        assert!(matches!(err, ValidationError::OdometerNotIncreasing { .. }));

        assert!(validate_record(&record(100.0, 100.0)).is_err());
        assert!(validate_record(&record(0.0, f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_record_line_items() {
        let ok = record(0.0, 50.0)
            .with_income(LineItem::new("Uber", Money::from_cents(100)))
            .with_expense(LineItem::fuel(3.0, 6.0));
        assert!(validate_record(&ok).is_ok());

        let zero_income = record(0.0, 50.0).with_income(LineItem::new("Uber", Money::zero()));
        assert!(validate_record(&zero_income).is_err());

        let blank_category = record(0.0, 50.0).with_expense(LineItem::new("  ", Money::from_cents(100)));
        assert!(validate_record(&blank_category).is_err());

        let mut no_liters = LineItem::fuel(3.0, 6.0);
        no_liters.liters = None;
        assert!(validate_line_item(&no_liters).is_err());

        let mut negative_price = LineItem::fuel(3.0, 6.0);
        negative_price.price_per_liter = Some(-1.0);
        assert!(validate_line_item(&negative_price).is_err());
    }

    #[test]
    fn test_validate_category_name() {
        assert_eq!(validate_category_name("  iFood ").unwrap(), "iFood");
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_fixed_expense() {
        let mut expense = FixedExpense {
            id: 1,
            name: "Phone plan".to_string(),
            amount: Money::from_cents(4_990),
        };
        assert!(validate_fixed_expense(&expense).is_ok());

        expense.amount = Money::zero();
        assert!(validate_fixed_expense(&expense).is_err());

        expense.amount = Money::from_cents(1);
        expense.name.clear();
        assert!(validate_fixed_expense(&expense).is_err());
    }

    #[test]
    fn test_validate_maintenance_item() {
        let mut item = MaintenanceItem {
            id: 1,
            name: "Oil change".to_string(),
            last_km: 12_000.0,
            interval: 3_000.0,
        };
        assert!(validate_maintenance_item(&item).is_ok());

        item.interval = 0.0;
        assert!(validate_maintenance_item(&item).is_err());

        item.interval = 3_000.0;
        item.last_km = -1.0;
        assert!(validate_maintenance_item(&item).is_err());
    }

    #[test]
    fn test_validate_monthly_goal() {
        assert!(validate_monthly_goal(Money::zero()).is_ok());
        assert!(validate_monthly_goal(Money::from_cents(300_000)).is_ok());
        assert!(validate_monthly_goal(Money::from_cents(-1)).is_err());
    }
}
