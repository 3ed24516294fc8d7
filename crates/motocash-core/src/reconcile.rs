//! # Reconcile Module
//!
//! Detects records whose stored totals no longer match their line items.
//!
//! ## Why Totals Drift
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Record.total_income / total_expense are written with the record and   │
//! │  read by every derivation as authoritative.                            │
//! │                                                                         │
//! │  Partial import ─┐                                                     │
//! │  Hand-edited doc ─┼──► stored totals ≠ Σ line items                    │
//! │  Older app build ─┘                                                     │
//! │                                                                         │
//! │  find_drift()          reports the mismatches, changes nothing         │
//! │  AppState::repair_totals() applies the recomputed values explicitly    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Record, RecordId};

/// Stored vs. recomputed totals of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDrift {
    #[ts(type = "number")]
    pub record_id: RecordId,
    pub stored_income: Money,
    pub computed_income: Money,
    pub stored_expense: Money,
    pub computed_expense: Money,
}

impl TotalsDrift {
    /// Effect of the drift on the record's profit (`stored − computed`).
    pub fn profit_delta(&self) -> Money {
        (self.stored_income - self.stored_expense) - (self.computed_income - self.computed_expense)
    }
}

/// Lists every record whose stored totals differ from its line items by
/// more than per-line cent rounding (see [`Record::totals_match`]).
pub fn find_drift(records: &[Record]) -> Vec<TotalsDrift> {
    records
        .iter()
        .filter_map(|record| {
            if record.totals_match() {
                return None;
            }
            let (computed_income, computed_expense) = record.computed_totals();
            Some(TotalsDrift {
                record_id: record.id,
                stored_income: record.total_income,
                computed_income,
                stored_expense: record.total_expense,
                computed_expense,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;
    use chrono::NaiveDate;

    fn record(id: RecordId) -> Record {
        Record::new(id, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), 0.0, 10.0)
            .with_income(LineItem::new("Uber", Money::from_cents(10_000)))
            .with_expense(LineItem::new("Food", Money::from_cents(2_000)))
    }

    #[test]
    fn test_consistent_records_have_no_drift() {
        assert!(find_drift(&[record(1), record(2)]).is_empty());
    }

    #[test]
    fn test_raw_decimal_fuel_totals_are_not_drift() {
        let price = 5.899;
        let document = serde_json::json!([{
            "id": 1,
            "date": "2026-03-02",
            "kmInitial": 0,
            "kmFinal": 60,
            "expenses": [
                {"category": "Combustível", "liters": 3.0, "pricePerLiter": price, "amount": 3.0 * price},
                {"category": "Combustível", "liters": 2.0, "pricePerLiter": price, "amount": 2.0 * price}
            ],
            "totalExpense": 3.0 * price + 2.0 * price
        }]);
        let records: Vec<Record> = serde_json::from_value(document).unwrap();
        assert!(find_drift(&records).is_empty());
    }

    #[test]
    fn test_drift_is_reported() {
        let mut stale = record(2);
        stale.incomes.push(LineItem::new("iFood", Money::from_cents(3_000)));
        let mut inflated = record(3);
        inflated.total_expense = Money::from_cents(500);

        let drift = find_drift(&[record(1), stale, inflated]);
        assert_eq!(drift.len(), 2);

        assert_eq!(drift[0].record_id, 2);
        assert_eq!(drift[0].computed_income.cents(), 13_000);
        assert_eq!(drift[0].profit_delta().cents(), -3_000);

        assert_eq!(drift[1].record_id, 3);
        assert_eq!(drift[1].stored_expense.cents(), 500);
        assert_eq!(drift[1].profit_delta().cents(), 1_500);
    }
}
