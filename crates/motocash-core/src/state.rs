//! # Application State
//!
//! The owned record store: records, category lists and settings.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Record Store Operations                              │
//! │                                                                         │
//! │  Caller Action            AppState Method         State Change          │
//! │  ─────────────            ───────────────         ────────────          │
//! │                                                                         │
//! │  Save new day ───────────► insert_record() ──────► records.push()      │
//! │                                                                         │
//! │  Edit day ───────────────► replace_record() ─────► records[i] = new    │
//! │                                                                         │
//! │  Delete day ─────────────► remove_record() ──────► records.remove(i)   │
//! │                                                                         │
//! │  Oil changed ────────────► mark_serviced() ──────► item.last_km = odo  │
//! │                                                                         │
//! │  Any of the above ───────► derive_snapshot() (caller's job, every time)│
//! │                                                                         │
//! │  NOTE: Mutations validate their input. Loading a document does not,   │
//! │        so legacy data that breaks the rules still loads.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::maintenance::current_odometer;
use crate::money::Money;
use crate::types::{Categories, FixedExpense, MaintenanceItem, Record, RecordId, Settings};
use crate::validation::{
    validate_category_name, validate_fixed_expense, validate_maintenance_item, validate_monthly_goal,
    validate_record,
};

// =============================================================================
// Category Kind
// =============================================================================

/// Which category list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Income => f.write_str("income"),
            CategoryKind::Expense => f.write_str("expense"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(ValidationError::InvalidFormat {
                field: "category kind".to_string(),
                reason: format!("expected income or expense, got '{}'", other),
            }),
        }
    }
}

// =============================================================================
// App State
// =============================================================================

/// The whole persisted document.
///
/// ## Document Shape
/// Exactly three top-level fields: `records`, `categories`, `settings`.
/// Any of them may be missing and defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct AppState {
    pub records: Vec<Record>,
    pub categories: Categories,
    pub settings: Settings,
}

impl AppState {
    // -------------------------------------------------------------------------
    // Records
    // -------------------------------------------------------------------------

    /// Time-derived id for a new record.
    ///
    /// Uses `now_millis` unless an existing record already has that id or a
    /// later one, in which case it returns one past the highest id.
    pub fn next_record_id(&self, now_millis: i64) -> RecordId {
        self.records
            .iter()
            .map(|record| record.id)
            .max()
            .map_or(now_millis, |max| now_millis.max(max.saturating_add(1)))
    }

    /// Looks up a record by id.
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Adds a new record.
    ///
    /// ## Errors
    /// - `Validation` if the record breaks an entry rule
    /// - `DuplicateRecord` if the id is taken
    pub fn insert_record(&mut self, record: Record) -> CoreResult<()> {
        validate_record(&record)?;
        if self.record(record.id).is_some() {
            return Err(CoreError::DuplicateRecord(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    /// Replaces the record with the same id, returning the previous version.
    pub fn replace_record(&mut self, record: Record) -> CoreResult<Record> {
        validate_record(&record)?;
        let slot = self
            .records
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(CoreError::RecordNotFound(record.id))?;
        Ok(std::mem::replace(slot, record))
    }

    /// Deletes a record and returns it.
    pub fn remove_record(&mut self, id: RecordId) -> CoreResult<Record> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(CoreError::RecordNotFound(id))?;
        Ok(self.records.remove(index))
    }

    /// Highest final odometer reading, 0 with no records.
    pub fn current_odometer(&self) -> f64 {
        current_odometer(&self.records)
    }

    /// Overwrites the stored totals of every record that drifted from its
    /// line items beyond cent rounding.
    ///
    /// Returns how many records changed.
    pub fn repair_totals(&mut self) -> usize {
        self.records
            .iter_mut()
            .map(Record::recompute_totals)
            .filter(|changed| *changed)
            .count()
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    fn category_list(&mut self, kind: CategoryKind) -> &mut Vec<String> {
        match kind {
            CategoryKind::Income => &mut self.categories.income,
            CategoryKind::Expense => &mut self.categories.expense,
        }
    }

    /// Adds a category name (trimmed) to a list.
    pub fn add_category(&mut self, kind: CategoryKind, name: &str) -> CoreResult<()> {
        let name = validate_category_name(name)?;
        let list = self.category_list(kind);
        if list.iter().any(|existing| existing.eq_ignore_ascii_case(&name)) {
            return Err(CoreError::DuplicateCategory {
                kind: kind.to_string(),
                name,
            });
        }
        list.push(name);
        Ok(())
    }

    /// Removes a category name from a list.
    ///
    /// Records keep the category they were written with.
    pub fn remove_category(&mut self, kind: CategoryKind, name: &str) -> CoreResult<()> {
        let name = name.trim();
        let list = self.category_list(kind);
        let index = list
            .iter()
            .position(|existing| existing == name)
            .ok_or_else(|| CoreError::CategoryNotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            })?;
        list.remove(index);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    /// Adds a recurring monthly cost.
    pub fn add_fixed_expense(&mut self, expense: FixedExpense) -> CoreResult<()> {
        validate_fixed_expense(&expense)?;
        if self.settings.fixed_expenses.iter().any(|e| e.id == expense.id) {
            return Err(ValidationError::Duplicate {
                field: "fixed expense id".to_string(),
                value: expense.id.to_string(),
            }
            .into());
        }
        self.settings.fixed_expenses.push(expense);
        Ok(())
    }

    pub fn remove_fixed_expense(&mut self, id: i64) -> CoreResult<FixedExpense> {
        let expenses = &mut self.settings.fixed_expenses;
        let index = expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(CoreError::FixedExpenseNotFound(id))?;
        Ok(expenses.remove(index))
    }

    /// Adds a maintenance plan item.
    pub fn add_maintenance_item(&mut self, item: MaintenanceItem) -> CoreResult<()> {
        validate_maintenance_item(&item)?;
        if self.settings.maintenance_plan.iter().any(|i| i.id == item.id) {
            return Err(ValidationError::Duplicate {
                field: "maintenance item id".to_string(),
                value: item.id.to_string(),
            }
            .into());
        }
        self.settings.maintenance_plan.push(item);
        Ok(())
    }

    pub fn remove_maintenance_item(&mut self, id: i64) -> CoreResult<MaintenanceItem> {
        let plan = &mut self.settings.maintenance_plan;
        let index = plan
            .iter()
            .position(|item| item.id == id)
            .ok_or(CoreError::MaintenanceItemNotFound(id))?;
        Ok(plan.remove(index))
    }

    /// Records a service: sets `last_km` to `km`, or to the current
    /// odometer when `km` is `None`.
    pub fn mark_serviced(&mut self, id: i64, km: Option<f64>) -> CoreResult<()> {
        let km = km.unwrap_or_else(|| self.current_odometer());
        if !km.is_finite() || km < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "last_km".to_string(),
                min: 0.0,
                max: f64::MAX,
            }
            .into());
        }

        let item = self
            .settings
            .maintenance_plan
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CoreError::MaintenanceItemNotFound(id))?;
        item.last_km = km;
        Ok(())
    }

    /// Sets the monthly goal; zero disables goal tracking.
    pub fn set_monthly_goal(&mut self, goal: Money) -> CoreResult<()> {
        validate_monthly_goal(goal)?;
        self.settings.monthly_goal = goal;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;
    use chrono::NaiveDate;

    fn record(id: RecordId, km_initial: f64, km_final: f64) -> Record {
        Record::new(id, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), km_initial, km_final)
            .with_income(LineItem::new("Uber", Money::from_cents(10_000)))
    }

    fn oil_change() -> MaintenanceItem {
        MaintenanceItem {
            id: 7,
            name: "Oil change".to_string(),
            last_km: 1_000.0,
            interval: 3_000.0,
        }
    }

    #[test]
    fn test_next_record_id_is_monotonic() {
        let mut state = AppState::default();
        assert_eq!(state.next_record_id(1_000), 1_000);

        state.insert_record(record(5_000, 0.0, 10.0)).unwrap();
        assert_eq!(state.next_record_id(9_000), 9_000);
        // clock behind the newest record
        assert_eq!(state.next_record_id(1_000), 5_001);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_invalid_records() {
        let mut state = AppState::default();
        state.insert_record(record(1, 0.0, 10.0)).unwrap();

        let err = state.insert_record(record(1, 10.0, 20.0)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateRecord(1)));

        let err = state.insert_record(record(2, 20.0, 20.0)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(state.records.len(), 1);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut state = AppState::default();
        state.insert_record(record(1, 0.0, 10.0)).unwrap();

        let previous = state.replace_record(record(1, 0.0, 25.0)).unwrap();
        assert_eq!(previous.km_final, 10.0);
        assert_eq!(state.record(1).unwrap().km_final, 25.0);

        assert!(matches!(
            state.replace_record(record(2, 0.0, 5.0)),
            Err(CoreError::RecordNotFound(2))
        ));

        let removed = state.remove_record(1).unwrap();
        assert_eq!(removed.id, 1);
        assert!(state.records.is_empty());
        assert!(matches!(state.remove_record(1), Err(CoreError::RecordNotFound(1))));
    }

    #[test]
    fn test_categories() {
        let mut state = AppState::default();
        state.add_category(CategoryKind::Income, "  99Food ").unwrap();
        assert!(state.categories.income.contains(&"99Food".to_string()));

        let err = state.add_category(CategoryKind::Income, "uber").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateCategory { .. }));

        state.remove_category(CategoryKind::Expense, "Food").unwrap();
        assert!(!state.categories.expense.contains(&"Food".to_string()));
        assert!(state.remove_category(CategoryKind::Expense, "Food").is_err());
    }

    #[test]
    fn test_category_kind_parse() {
        assert_eq!("Income".parse::<CategoryKind>().unwrap(), CategoryKind::Income);
        assert_eq!(CategoryKind::Expense.to_string(), "expense");
        assert!("tips".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_fixed_expenses() {
        let mut state = AppState::default();
        let phone = FixedExpense {
            id: 1,
            name: "Phone".to_string(),
            amount: Money::from_cents(4_990),
        };
        state.add_fixed_expense(phone.clone()).unwrap();
        assert!(state.add_fixed_expense(phone).is_err());

        assert_eq!(state.remove_fixed_expense(1).unwrap().name, "Phone");
        assert!(matches!(
            state.remove_fixed_expense(1),
            Err(CoreError::FixedExpenseNotFound(1))
        ));
    }

    #[test]
    fn test_mark_serviced_defaults_to_current_odometer() {
        let mut state = AppState::default();
        state.insert_record(record(1, 3_900.0, 4_200.0)).unwrap();
        state.add_maintenance_item(oil_change()).unwrap();

        state.mark_serviced(7, None).unwrap();
        assert_eq!(state.settings.maintenance_plan[0].last_km, 4_200.0);

        state.mark_serviced(7, Some(4_000.0)).unwrap();
        assert_eq!(state.settings.maintenance_plan[0].last_km, 4_000.0);

        assert!(state.mark_serviced(7, Some(-1.0)).is_err());
        assert!(matches!(
            state.mark_serviced(8, None),
            Err(CoreError::MaintenanceItemNotFound(8))
        ));

        assert_eq!(state.remove_maintenance_item(7).unwrap().name, "Oil change");
    }

    #[test]
    fn test_monthly_goal() {
        let mut state = AppState::default();
        state.set_monthly_goal(Money::from_cents(300_000)).unwrap();
        assert_eq!(state.settings.monthly_goal.cents(), 300_000);
        assert!(state.set_monthly_goal(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_repair_totals() {
        let mut state = AppState::default();
        state.insert_record(record(1, 0.0, 10.0)).unwrap();
        state.insert_record(record(2, 10.0, 20.0)).unwrap();
        state.records[1].total_income = Money::zero();

        assert_eq!(state.repair_totals(), 1);
        assert_eq!(state.records[1].total_income.cents(), 10_000);
        assert_eq!(state.repair_totals(), 0);
    }

    #[test]
    fn test_document_with_missing_sections() {
        let state: AppState = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert_eq!(state.categories, Categories::default());
        assert!(state.settings.fixed_expenses.is_empty());

        let json = r#"{
            "records": [{"id": 1, "date": "2026-03-02", "kmInitial": 200, "kmFinal": 100}],
            "categories": {"income": ["Uber"], "expense": ["Combustível"]},
            "settings": {"monthlyGoal": 2500.5, "theme": "theme-light"}
        }"#;
        let state: AppState = serde_json::from_str(json).unwrap();
        // invalid legacy record still loads
        assert_eq!(state.records[0].km_final, 100.0);
        assert_eq!(state.settings.monthly_goal.cents(), 250_050);
        assert!(state.settings.maintenance_plan.is_empty());
    }
}
