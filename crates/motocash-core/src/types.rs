//! # Domain Types
//!
//! Core domain types used throughout MotoCash.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Record      │   │    LineItem     │   │    Settings     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (ms stamp)  │◄──│  category       │   │  monthly_goal   │       │
//! │  │  date           │   │  amount         │   │  maint. plan ───┼──┐    │
//! │  │  km_initial/fin │   │  liters?        │   │  fixed costs ───┼─┐│    │
//! │  │  time_start/end │   │  price_per_l?   │   │  theme          │ ││    │
//! │  │  totals (cache) │   └─────────────────┘   └─────────────────┘ ││    │
//! │  └─────────────────┘                                             ││    │
//! │                        ┌─────────────────┐   ┌─────────────────┐ ││    │
//! │                        │  FixedExpense   │◄──┼─────────────────┼─┘│    │
//! │                        │  id, name, amt  │   │ MaintenanceItem │◄─┘    │
//! │                        └─────────────────┘   │ last_km/interval│       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Field names follow the persisted JSON document (`kmInitial`,
//! `totalIncome`, `pricePerLiter`, ...). Every optional field defaults when
//! absent so older documents load unchanged.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::profitability::hours_between;
use crate::{DEFAULT_THEME, FUEL_CATEGORY, LEGACY_FUEL_CATEGORY};

/// Record identity: a millisecond timestamp taken at creation.
pub type RecordId = i64;

// =============================================================================
// Line Item
// =============================================================================

/// One income or expense entry of a work session.
///
/// Fuel purchases additionally carry the volume and unit price; their
/// `amount` is `liters × price_per_liter` by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub category: String,

    #[serde(default)]
    pub amount: Money,

    /// Volume bought, fuel lines only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub liters: Option<f64>,

    /// Unit price, fuel lines only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price_per_liter: Option<f64>,
}

impl LineItem {
    /// Creates a plain income/expense line.
    pub fn new(category: impl Into<String>, amount: Money) -> Self {
        LineItem {
            category: category.into(),
            amount,
            liters: None,
            price_per_liter: None,
        }
    }

    /// Creates a fuel purchase line.
    ///
    /// ## Example
    /// ```rust
    /// use motocash_core::LineItem;
    ///
    /// let fill = LineItem::fuel(8.0, 6.25);
    /// assert!(fill.is_fuel());
    /// assert_eq!(fill.amount.cents(), 5000);
    /// ```
    pub fn fuel(liters: f64, price_per_liter: f64) -> Self {
        LineItem {
            category: FUEL_CATEGORY.to_string(),
            amount: Money::from_decimal(liters * price_per_liter),
            liters: Some(liters),
            price_per_liter: Some(price_per_liter),
        }
    }

    /// Returns true if this line is a fuel purchase.
    pub fn is_fuel(&self) -> bool {
        self.category == FUEL_CATEGORY || self.category == LEGACY_FUEL_CATEGORY
    }

    /// Returns the volume of a fuel line, only when it is strictly positive.
    pub fn fuel_liters(&self) -> Option<f64> {
        match self.liters {
            Some(liters) if self.is_fuel() && liters > 0.0 => Some(liters),
            _ => None,
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// A single work session (one day on the road).
///
/// ## Denormalized Totals
/// `total_income` and `total_expense` are computed when the record is
/// written and stored with it. Every derivation reads them as-is; use
/// [`crate::reconcile`] to detect and repair drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[ts(type = "number")]
    pub id: RecordId,

    /// Calendar day of the session; decides month bucketing.
    #[ts(as = "String")]
    pub date: NaiveDate,

    #[serde(default)]
    pub km_initial: f64,

    #[serde(default)]
    pub km_final: f64,

    #[serde(default, with = "clock_time")]
    #[ts(type = "string")]
    pub time_start: Option<NaiveTime>,

    #[serde(default, with = "clock_time")]
    #[ts(type = "string")]
    pub time_end: Option<NaiveTime>,

    #[serde(default)]
    pub incomes: Vec<LineItem>,

    #[serde(default)]
    pub expenses: Vec<LineItem>,

    #[serde(default)]
    pub total_income: Money,

    #[serde(default)]
    pub total_expense: Money,
}

impl Record {
    /// Creates an empty record for a day.
    pub fn new(id: RecordId, date: NaiveDate, km_initial: f64, km_final: f64) -> Self {
        Record {
            id,
            date,
            km_initial,
            km_final,
            time_start: None,
            time_end: None,
            incomes: Vec::new(),
            expenses: Vec::new(),
            total_income: Money::zero(),
            total_expense: Money::zero(),
        }
    }

    /// Sets the working-hours interval.
    pub fn with_times(mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.time_start = start;
        self.time_end = end;
        self
    }

    /// Appends an income line and updates the stored total.
    pub fn with_income(mut self, item: LineItem) -> Self {
        self.total_income += item.amount;
        self.incomes.push(item);
        self
    }

    /// Appends an expense line and updates the stored total.
    pub fn with_expense(mut self, item: LineItem) -> Self {
        self.total_expense += item.amount;
        self.expenses.push(item);
        self
    }

    /// Profit of the session from the stored totals.
    #[inline]
    pub fn profit(&self) -> Money {
        self.total_income - self.total_expense
    }

    /// Kilometres driven during the session.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.km_final - self.km_initial
    }

    /// Worked hours, when both times are present and the duration is
    /// strictly positive. An end before the start is not wrapped to the
    /// next day.
    pub fn worked_hours(&self) -> Option<f64> {
        let (start, end) = (self.time_start?, self.time_end?);
        let hours = hours_between(start, end);
        (hours > 0.0).then_some(hours)
    }

    /// Profit per worked hour for this record.
    pub fn hourly_rate(&self) -> Option<Money> {
        self.worked_hours().map(|hours| self.profit().divide_by(hours))
    }

    /// Expense lines that are fuel purchases.
    pub fn fuel_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.expenses.iter().filter(|item| item.is_fuel())
    }

    /// Sums the line items: `(income, expense)`.
    pub fn computed_totals(&self) -> (Money, Money) {
        let income = self.incomes.iter().map(|item| item.amount).sum();
        let expense = self.expenses.iter().map(|item| item.amount).sum();
        (income, expense)
    }

    /// True when the stored totals agree with the line items.
    ///
    /// Line amounts and stored totals are rounded to the cent separately,
    /// so a total written from the raw sum may differ from the sum of
    /// rounded lines by less than half a cent per line. That much is not
    /// drift.
    pub fn totals_match(&self) -> bool {
        let (income, expense) = self.computed_totals();
        within_rounding(self.total_income, income, self.incomes.len())
            && within_rounding(self.total_expense, expense, self.expenses.len())
    }

    /// Overwrites the stored totals with the line-item sums, unless they
    /// already match within rounding.
    ///
    /// Returns true if anything changed.
    pub fn recompute_totals(&mut self) -> bool {
        if self.totals_match() {
            return false;
        }
        let (income, expense) = self.computed_totals();
        self.total_income = income;
        self.total_expense = expense;
        true
    }
}

fn within_rounding(stored: Money, computed: Money, lines: usize) -> bool {
    // n lines plus the total: the integer gap is strictly below (n + 1) / 2
    let tolerance = i64::try_from(lines / 2).unwrap_or(i64::MAX);
    (stored.cents() - computed.cents()).abs() <= tolerance
}

// =============================================================================
// Settings
// =============================================================================

/// A recurring monthly cost (phone plan, bike installment, insurance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FixedExpense {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub amount: Money,
}

/// A recurring service reminder (oil change, chain kit, tyres).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceItem {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    /// Odometer reading at the last service.
    #[serde(default)]
    pub last_km: f64,
    /// Kilometres between services.
    #[serde(default)]
    pub interval: f64,
}

impl MaintenanceItem {
    /// Odometer reading at which the next service is due.
    #[inline]
    pub fn next_due_km(&self) -> f64 {
        self.last_km + self.interval
    }
}

/// User settings stored alongside the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Monthly net profit goal; zero disables goal tracking.
    pub monthly_goal: Money,
    pub maintenance_plan: Vec<MaintenanceItem>,
    pub fixed_expenses: Vec<FixedExpense>,
    /// Presentation only, never read by the derivations.
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            monthly_goal: Money::zero(),
            maintenance_plan: Vec::new(),
            fixed_expenses: Vec::new(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// User-editable category lists offered by the day form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Categories {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for Categories {
    fn default() -> Self {
        Categories {
            income: vec!["Uber".to_string(), "iFood".to_string(), "Private".to_string()],
            expense: vec![
                FUEL_CATEGORY.to_string(),
                "Maintenance".to_string(),
                "Food".to_string(),
            ],
        }
    }
}

// =============================================================================
// Clock Time Serialization
// =============================================================================

/// Serde adapter for the optional `HH:MM` session times.
///
/// An empty, missing or unparseable string reads as `None`; `None` is
/// written back as an empty string, which is what the day form stores for
/// a blank time input.
pub(crate) mod clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<NaiveTime> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn format(time: &NaiveTime) -> String {
        if time.second() == 0 {
            time.format("%H:%M").to_string()
        } else {
            time.format("%H:%M:%S").to_string()
        }
    }

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&format(time)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}

pub use clock_time::parse as parse_clock_time;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn at(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn test_builder_keeps_totals_in_step() {
        let record = Record::new(1, day(1), 1000.0, 1180.0)
            .with_income(LineItem::new("Uber", Money::from_cents(15_000)))
            .with_income(LineItem::new("iFood", Money::from_cents(7_550)))
            .with_expense(LineItem::fuel(5.0, 6.0));

        assert_eq!(record.total_income.cents(), 22_550);
        assert_eq!(record.total_expense.cents(), 3_000);
        assert_eq!(record.profit().cents(), 19_550);
        assert_eq!(record.distance(), 180.0);
        assert_eq!(record.computed_totals(), (record.total_income, record.total_expense));
    }

    #[test]
    fn test_fuel_detection() {
        assert!(LineItem::fuel(3.0, 5.0).is_fuel());
        assert!(LineItem::new("Combustível", Money::from_cents(100)).is_fuel());
        assert!(!LineItem::new("Food", Money::from_cents(100)).is_fuel());

        let mut empty_fill = LineItem::fuel(0.0, 6.0);
        assert_eq!(empty_fill.fuel_liters(), None);
        empty_fill.liters = Some(-2.0);
        assert_eq!(empty_fill.fuel_liters(), None);

        let mut mislabeled = LineItem::new("Food", Money::from_cents(100));
        mislabeled.liters = Some(4.0);
        assert_eq!(mislabeled.fuel_liters(), None);
    }

    #[test]
    fn test_worked_hours() {
        let record = Record::new(1, day(1), 0.0, 10.0).with_times(at(8, 0), at(17, 30));
        assert_eq!(record.worked_hours(), Some(9.5));

        let zero = Record::new(2, day(1), 0.0, 10.0).with_times(at(8, 0), at(8, 0));
        assert_eq!(zero.worked_hours(), None);

        let overnight = Record::new(3, day(1), 0.0, 10.0).with_times(at(22, 0), at(2, 0));
        assert_eq!(overnight.worked_hours(), None);

        let missing_end = Record::new(4, day(1), 0.0, 10.0).with_times(at(8, 0), None);
        assert_eq!(missing_end.worked_hours(), None);
    }

    #[test]
    fn test_hourly_rate() {
        let record = Record::new(1, day(1), 0.0, 10.0)
            .with_times(at(9, 0), at(13, 0))
            .with_income(LineItem::new("Uber", Money::from_cents(10_000)));
        assert_eq!(record.hourly_rate(), Some(Money::from_cents(2_500)));
    }

    #[test]
    fn test_recompute_totals() {
        let mut record = Record::new(1, day(1), 0.0, 10.0)
            .with_income(LineItem::new("Uber", Money::from_cents(5_000)));
        assert!(!record.recompute_totals());

        record.total_income = Money::from_cents(1);
        assert!(record.recompute_totals());
        assert_eq!(record.total_income.cents(), 5_000);
    }

    #[test]
    fn test_totals_match_within_line_rounding() {
        // two fills at 5.899/L, amounts and total summed as raw decimals
        let first = 3.0 * 5.899;
        let second = 2.0 * 5.899;
        let json = serde_json::json!({
            "id": 1,
            "date": "2026-03-02",
            "kmInitial": 0,
            "kmFinal": 50,
            "expenses": [
                {"category": "Combustível", "liters": 3.0, "pricePerLiter": 5.899, "amount": first},
                {"category": "Combustível", "liters": 2.0, "pricePerLiter": 5.899, "amount": second}
            ],
            "totalExpense": first + second
        });
        let mut record: Record = serde_json::from_value(json).unwrap();
        let stored = record.total_expense;

        assert!(record.totals_match());
        assert!(!record.recompute_totals());
        assert_eq!(record.total_expense, stored);

        record.total_expense = record.computed_totals().1 + Money::from_cents(2);
        assert!(!record.totals_match());

        let mut single = Record::new(2, day(1), 0.0, 10.0)
            .with_income(LineItem::new("Uber", Money::from_cents(5_000)));
        single.total_income = Money::from_cents(5_001);
        assert!(!single.totals_match());
    }

    #[test]
    fn test_record_from_document_json() {
        let json = r#"{
            "id": 1709380000000,
            "date": "2026-03-02",
            "kmInitial": 15200,
            "kmFinal": 15390.5,
            "timeStart": "08:15",
            "timeEnd": "",
            "incomes": [{"category": "Uber", "amount": 210.5}],
            "expenses": [{"category": "Fuel", "liters": 7.2, "pricePerLiter": 6.1, "amount": 43.92}],
            "totalIncome": 210.5,
            "totalExpense": 43.92
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 1709380000000);
        assert_eq!(record.date, day(2));
        assert_eq!(record.time_start, at(8, 15));
        assert_eq!(record.time_end, None);
        assert_eq!(record.total_income.cents(), 21_050);
        assert_eq!(record.expenses[0].fuel_liters(), Some(7.2));
        assert_eq!(record.expenses[0].amount.cents(), 4_392);
    }

    #[test]
    fn test_record_tolerates_missing_optional_fields() {
        let json = r#"{"id": 5, "date": "2026-03-09", "kmInitial": 1, "kmFinal": 2}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.incomes.is_empty());
        assert_eq!(record.time_start, None);
        assert!(record.total_expense.is_zero());
    }

    #[test]
    fn test_record_json_writes_empty_time_as_blank() {
        let record = Record::new(7, day(3), 0.0, 1.0).with_times(at(7, 5), None);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timeStart"], "07:05");
        assert_eq!(value["timeEnd"], "");
        assert_eq!(value["kmFinal"], 1.0);
    }

    #[test]
    fn test_clock_time_parse() {
        assert_eq!(parse_clock_time("06:30"), at(6, 30));
        assert_eq!(parse_clock_time("06:30:15"), NaiveTime::from_hms_opt(6, 30, 15));
        assert_eq!(parse_clock_time("half past six"), None);
        assert_eq!(parse_clock_time(""), None);
    }

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"monthlyGoal": 3000}"#).unwrap();
        assert_eq!(settings.monthly_goal.cents(), 300_000);
        assert!(settings.maintenance_plan.is_empty());
        assert!(settings.fixed_expenses.is_empty());
        assert_eq!(settings.theme, DEFAULT_THEME);
    }

    #[test]
    fn test_maintenance_next_due() {
        let item = MaintenanceItem {
            id: 1,
            name: "Oil change".to_string(),
            last_km: 10_000.0,
            interval: 5_000.0,
        };
        assert_eq!(item.next_due_km(), 15_000.0);
    }
}
