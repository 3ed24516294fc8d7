//! # Profitability Module
//!
//! Monthly profit, worked hours and goal progress.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Monthly Profit Summary                               │
//! │                                                                         │
//! │  records ──► filter date ∈ month ──► for each record:                  │
//! │                                     profit = income − expense          │
//! │                                     total_profit += profit             │
//! │                                          │                              │
//! │                          both times and duration > 0 ?                 │
//! │                                │ yes               │ no                 │
//! │                                ▼                   ▼                    │
//! │              total_hours += hours         (profit still counted,       │
//! │              profit_with_time += profit    not in the hourly rate)     │
//! │                                                                         │
//! │  net_profit      = total_profit − Σ fixed expenses  (not date-filtered)│
//! │  avg_hourly_rate = profit_with_time / total_hours   (0 if no hours)    │
//! │  goal progress   = min(net / goal × 100, 100)       (goal > 0 only)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{FixedExpense, Record};

// =============================================================================
// Month Key
// =============================================================================

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key; `None` if `month` is not 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(MonthKey { year, month })
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns true if `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: format!("expected YYYY-MM, got '{}'", s),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Profit Summary
// =============================================================================

/// Profitability of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    #[ts(as = "String")]
    pub month: MonthKey,
    pub record_count: usize,
    /// Records that contributed to the hourly rate.
    pub timed_record_count: usize,
    pub total_income: Money,
    pub total_expense: Money,
    pub total_profit: Money,
    pub total_hours: f64,
    pub profit_with_time: Money,
    pub total_fixed_expenses: Money,
    pub net_profit: Money,
    pub avg_hourly_rate: Money,
    pub total_distance: f64,
}

/// Summarizes the records of one month against the fixed costs.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, NaiveTime};
/// use motocash_core::{summarize_month, LineItem, Money, MonthKey, Record};
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let record = Record::new(1, day, 0.0, 120.0)
///     .with_times(NaiveTime::from_hms_opt(8, 0, 0), NaiveTime::from_hms_opt(12, 0, 0))
///     .with_income(LineItem::new("Uber", Money::from_cents(20_000)));
///
/// let summary = summarize_month(&[record], MonthKey::of(day), &[]);
/// assert_eq!(summary.total_hours, 4.0);
/// assert_eq!(summary.avg_hourly_rate, Money::from_cents(5_000));
/// ```
pub fn summarize_month(records: &[Record], month: MonthKey, fixed_expenses: &[FixedExpense]) -> ProfitSummary {
    let mut summary = ProfitSummary {
        month,
        record_count: 0,
        timed_record_count: 0,
        total_income: Money::zero(),
        total_expense: Money::zero(),
        total_profit: Money::zero(),
        total_hours: 0.0,
        profit_with_time: Money::zero(),
        total_fixed_expenses: fixed_expenses.iter().map(|expense| expense.amount).sum(),
        net_profit: Money::zero(),
        avg_hourly_rate: Money::zero(),
        total_distance: 0.0,
    };

    for record in records.iter().filter(|record| month.contains(record.date)) {
        let profit = record.profit();
        summary.record_count += 1;
        summary.total_income += record.total_income;
        summary.total_expense += record.total_expense;
        summary.total_profit += profit;
        summary.total_distance += record.distance();

        if let Some(hours) = record.worked_hours() {
            summary.timed_record_count += 1;
            summary.total_hours += hours;
            summary.profit_with_time += profit;
        }
    }

    summary.net_profit = summary.total_profit - summary.total_fixed_expenses;
    summary.avg_hourly_rate = summary.profit_with_time.divide_by(summary.total_hours);
    summary
}

/// Progress toward the monthly goal in percent, capped at 100.
///
/// `None` when no goal is set (goal ≤ 0). A negative net profit gives a
/// negative percentage; presentation decides how to draw it.
///
/// ## Example
/// ```rust
/// use motocash_core::{goal_progress, Money};
///
/// let goal = Money::from_cents(100_000);
/// assert_eq!(goal_progress(Money::from_cents(45_000), goal), Some(45.0));
/// assert_eq!(goal_progress(Money::from_cents(120_000), goal), Some(100.0));
/// assert_eq!(goal_progress(Money::from_cents(45_000), Money::zero()), None);
/// ```
pub fn goal_progress(net_profit: Money, monthly_goal: Money) -> Option<f64> {
    net_profit.percent_of(monthly_goal).map(|percent| percent.min(100.0))
}

/// Hours from `start` to `end` on the same 24-hour clock.
///
/// Signed: an end before the start gives a negative value (no overnight
/// wraparound).
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    end.signed_duration_since(start).num_milliseconds() as f64 / 3_600_000.0
}

// =============================================================================
// Unit Tests
// =============================================================================
