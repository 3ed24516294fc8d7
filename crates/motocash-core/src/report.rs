//! # Report Module
//!
//! Period reports for the reports view and for document export.
//!
//! ## Report Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Period Report                                   │
//! │                                                                         │
//! │  ReportPeriod ──► filter records by date ──► PeriodReport              │
//! │   "2026-10"         (inclusive bounds)         ├── totals (stored)      │
//! │   "2026"                                       ├── distance, hours      │
//! │   "2026-01-01..2026-03-31"                     ├── income by category   │
//! │   "all"                                        ├── expense by category  │
//! │                                                ├── daily profit series  │
//! │                                                └── records (date asc)   │
//! │                                                                         │
//! │  Category shares are computed from the line items; the totals use the  │
//! │  stored per-record totals like every other derivation.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::profitability::MonthKey;
use crate::types::{LineItem, Record};
use crate::FUEL_CATEGORY;

// =============================================================================
// Report Period
// =============================================================================

/// Date window a report covers. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Month(MonthKey),
    Year(i32),
    Range { from: NaiveDate, to: NaiveDate },
    AllTime,
}

impl ReportPeriod {
    /// Returns true if `date` falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            ReportPeriod::Month(month) => month.contains(date),
            ReportPeriod::Year(year) => date.year() == *year,
            ReportPeriod::Range { from, to } => *from <= date && date <= *to,
            ReportPeriod::AllTime => true,
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::Month(month) => write!(f, "{}", month),
            ReportPeriod::Year(year) => write!(f, "{:04}", year),
            ReportPeriod::Range { from, to } => write!(f, "{}..{}", from, to),
            ReportPeriod::AllTime => f.write_str("all"),
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    /// Parses `all`, `YYYY`, `YYYY-MM` or `YYYY-MM-DD..YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: format!("{} (got '{}')", reason, s),
        };

        if s.eq_ignore_ascii_case("all") {
            return Ok(ReportPeriod::AllTime);
        }

        if let Some((from, to)) = s.split_once("..") {
            let parse_day = |value: &str| {
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                    .map_err(|_| invalid("range bounds must be YYYY-MM-DD"))
            };
            let (from, to) = (parse_day(from)?, parse_day(to)?);
            if from > to {
                return Err(invalid("range start is after its end"));
            }
            return Ok(ReportPeriod::Range { from, to });
        }

        if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            let year = s.parse().map_err(|_| invalid("expected a year"))?;
            return Ok(ReportPeriod::Year(year));
        }

        s.parse::<MonthKey>()
            .map(ReportPeriod::Month)
            .map_err(|_| invalid("expected all, YYYY, YYYY-MM or YYYY-MM-DD..YYYY-MM-DD"))
    }
}

// =============================================================================
// Period Report
// =============================================================================

/// Line-item total of one category within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub total: Money,
    pub count: usize,
    /// Share of all lines of the same side, 0-100.
    pub percentage: f64,
}

/// Profit of one calendar day (several sessions on a day are summed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyProfit {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub profit: Money,
}

/// Everything the reports view and the document export need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    /// Period label, e.g. `2026-10` or `all`.
    pub period: String,
    pub record_count: usize,
    pub total_income: Money,
    pub total_expense: Money,
    pub total_profit: Money,
    pub total_distance: f64,
    pub total_hours: f64,
    pub income_by_category: Vec<CategorySummary>,
    pub expense_by_category: Vec<CategorySummary>,
    pub daily_profit: Vec<DailyProfit>,
    /// Records in the period, oldest first.
    pub records: Vec<Record>,
}

/// Builds the report of a period.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use motocash_core::{build_report, LineItem, Money, Record, ReportPeriod};
///
/// let day = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
/// let records = vec![Record::new(1, day, 0.0, 80.0)
///     .with_income(LineItem::new("Uber", Money::from_cents(9_000)))
///     .with_income(LineItem::new("iFood", Money::from_cents(3_000)))];
///
/// let report = build_report(&records, "2026-10".parse::<ReportPeriod>().unwrap());
/// assert_eq!(report.income_by_category[0].category, "Uber");
/// assert_eq!(report.income_by_category[0].percentage, 75.0);
/// ```
pub fn build_report(records: &[Record], period: ReportPeriod) -> PeriodReport {
    let mut selected: Vec<Record> = records
        .iter()
        .filter(|record| period.contains(record.date))
        .cloned()
        .collect();
    selected.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    let mut daily: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    let mut total_hours = 0.0;
    for record in &selected {
        *daily.entry(record.date).or_default() += record.profit();
        total_hours += record.worked_hours().unwrap_or(0.0);
    }

    let total_income: Money = selected.iter().map(|record| record.total_income).sum();
    let total_expense: Money = selected.iter().map(|record| record.total_expense).sum();

    PeriodReport {
        period: period.to_string(),
        record_count: selected.len(),
        total_income,
        total_expense,
        total_profit: total_income - total_expense,
        total_distance: selected.iter().map(Record::distance).sum(),
        total_hours,
        income_by_category: breakdown(selected.iter().flat_map(|record| record.incomes.iter())),
        expense_by_category: breakdown(selected.iter().flat_map(|record| record.expenses.iter())),
        daily_profit: daily
            .into_iter()
            .map(|(date, profit)| DailyProfit { date, profit })
            .collect(),
        records: selected,
    }
}

/// Groups line items by category, largest total first (ties by name).
///
/// Every fuel line, legacy label included, lands under [`FUEL_CATEGORY`].
fn breakdown<'a>(items: impl Iterator<Item = &'a LineItem>) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for item in items {
        let category = if item.is_fuel() { FUEL_CATEGORY } else { item.category.as_str() };
        let entry = groups.entry(category).or_default();
        entry.0 += item.amount;
        entry.1 += 1;
    }

    let grand_total: Money = groups.values().map(|(total, _)| *total).sum();
    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_string(),
            total,
            count,
            percentage: total.percent_of(grand_total).unwrap_or(0.0),
        })
        .collect();

    summaries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    summaries
}

// =============================================================================
// Unit Tests
// =============================================================================
