//! # History Module
//!
//! One row per work session for the history list, newest first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::consumption::ConsumptionReport;
use crate::money::Money;
use crate::types::{Record, RecordId};

/// A work session as shown in the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[ts(type = "number")]
    pub record_id: RecordId,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub distance: f64,
    pub total_income: Money,
    pub total_expense: Money,
    pub profit: Money,
    #[ts(optional)]
    pub worked_hours: Option<f64>,
    #[ts(optional)]
    pub hourly_rate: Option<Money>,
    /// Set when the record closed an included fuel pair.
    #[ts(optional)]
    pub km_per_liter: Option<f64>,
}

/// Builds the history list.
///
/// Ordered by date descending; sessions on the same day show the most
/// recently created (highest id) first.
pub fn history(records: &[Record], consumption: &ConsumptionReport) -> Vec<HistoryEntry> {
    let mut ordered: Vec<&Record> = records.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    ordered
        .into_iter()
        .map(|record| HistoryEntry {
            record_id: record.id,
            date: record.date,
            distance: record.distance(),
            total_income: record.total_income,
            total_expense: record.total_expense,
            profit: record.profit(),
            worked_hours: record.worked_hours(),
            hourly_rate: record.hourly_rate(),
            km_per_liter: consumption.for_record(record.id),
        })
        .collect()
}
