//! # Consumption Module
//!
//! Fuel efficiency from fill-up checkpoints.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Fill-to-Fill Efficiency                              │
//! │                                                                         │
//! │  Every fuel line with liters > 0 is a checkpoint at the record's       │
//! │  final odometer reading:                                               │
//! │                                                                         │
//! │    km 100 (5 L)      km 250 (6 L)      km 250 (4 L)      km 420 (7 L)   │
//! │        │                 │                 │                 │          │
//! │        └──── 150 km ─────┘                 │                 │          │
//! │          150 / 6 = 25 km/L     diff = 0    │                 │          │
//! │                                (skipped)   └──── 170 km ─────┘          │
//! │                                              170 / 7 ≈ 24.3 km/L       │
//! │                                                                         │
//! │  The distance since the previous fill is divided by the liters of the  │
//! │  CURRENT fill (the fuel burned to cover it).                           │
//! │                                                                         │
//! │  overall = Σ included distance / Σ included liters                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Checkpoints are sorted by odometer reading, never by date or insertion
//! order. Equal readings are ordered by record id, then by their position
//! in the record (the sort is stable).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::types::{Record, RecordId};

// =============================================================================
// Fuel Event
// =============================================================================

/// A fuel purchase used as an efficiency checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FuelEvent {
    #[ts(type = "number")]
    pub record_id: RecordId,
    /// Final odometer reading of the record the fill belongs to.
    pub km: f64,
    pub liters: f64,
}

/// Extracts every fuel checkpoint, ordered by odometer reading.
///
/// Lines with zero, negative or missing liters are dropped here, so the
/// calculator never divides by a non-positive volume even when called on
/// unvalidated data.
pub fn fuel_events(records: &[Record]) -> Vec<FuelEvent> {
    let mut events: Vec<FuelEvent> = records
        .iter()
        .flat_map(|record| {
            record.fuel_lines().filter_map(move |line| {
                line.fuel_liters().map(|liters| FuelEvent {
                    record_id: record.id,
                    km: record.km_final,
                    liters,
                })
            })
        })
        .collect();

    events.sort_by(|a, b| a.km.total_cmp(&b.km).then(a.record_id.cmp(&b.record_id)));
    events
}

// =============================================================================
// Consumption Report
// =============================================================================

/// One included fill-to-fill pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSegment {
    /// Record of the closing fill (the one the figure is attributed to).
    #[ts(type = "number")]
    pub record_id: RecordId,
    pub from_km: f64,
    pub to_km: f64,
    pub distance: f64,
    /// Liters of the closing fill.
    pub liters: f64,
    pub km_per_liter: f64,
}

/// Fuel efficiency across the whole record collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionReport {
    /// km/L per record. A record that closes more than one pair keeps the
    /// figure of its last pair in odometer order.
    #[ts(type = "Record<number, number>")]
    pub per_record: BTreeMap<RecordId, f64>,
    /// Included pairs in odometer order.
    pub segments: Vec<ConsumptionSegment>,
    pub total_distance: f64,
    pub total_liters: f64,
    /// `total_distance / total_liters`, or 0 when nothing was included.
    pub overall_average: f64,
}

impl ConsumptionReport {
    /// km/L of a record, if it closed an included pair.
    pub fn for_record(&self, id: RecordId) -> Option<f64> {
        self.per_record.get(&id).copied()
    }
}

/// Computes fuel efficiency for every record.
///
/// ## Edge Cases
/// - Fewer than two checkpoints: empty map, average 0
/// - A pair whose odometer difference is ≤ 0 (duplicate reading, corrected
///   odometer, bad import) is skipped and contributes nothing
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use motocash_core::{calculate_consumption, LineItem, Record};
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let records = vec![
///     Record::new(1, day, 0.0, 100.0).with_expense(LineItem::fuel(5.0, 6.0)),
///     Record::new(2, day, 100.0, 250.0).with_expense(LineItem::fuel(6.0, 6.0)),
/// ];
///
/// let report = calculate_consumption(&records);
/// assert_eq!(report.for_record(2), Some(25.0));
/// assert_eq!(report.overall_average, 25.0);
/// ```
pub fn calculate_consumption(records: &[Record]) -> ConsumptionReport {
    let events = fuel_events(records);
    let mut report = ConsumptionReport::default();

    for pair in events.windows(2) {
        let (prev, current) = (pair[0], pair[1]);
        let distance = current.km - prev.km;
        if distance <= 0.0 || distance.is_nan() {
            continue;
        }

        let km_per_liter = distance / current.liters;
        report.per_record.insert(current.record_id, km_per_liter);
        report.segments.push(ConsumptionSegment {
            record_id: current.record_id,
            from_km: prev.km,
            to_km: current.km,
            distance,
            liters: current.liters,
            km_per_liter,
        });
        report.total_distance += distance;
        report.total_liters += current.liters;
    }

    if report.total_liters > 0.0 {
        report.overall_average = report.total_distance / report.total_liters;
    }

    report
}

// =============================================================================
// Unit Tests
// =============================================================================
