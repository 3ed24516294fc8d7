//! # Maintenance Module
//!
//! Which plan items are coming due, measured against the odometer.
//!
//! ## Status Bands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Progress Since Last Service                          │
//! │                                                                         │
//! │  progress = (current_odometer − last_km) × 100 / interval              │
//! │                                                                         │
//! │   0%            80%        90%       100%                  150%         │
//! │   ├──────────────┼──────────┼─────────┼──────────────────────┼────►     │
//! │   │   hidden     │    OK    │  WARN   │        DANGER        │ hidden   │
//! │   │ (not yet     │          │         │      (overdue)       │ (stale)  │
//! │   │  relevant)   │          │         │                      │          │
//! │                                                                         │
//! │  Visible: 80 ≤ progress < 150, sorted by next-due odometer.           │
//! │  current_odometer = max km_final over all records; no records means    │
//! │  nothing is ever shown.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{MaintenanceItem, Record};

/// Progress at which an item starts being shown.
pub const SHOW_FROM_PERCENT: f64 = 80.0;

/// Progress at which an item turns from OK to WARN.
pub const WARN_FROM_PERCENT: f64 = 90.0;

/// Progress at which an item is due.
pub const DANGER_FROM_PERCENT: f64 = 100.0;

/// Progress at which an item is considered stale and hidden again.
pub const HIDE_FROM_PERCENT: f64 = 150.0;

// =============================================================================
// Types
// =============================================================================

/// Urgency of a visible maintenance item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaintenanceTier {
    Ok,
    Warn,
    Danger,
}

impl MaintenanceTier {
    /// Tier for a progress percentage (assumes the item is visible).
    pub fn for_progress(progress_percent: f64) -> Self {
        if progress_percent >= DANGER_FROM_PERCENT {
            MaintenanceTier::Danger
        } else if progress_percent >= WARN_FROM_PERCENT {
            MaintenanceTier::Warn
        } else {
            MaintenanceTier::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceTier::Ok => "OK",
            MaintenanceTier::Warn => "WARN",
            MaintenanceTier::Danger => "DANGER",
        }
    }
}

/// Distance left until the next service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Remaining {
    /// Kilometres still to go (always > 0).
    Km(f64),
    /// Kilometres past the due reading (0 means due right now).
    Overdue(f64),
}

/// A plan item that is approaching or past its due reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatus {
    pub item: MaintenanceItem,
    pub progress_percent: f64,
    pub tier: MaintenanceTier,
    pub next_due_km: f64,
    /// `next_due_km − current_odometer`; ≤ 0 when overdue.
    pub remaining_km: f64,
}

impl MaintenanceStatus {
    /// Remaining distance, or how far past due the item is.
    pub fn remaining(&self) -> Remaining {
        if self.remaining_km > 0.0 {
            Remaining::Km(self.remaining_km)
        } else {
            Remaining::Overdue(0.0 - self.remaining_km)
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.remaining_km <= 0.0
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Highest final odometer reading across all records, 0 with no records.
pub fn current_odometer(records: &[Record]) -> f64 {
    records
        .iter()
        .map(|record| record.km_final)
        .filter(|km| km.is_finite())
        .fold(0.0, f64::max)
}

/// Plan items between 80% and 150% of their interval.
///
/// Items with a non-positive interval are skipped.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use motocash_core::{due_maintenance, MaintenanceItem, MaintenanceTier, Record};
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let records = vec![Record::new(1, day, 14_300.0, 14_500.0)];
/// let plan = vec![MaintenanceItem {
///     id: 1,
///     name: "Oil change".to_string(),
///     last_km: 10_000.0,
///     interval: 5_000.0,
/// }];
///
/// let due = due_maintenance(&plan, &records);
/// assert_eq!(due[0].progress_percent, 90.0);
/// assert_eq!(due[0].tier, MaintenanceTier::Warn);
/// assert_eq!(due[0].remaining_km, 500.0);
/// ```
pub fn due_maintenance(plan: &[MaintenanceItem], records: &[Record]) -> Vec<MaintenanceStatus> {
    if records.is_empty() {
        return Vec::new();
    }
    let odometer = current_odometer(records);

    let mut due: Vec<MaintenanceStatus> = plan
        .iter()
        .filter(|item| item.interval > 0.0 && item.last_km.is_finite())
        .filter_map(|item| {
            let progress_percent = (odometer - item.last_km) * 100.0 / item.interval;
            if !(SHOW_FROM_PERCENT..HIDE_FROM_PERCENT).contains(&progress_percent) {
                return None;
            }

            let next_due_km = item.next_due_km();
            Some(MaintenanceStatus {
                item: item.clone(),
                progress_percent,
                tier: MaintenanceTier::for_progress(progress_percent),
                next_due_km,
                remaining_km: next_due_km - odometer,
            })
        })
        .collect();

    due.sort_by(|a, b| a.next_due_km.total_cmp(&b.next_due_km));
    due
}

// =============================================================================
// Unit Tests
// =============================================================================
