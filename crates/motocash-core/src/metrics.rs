//! # Metrics Facade
//!
//! One call that derives every figure the presentation layer reads.
//!
//! ## Recompute Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     derive_snapshot(state, today)                       │
//! │                                                                         │
//! │   AppState ──┬──► calculate_consumption(records) ──► km/L map, average │
//! │              │                                                          │
//! │              ├──► summarize_month(records, month(today), fixed costs)  │
//! │              │         └──► goal_progress(net, monthly goal)            │
//! │              │                                                          │
//! │              ├──► due_maintenance(plan, records)                        │
//! │              │                                                          │
//! │              └──► history(records, consumption)                         │
//! │                                                                         │
//! │   No caching and no invalidation: the caller derives a fresh snapshot  │
//! │   after every mutation of records, fixed costs or the plan.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::consumption::{calculate_consumption, ConsumptionReport};
use crate::history::{history, HistoryEntry};
use crate::maintenance::{current_odometer, due_maintenance, MaintenanceStatus};
use crate::money::Money;
use crate::profitability::{goal_progress, summarize_month, MonthKey, ProfitSummary};
use crate::state::AppState;

/// Every derived metric at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Reference date the month window was taken from.
    #[ts(as = "String")]
    pub today: NaiveDate,
    pub consumption: ConsumptionReport,
    /// Profit of the month containing `today`.
    pub profit: ProfitSummary,
    pub monthly_goal: Money,
    /// Percent of the goal reached, capped at 100; absent without a goal.
    #[ts(optional)]
    pub goal_progress: Option<f64>,
    pub maintenance: Vec<MaintenanceStatus>,
    pub current_odometer: f64,
    pub history: Vec<HistoryEntry>,
}

/// Derives a consistent snapshot from the current state.
pub fn derive_snapshot(state: &AppState, today: NaiveDate) -> MetricsSnapshot {
    let records = &state.records;
    let settings = &state.settings;

    let consumption = calculate_consumption(records);
    let profit = summarize_month(records, MonthKey::of(today), &settings.fixed_expenses);
    let goal_progress = goal_progress(profit.net_profit, settings.monthly_goal);

    MetricsSnapshot {
        today,
        history: history(records, &consumption),
        consumption,
        monthly_goal: settings.monthly_goal,
        goal_progress,
        profit,
        maintenance: due_maintenance(&settings.maintenance_plan, records),
        current_odometer: current_odometer(records),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::MaintenanceTier;
    use crate::types::{FixedExpense, LineItem, MaintenanceItem, Record};
    use chrono::NaiveTime;

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, d).unwrap()
    }

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        state
            .insert_record(
                Record::new(1, day(2, 27), 9_900.0, 10_000.0)
                    .with_income(LineItem::new("Uber", Money::from_cents(30_000)))
                    .with_expense(LineItem::fuel(5.0, 6.0)),
            )
            .unwrap();
        state
            .insert_record(
                Record::new(2, day(3, 2), 10_000.0, 10_150.0)
                    .with_times(NaiveTime::from_hms_opt(8, 0, 0), NaiveTime::from_hms_opt(13, 0, 0))
                    .with_income(LineItem::new("Uber", Money::from_cents(40_000)))
                    .with_expense(LineItem::fuel(6.0, 6.0)),
            )
            .unwrap();
        state
            .insert_record(
                Record::new(3, day(3, 3), 10_150.0, 14_500.0)
                    .with_times(NaiveTime::from_hms_opt(8, 0, 0), NaiveTime::from_hms_opt(8, 0, 0))
                    .with_income(LineItem::new("iFood", Money::from_cents(20_000))),
            )
            .unwrap();
        state
            .add_fixed_expense(FixedExpense {
                id: 1,
                name: "Installment".to_string(),
                amount: Money::from_cents(10_400),
            })
            .unwrap();
        state
            .add_maintenance_item(MaintenanceItem {
                id: 1,
                name: "Oil change".to_string(),
                last_km: 10_000.0,
                interval: 5_000.0,
            })
            .unwrap();
        state.set_monthly_goal(Money::from_cents(100_000)).unwrap();
        state
    }

    #[test]
    fn test_snapshot_combines_all_derivations() {
        let snapshot = derive_snapshot(&sample_state(), day(3, 14));

        assert_eq!(snapshot.consumption.for_record(2), Some(25.0));
        assert_eq!(snapshot.current_odometer, 14_500.0);

        // March only: 400 - 36 + 200 = 564, net 564 - 104 = 460
        assert_eq!(snapshot.profit.record_count, 2);
        assert_eq!(snapshot.profit.total_profit.cents(), 56_400);
        assert_eq!(snapshot.profit.net_profit.cents(), 46_000);
        assert_eq!(snapshot.goal_progress, Some(46.0));

        // zero-duration record counts in profit but not in hours
        assert_eq!(snapshot.profit.total_hours, 5.0);
        assert_eq!(snapshot.profit.avg_hourly_rate.cents(), 7_280);

        assert_eq!(snapshot.maintenance.len(), 1);
        assert_eq!(snapshot.maintenance[0].tier, MaintenanceTier::Warn);

        let ids: Vec<i64> = snapshot.history.iter().map(|entry| entry.record_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_snapshot_of_empty_state() {
        let snapshot = derive_snapshot(&AppState::default(), day(3, 14));
        assert_eq!(snapshot.consumption.overall_average, 0.0);
        assert!(snapshot.profit.total_profit.is_zero());
        assert_eq!(snapshot.goal_progress, None);
        assert!(snapshot.maintenance.is_empty());
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn test_snapshot_follows_mutations() {
        let mut state = sample_state();
        let before = derive_snapshot(&state, day(3, 14));

        state.remove_record(3).unwrap();
        let after = derive_snapshot(&state, day(3, 14));

        assert_ne!(before.profit.total_profit, after.profit.total_profit);
        assert_eq!(after.current_odometer, 10_150.0);
        assert!(after.maintenance.is_empty());
    }

    #[test]
    fn test_previous_month_window() {
        let snapshot = derive_snapshot(&sample_state(), day(2, 1));
        assert_eq!(snapshot.profit.record_count, 1);
        assert_eq!(snapshot.profit.total_profit.cents(), 27_000);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let value = serde_json::to_value(derive_snapshot(&sample_state(), day(3, 14))).unwrap();
        assert_eq!(value["profit"]["month"], "2026-03");
        assert_eq!(value["currentOdometer"], 14_500.0);
        assert_eq!(value["consumption"]["perRecord"]["2"], 25.0);
    }
}
