//! # Metrics Commands
//!
//! `dashboard`, `history` and `maintenance`: read-only views over a fresh
//! [`MetricsSnapshot`].
//!
//! ## Dashboard Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MotoCash · 2026-03                                                     │
//! │  ─────────────────────────────────────                                 │
//! │  Income            R$ 350,00                                           │
//! │  Expenses          R$ 66,00                                            │
//! │  Fixed costs       R$ 0,00                                             │
//! │  Net profit        R$ 284,00                                           │
//! │  Hours worked      4,0                                                 │
//! │  Per hour          R$ 42,50                                            │
//! │  Goal              R$ 1.000,00 (28,4%)                                 │
//! │  Fuel average      25,0 km/L                                           │
//! │  Odometer          250,0 km                                            │
//! │                                                                         │
//! │  Maintenance                                                           │
//! │  [OK]   Oil change   83,3%  due at 300,0 km (50,0 km left)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use motocash_core::maintenance::Remaining;
use motocash_core::{derive_snapshot, MaintenanceStatus, MetricsSnapshot};
use std::io::Write;
use tracing::{debug, info};

use super::{write_json, Context};
use crate::error::{AppError, AppResult};
use crate::format::MoneyFormat;

/// Parses `--date`, or falls back to the local calendar day.
pub fn reference_date(date: Option<&str>) -> AppResult<NaiveDate> {
    match date {
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidArgument(format!("date must be YYYY-MM-DD, got '{}'", text))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

async fn snapshot(ctx: &Context<'_>, today: NaiveDate) -> AppResult<MetricsSnapshot> {
    let state = ctx.store.load().await?;
    debug!(records = state.records.len(), %today, "Deriving metrics snapshot");
    Ok(derive_snapshot(&state, today))
}

// =============================================================================
// dashboard
// =============================================================================

/// Month summary, goal, fuel efficiency and due maintenance.
pub async fn dashboard(ctx: &Context<'_>, today: NaiveDate, json: bool, out: &mut dyn Write) -> AppResult<()> {
    let snapshot = snapshot(ctx, today).await?;
    info!(month = %snapshot.profit.month, net = %snapshot.profit.net_profit, "dashboard");

    if json {
        return write_json(out, &snapshot);
    }

    let f = ctx.format;
    let profit = &snapshot.profit;
    writeln!(out, "MotoCash · {}", profit.month)?;
    writeln!(out, "{}", "─".repeat(37))?;
    writeln!(out, "{:<18}{}", "Income", f.money(profit.total_income))?;
    writeln!(out, "{:<18}{}", "Expenses", f.money(profit.total_expense))?;
    writeln!(out, "{:<18}{}", "Fixed costs", f.money(profit.total_fixed_expenses))?;
    writeln!(out, "{:<18}{}", "Net profit", f.money(profit.net_profit))?;
    writeln!(out, "{:<18}{}", "Hours worked", f.number(profit.total_hours, 1))?;
    writeln!(out, "{:<18}{}", "Per hour", f.money(profit.avg_hourly_rate))?;

    match snapshot.goal_progress {
        Some(progress) => writeln!(
            out,
            "{:<18}{} ({})",
            "Goal",
            f.money(snapshot.monthly_goal),
            f.percent(progress)
        )?,
        None => writeln!(out, "{:<18}not set", "Goal")?,
    }

    if snapshot.consumption.overall_average > 0.0 {
        writeln!(
            out,
            "{:<18}{} km/L",
            "Fuel average",
            f.number(snapshot.consumption.overall_average, 1)
        )?;
    } else {
        writeln!(out, "{:<18}not enough fill-ups", "Fuel average")?;
    }
    writeln!(out, "{:<18}{}", "Odometer", f.km(snapshot.current_odometer))?;

    if !snapshot.maintenance.is_empty() {
        writeln!(out)?;
        writeln!(out, "Maintenance")?;
        write_maintenance(out, f, &snapshot.maintenance)?;
    }

    Ok(())
}

// =============================================================================
// history
// =============================================================================

/// Sessions newest first, optionally limited.
pub async fn history(ctx: &Context<'_>, limit: Option<usize>, json: bool, out: &mut dyn Write) -> AppResult<()> {
    let snapshot = snapshot(ctx, chrono::Local::now().date_naive()).await?;
    let entries = match limit {
        Some(limit) => &snapshot.history[..limit.min(snapshot.history.len())],
        None => &snapshot.history[..],
    };
    debug!(shown = entries.len(), total = snapshot.history.len(), "history");

    if json {
        return write_json(out, entries);
    }

    if entries.is_empty() {
        writeln!(out, "No sessions recorded")?;
        return Ok(());
    }

    let f = ctx.format;
    for entry in entries {
        let rate = entry
            .hourly_rate
            .map(|rate| format!("{}/h", f.money(rate)))
            .unwrap_or_else(|| "-".to_string());
        let efficiency = entry
            .km_per_liter
            .map(|kml| format!("{} km/L", f.number(kml, 1)))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{}  #{:<14} {:>10}  profit {:>14}  {:>14}  {}",
            entry.date,
            entry.record_id,
            f.km(entry.distance),
            f.money(entry.profit),
            rate,
            efficiency
        )?;
    }

    Ok(())
}

// =============================================================================
// maintenance
// =============================================================================

/// Plan items that are coming due or overdue.
pub async fn maintenance(ctx: &Context<'_>, json: bool, out: &mut dyn Write) -> AppResult<()> {
    let snapshot = snapshot(ctx, chrono::Local::now().date_naive()).await?;
    let overdue = snapshot.maintenance.iter().filter(|status| status.is_overdue()).count();
    info!(due = snapshot.maintenance.len(), overdue, odometer = snapshot.current_odometer, "maintenance");

    if json {
        return write_json(out, &snapshot.maintenance);
    }

    if snapshot.maintenance.is_empty() {
        writeln!(out, "Nothing due at {}", ctx.format.km(snapshot.current_odometer))?;
        return Ok(());
    }

    write_maintenance(out, ctx.format, &snapshot.maintenance)
}

fn write_maintenance(out: &mut dyn Write, f: &MoneyFormat, due: &[MaintenanceStatus]) -> AppResult<()> {
    for status in due {
        let remaining = match status.remaining() {
            Remaining::Km(km) => format!("{} left", f.km(km)),
            Remaining::Overdue(km) if km == 0.0 => "due now".to_string(),
            Remaining::Overdue(km) => format!("{} overdue", f.km(km)),
        };
        writeln!(
            out,
            "{:<8} {:<20} {:>7}  due at {} ({})",
            format!("[{}]", status.tier.as_str()),
            status.item.name,
            f.percent(status.progress_percent),
            f.km(status.next_due_km),
            remaining
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{day, output, sample_state, seeded_store};
    use motocash_core::AppState;

    #[test]
    fn test_reference_date_parsing() {
        assert_eq!(reference_date(Some("2026-03-15")).unwrap(), day(2026, 3, 15));
        assert!(matches!(
            reference_date(Some("15/03/2026")),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_dashboard_text() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        dashboard(&ctx, day(2026, 3, 20), false, &mut buf).await.unwrap();
        let text = output(buf);

        assert!(text.contains("MotoCash · 2026-03"));
        assert!(text.contains("R$ 284,00"));
        assert!(text.contains("R$ 42,50"));
        assert!(text.contains("(28,4%)"));
        assert!(text.contains("25,0 km/L"));
        assert!(text.contains("[OK]"));
        assert!(text.contains("Oil change"));
    }

    #[tokio::test]
    async fn test_dashboard_json_is_the_snapshot() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        dashboard(&ctx, day(2026, 3, 20), true, &mut buf).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();

        assert_eq!(value["profit"]["netProfit"], 284.0);
        assert_eq!(value["currentOdometer"], 250.0);
        assert_eq!(value["maintenance"][0]["tier"], "OK");
    }

    #[tokio::test]
    async fn test_dashboard_on_empty_store() {
        let (_dir, store) = seeded_store(&AppState::default()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        dashboard(&ctx, day(2026, 3, 20), false, &mut buf).await.unwrap();
        let text = output(buf);

        assert!(text.contains("not set"));
        assert!(text.contains("not enough fill-ups"));
        assert!(!text.contains("Maintenance"));
    }

    #[tokio::test]
    async fn test_history_newest_first_with_limit() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        history(&ctx, Some(1), true, &mut buf).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();

        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["recordId"], 2);
        assert_eq!(entries[0]["kmPerLiter"], 25.0);
    }

    #[tokio::test]
    async fn test_history_text_marks_missing_figures() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        history(&ctx, None, false, &mut buf).await.unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2026-03-03"));
        assert!(lines[1].contains("R$ 42,50/h"));
    }

    #[tokio::test]
    async fn test_maintenance_overdue_and_due_now() {
        let mut state = sample_state();
        state
            .add_maintenance_item(motocash_core::MaintenanceItem {
                id: 8,
                name: "Chain".to_string(),
                last_km: 50.0,
                interval: 200.0,
            })
            .unwrap();
        state.settings.maintenance_plan[0].interval = 200.0;
        let (_dir, store) = seeded_store(&state).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        maintenance(&ctx, false, &mut buf).await.unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();

        // oil: 250 of 200 km, chain: exactly 200 of 200 km
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Oil change") && lines[0].ends_with("(50,0 km overdue)"));
        assert!(lines[1].contains("Chain") && lines[1].ends_with("(due now)"));
        assert!(lines.iter().all(|line| line.starts_with("[DANGER]")));
    }

    #[tokio::test]
    async fn test_maintenance_nothing_due() {
        let mut state = sample_state();
        state.mark_serviced(7, None).unwrap();
        let (_dir, store) = seeded_store(&state).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        maintenance(&ctx, false, &mut buf).await.unwrap();
        assert_eq!(output(buf).trim(), "Nothing due at 250,0 km");
    }
}
