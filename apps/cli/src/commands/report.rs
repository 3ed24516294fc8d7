//! # Report Commands
//!
//! `report` summarizes a period; `reconcile` checks stored totals against
//! the line items of each record.
//!
//! ## Reconcile Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load ──► find_drift(records)                                          │
//! │              │                                                          │
//! │              ├── empty ──────────────► "All totals match"             │
//! │              │                                                          │
//! │              └── drifted records ──► print each                        │
//! │                        │                                                │
//! │                        └── --fix ──► repair_totals() ──► save          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use motocash_core::report::CategorySummary;
use motocash_core::{build_report, find_drift, ReportPeriod};
use std::io::Write;
use tracing::{debug, info, warn};

use super::{write_json, Context};
use crate::error::{AppError, AppResult};
use crate::format::MoneyFormat;

// =============================================================================
// report
// =============================================================================

/// Totals and category breakdowns for `period`.
pub async fn report(ctx: &Context<'_>, period: &str, json: bool, out: &mut dyn Write) -> AppResult<()> {
    let period: ReportPeriod = period
        .parse()
        .map_err(|e: motocash_core::ValidationError| AppError::InvalidArgument(e.to_string()))?;

    let state = ctx.store.load().await?;
    let report = build_report(&state.records, period);
    info!(period = %report.period, records = report.record_count, "report");

    if json {
        return write_json(out, &report);
    }

    let f = ctx.format;
    writeln!(out, "Report {} ({} sessions)", report.period, report.record_count)?;
    writeln!(out, "{:<18}{}", "Income", f.money(report.total_income))?;
    writeln!(out, "{:<18}{}", "Expenses", f.money(report.total_expense))?;
    writeln!(out, "{:<18}{}", "Profit", f.money(report.total_profit))?;
    writeln!(out, "{:<18}{}", "Distance", f.km(report.total_distance))?;
    writeln!(out, "{:<18}{}", "Hours worked", f.number(report.total_hours, 1))?;

    write_breakdown(out, f, "Income by category", &report.income_by_category)?;
    write_breakdown(out, f, "Expenses by category", &report.expense_by_category)?;

    if !report.daily_profit.is_empty() {
        writeln!(out)?;
        writeln!(out, "Daily profit")?;
        for day in &report.daily_profit {
            writeln!(out, "  {}  {:>14}", day.date, f.money(day.profit))?;
        }
    }

    Ok(())
}

fn write_breakdown(out: &mut dyn Write, f: &MoneyFormat, title: &str, rows: &[CategorySummary]) -> AppResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for row in rows {
        writeln!(
            out,
            "  {:<20} {:>14} {:>7}  ({}x)",
            row.category,
            f.money(row.total),
            f.percent(row.percentage),
            row.count
        )?;
    }
    Ok(())
}

// =============================================================================
// reconcile
// =============================================================================

/// Lists records whose stored totals differ from their line items.
///
/// With `fix`, rewrites the totals from the line items and saves.
pub async fn reconcile(ctx: &Context<'_>, fix: bool, out: &mut dyn Write) -> AppResult<()> {
    let mut state = ctx.store.load().await?;
    let drift = find_drift(&state.records);

    if drift.is_empty() {
        debug!(records = state.records.len(), "No totals drift");
        writeln!(out, "All totals match ({} records)", state.records.len())?;
        return Ok(());
    }

    let f = ctx.format;
    for d in &drift {
        warn!(record_id = d.record_id, delta = %d.profit_delta(), "Stored totals drifted");
        writeln!(
            out,
            "#{}  income {} -> {}  expense {} -> {}",
            d.record_id,
            f.money(d.stored_income),
            f.money(d.computed_income),
            f.money(d.stored_expense),
            f.money(d.computed_expense)
        )?;
    }

    if fix {
        let repaired = state.repair_totals();
        ctx.store.save(&state).await?;
        info!(repaired, "Repaired record totals");
        writeln!(out, "Repaired {} records", repaired)?;
    } else {
        writeln!(out, "{} records drifted; run with --fix to repair", drift.len())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, sample_state, seeded_store};
    use motocash_core::Money;

    #[tokio::test]
    async fn test_report_month_text() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        report(&ctx, "2026-03", false, &mut buf).await.unwrap();
        let text = output(buf);

        assert!(text.starts_with("Report 2026-03 (2 sessions)"));
        assert!(text.contains("R$ 284,00"));
        assert!(text.contains("250,0 km"));
        assert!(text.contains("Uber"));
        assert!(text.contains("Fuel"));
    }

    #[tokio::test]
    async fn test_report_json_and_empty_year() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        report(&ctx, "2025", true, &mut buf).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();

        assert_eq!(value["period"], "2025");
        assert_eq!(value["recordCount"], 0);
    }

    #[tokio::test]
    async fn test_report_rejects_bad_period() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let err = report(&ctx, "march", false, &mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_reconcile_reports_then_fixes() {
        let mut state = sample_state();
        state.records[0].total_income = Money::from_cents(1);
        let (_dir, store) = seeded_store(&state).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        reconcile(&ctx, false, &mut buf).await.unwrap();
        let text = output(buf);
        assert!(text.contains("#1  income R$ 0,01 -> R$ 200,00"));
        assert!(text.contains("run with --fix"));

        let unchanged = motocash_store::StateStore::load(&store).await.unwrap();
        assert_eq!(unchanged.records[0].total_income, Money::from_cents(1));

        let mut buf = Vec::new();
        reconcile(&ctx, true, &mut buf).await.unwrap();
        assert!(output(buf).contains("Repaired 1 records"));

        let mut buf = Vec::new();
        reconcile(&ctx, false, &mut buf).await.unwrap();
        assert_eq!(output(buf).trim(), "All totals match (2 records)");
    }
}
