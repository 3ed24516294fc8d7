//! # Settings Commands
//!
//! Monthly goal, fixed expenses, the maintenance plan and the category
//! lists. Every handler loads the document, applies one [`AppState`] method
//! and saves; a rejected change leaves the stored document untouched.
//!
//! [`AppState`]: motocash_core::AppState

use motocash_core::{CategoryKind, FixedExpense, MaintenanceItem};
use std::io::Write;
use tracing::info;

use super::{parse_amount, Context};
use crate::error::{AppError, AppResult};

/// Millisecond ids like records get, bumped past the highest existing one.
fn next_id(existing: impl Iterator<Item = i64>, now_millis: i64) -> i64 {
    existing
        .max()
        .map_or(now_millis, |max| now_millis.max(max.saturating_add(1)))
}

fn category_kind(text: &str) -> AppResult<CategoryKind> {
    text.parse()
        .map_err(|err: motocash_core::ValidationError| AppError::InvalidArgument(err.to_string()))
}

// =============================================================================
// goal
// =============================================================================

pub async fn goal(ctx: &Context<'_>, amount: &str, out: &mut dyn Write) -> AppResult<()> {
    let amount = parse_amount(amount)?;
    let mut state = ctx.store.load().await?;
    state.set_monthly_goal(amount)?;
    ctx.store.save(&state).await?;

    info!(goal = %amount, "Monthly goal set");
    if amount.is_zero() {
        writeln!(out, "Monthly goal cleared")?;
    } else {
        writeln!(out, "Monthly goal set to {}", ctx.format.money(amount))?;
    }
    Ok(())
}

// =============================================================================
// fixed add | rm
// =============================================================================

pub async fn add_fixed(
    ctx: &Context<'_>,
    name: &str,
    amount: &str,
    now_millis: i64,
    out: &mut dyn Write,
) -> AppResult<()> {
    let amount = parse_amount(amount)?;
    let mut state = ctx.store.load().await?;
    let id = next_id(state.settings.fixed_expenses.iter().map(|e| e.id), now_millis);
    state.add_fixed_expense(FixedExpense {
        id,
        name: name.trim().to_string(),
        amount,
    })?;
    ctx.store.save(&state).await?;

    info!(id, "Fixed expense added");
    writeln!(out, "Added fixed expense {}: {} {}/month", id, name.trim(), ctx.format.money(amount))?;
    Ok(())
}

pub async fn remove_fixed(ctx: &Context<'_>, id: i64, out: &mut dyn Write) -> AppResult<()> {
    let mut state = ctx.store.load().await?;
    let removed = state.remove_fixed_expense(id)?;
    ctx.store.save(&state).await?;

    info!(id, "Fixed expense removed");
    writeln!(out, "Removed fixed expense {}", removed.name)?;
    Ok(())
}

// =============================================================================
// plan add | rm
// =============================================================================

/// Adds a plan item; `last_km` defaults to the current odometer.
pub async fn add_plan_item(
    ctx: &Context<'_>,
    name: &str,
    interval: f64,
    last_km: Option<f64>,
    now_millis: i64,
    out: &mut dyn Write,
) -> AppResult<()> {
    let mut state = ctx.store.load().await?;
    let item = MaintenanceItem {
        id: next_id(state.settings.maintenance_plan.iter().map(|i| i.id), now_millis),
        name: name.trim().to_string(),
        last_km: last_km.unwrap_or_else(|| state.current_odometer()),
        interval,
    };
    let message = format!(
        "Added maintenance item {}: {} every {}; next due at {}",
        item.id,
        item.name,
        ctx.format.km(item.interval),
        ctx.format.km(item.next_due_km())
    );
    let id = item.id;
    state.add_maintenance_item(item)?;
    ctx.store.save(&state).await?;

    info!(id, interval, "Maintenance item added");
    writeln!(out, "{}", message)?;
    Ok(())
}

pub async fn remove_plan_item(ctx: &Context<'_>, id: i64, out: &mut dyn Write) -> AppResult<()> {
    let mut state = ctx.store.load().await?;
    let removed = state.remove_maintenance_item(id)?;
    ctx.store.save(&state).await?;

    info!(id, "Maintenance item removed");
    writeln!(out, "Removed maintenance item {}", removed.name)?;
    Ok(())
}

// =============================================================================
// category add | rm
// =============================================================================

pub async fn add_category(ctx: &Context<'_>, kind: &str, name: &str, out: &mut dyn Write) -> AppResult<()> {
    let kind = category_kind(kind)?;
    let mut state = ctx.store.load().await?;
    state.add_category(kind, name)?;
    ctx.store.save(&state).await?;

    info!(%kind, name = name.trim(), "Category added");
    writeln!(out, "Added {} category '{}'", kind, name.trim())?;
    Ok(())
}

/// Removes a category from its list; records already using it keep it.
pub async fn remove_category(ctx: &Context<'_>, kind: &str, name: &str, out: &mut dyn Write) -> AppResult<()> {
    let kind = category_kind(kind)?;
    let mut state = ctx.store.load().await?;
    state.remove_category(kind, name)?;
    ctx.store.save(&state).await?;

    info!(%kind, name = name.trim(), "Category removed");
    writeln!(out, "Removed {} category '{}'", kind, name.trim())?;
    Ok(())
}
