//! # Record Commands
//!
//! `record add`, `record edit` and `record rm`: the day form on the command
//! line.
//!
//! ## Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  motocash record add --km-end 15320 --income Uber=120,50 --fuel 5@5,899│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse lines (CATEGORY=AMOUNT, LITERS@PRICE) ── bad text ──► exit 2    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.load()                                                          │
//! │       │  km start defaults to the current odometer                     │
//! │       │  id = next_record_id(now in ms)                                │
//! │       ▼                                                                 │
//! │  AppState::insert_record() ── validate_record fails ──► nothing saved  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.save()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveTime;
use motocash_core::{parse_clock_time, CoreError, LineItem, Record, RecordId};
use std::io::Write;
use tracing::{debug, info};

use super::metrics::reference_date;
use super::{parse_amount, parse_decimal, Context};
use crate::cli::RecordFields;
use crate::error::{AppError, AppResult};
use crate::format::MoneyFormat;

// =============================================================================
// Field Parsing
// =============================================================================

fn clock(text: Option<&str>) -> AppResult<Option<NaiveTime>> {
    match text {
        None => Ok(None),
        Some(text) => parse_clock_time(text)
            .map(Some)
            .ok_or_else(|| AppError::InvalidArgument(format!("time must be HH:MM, got '{}'", text))),
    }
}

/// `CATEGORY=AMOUNT`, split at the last `=`.
fn parse_line(text: &str) -> AppResult<LineItem> {
    let (category, amount) = text
        .rsplit_once('=')
        .ok_or_else(|| AppError::InvalidArgument(format!("expected CATEGORY=AMOUNT, got '{}'", text)))?;
    Ok(LineItem::new(category.trim(), parse_amount(amount)?))
}

/// `LITERS@PRICE`; the amount is liters times price.
fn parse_fuel(text: &str) -> AppResult<LineItem> {
    let (liters, price) = text
        .split_once('@')
        .ok_or_else(|| AppError::InvalidArgument(format!("expected LITERS@PRICE, got '{}'", text)))?;
    Ok(LineItem::fuel(
        parse_decimal(liters, "liters")?,
        parse_decimal(price, "price per liter")?,
    ))
}

fn income_lines(fields: &RecordFields) -> AppResult<Vec<LineItem>> {
    fields.income.iter().map(|text| parse_line(text)).collect()
}

/// Plain expense lines first, then fuel purchases.
fn expense_lines(fields: &RecordFields) -> AppResult<Vec<LineItem>> {
    let mut lines = fields
        .expense
        .iter()
        .map(|text| parse_line(text))
        .collect::<AppResult<Vec<_>>>()?;
    for text in &fields.fuel {
        lines.push(parse_fuel(text)?);
    }
    Ok(lines)
}

fn is_empty(fields: &RecordFields) -> bool {
    fields.date.is_none()
        && fields.km_start.is_none()
        && fields.km_end.is_none()
        && fields.start.is_none()
        && fields.end.is_none()
        && fields.income.is_empty()
        && fields.expense.is_empty()
        && fields.fuel.is_empty()
}

fn summary(f: &MoneyFormat, record: &Record) -> String {
    format!(
        "record {} on {}: {} driven, income {}, expenses {}, profit {}",
        record.id,
        record.date,
        f.km(record.distance()),
        f.money(record.total_income),
        f.money(record.total_expense),
        f.money(record.profit())
    )
}

// =============================================================================
// record add
// =============================================================================

/// Saves a new session. Its id comes from `now_millis`.
pub async fn add(ctx: &Context<'_>, fields: &RecordFields, now_millis: i64, out: &mut dyn Write) -> AppResult<()> {
    let km_end = fields
        .km_end
        .ok_or_else(|| AppError::InvalidArgument("--km-end is required for a new record".to_string()))?;
    let date = reference_date(fields.date.as_deref())?;
    let times = (clock(fields.start.as_deref())?, clock(fields.end.as_deref())?);
    let incomes = income_lines(fields)?;
    let expenses = expense_lines(fields)?;

    let mut state = ctx.store.load().await?;
    let km_start = fields.km_start.unwrap_or_else(|| state.current_odometer());
    let mut record = Record::new(state.next_record_id(now_millis), date, km_start, km_end).with_times(times.0, times.1);
    for item in incomes {
        record = record.with_income(item);
    }
    for item in expenses {
        record = record.with_expense(item);
    }

    let line = summary(ctx.format, &record);
    let id = record.id;
    state.insert_record(record)?;
    ctx.store.save(&state).await?;

    info!(id, %date, "Record added");
    writeln!(out, "Saved {}", line)?;
    Ok(())
}

// =============================================================================
// record edit
// =============================================================================

/// Applies the given fields to an existing session.
///
/// Income options replace every income line; expense or fuel options
/// replace every expense line. The totals of a replaced side are rebuilt
/// from its new lines.
pub async fn edit(ctx: &Context<'_>, id: RecordId, fields: &RecordFields, out: &mut dyn Write) -> AppResult<()> {
    if is_empty(fields) {
        return Err(AppError::InvalidArgument("nothing to change".to_string()));
    }

    let mut state = ctx.store.load().await?;
    let mut record = state.record(id).cloned().ok_or(CoreError::RecordNotFound(id))?;

    if fields.date.is_some() {
        record.date = reference_date(fields.date.as_deref())?;
    }
    if let Some(km) = fields.km_start {
        record.km_initial = km;
    }
    if let Some(km) = fields.km_end {
        record.km_final = km;
    }
    if fields.start.is_some() {
        record.time_start = clock(fields.start.as_deref())?;
    }
    if fields.end.is_some() {
        record.time_end = clock(fields.end.as_deref())?;
    }

    if !fields.income.is_empty() {
        record.incomes = income_lines(fields)?;
        record.total_income = record.computed_totals().0;
    }
    if !fields.expense.is_empty() || !fields.fuel.is_empty() {
        record.expenses = expense_lines(fields)?;
        record.total_expense = record.computed_totals().1;
    }

    let line = summary(ctx.format, &record);
    let previous = state.replace_record(record)?;
    ctx.store.save(&state).await?;

    debug!(id, previous_date = %previous.date, "Record replaced");
    info!(id, "Record updated");
    writeln!(out, "Updated {}", line)?;
    Ok(())
}

// =============================================================================
// record rm
// =============================================================================

pub async fn remove(ctx: &Context<'_>, id: RecordId, out: &mut dyn Write) -> AppResult<()> {
    let mut state = ctx.store.load().await?;
    let removed = state.remove_record(id)?;
    ctx.store.save(&state).await?;

    info!(id, "Record removed");
    writeln!(out, "Removed record {} ({})", removed.id, removed.date)?;
    Ok(())
}
