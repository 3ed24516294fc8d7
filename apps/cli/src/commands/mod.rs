//! # CLI Commands
//!
//! One handler per subcommand. Each loads the document from the configured
//! [`StateStore`], hands it to `motocash-core`, and prints the result.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Command Modules                                  │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐         │
//! │  │  metrics.rs     │  │  report.rs      │  │  data.rs        │         │
//! │  │                 │  │                 │  │                 │         │
//! │  │ • dashboard     │  │ • report        │  │ • service       │         │
//! │  │ • history       │  │ • reconcile     │  │ • import        │         │
//! │  │ • maintenance   │  │                 │  │ • export        │         │
//! │  │                 │  │                 │  │ • config        │         │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘         │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  records.rs     │  │  settings.rs    │                              │
//! │  │                 │  │                 │                              │
//! │  │ • record add    │  │ • goal          │                              │
//! │  │ • record edit   │  │ • fixed add|rm  │                              │
//! │  │ • record rm     │  │ • plan add|rm   │                              │
//! │  │                 │  │ • category      │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! │                                                                         │
//! │  read-only: metrics.rs, report (reconcile --fix saves)                 │
//! │  mutating:  load ──► AppState method ──► save                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output goes to the `out` writer so tests can capture it; logs go to
//! stderr through tracing.

pub mod data;
pub mod metrics;
pub mod records;
pub mod report;
pub mod settings;

use motocash_core::Money;
use motocash_store::StateStore;
use serde::Serialize;
use std::io::Write;

use crate::error::{AppError, AppResult};
use crate::format::MoneyFormat;

/// What every handler needs.
pub struct Context<'a> {
    pub store: &'a dyn StateStore,
    pub format: &'a MoneyFormat,
}

/// Pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Reads a decimal typed with `,` or `.` as the separator.
///
/// When both appear, the later one is the decimal separator and the other
/// groups thousands.
///
/// ## Example
/// ```text
/// "12,50"     → 12.5
/// "1.234,56"  → 1234.56
/// "1,234.56"  → 1234.56
/// ```
pub(crate) fn parse_decimal(text: &str, what: &str) -> AppResult<f64> {
    let trimmed = text.trim();
    let normalized = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => trimmed.replace(',', ""),
        (Some(_), None) => trimmed.replace(',', "."),
        _ => trimmed.to_string(),
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| AppError::InvalidArgument(format!("{} must be a number, got '{}'", what, text)))
}

/// [`parse_decimal`] rounded to the cent.
pub(crate) fn parse_amount(text: &str) -> AppResult<Money> {
    parse_decimal(text, "amount").map(Money::from_decimal)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_separators() {
        assert_eq!(parse_amount("12,50").unwrap().cents(), 1250);
        assert_eq!(parse_amount(" 12.50 ").unwrap().cents(), 1250);
        assert_eq!(parse_amount("1.234,56").unwrap().cents(), 123_456);
        assert_eq!(parse_amount("1,234.56").unwrap().cents(), 123_456);
        assert_eq!(parse_amount("80").unwrap().cents(), 8000);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(matches!(parse_decimal("abc", "liters"), Err(AppError::InvalidArgument(msg)) if msg.contains("liters")));
        assert!(parse_decimal("", "amount").is_err());
        assert!(parse_decimal("inf", "amount").is_err());
    }
}
