//! # motocash-core: Derived-Metrics Engine for MotoCash
//!
//! This crate holds everything MotoCash computes from a driver's work
//! sessions: fuel efficiency, monthly profitability and maintenance due
//! status. It is a set of pure functions over an owned [`AppState`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MotoCash Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (dashboard, CLI)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ MetricsSnapshot                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ motocash-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌────────────┐  │   │
//! │  │   │consumption │ │profitabil. │ │maintenance │ │  metrics   │  │   │
//! │  │   │  km/L      │ │ net, R$/h  │ │ due items  │ │  facade    │  │   │
//! │  │   └────────────┘ └────────────┘ └────────────┘ └────────────┘  │   │
//! │  │   ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌────────────┐  │   │
//! │  │   │   state    │ │   types    │ │   money    │ │ validation │  │   │
//! │  │   └────────────┘ └────────────┘ └────────────┘ └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ AppState (JSON document)               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              motocash-store (persistence layer)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records, line items, settings, maintenance plan
//! - [`money`] - Money type with integer cents
//! - [`state`] - The owned record store and its mutations
//! - [`consumption`] - Fuel efficiency from fill-up checkpoints
//! - [`profitability`] - Monthly profit, hours, goal progress
//! - [`maintenance`] - Due/overdue maintenance items
//! - [`history`] - Per-record rows for the history list
//! - [`report`] - Period reports for charts and document export
//! - [`reconcile`] - Drift detection for stored totals
//! - [`metrics`] - Facade producing one consistent snapshot
//! - [`validation`] - Record-entry rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use motocash_core::{derive_snapshot, AppState, LineItem, Money, Record};
//!
//! let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let mut state = AppState::default();
//! state
//!     .insert_record(
//!         Record::new(1, day, 0.0, 100.0)
//!             .with_income(LineItem::new("Uber", Money::from_cents(20_000)))
//!             .with_expense(LineItem::fuel(5.0, 6.0)),
//!     )
//!     .unwrap();
//!
//! let snapshot = derive_snapshot(&state, day);
//! assert_eq!(snapshot.profit.total_profit, Money::from_cents(17_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod consumption;
pub mod error;
pub mod history;
pub mod maintenance;
pub mod metrics;
pub mod money;
pub mod profitability;
pub mod reconcile;
pub mod report;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use consumption::{calculate_consumption, ConsumptionReport, ConsumptionSegment, FuelEvent};
pub use error::{CoreError, CoreResult, ValidationError};
pub use history::{history, HistoryEntry};
pub use maintenance::{current_odometer, due_maintenance, MaintenanceStatus, MaintenanceTier};
pub use metrics::{derive_snapshot, MetricsSnapshot};
pub use money::Money;
pub use profitability::{goal_progress, summarize_month, MonthKey, ProfitSummary};
pub use reconcile::{find_drift, TotalsDrift};
pub use report::{build_report, PeriodReport, ReportPeriod};
pub use state::{AppState, CategoryKind};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category name that marks an expense line as a fuel purchase.
pub const FUEL_CATEGORY: &str = "Fuel";

/// Fuel category name written by earlier versions of the app.
///
/// Documents exported before the category rename still carry it, so
/// both names are recognized when extracting fuel events.
pub const LEGACY_FUEL_CATEGORY: &str = "Combustível";

/// Default theme stored in settings (presentation only).
pub const DEFAULT_THEME: &str = "theme-dark";
