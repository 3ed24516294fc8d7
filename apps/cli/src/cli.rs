//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// MotoCash: earnings, fuel efficiency and maintenance for delivery riders
#[derive(Debug, Parser)]
#[command(
    name = "motocash",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track earnings, fuel efficiency and maintenance for gig-economy riders",
    long_about = None
)]
pub struct Cli {
    /// Use this config file instead of the platform default
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Current month: profit, hourly rate, goal, fuel and maintenance
    Dashboard {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long = "date")]
        date: Option<String>,

        /// Print the full metrics snapshot as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Work sessions, newest first
    History {
        /// Show at most this many sessions
        #[arg(long = "limit")]
        limit: Option<usize>,

        #[arg(long = "json")]
        json: bool,
    },

    /// Maintenance items that are coming due or overdue
    Maintenance {
        #[arg(long = "json")]
        json: bool,
    },

    /// Report for a period: all, YYYY, YYYY-MM or YYYY-MM-DD..YYYY-MM-DD
    Report {
        period: String,

        #[arg(long = "json")]
        json: bool,
    },

    /// Check stored record totals against their line items
    Reconcile {
        #[arg(long = "fix", help = "Rewrite drifted totals and save")]
        fix: bool,
    },

    /// Record a service for a maintenance plan item
    Service {
        /// Maintenance item id
        id: i64,

        /// Odometer reading at the service; defaults to the current odometer
        #[arg(long = "km")]
        km: Option<f64>,
    },

    /// Add, edit or delete a work session
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Set the monthly net-profit goal; 0 turns goal tracking off
    Goal {
        /// Amount, e.g. 1500 or 1.500,00
        amount: String,
    },

    /// Recurring monthly costs
    Fixed {
        #[command(subcommand)]
        action: FixedAction,
    },

    /// Maintenance plan items
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Income and expense category lists
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Replace the stored document with a JSON backup
    Import { file: PathBuf },

    /// Write the stored document to a JSON backup
    Export { file: PathBuf },

    /// Show the effective configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration as TOML")]
        print: bool,
    },
}

// =============================================================================
// Nested Actions
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum RecordAction {
    /// Save a new work session
    Add(RecordFields),

    /// Change fields of an existing session; line options replace that side's lines
    Edit {
        id: i64,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Delete a session
    Rm { id: i64 },
}

/// Fields of a work session as typed on the command line.
#[derive(Debug, Default, Clone, Args)]
pub struct RecordFields {
    /// Session day (YYYY-MM-DD); defaults to today
    #[arg(long = "date")]
    pub date: Option<String>,

    /// Odometer at the start; defaults to the current odometer
    #[arg(long = "km-start")]
    pub km_start: Option<f64>,

    /// Odometer at the end; required for a new session
    #[arg(long = "km-end")]
    pub km_end: Option<f64>,

    /// Start time (HH:MM)
    #[arg(long = "start")]
    pub start: Option<String>,

    /// End time (HH:MM)
    #[arg(long = "end")]
    pub end: Option<String>,

    /// Income line, repeatable
    #[arg(long = "income", value_name = "CATEGORY=AMOUNT")]
    pub income: Vec<String>,

    /// Expense line, repeatable
    #[arg(long = "expense", value_name = "CATEGORY=AMOUNT")]
    pub expense: Vec<String>,

    /// Fuel purchase, repeatable
    #[arg(long = "fuel", value_name = "LITERS@PRICE")]
    pub fuel: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum FixedAction {
    /// Add a recurring monthly cost
    Add { name: String, amount: String },

    /// Remove a recurring monthly cost
    Rm { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum PlanAction {
    /// Add a maintenance plan item
    Add {
        name: String,

        /// Kilometres between services
        #[arg(long = "interval")]
        interval: f64,

        /// Odometer at the last service; defaults to the current odometer
        #[arg(long = "last-km")]
        last_km: Option<f64>,
    },

    /// Remove a maintenance plan item
    Rm { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// Add a category: income or expense, then the name
    Add { kind: String, name: String },

    /// Remove a category; existing records keep it
    Rm { kind: String, name: String },
}
