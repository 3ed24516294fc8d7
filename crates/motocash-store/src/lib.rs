//! # motocash-store: Persistence Layer for MotoCash
//!
//! Loads and saves the application document ([`AppState`]). The derivation
//! core never calls this crate; the application loads, lets the core
//! mutate and derive, then saves.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MotoCash Data Flow                               │
//! │                                                                         │
//! │  CLI command (dashboard, import, reconcile --fix, ...)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                motocash-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │            dyn StateStore { load(), save(&state) }              │   │
//! │  │                 │                          │                    │   │
//! │  │   ┌─────────────▼─────────┐    ┌───────────▼────────────┐      │   │
//! │  │   │   StateRepository     │    │    JsonFileStore       │      │   │
//! │  │   │   (SQLite, pool.rs)   │    │    (backup.rs)         │      │   │
//! │  │   │   app_state table     │    │    one JSON document   │      │   │
//! │  │   └───────────────────────┘    └────────────────────────┘      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - The `app_state` repository
//! - [`backup`] - JSON document files, export and import
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use motocash_store::{Database, StateStore, StoreConfig};
//!
//! let db = Database::new(StoreConfig::new("motocash.db")).await?;
//! let store = db.state();
//!
//! let mut state = store.load().await?;
//! state.set_monthly_goal(Money::from_cents(300_000))?;
//! store.save(&state).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::{export_document, import_document, parse_document, JsonFileStore};
pub use error::{StoreError, StoreResult};
pub use pool::{Database, StoreConfig};
pub use repository::state::StateRepository;

use async_trait::async_trait;
use motocash_core::AppState;

// =============================================================================
// State Store Trait
// =============================================================================

/// Something that can load and store the whole application document.
///
/// Both backends implement it so the application picks one from
/// configuration and stays backend-agnostic.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the document; a backend with nothing saved yet returns
    /// `AppState::default()`.
    async fn load(&self) -> StoreResult<AppState>;

    /// Replaces the stored document.
    async fn save(&self, state: &AppState) -> StoreResult<()>;
}

#[async_trait]
impl StateStore for StateRepository {
    async fn load(&self) -> StoreResult<AppState> {
        StateRepository::load(self).await
    }

    async fn save(&self, state: &AppState) -> StoreResult<()> {
        StateRepository::save(self, state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use motocash_core::Record;

    async fn round_trip(store: &dyn StateStore) -> AppState {
        let mut state = AppState::default();
        state
            .insert_record(Record::new(1, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), 0.0, 42.0))
            .unwrap();
        store.save(&state).await.unwrap();
        store.load().await.unwrap()
    }

    #[tokio::test]
    async fn test_backends_are_interchangeable() {
        let db = Database::new(StoreConfig::in_memory()).await.unwrap();
        let sqlite = round_trip(&db.state()).await;

        let dir = tempfile::tempdir().unwrap();
        let json = round_trip(&JsonFileStore::new(dir.path().join("state.json"))).await;

        assert_eq!(sqlite, json);
        assert_eq!(sqlite.records[0].km_final, 42.0);
    }
}
