//! # State Repository
//!
//! Stores the application document as three JSON sections.
//!
//! ## Save Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    save(&AppState)                                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPSERT app_state('records',    <records JSON>,    now)              │
//! │    UPSERT app_state('categories', <categories JSON>, now)              │
//! │    UPSERT app_state('settings',   <settings JSON>,   now)              │
//! │  COMMIT ← all three sections or none                                   │
//! │                                                                         │
//! │  load(): a missing section defaults, a malformed one is an error       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::de::DeserializeOwned;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use motocash_core::{AppState, Categories, Record, Settings};

/// Section keys of the `app_state` table.
pub const RECORDS_KEY: &str = "records";
pub const CATEGORIES_KEY: &str = "categories";
pub const SETTINGS_KEY: &str = "settings";

/// Repository for the persisted application document.
#[derive(Debug, Clone)]
pub struct StateRepository {
    pool: SqlitePool,
}

impl StateRepository {
    /// Creates a new StateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StateRepository { pool }
    }

    /// Loads the whole document.
    ///
    /// Sections that were never saved load as their defaults, so a fresh
    /// database yields `AppState::default()`.
    pub async fn load(&self) -> StoreResult<AppState> {
        let rows = sqlx::query("SELECT key, value FROM app_state")
            .fetch_all(&self.pool)
            .await?;

        let mut state = AppState::default();
        for row in rows {
            let key: String = row.try_get("key")?;
            let value: String = row.try_get("value")?;

            match key.as_str() {
                RECORDS_KEY => state.records = parse_section::<Vec<Record>>(&key, &value)?,
                CATEGORIES_KEY => state.categories = parse_section::<Categories>(&key, &value)?,
                SETTINGS_KEY => state.settings = parse_section::<Settings>(&key, &value)?,
                other => debug!(key = %other, "Ignoring unknown app_state key"),
            }
        }

        info!(records = state.records.len(), "Application state loaded");
        Ok(state)
    }

    /// Saves the whole document in one transaction.
    pub async fn save(&self, state: &AppState) -> StoreResult<()> {
        let sections = [
            (RECORDS_KEY, serde_json::to_string(&state.records)?),
            (CATEGORIES_KEY, serde_json::to_string(&state.categories)?),
            (SETTINGS_KEY, serde_json::to_string(&state.settings)?),
        ];
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        for (key, value) in &sections {
            sqlx::query(
                r#"
                INSERT INTO app_state (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(value.as_str())
            .bind(now.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(records = state.records.len(), "Application state saved");
        Ok(())
    }
}

fn parse_section<T: DeserializeOwned>(key: &str, value: &str) -> StoreResult<T> {
    serde_json::from_str(value).map_err(|e| StoreError::invalid_document(key, e))
}

// =============================================================================
// Unit Tests
// =============================================================================
