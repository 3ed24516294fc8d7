//! # JSON Backups
//!
//! The application document as a single pretty-printed JSON file, used as
//! a backend of its own and for backup export / import.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Atomic Document Write                                │
//! │                                                                         │
//! │  AppState ──► serde_json::to_vec_pretty                                │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  write  motocash.json.tmp   (same directory as the target)             │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  rename motocash.json.tmp ──► motocash.json                            │
//! │                                                                         │
//! │  A crash mid-write leaves the previous file untouched.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::StateStore;
use motocash_core::AppState;

// =============================================================================
// Document Parsing
// =============================================================================

/// Parses a backup document.
///
/// The top level must be an object carrying a `records` array;
/// `categories` and `settings` default when absent, as do optional fields
/// inside them.
pub fn parse_document(text: &str) -> StoreResult<AppState> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let object = value
        .as_object()
        .ok_or_else(|| StoreError::invalid_document("document", "top level must be an object"))?;
    match object.get("records") {
        Some(serde_json::Value::Array(_)) => {}
        Some(_) => return Err(StoreError::invalid_document("records", "must be an array")),
        None => return Err(StoreError::invalid_document("records", "missing")),
    }

    for key in object.keys() {
        if !matches!(key.as_str(), "records" | "categories" | "settings") {
            warn!(key = %key, "Ignoring unknown top-level field in document");
        }
    }

    serde_json::from_value(value).map_err(|e| StoreError::invalid_document("document", e))
}

/// Writes the document to `path` through a temp file and a rename.
pub async fn export_document(path: &Path, state: &AppState) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(state)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    info!(path = %path.display(), records = state.records.len(), "Document exported");
    Ok(())
}

/// Reads and parses the document at `path`.
pub async fn import_document(path: &Path) -> StoreResult<AppState> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    let state = parse_document(&text)?;

    info!(path = %path.display(), records = state.records.len(), "Document imported");
    Ok(state)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// =============================================================================
// JSON File Store
// =============================================================================

/// [`StateStore`] backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    /// A missing file loads as the default document.
    async fn load(&self) -> StoreResult<AppState> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?
        {
            debug!(path = %self.path.display(), "No document yet, starting empty");
            return Ok(AppState::default());
        }
        import_document(&self.path).await
    }

    async fn save(&self, state: &AppState) -> StoreResult<()> {
        export_document(&self.path, state).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use motocash_core::{LineItem, Money, Record};

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        state
            .insert_record(
                Record::new(42, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(), 500.0, 640.0)
                    .with_income(LineItem::new("iFood", Money::from_cents(18_990)))
                    .with_expense(LineItem::fuel(4.0, 6.5)),
            )
            .unwrap();
        state
    }

    #[test]
    fn test_parse_document_with_defaults() {
        let state = parse_document(r#"{"records": []}"#).unwrap();
        assert_eq!(state, AppState::default());

        let state = parse_document(
            r#"{"records": [], "settings": {"fixedExpenses": [{"id": 1, "name": "Phone", "amount": 49.9}]}}"#,
        )
        .unwrap();
        assert_eq!(state.settings.fixed_expenses[0].amount.cents(), 4_990);
        assert!(state.settings.maintenance_plan.is_empty());
    }

    #[test]
    fn test_parse_document_rejects_wrong_shapes() {
        assert!(parse_document("[]").is_err());
        assert!(parse_document(r#"{"settings": {}}"#).is_err());
        assert!(parse_document(r#"{"records": {}}"#).is_err());
        assert!(parse_document("not json").is_err());
    }

    #[tokio::test]
    async fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup").join("motocash.json");
        let state = sample_state();

        export_document(&path, &state).await.unwrap();
        assert!(!temp_path(&path).exists());
        assert_eq!(import_document(&path).await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("motocash.json"));

        assert_eq!(store.load().await.unwrap(), AppState::default());

        let state = sample_state();
        store.save(&state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_import_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = import_document(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_temp_path_sits_next_to_target() {
        assert_eq!(temp_path(Path::new("/data/motocash.json")), PathBuf::from("/data/motocash.json.tmp"));
    }
}
