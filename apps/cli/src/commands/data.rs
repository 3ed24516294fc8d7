//! # Data Commands
//!
//! Commands that change or move the stored document, plus `config`.
//!
//! ## Backup Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  motocash export backup.json                                           │
//! │       store.load() ──► export_document(path) ──► backup.json           │
//! │                                                                         │
//! │  motocash import backup.json                                           │
//! │       import_document(path) ──► store.save() (replaces everything)     │
//! │                                                                         │
//! │  A file without a "records" array is rejected before anything is      │
//! │  written.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use motocash_store::{export_document, import_document};
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::Context;
use crate::config::AppConfig;
use crate::error::AppResult;

/// Marks a maintenance item as serviced at `km`, or at the current odometer.
pub async fn service(ctx: &Context<'_>, id: i64, km: Option<f64>, out: &mut dyn Write) -> AppResult<()> {
    let mut state = ctx.store.load().await?;
    state.mark_serviced(id, km)?;
    ctx.store.save(&state).await?;

    let item = state.settings.maintenance_plan.iter().find(|item| item.id == id);
    if let Some(item) = item {
        info!(id, last_km = item.last_km, "Maintenance item serviced");
        writeln!(
            out,
            "{} serviced at {}; next due at {}",
            item.name,
            ctx.format.km(item.last_km),
            ctx.format.km(item.next_due_km())
        )?;
    }
    Ok(())
}

/// Replaces the stored document with the one in `file`.
pub async fn import(ctx: &Context<'_>, file: &Path, out: &mut dyn Write) -> AppResult<()> {
    let state = import_document(file).await?;
    ctx.store.save(&state).await?;
    writeln!(out, "Imported {} records from {}", state.records.len(), file.display())?;
    Ok(())
}

/// Writes the stored document to `file`.
pub async fn export(ctx: &Context<'_>, file: &Path, out: &mut dyn Write) -> AppResult<()> {
    let state = ctx.store.load().await?;
    export_document(file, &state).await?;
    writeln!(out, "Exported {} records to {}", state.records.len(), file.display())?;
    Ok(())
}

/// Shows where data lives, or the whole configuration as TOML.
pub fn config(config: &AppConfig, print: bool, out: &mut dyn Write) -> AppResult<()> {
    if print {
        write!(out, "{}", toml::to_string_pretty(config)?)?;
        return Ok(());
    }

    writeln!(out, "backend:  {}", config.storage.backend)?;
    writeln!(out, "data:     {}", config.data_path().display())?;
    writeln!(
        out,
        "currency: {} (decimal '{}')",
        config.display.currency_symbol, config.display.decimal_separator
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, sample_state, seeded_store};
    use crate::config::Backend;
    use crate::format::MoneyFormat;
    use motocash_core::{AppState, CoreError};
    use motocash_store::{JsonFileStore, StateStore};
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_service_defaults_to_current_odometer() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let mut buf = Vec::new();
        service(&ctx, 7, None, &mut buf).await.unwrap();
        assert_eq!(
            output(buf).trim(),
            "Oil change serviced at 250,0 km; next due at 550,0 km"
        );

        let saved = store.load().await.unwrap();
        assert_eq!(saved.settings.maintenance_plan[0].last_km, 250.0);
    }

    #[tokio::test]
    async fn test_service_unknown_item_saves_nothing() {
        let (_dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let ctx = Context { store: &store, format: &format };

        let err = service(&ctx, 99, Some(100.0), &mut Vec::new()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Core(CoreError::MaintenanceItemNotFound(99))
        ));
        assert_eq!(store.load().await.unwrap(), sample_state());
    }

    #[tokio::test]
    async fn test_export_then_import_into_empty_store() {
        let (dir, source) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let backup = dir.path().join("backup").join("motocash-backup.json");

        let mut buf = Vec::new();
        export(&Context { store: &source, format: &format }, &backup, &mut buf)
            .await
            .unwrap();
        assert!(output(buf).starts_with("Exported 2 records"));

        let target = JsonFileStore::new(dir.path().join("fresh.json"));
        assert_eq!(target.load().await.unwrap(), AppState::default());

        let mut buf = Vec::new();
        import(&Context { store: &target, format: &format }, &backup, &mut buf)
            .await
            .unwrap();
        assert!(output(buf).starts_with("Imported 2 records"));
        assert_eq!(target.load().await.unwrap(), sample_state());
    }

    #[tokio::test]
    async fn test_import_rejects_document_without_records() {
        let (dir, store) = seeded_store(&sample_state()).await;
        let format = MoneyFormat::default();
        let bogus = dir.path().join("bogus.json");
        std::fs::write(&bogus, r#"{"settings": {}}"#).unwrap();

        let result = import(&Context { store: &store, format: &format }, &bogus, &mut Vec::new()).await;
        assert!(result.is_err());
        assert_eq!(store.load().await.unwrap().records.len(), 2);
    }

    #[test]
    fn test_config_summary_and_print() {
        let mut config = AppConfig::default();
        config.storage.backend = Backend::Json;
        config.storage.path = Some(PathBuf::from("/data/motocash.json"));

        let mut buf = Vec::new();
        super::config(&config, false, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("backend:  json"));
        assert!(text.contains("/data/motocash.json"));

        let mut buf = Vec::new();
        super::config(&config, true, &mut buf).unwrap();
        assert!(output(buf).contains("[storage]"));
    }
}
