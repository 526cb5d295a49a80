//! Persisted application settings.
//!
//! Settings live in a single logical row (the newest by `created_at`). Every successful write
//! is published on the [`SettingsHub`] so running sessions see the change.

use super::helpers::{from_millis, now_millis};
use crate::settings_hub::SettingsHub;
use crate::validation::validate_settings;
use crate::wire::{Settings, SettingsPatch, SettingsRecord};
use crate::{PromptDeskError, PromptDeskResult, RecordId};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

#[derive(sqlx::FromRow)]
struct SettingsRow {
    id: String,
    data: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SettingsRow> for SettingsRecord {
    type Error = PromptDeskError;

    fn try_from(row: SettingsRow) -> PromptDeskResult<Self> {
        Ok(SettingsRecord {
            id: RecordId::parse(&row.id)?,
            settings: serde_json::from_str(&row.data).map_err(PromptDeskError::Deserialization)?,
            created_at: from_millis(row.created_at)?,
            updated_at: from_millis(row.updated_at)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct SettingsService {
    pool: SqlitePool,
    hub: SettingsHub,
}

impl SettingsService {
    pub fn new(pool: SqlitePool, hub: SettingsHub) -> Self {
        Self { pool, hub }
    }

    pub fn hub(&self) -> &SettingsHub {
        &self.hub
    }

    /// The stored settings, creating the default row on first access.
    pub async fn get(&self) -> PromptDeskResult<SettingsRecord> {
        let mut conn = self.pool.acquire().await?;
        if let Some(record) = fetch_latest(&mut conn).await? {
            return Ok(record);
        }
        drop(conn);

        let mut tx = self.pool.begin().await?;
        let record = ensure_latest(&mut tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Merge `patch` into the stored settings, validate, persist and publish.
    ///
    /// The read, merge and write run in one transaction whose first statement is a write, so
    /// concurrent updates queue on SQLite's write lock instead of overwriting each other.
    ///
    /// # Errors
    ///
    /// Returns `PromptDeskError::InvalidInput` when the merged settings are out of range; nothing
    /// is written or published in that case.
    pub async fn update(&self, patch: SettingsPatch) -> PromptDeskResult<SettingsRecord> {
        let mut tx = self.pool.begin().await?;
        let current = ensure_latest(&mut tx).await?;
        let mut settings = current.settings;
        patch.apply_to(&mut settings);
        validate_settings(&settings)?;

        let data = serde_json::to_string(&settings).map_err(PromptDeskError::Serialization)?;
        let row: SettingsRow = sqlx::query_as(
            "UPDATE settings SET data = ?, updated_at = ? WHERE id = ? \
             RETURNING id, data, created_at, updated_at",
        )
        .bind(data)
        .bind(now_millis())
        .bind(current.id.to_string())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        let record = SettingsRecord::try_from(row)?;
        self.hub.publish(record.settings.clone());
        info!(settings_id = %record.id, "updated settings");
        Ok(record)
    }
}

/// Write the default row if the table is empty, then read the newest row.
///
/// The conditional insert is a single statement, so it takes the write lock before it looks at
/// the table.
async fn ensure_latest(conn: &mut SqliteConnection) -> PromptDeskResult<SettingsRecord> {
    let data =
        serde_json::to_string(&Settings::default()).map_err(PromptDeskError::Serialization)?;
    let now = now_millis();
    let inserted = sqlx::query(
        "INSERT INTO settings (id, data, created_at, updated_at) \
         SELECT ?, ?, ?, ? WHERE NOT EXISTS (SELECT 1 FROM settings)",
    )
    .bind(RecordId::new().to_string())
    .bind(data)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    if inserted > 0 {
        debug!("no settings stored, wrote defaults");
    }

    fetch_latest(conn)
        .await?
        .ok_or_else(|| PromptDeskError::not_found("settings", "latest"))
}

pub(crate) async fn fetch_latest(
    conn: &mut SqliteConnection,
) -> PromptDeskResult<Option<SettingsRecord>> {
    let row: Option<SettingsRow> = sqlx::query_as(
        "SELECT id, data, created_at, updated_at FROM settings \
         ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .fetch_optional(&mut *conn)
    .await?;

    row.map(SettingsRecord::try_from).transpose()
}

pub(crate) async fn insert_settings(
    conn: &mut SqliteConnection,
    settings: &Settings,
) -> PromptDeskResult<SettingsRecord> {
    let data = serde_json::to_string(settings).map_err(PromptDeskError::Serialization)?;
    let now = now_millis();
    let row: SettingsRow = sqlx::query_as(
        "INSERT INTO settings (id, data, created_at, updated_at) VALUES (?, ?, ?, ?) \
         RETURNING id, data, created_at, updated_at",
    )
    .bind(RecordId::new().to_string())
    .bind(data)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    row.try_into()
}

/// Drop every stored settings row and write `settings` as the only one.
pub(crate) async fn replace_settings(
    conn: &mut SqliteConnection,
    settings: &Settings,
) -> PromptDeskResult<SettingsRecord> {
    sqlx::query("DELETE FROM settings")
        .execute(&mut *conn)
        .await?;
    insert_settings(conn, settings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_pool;

    #[tokio::test]
    async fn test_get_creates_defaults_once() {
        let (_dir, pool) = temp_pool().await;
        let service = SettingsService::new(pool.clone(), SettingsHub::default());

        let first = service.get().await.unwrap();
        let second = service.get().await.unwrap();

        assert_eq!(first.settings, Settings::default());
        assert_eq!(first.id, second.id);
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_reads_create_one_row() {
        let (_dir, pool) = temp_pool().await;
        let service = SettingsService::new(pool.clone(), SettingsHub::default());

        let (a, b, c) = tokio::join!(service.get(), service.get(), service.get());
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert_eq!(a.id, b.id);
        assert_eq!(b.id, c.id);
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_keep_both_patches() {
        let (_dir, pool) = temp_pool().await;
        let service = SettingsService::new(pool, SettingsHub::default());
        service.get().await.unwrap();

        let (first, second) = tokio::join!(
            service.update(SettingsPatch {
                font_size: Some(20),
                ..Default::default()
            }),
            service.update(SettingsPatch {
                tab_size: Some(4),
                ..Default::default()
            }),
        );
        first.unwrap();
        second.unwrap();

        let stored = service.get().await.unwrap().settings;
        assert_eq!(stored.font_size, 20);
        assert_eq!(stored.tab_size, 4);
    }

    #[tokio::test]
    async fn test_update_persists_and_publishes() {
        let (_dir, pool) = temp_pool().await;
        let hub = SettingsHub::default();
        let sub = hub.subscribe();
        let service = SettingsService::new(pool, hub);

        let updated = service
            .update(SettingsPatch {
                auto_save: Some(false),
                font_size: Some(18),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!updated.settings.auto_save);
        assert_eq!(updated.settings.font_size, 18);
        assert_eq!(service.get().await.unwrap().settings, updated.settings);
        assert!(!sub.auto_save_enabled());
    }

    #[tokio::test]
    async fn test_invalid_update_is_not_persisted_or_published() {
        let (_dir, pool) = temp_pool().await;
        let hub = SettingsHub::default();
        let service = SettingsService::new(pool, hub.clone());

        let err = service
            .update(SettingsPatch {
                auto_save: Some(false),
                font_size: Some(200),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(service.get().await.unwrap().settings, Settings::default());
        assert!(hub.current().auto_save);
    }
}
