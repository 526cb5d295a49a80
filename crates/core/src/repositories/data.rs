//! Whole-database operations: export, import, clear and seed.

use super::drafts::{upsert_draft_with, DraftRepository};
use super::helpers::{from_millis, now_millis, to_millis};
use super::prompts::{insert_prompt, PromptService};
use super::settings::{replace_settings, SettingsService};
use crate::constants::EXPORT_BUNDLE_VERSION;
use crate::seed::sample_prompts;
use crate::settings_hub::SettingsHub;
use crate::validation::{validate_prompt_text, validate_settings, validate_unique_draft_ids};
use crate::wire::{
    DraftInput, ExportBundle, ExportFormat, ImportRes, ListPromptsQuery, Prompt, Settings,
};
use crate::{PromptDeskError, PromptDeskResult, RecordId};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct DataService {
    pool: SqlitePool,
    hub: SettingsHub,
}

impl DataService {
    pub fn new(pool: SqlitePool, hub: SettingsHub) -> Self {
        Self { pool, hub }
    }

    /// Snapshot every prompt, draft and the current settings.
    pub async fn bundle(&self) -> PromptDeskResult<ExportBundle> {
        let prompts = PromptService::new(self.pool.clone())
            .list(&ListPromptsQuery::default())
            .await?;
        let drafts = DraftRepository::new(self.pool.clone()).list().await?;
        let settings = SettingsService::new(self.pool.clone(), self.hub.clone())
            .get()
            .await?
            .settings;

        Ok(ExportBundle {
            version: EXPORT_BUNDLE_VERSION,
            exported_at: Utc::now(),
            prompts,
            drafts,
            settings: Some(settings),
        })
    }

    /// Render the bundle in `format`, or in the stored `exportFormat` when `None`.
    ///
    /// Returns the format actually used alongside the document.
    pub async fn export(
        &self,
        format: Option<ExportFormat>,
    ) -> PromptDeskResult<(ExportFormat, String)> {
        let bundle = self.bundle().await?;
        let format = format
            .or_else(|| bundle.settings.as_ref().map(|s| s.export_format))
            .unwrap_or_default();
        let body = render_bundle(&bundle, format)?;

        info!(
            ?format,
            prompts = bundle.prompts.len(),
            drafts = bundle.drafts.len(),
            "exported data"
        );
        Ok((format, body))
    }

    /// Write a bundle in one transaction.
    ///
    /// Prompts and drafts are upserted by id with the bundle's timestamps; settings replace the
    /// stored record when present. The bundle is validated up front, so a rejected import
    /// leaves the database untouched.
    pub async fn import(&self, bundle: ExportBundle) -> PromptDeskResult<ImportRes> {
        if bundle.version > EXPORT_BUNDLE_VERSION {
            return Err(PromptDeskError::InvalidInput(format!(
                "unsupported bundle version {}",
                bundle.version
            )));
        }
        for prompt in &bundle.prompts {
            validate_prompt_text(&prompt.title, &prompt.content)?;
        }
        let draft_inputs: Vec<DraftInput> = bundle.drafts.iter().map(DraftInput::from).collect();
        validate_unique_draft_ids(&draft_inputs)?;
        if let Some(settings) = &bundle.settings {
            validate_settings(settings)?;
        }

        let mut tx = self.pool.begin().await?;
        for prompt in &bundle.prompts {
            insert_prompt(&mut tx, prompt).await?;
        }
        for (input, draft) in draft_inputs.iter().zip(&bundle.drafts) {
            upsert_draft_with(
                &mut tx,
                input,
                to_millis(draft.created_at),
                to_millis(draft.updated_at),
                true,
            )
            .await?;
        }
        let settings = match &bundle.settings {
            Some(settings) => Some(replace_settings(&mut tx, settings).await?.settings),
            None => None,
        };
        tx.commit().await?;

        let res = ImportRes {
            prompts: bundle.prompts.len(),
            drafts: bundle.drafts.len(),
            settings: settings.is_some(),
        };
        if let Some(settings) = settings {
            self.hub.publish(settings);
        }

        info!(
            prompts = res.prompts,
            drafts = res.drafts,
            settings = res.settings,
            "imported data"
        );
        Ok(res)
    }

    /// Delete every prompt, draft and settings row.
    ///
    /// Subscribers are told the settings are back to their defaults.
    pub async fn clear_all(&self) -> PromptDeskResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM prompts").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM drafts").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM settings").execute(&mut *tx).await?;
        tx.commit().await?;

        self.hub.publish(Settings::default());
        warn!("cleared all data");
        Ok(())
    }

    /// Insert the sample prompt library.
    pub async fn seed(&self) -> PromptDeskResult<Vec<Prompt>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::new();
        for req in sample_prompts() {
            let now = from_millis(now_millis())?;
            let prompt = Prompt {
                id: RecordId::new(),
                title: req.title,
                content: req.content,
                description: req.description,
                is_favorite: req.is_favorite,
                created_at: now,
                updated_at: now,
            };
            created.push(insert_prompt(&mut tx, &prompt).await?);
        }
        tx.commit().await?;

        info!(count = created.len(), "seeded sample prompts");
        Ok(created)
    }
}

pub fn render_bundle(bundle: &ExportBundle, format: ExportFormat) -> PromptDeskResult<String> {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(bundle).map_err(PromptDeskError::Serialization)
        }
        ExportFormat::Yaml => {
            serde_yaml::to_string(bundle).map_err(PromptDeskError::YamlSerialization)
        }
    }
}

/// Parse an export document.
///
/// With no explicit format, JSON is tried first and YAML second.
pub fn parse_bundle(text: &str, format: Option<ExportFormat>) -> PromptDeskResult<ExportBundle> {
    match format {
        Some(ExportFormat::Json) => {
            serde_json::from_str(text).map_err(PromptDeskError::Deserialization)
        }
        Some(ExportFormat::Yaml) => {
            serde_yaml::from_str(text).map_err(PromptDeskError::YamlDeserialization)
        }
        None => match serde_json::from_str(text) {
            Ok(bundle) => Ok(bundle),
            Err(_) => serde_yaml::from_str(text).map_err(PromptDeskError::YamlDeserialization),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_pool;
    use crate::wire::{CreateDraftReq, CreatePromptReq, SettingsPatch};

    async fn populated(pool: &SqlitePool, hub: &SettingsHub) {
        PromptService::new(pool.clone())
            .create(CreatePromptReq {
                title: "Title".into(),
                content: "Body".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        DraftRepository::new(pool.clone())
            .create(CreateDraftReq {
                title: "Draft 1".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        SettingsService::new(pool.clone(), hub.clone())
            .update(SettingsPatch {
                export_format: Some(ExportFormat::Yaml),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_export_uses_stored_format_by_default() {
        let (_dir, pool) = temp_pool().await;
        let hub = SettingsHub::default();
        populated(&pool, &hub).await;
        let service = DataService::new(pool, hub);

        let (format, body) = service.export(None).await.unwrap();
        assert_eq!(format, ExportFormat::Yaml);
        let bundle = parse_bundle(&body, Some(ExportFormat::Yaml)).unwrap();
        assert_eq!(bundle.prompts.len(), 1);
        assert_eq!(bundle.drafts.len(), 1);

        let (format, body) = service.export(Some(ExportFormat::Json)).await.unwrap();
        assert_eq!(format, ExportFormat::Json);
        assert_eq!(parse_bundle(&body, None).unwrap().version, EXPORT_BUNDLE_VERSION);
    }

    #[tokio::test]
    async fn test_import_into_empty_database_preserves_records() {
        let (_src_dir, src_pool) = temp_pool().await;
        let src_hub = SettingsHub::default();
        populated(&src_pool, &src_hub).await;
        let bundle = DataService::new(src_pool, src_hub).bundle().await.unwrap();

        let (_dst_dir, dst_pool) = temp_pool().await;
        let hub = SettingsHub::default();
        let service = DataService::new(dst_pool.clone(), hub.clone());
        let res = service.import(bundle.clone()).await.unwrap();

        assert_eq!(
            res,
            ImportRes {
                prompts: 1,
                drafts: 1,
                settings: true
            }
        );
        let drafts = DraftRepository::new(dst_pool).list().await.unwrap();
        assert_eq!(drafts, bundle.drafts);
        assert_eq!(hub.current().export_format, ExportFormat::Yaml);
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_prompt_without_writing() {
        let (_dir, pool) = temp_pool().await;
        let service = DataService::new(pool.clone(), SettingsHub::default());
        let now = Utc::now();
        let bundle = ExportBundle {
            version: EXPORT_BUNDLE_VERSION,
            exported_at: now,
            prompts: vec![Prompt {
                id: RecordId::new(),
                title: String::new(),
                content: "Body".into(),
                description: None,
                is_favorite: false,
                created_at: now,
                updated_at: now,
            }],
            drafts: Vec::new(),
            settings: None,
        };

        assert!(service.import(bundle).await.unwrap_err().is_invalid_input());
        assert!(PromptService::new(pool)
            .list(&ListPromptsQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_empties_tables_and_publishes_defaults() {
        let (_dir, pool) = temp_pool().await;
        let hub = SettingsHub::default();
        populated(&pool, &hub).await;
        assert_eq!(hub.current().export_format, ExportFormat::Yaml);

        DataService::new(pool.clone(), hub.clone())
            .clear_all()
            .await
            .unwrap();

        assert!(DraftRepository::new(pool.clone()).list().await.unwrap().is_empty());
        assert_eq!(hub.current(), Settings::default());
        let settings = SettingsService::new(pool, hub).get().await.unwrap();
        assert_eq!(settings.settings, Settings::default());
    }

    #[tokio::test]
    async fn test_seed_inserts_sample_prompts() {
        let (_dir, pool) = temp_pool().await;
        let created = DataService::new(pool.clone(), SettingsHub::default())
            .seed()
            .await
            .unwrap();
        assert_eq!(created.len(), 8);

        let favorites = PromptService::new(pool)
            .list(&ListPromptsQuery {
                favorites: Some(true),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(favorites.len(), 4);
    }

    #[test]
    fn test_parse_bundle_rejects_garbage() {
        assert!(parse_bundle("not a bundle", None).is_err());
        assert!(parse_bundle("{}", Some(ExportFormat::Json)).is_err());
    }
}
