//! Wire records exchanged over the REST API and written to export bundles.
//!
//! Field names are camelCase on the wire (`createdAt`, `isFavorite`, ...). Timestamps are
//! RFC 3339 strings in UTC.

use chrono::{DateTime, Utc};
use promptdesk_uuid::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

// ============================================================================
// DRAFTS
// ============================================================================

/// A persisted draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A draft held in an editing session, with its transient dirty flag.
///
/// `hasChanges` is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftState {
    #[serde(flatten)]
    pub draft: Draft,
    pub has_changes: bool,
}

impl DraftState {
    pub fn clean(draft: Draft) -> Self {
        Self {
            draft,
            has_changes: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateDraftReq {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

/// One entry of a batch save. Timestamps sent by clients are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftInput {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

impl From<&Draft> for DraftInput {
    fn from(draft: &Draft) -> Self {
        Self {
            id: draft.id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            content: draft.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveDraftsReq {
    pub drafts: Vec<DraftInput>,
}

/// The editable fields of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DraftField {
    Title,
    Description,
    Content,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDraftFieldReq {
    pub field: DraftField,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveDraftReq {
    #[schema(value_type = Option<String>)]
    pub draft_id: Option<RecordId>,
}

/// Snapshot of a draft editing session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRes {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub drafts: Vec<DraftState>,
    #[schema(value_type = Option<String>)]
    pub active_draft_id: Option<RecordId>,
    pub has_any_changes: bool,
    pub last_auto_save: Option<DateTime<Utc>>,
}

// ============================================================================
// PROMPTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    #[schema(value_type = String)]
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Missing title/content deserialise to empty strings so the service can reject them with a
/// validation error rather than a body-parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptReq {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Partial prompt update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromptReq {
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPromptsQuery {
    /// Only return favourites when `true`
    pub favorites: Option<bool>,
    /// Case-insensitive substring match on title, content and description
    pub search: Option<String>,
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Application settings values. Missing keys take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: String,
    pub auto_save: bool,
    /// Editor auto-save debounce in milliseconds
    pub auto_save_interval: u32,
    pub default_category: String,
    pub export_format: ExportFormat,
    pub show_line_numbers: bool,
    pub font_size: u32,
    pub font_family: String,
    pub word_wrap: bool,
    pub line_height: f64,
    pub tab_size: u32,
    pub bracket_matching: bool,
    pub highlight_active_line: bool,
    pub show_invisibles: bool,
    pub copyable_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            auto_save: true,
            auto_save_interval: 2000,
            default_category: "general".into(),
            export_format: ExportFormat::Json,
            show_line_numbers: true,
            font_size: 14,
            font_family: r#"Monaco, Menlo, "Ubuntu Mono", monospace"#.into(),
            word_wrap: true,
            line_height: 1.5,
            tab_size: 2,
            bracket_matching: true,
            highlight_active_line: true,
            show_invisibles: false,
            copyable_command: "npm run dev".into(),
        }
    }
}

/// The stored settings row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[serde(flatten)]
    pub settings: Settings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial settings update. Unknown keys (including `id` and the timestamps) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme: Option<String>,
    pub auto_save: Option<bool>,
    pub auto_save_interval: Option<u32>,
    pub default_category: Option<String>,
    pub export_format: Option<ExportFormat>,
    pub show_line_numbers: Option<bool>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub word_wrap: Option<bool>,
    pub line_height: Option<f64>,
    pub tab_size: Option<u32>,
    pub bracket_matching: Option<bool>,
    pub highlight_active_line: Option<bool>,
    pub show_invisibles: Option<bool>,
    pub copyable_command: Option<String>,
}

impl SettingsPatch {
    /// Applies every present field onto `settings`.
    pub fn apply_to(self, settings: &mut Settings) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { settings.$field = v; })*
            };
        }
        merge!(
            theme,
            auto_save,
            auto_save_interval,
            default_category,
            export_format,
            show_line_numbers,
            font_size,
            font_family,
            word_wrap,
            line_height,
            tab_size,
            bracket_matching,
            highlight_active_line,
            show_invisibles,
            copyable_command,
        );
    }
}

// ============================================================================
// DATA MANAGEMENT
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Yaml => "application/yaml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Overrides the `exportFormat` setting
    pub format: Option<ExportFormat>,
}

/// Full backup of the application data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub drafts: Vec<Draft>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRes {
    pub prompts: usize,
    pub drafts: usize,
    pub settings: bool,
}
