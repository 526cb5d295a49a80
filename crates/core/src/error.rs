/// Errors surfaced by core services.
///
/// The variants map onto the three failure classes callers react to differently:
/// a missing target, bad input rejected before touching the store, and store/transport failure.
#[derive(Debug, thiserror::Error)]
pub enum PromptDeskError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store error: {0}")]
    Transport(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("failed to serialize JSON: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize JSON: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("stored timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

impl PromptDeskError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<promptdesk_uuid::RecordIdError> for PromptDeskError {
    fn from(e: promptdesk_uuid::RecordIdError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

pub type PromptDeskResult<T> = std::result::Result<T, PromptDeskError>;
