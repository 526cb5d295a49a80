//! Saved prompt library.

use super::helpers::{from_millis, now_millis, to_millis};
use crate::validation::validate_prompt_text;
use crate::wire::{CreatePromptReq, ListPromptsQuery, Prompt, UpdatePromptReq};
use crate::{PromptDeskError, PromptDeskResult, RecordId};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

const PROMPT_COLUMNS: &str = "id, title, content, description, is_favorite, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct PromptRow {
    id: String,
    title: String,
    content: String,
    description: Option<String>,
    is_favorite: bool,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<PromptRow> for Prompt {
    type Error = PromptDeskError;

    fn try_from(row: PromptRow) -> PromptDeskResult<Self> {
        Ok(Prompt {
            id: RecordId::parse(&row.id)?,
            title: row.title,
            content: row.content,
            description: row.description,
            is_favorite: row.is_favorite,
            created_at: from_millis(row.created_at)?,
            updated_at: from_millis(row.updated_at)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PromptService {
    pool: SqlitePool,
}

impl PromptService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Prompts, most recently updated first, optionally narrowed to favourites and/or a
    /// case-insensitive search over title, content and description.
    pub async fn list(&self, query: &ListPromptsQuery) -> PromptDeskResult<Vec<Prompt>> {
        let favorites_only = query.favorites.unwrap_or(false);
        let sql = format!(
            "SELECT {PROMPT_COLUMNS} FROM prompts WHERE (? = 0 OR is_favorite = 1) \
             ORDER BY updated_at DESC, id"
        );
        let rows: Vec<PromptRow> = sqlx::query_as(&sql)
            .bind(favorites_only)
            .fetch_all(&self.pool)
            .await?;

        let prompts = rows
            .into_iter()
            .map(Prompt::try_from)
            .collect::<PromptDeskResult<Vec<_>>>()?;

        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(match needle {
            Some(needle) => prompts
                .into_iter()
                .filter(|p| matches_search(p, &needle))
                .collect(),
            None => prompts,
        })
    }

    pub async fn get(&self, id: RecordId) -> PromptDeskResult<Prompt> {
        fetch_prompt(&self.pool, id).await
    }

    pub async fn create(&self, req: CreatePromptReq) -> PromptDeskResult<Prompt> {
        validate_prompt_text(&req.title, &req.content)?;

        let id = RecordId::new();
        let now = now_millis();
        let prompt = Prompt {
            id,
            title: req.title,
            content: req.content,
            description: req.description,
            is_favorite: req.is_favorite,
            created_at: from_millis(now)?,
            updated_at: from_millis(now)?,
        };

        let mut conn = self.pool.acquire().await?;
        let stored = insert_prompt(&mut conn, &prompt).await?;
        info!(prompt_id = %id, "created prompt");
        Ok(stored)
    }

    /// Apply a partial update. The merged prompt must still have a title and content.
    pub async fn update(&self, id: RecordId, req: UpdatePromptReq) -> PromptDeskResult<Prompt> {
        let mut prompt = fetch_prompt(&self.pool, id).await?;

        if let Some(title) = req.title {
            prompt.title = title;
        }
        if let Some(content) = req.content {
            prompt.content = content;
        }
        if let Some(description) = req.description {
            prompt.description = Some(description);
        }
        if let Some(is_favorite) = req.is_favorite {
            prompt.is_favorite = is_favorite;
        }
        validate_prompt_text(&prompt.title, &prompt.content)?;

        let sql = format!(
            "UPDATE prompts SET title = ?, content = ?, description = ?, is_favorite = ?, updated_at = ? \
             WHERE id = ? RETURNING {PROMPT_COLUMNS}"
        );
        let row: Option<PromptRow> = sqlx::query_as(&sql)
            .bind(&prompt.title)
            .bind(&prompt.content)
            .bind(&prompt.description)
            .bind(prompt.is_favorite)
            .bind(now_millis())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        // Deleted between the read and the write.
        row.ok_or_else(|| PromptDeskError::not_found("prompt", id))?
            .try_into()
    }

    pub async fn toggle_favorite(&self, id: RecordId) -> PromptDeskResult<Prompt> {
        let sql = format!(
            "UPDATE prompts SET is_favorite = 1 - is_favorite, updated_at = ? \
             WHERE id = ? RETURNING {PROMPT_COLUMNS}"
        );
        let row: Option<PromptRow> = sqlx::query_as(&sql)
            .bind(now_millis())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| PromptDeskError::not_found("prompt", id))?
            .try_into()
    }

    pub async fn delete(&self, id: RecordId) -> PromptDeskResult<()> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PromptDeskError::not_found("prompt", id));
        }

        info!(prompt_id = %id, "deleted prompt");
        Ok(())
    }
}

fn matches_search(prompt: &Prompt, needle: &str) -> bool {
    prompt.title.to_lowercase().contains(needle)
        || prompt.content.to_lowercase().contains(needle)
        || prompt
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

async fn fetch_prompt(pool: &SqlitePool, id: RecordId) -> PromptDeskResult<Prompt> {
    let sql = format!("SELECT {PROMPT_COLUMNS} FROM prompts WHERE id = ?");
    let row: Option<PromptRow> = sqlx::query_as(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| PromptDeskError::not_found("prompt", id))?
        .try_into()
}

/// Insert or replace a prompt with the timestamps it carries.
pub(crate) async fn insert_prompt(
    conn: &mut SqliteConnection,
    prompt: &Prompt,
) -> PromptDeskResult<Prompt> {
    let sql = format!(
        "INSERT INTO prompts ({PROMPT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
             title = excluded.title, \
             content = excluded.content, \
             description = excluded.description, \
             is_favorite = excluded.is_favorite, \
             created_at = excluded.created_at, \
             updated_at = excluded.updated_at \
         RETURNING {PROMPT_COLUMNS}"
    );
    let row: PromptRow = sqlx::query_as(&sql)
        .bind(prompt.id.to_string())
        .bind(&prompt.title)
        .bind(&prompt.content)
        .bind(&prompt.description)
        .bind(prompt.is_favorite)
        .bind(to_millis(prompt.created_at))
        .bind(to_millis(prompt.updated_at))
        .fetch_one(&mut *conn)
        .await?;

    row.try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_pool;

    fn req(title: &str, content: &str) -> CreatePromptReq {
        CreatePromptReq {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_dir, pool) = temp_pool().await;
        let service = PromptService::new(pool);

        let created = service
            .create(CreatePromptReq {
                description: Some("desc".into()),
                is_favorite: true,
                ..req("Code Review", "Review this")
            })
            .await
            .unwrap();

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.is_favorite);
        assert_eq!(fetched.description.as_deref(), Some("desc"));
    }

    #[tokio::test]
    async fn test_create_requires_title_and_content() {
        let (_dir, pool) = temp_pool().await;
        let service = PromptService::new(pool);

        let err = service.create(req("", "body")).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert!(service
            .list(&ListPromptsQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_long_title_is_stored_in_full() {
        let (_dir, pool) = temp_pool().await;
        let service = PromptService::new(pool);
        let title = "x".repeat(201);

        let created = service.create(req(&title, "body")).await.unwrap();
        assert_eq!(created.title, title);

        let longer = "y".repeat(1_000);
        let updated = service
            .update(
                created.id,
                UpdatePromptReq {
                    title: Some(longer.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(service.get(updated.id).await.unwrap().title, longer);
    }

    #[tokio::test]
    async fn test_list_filters_favorites_and_search() {
        let (_dir, pool) = temp_pool().await;
        let service = PromptService::new(pool);
        service.create(req("Code Review", "Review code")).await.unwrap();
        let fav = service.create(req("Email Writer", "Write an email")).await.unwrap();
        service.toggle_favorite(fav.id).await.unwrap();

        let favorites = service
            .list(&ListPromptsQuery {
                favorites: Some(true),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, fav.id);

        let found = service
            .list(&ListPromptsQuery {
                favorites: None,
                search: Some("REVIEW".into()),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Code Review");
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let (_dir, pool) = temp_pool().await;
        let service = PromptService::new(pool);
        let created = service.create(req("Title", "Body")).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdatePromptReq {
                    content: Some("New body".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "New body");
        assert_eq!(updated.created_at, created.created_at);

        let err = service
            .update(
                created.id,
                UpdatePromptReq {
                    title: Some(" ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_toggle_favorite_flips_flag() {
        let (_dir, pool) = temp_pool().await;
        let service = PromptService::new(pool);
        let created = service.create(req("Title", "Body")).await.unwrap();

        assert!(service.toggle_favorite(created.id).await.unwrap().is_favorite);
        assert!(!service.toggle_favorite(created.id).await.unwrap().is_favorite);
    }

    #[tokio::test]
    async fn test_missing_prompt_is_not_found() {
        let (_dir, pool) = temp_pool().await;
        let service = PromptService::new(pool);
        let id = RecordId::new();

        assert!(service.get(id).await.unwrap_err().is_not_found());
        assert!(service.delete(id).await.unwrap_err().is_not_found());
        assert!(service.toggle_favorite(id).await.unwrap_err().is_not_found());
        assert!(service
            .update(id, UpdatePromptReq::default())
            .await
            .unwrap_err()
            .is_not_found());
    }
}
