//! Draft persistence.
//!
//! Drafts are plain rows keyed by a canonical [`RecordId`]. The interesting operation is the
//! batch upsert used by the editing session's save: every draft of the working set is written
//! inside one transaction, so a save either lands completely or not at all.

use super::helpers::{from_millis, now_millis};
use crate::store::DraftStore;
use crate::validation::validate_unique_draft_ids;
use crate::wire::{CreateDraftReq, Draft, DraftInput};
use crate::{PromptDeskError, PromptDeskResult, RecordId};
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

const DRAFT_COLUMNS: &str = "id, title, description, content, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct DraftRow {
    id: String,
    title: String,
    description: String,
    content: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<DraftRow> for Draft {
    type Error = PromptDeskError;

    fn try_from(row: DraftRow) -> PromptDeskResult<Self> {
        Ok(Draft {
            id: RecordId::parse(&row.id)?,
            title: row.title,
            description: row.description,
            content: row.content,
            created_at: from_millis(row.created_at)?,
            updated_at: from_millis(row.updated_at)?,
        })
    }
}

/// SQLite implementation of [`DraftStore`].
#[derive(Clone, Debug)]
pub struct DraftRepository {
    pool: SqlitePool,
}

impl DraftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> PromptDeskResult<Vec<Draft>> {
        let sql = format!(
            "SELECT {DRAFT_COLUMNS} FROM drafts ORDER BY updated_at DESC, created_at DESC, id"
        );
        let rows: Vec<DraftRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Draft::try_from).collect()
    }

    pub async fn get(&self, id: RecordId) -> PromptDeskResult<Draft> {
        let sql = format!("SELECT {DRAFT_COLUMNS} FROM drafts WHERE id = ?");
        let row: Option<DraftRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| PromptDeskError::not_found("draft", id))?
            .try_into()
    }

    pub async fn create(&self, input: CreateDraftReq) -> PromptDeskResult<Draft> {
        let id = RecordId::new();
        let now = now_millis();
        let sql = format!(
            "INSERT INTO drafts ({DRAFT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {DRAFT_COLUMNS}"
        );
        let row: DraftRow = sqlx::query_as(&sql)
            .bind(id.to_string())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        info!(draft_id = %id, "created draft");
        row.try_into()
    }

    pub async fn delete(&self, id: RecordId) -> PromptDeskResult<()> {
        let result = sqlx::query("DELETE FROM drafts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PromptDeskError::not_found("draft", id));
        }

        info!(draft_id = %id, "deleted draft");
        Ok(())
    }

    /// Update-or-insert all `drafts` atomically, returning the stored rows in input order.
    ///
    /// Existing rows keep their `created_at`; every written row gets a fresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `PromptDeskError::InvalidInput` (before opening a transaction) if an id appears
    /// twice, and `PromptDeskError::Transport` if any statement or the commit fails, in which
    /// case nothing is written.
    pub async fn batch_upsert(&self, drafts: Vec<DraftInput>) -> PromptDeskResult<Vec<Draft>> {
        validate_unique_draft_ids(&drafts)?;

        let mut tx = self.pool.begin().await?;
        let now = now_millis();
        let mut saved = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            saved.push(upsert_draft(&mut tx, draft, now, now).await?);
        }
        tx.commit().await?;

        debug!(count = saved.len(), "batch upserted drafts");
        Ok(saved)
    }
}

/// Write one draft on an open connection or transaction.
///
/// On conflict the existing `created_at` is kept unless the caller asks to overwrite it by
/// passing `overwrite_created = true` (used by imports, which carry their own timestamps).
pub(crate) async fn upsert_draft_with(
    conn: &mut SqliteConnection,
    draft: &DraftInput,
    created_at: i64,
    updated_at: i64,
    overwrite_created: bool,
) -> PromptDeskResult<Draft> {
    let created_clause = if overwrite_created {
        ", created_at = excluded.created_at"
    } else {
        ""
    };
    let sql = format!(
        "INSERT INTO drafts ({DRAFT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
             title = excluded.title, \
             description = excluded.description, \
             content = excluded.content, \
             updated_at = excluded.updated_at{created_clause} \
         RETURNING {DRAFT_COLUMNS}"
    );
    let row: DraftRow = sqlx::query_as(&sql)
        .bind(draft.id.to_string())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.content)
        .bind(created_at)
        .bind(updated_at)
        .fetch_one(&mut *conn)
        .await?;

    row.try_into()
}

async fn upsert_draft(
    conn: &mut SqliteConnection,
    draft: &DraftInput,
    created_at: i64,
    updated_at: i64,
) -> PromptDeskResult<Draft> {
    upsert_draft_with(conn, draft, created_at, updated_at, false).await
}

#[async_trait]
impl DraftStore for DraftRepository {
    async fn list_drafts(&self) -> PromptDeskResult<Vec<Draft>> {
        self.list().await
    }

    async fn create_draft(&self, input: CreateDraftReq) -> PromptDeskResult<Draft> {
        self.create(input).await
    }

    async fn delete_draft(&self, id: RecordId) -> PromptDeskResult<()> {
        self.delete(id).await
    }

    async fn batch_upsert_drafts(&self, drafts: Vec<DraftInput>) -> PromptDeskResult<Vec<Draft>> {
        self.batch_upsert(drafts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_pool;

    fn new_draft(title: &str) -> CreateDraftReq {
        CreateDraftReq {
            title: title.into(),
            description: String::new(),
            content: String::new(),
        }
    }

    async fn insert_raw(pool: &SqlitePool, id: RecordId, title: &str, updated_at: i64) {
        sqlx::query(
            "INSERT INTO drafts (id, title, description, content, created_at, updated_at) VALUES (?, ?, '', '', 0, ?)",
        )
        .bind(id.to_string())
        .bind(title)
        .bind(updated_at)
        .execute(pool)
        .await
        .expect("raw insert should succeed");
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let (_dir, pool) = temp_pool().await;
        let repo = DraftRepository::new(pool);

        let draft = repo.create(new_draft("Draft 1")).await.unwrap();

        assert_eq!(draft.title, "Draft 1");
        assert_eq!(draft.created_at, draft.updated_at);
        assert_eq!(repo.get(draft.id).await.unwrap(), draft);
    }

    #[tokio::test]
    async fn test_list_orders_by_most_recently_updated() {
        let (_dir, pool) = temp_pool().await;
        let (a, b, c) = (RecordId::new(), RecordId::new(), RecordId::new());
        insert_raw(&pool, a, "oldest", 1_000).await;
        insert_raw(&pool, b, "newest", 3_000).await;
        insert_raw(&pool, c, "middle", 2_000).await;

        let titles: Vec<String> = DraftRepository::new(pool)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();

        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_delete_missing_draft_is_not_found() {
        let (_dir, pool) = temp_pool().await;
        let repo = DraftRepository::new(pool);

        let err = repo.delete(RecordId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_batch_upsert_updates_existing_and_inserts_new_with_given_id() {
        let (_dir, pool) = temp_pool().await;
        let repo = DraftRepository::new(pool);
        let existing = repo.create(new_draft("T1")).await.unwrap();
        let fresh_id = RecordId::new();

        let saved = repo
            .batch_upsert(vec![
                DraftInput {
                    id: existing.id,
                    title: "T2".into(),
                    description: "d".into(),
                    content: "c".into(),
                },
                DraftInput {
                    id: fresh_id,
                    title: "New".into(),
                    description: String::new(),
                    content: String::new(),
                },
            ])
            .await
            .unwrap();

        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, existing.id);
        assert_eq!(saved[0].title, "T2");
        assert_eq!(saved[0].created_at, existing.created_at);
        assert!(saved[0].updated_at >= existing.updated_at);
        assert_eq!(saved[1].id, fresh_id);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_batch_upsert_rolls_back_on_failure() {
        let (_dir, pool) = temp_pool().await;
        let repo = DraftRepository::new(pool.clone());
        let existing = repo.create(new_draft("before")).await.unwrap();

        // A trigger that rejects one specific title makes the second statement fail.
        sqlx::query(
            "CREATE TRIGGER reject_poison BEFORE INSERT ON drafts WHEN NEW.title = 'poison' \
             BEGIN SELECT RAISE(ABORT, 'poisoned'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = repo
            .batch_upsert(vec![
                DraftInput {
                    id: existing.id,
                    title: "after".into(),
                    description: String::new(),
                    content: String::new(),
                },
                DraftInput {
                    id: RecordId::new(),
                    title: "poison".into(),
                    description: String::new(),
                    content: String::new(),
                },
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, PromptDeskError::Transport(_)));
        let drafts = repo.list().await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "before");
    }

    #[tokio::test]
    async fn test_batch_upsert_rejects_duplicate_ids_before_writing() {
        let (_dir, pool) = temp_pool().await;
        let repo = DraftRepository::new(pool);
        let id = RecordId::new();
        let input = DraftInput {
            id,
            title: "x".into(),
            description: String::new(),
            content: String::new(),
        };

        let err = repo
            .batch_upsert(vec![input.clone(), input])
            .await
            .unwrap_err();

        assert!(err.is_invalid_input());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
