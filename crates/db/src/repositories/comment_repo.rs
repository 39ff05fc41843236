//! Repository for the `complaint_comments` table (append-only).

use redress_core::comment::CommentKind;
use redress_core::types::DbId;
use sqlx::PgPool;

use crate::models::complaint::ComplaintComment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, complaint_id, author_id, kind, message, created_at";

/// Provides append and list operations for complaint comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment and bump the parent complaint's `updated_at`.
    ///
    /// Returns `None` if the complaint does not exist. Both statements run
    /// as one CTE, so a concurrent delete cannot leave an orphan.
    pub async fn append(
        pool: &PgPool,
        complaint_id: DbId,
        author_id: DbId,
        kind: CommentKind,
        message: &str,
    ) -> Result<Option<ComplaintComment>, sqlx::Error> {
        let query = format!(
            "WITH target AS (
                UPDATE complaints SET updated_at = NOW()
                WHERE id = $1
                RETURNING id
             )
             INSERT INTO complaint_comments (complaint_id, author_id, kind, message)
             SELECT target.id, $2, $3, $4 FROM target
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ComplaintComment>(&query)
            .bind(complaint_id)
            .bind(author_id)
            .bind(kind.as_str())
            .bind(message)
            .fetch_optional(pool)
            .await
    }

    /// List the comments of a complaint in insertion order.
    pub async fn list_for_complaint(
        pool: &PgPool,
        complaint_id: DbId,
    ) -> Result<Vec<ComplaintComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaint_comments
             WHERE complaint_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ComplaintComment>(&query)
            .bind(complaint_id)
            .fetch_all(pool)
            .await
    }
}
