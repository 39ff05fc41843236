//! Repository for the `complaint_status_history` table (append-only).

use redress_core::lifecycle::StatusTransition;
use redress_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::complaint::StatusHistoryEntry;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, complaint_id, status, previous_status, actor_id, note, created_at";

/// Provides append and list operations for status history.
pub struct StatusHistoryRepo;

impl StatusHistoryRepo {
    /// Record one status transition.
    ///
    /// Takes any executor so callers can append inside the transaction that
    /// changes the status.
    pub async fn append<'e, E>(
        executor: E,
        complaint_id: DbId,
        actor_id: DbId,
        transition: &StatusTransition,
    ) -> Result<StatusHistoryEntry, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO complaint_status_history
                (complaint_id, status, previous_status, actor_id, note)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(complaint_id)
            .bind(transition.to.as_str())
            .bind(transition.from.as_str())
            .bind(actor_id)
            .bind(transition.note.as_deref())
            .fetch_one(executor)
            .await
    }

    /// List the history of a complaint, oldest first.
    pub async fn list_for_complaint(
        pool: &PgPool,
        complaint_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaint_status_history
             WHERE complaint_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(complaint_id)
            .fetch_all(pool)
            .await
    }
}
