//! Repository for the `complaints` table.

use chrono::Utc;
use redress_core::complaint::{
    generate_reference, ComplaintDraft, ComplaintStatus, ContentEdit, Priority,
};
use redress_core::lifecycle::TriagePlan;
use redress_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::complaint::{Complaint, ComplaintFilter, StatusCount};
use crate::repositories::StatusHistoryRepo;
use crate::store::WriteOutcome;

/// Column list for `complaints` queries.
const COLUMNS: &str = "\
    id, reference, owner_id, title, description, category, priority, status, \
    assigned_to, resolution, created_at, updated_at";

/// How many fresh reference codes to try before giving up on a collision.
const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// Constraint guarding reference uniqueness.
const REFERENCE_CONSTRAINT: &str = "uq_complaints_reference";

/// Provides CRUD and lifecycle operations for complaints.
pub struct ComplaintRepo;

impl ComplaintRepo {
    /// Insert a new `Pending` complaint owned by `owner_id`.
    ///
    /// Regenerates the reference code if it collides with an existing one.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        draft: &ComplaintDraft,
    ) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaints \
                (reference, owner_id, title, description, category, priority) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );

        let mut attempt = 1;
        loop {
            let reference = generate_reference(Utc::now());
            let result = sqlx::query_as::<_, Complaint>(&query)
                .bind(&reference)
                .bind(owner_id)
                .bind(&draft.title)
                .bind(&draft.description)
                .bind(&draft.category)
                .bind(draft.priority.as_str())
                .fetch_one(pool)
                .await;

            match result {
                Err(sqlx::Error::Database(db_err))
                    if db_err.constraint() == Some(REFERENCE_CONSTRAINT)
                        && attempt < MAX_REFERENCE_ATTEMPTS =>
                {
                    tracing::warn!(%reference, attempt, "Complaint reference collision, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Find a complaint by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a complaint by its human-readable reference code.
    pub async fn find_by_reference(
        pool: &PgPool,
        reference: &str,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE reference = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(reference)
            .fetch_optional(pool)
            .await
    }

    /// Whether a complaint with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM complaints WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List complaints matching `filter`, newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let (where_clause, param_idx) = filter_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM complaints {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        bind_filter(sqlx::query_as::<_, Complaint>(&query), filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count complaints matching `filter`.
    pub async fn count_filtered(
        pool: &PgPool,
        filter: &ComplaintFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM complaints {where_clause}");

        let (count,) = bind_filter(sqlx::query_as::<_, (i64,)>(&query), filter)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Count complaints matching `filter`, grouped by status.
    ///
    /// Statuses with no complaints are omitted.
    pub async fn count_by_status(
        pool: &PgPool,
        filter: &ComplaintFilter,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter);
        let query = format!(
            "SELECT status, COUNT(*) AS count FROM complaints {where_clause} \
             GROUP BY status ORDER BY status"
        );

        bind_filter(sqlx::query_as::<_, StatusCount>(&query), filter)
            .fetch_all(pool)
            .await
    }

    /// Apply an owner edit, only while the complaint is unresolved.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        edit: &ContentEdit,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                category = COALESCE($4, category) \
             WHERE id = $1 AND status <> 'Resolved' \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(&edit.title)
            .bind(&edit.description)
            .bind(&edit.category)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(complaint) => Ok(WriteOutcome::Applied(complaint)),
            None => Self::missing_or_conflict(pool, id).await,
        }
    }

    /// Apply a triage plan and its status-history entry in one transaction.
    ///
    /// Status changes and resolutions only match while the complaint still
    /// has `plan.expected_status`; a concurrent status change makes such a
    /// plan [`WriteOutcome::Conflict`]. Leaving `Resolved` clears the
    /// resolution.
    pub async fn apply_triage(
        pool: &PgPool,
        id: DbId,
        actor_id: DbId,
        plan: &TriagePlan,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE complaints SET \
                status = COALESCE($3, status), \
                priority = COALESCE($4, priority), \
                assigned_to = COALESCE($5, assigned_to), \
                resolution = CASE WHEN $7 THEN NULL ELSE COALESCE($6, resolution) END \
             WHERE id = $1 AND ($2::TEXT IS NULL OR status = $2::TEXT) \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .bind(plan.required_status().map(ComplaintStatus::as_str))
            .bind(plan.transition.as_ref().map(|t| t.to.as_str()))
            .bind(plan.priority.map(Priority::as_str))
            .bind(plan.assigned_to.as_deref())
            .bind(plan.resolution.as_deref())
            .bind(plan.clears_resolution())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(complaint) = updated else {
            tx.rollback().await?;
            return Self::missing_or_conflict(pool, id).await;
        };

        if let Some(transition) = &plan.transition {
            StatusHistoryRepo::append(&mut *tx, id, actor_id, transition).await?;
        }

        tx.commit().await?;
        Ok(WriteOutcome::Applied(complaint))
    }

    /// Hard-delete a complaint; comments and history cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn missing_or_conflict<T>(pool: &PgPool, id: DbId) -> Result<WriteOutcome<T>, sqlx::Error> {
        if Self::exists(pool, id).await? {
            Ok(WriteOutcome::Conflict)
        } else {
            Ok(WriteOutcome::NotFound)
        }
    }
}

/// Build the `WHERE` clause for `filter`.
///
/// Returns the clause (empty when unfiltered) and the next free
/// placeholder index. Placeholders are bound by [`bind_filter`] in the same
/// order.
fn filter_clause(filter: &ComplaintFilter) -> (String, usize) {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_idx: usize = 1;

    if filter.owner_id.is_some() {
        conditions.push(format!("owner_id = ${param_idx}"));
        param_idx += 1;
    }
    if filter.status.is_some() {
        conditions.push(format!("status = ${param_idx}"));
        param_idx += 1;
    }
    if filter.category.is_some() {
        conditions.push(format!("category = ${param_idx}"));
        param_idx += 1;
    }
    if filter.priority.is_some() {
        conditions.push(format!("priority = ${param_idx}"));
        param_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, param_idx)
}

fn bind_filter<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &'q ComplaintFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    if let Some(owner_id) = filter.owner_id {
        q = q.bind(owner_id);
    }
    if let Some(status) = filter.status {
        q = q.bind(status.as_str());
    }
    if let Some(category) = filter.category.as_deref() {
        q = q.bind(category);
    }
    if let Some(priority) = filter.priority {
        q = q.bind(priority.as_str());
    }
    q
}
