//! [`ComplaintStore`] and [`UserStore`] backed by PostgreSQL.

use async_trait::async_trait;
use redress_core::account::ProfileUpdate;
use redress_core::comment::CommentKind;
use redress_core::complaint::{ComplaintDraft, ContentEdit};
use redress_core::lifecycle::TriagePlan;
use redress_core::types::DbId;

use crate::models::complaint::{
    Complaint, ComplaintComment, ComplaintDetail, ComplaintFilter, StatusCount,
    StatusHistoryEntry,
};
use crate::models::user::{CreateUser, User};
use crate::repositories::{CommentRepo, ComplaintRepo, StatusHistoryRepo, UserRepo};
use crate::store::{ComplaintStore, UserStore, WriteOutcome};
use crate::DbPool;

/// Constraint guarding email uniqueness.
const EMAIL_CONSTRAINT: &str = "uq_users_email";

/// Thin adapter from the store traits onto the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn is_email_conflict(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.constraint() == Some(EMAIL_CONSTRAINT))
}

#[async_trait]
impl ComplaintStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    async fn create_complaint(
        &self,
        owner_id: DbId,
        draft: &ComplaintDraft,
    ) -> Result<Complaint, sqlx::Error> {
        ComplaintRepo::create(&self.pool, owner_id, draft).await
    }

    async fn find_complaint(&self, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        ComplaintRepo::find_by_id(&self.pool, id).await
    }

    async fn find_complaint_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        ComplaintRepo::find_by_reference(&self.pool, reference).await
    }

    async fn load_detail(&self, id: DbId) -> Result<Option<ComplaintDetail>, sqlx::Error> {
        let Some(complaint) = ComplaintRepo::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let comments = CommentRepo::list_for_complaint(&self.pool, id).await?;
        let status_history = StatusHistoryRepo::list_for_complaint(&self.pool, id).await?;
        Ok(Some(ComplaintDetail {
            complaint,
            comments,
            status_history,
        }))
    }

    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        ComplaintRepo::list_filtered(&self.pool, filter, limit, offset).await
    }

    async fn count_complaints(&self, filter: &ComplaintFilter) -> Result<i64, sqlx::Error> {
        ComplaintRepo::count_filtered(&self.pool, filter).await
    }

    async fn count_by_status(
        &self,
        filter: &ComplaintFilter,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        ComplaintRepo::count_by_status(&self.pool, filter).await
    }

    async fn update_content(
        &self,
        id: DbId,
        edit: &ContentEdit,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error> {
        ComplaintRepo::update_content(&self.pool, id, edit).await
    }

    async fn apply_triage(
        &self,
        id: DbId,
        actor_id: DbId,
        plan: &TriagePlan,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error> {
        ComplaintRepo::apply_triage(&self.pool, id, actor_id, plan).await
    }

    async fn append_comment(
        &self,
        complaint_id: DbId,
        author_id: DbId,
        kind: CommentKind,
        message: &str,
    ) -> Result<Option<ComplaintComment>, sqlx::Error> {
        CommentRepo::append(&self.pool, complaint_id, author_id, kind, message).await
    }

    async fn list_comments(
        &self,
        complaint_id: DbId,
    ) -> Result<Vec<ComplaintComment>, sqlx::Error> {
        CommentRepo::list_for_complaint(&self.pool, complaint_id).await
    }

    async fn list_status_history(
        &self,
        complaint_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        StatusHistoryRepo::list_for_complaint(&self.pool, complaint_id).await
    }

    async fn delete_complaint(&self, id: DbId) -> Result<bool, sqlx::Error> {
        ComplaintRepo::delete(&self.pool, id).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<Option<User>, sqlx::Error> {
        match UserRepo::create(&self.pool, input).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if is_email_conflict(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_email(&self.pool, email).await
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error> {
        UserRepo::list(&self.pool, limit, offset).await
    }

    async fn count_users(&self) -> Result<i64, sqlx::Error> {
        UserRepo::count(&self.pool).await
    }

    async fn update_profile(
        &self,
        id: DbId,
        update: &ProfileUpdate,
    ) -> Result<WriteOutcome<User>, sqlx::Error> {
        match UserRepo::update_profile(&self.pool, id, update).await {
            Ok(Some(user)) => Ok(WriteOutcome::Applied(user)),
            Ok(None) => Ok(WriteOutcome::NotFound),
            Err(e) if is_email_conflict(&e) => Ok(WriteOutcome::Conflict),
            Err(e) => Err(e),
        }
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        UserRepo::update_password(&self.pool, id, password_hash).await
    }
}
