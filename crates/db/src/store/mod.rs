//! Storage traits the API layer depends on.
//!
//! Handlers hold `Arc<dyn ComplaintStore>` / `Arc<dyn UserStore>` so the
//! same router runs against PostgreSQL in production and against
//! [`MemoryStore`] in tests or when no database is configured.
//!
//! Every mutating operation is atomic per complaint: a status change and its
//! history entry land together or not at all, and concurrent appends to the
//! same comment thread are all retained.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

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

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<T> {
    /// The write went through; carries the updated row.
    Applied(T),
    /// The row exists but its state no longer permits the write (status
    /// changed underneath a triage plan, complaint already resolved, email
    /// already taken).
    Conflict,
    /// No row with the given ID.
    NotFound,
}

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Short backend name for health output (`postgres` or `memory`).
    fn backend(&self) -> &'static str;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// Persist a new `Pending` complaint with a fresh reference code.
    async fn create_complaint(
        &self,
        owner_id: DbId,
        draft: &ComplaintDraft,
    ) -> Result<Complaint, sqlx::Error>;

    async fn find_complaint(&self, id: DbId) -> Result<Option<Complaint>, sqlx::Error>;

    async fn find_complaint_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Complaint>, sqlx::Error>;

    /// Complaint plus comments and status history, all in insertion order.
    async fn load_detail(&self, id: DbId) -> Result<Option<ComplaintDetail>, sqlx::Error>;

    /// Complaints matching `filter`, newest first.
    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error>;

    async fn count_complaints(&self, filter: &ComplaintFilter) -> Result<i64, sqlx::Error>;

    /// Per-status counts over `filter`; statuses without complaints are omitted.
    async fn count_by_status(
        &self,
        filter: &ComplaintFilter,
    ) -> Result<Vec<StatusCount>, sqlx::Error>;

    /// Apply an owner edit. [`WriteOutcome::Conflict`] once resolved.
    async fn update_content(
        &self,
        id: DbId,
        edit: &ContentEdit,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error>;

    /// Apply a triage plan atomically, appending one history entry when it
    /// carries a status transition. [`WriteOutcome::Conflict`] when the
    /// current status no longer equals `plan.expected_status`.
    async fn apply_triage(
        &self,
        id: DbId,
        actor_id: DbId,
        plan: &TriagePlan,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error>;

    /// Append to the comment thread. `None` if the complaint does not exist.
    async fn append_comment(
        &self,
        complaint_id: DbId,
        author_id: DbId,
        kind: CommentKind,
        message: &str,
    ) -> Result<Option<ComplaintComment>, sqlx::Error>;

    async fn list_comments(&self, complaint_id: DbId)
        -> Result<Vec<ComplaintComment>, sqlx::Error>;

    async fn list_status_history(
        &self,
        complaint_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error>;

    /// Hard delete. Returns `false` if nothing was deleted.
    async fn delete_complaint(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. `None` if the email is already registered.
    async fn create_user(&self, input: &CreateUser) -> Result<Option<User>, sqlx::Error>;

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    /// Users, most recently created first.
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error>;

    async fn count_users(&self) -> Result<i64, sqlx::Error>;

    /// [`WriteOutcome::Conflict`] when the new email belongs to another user.
    async fn update_profile(
        &self,
        id: DbId,
        update: &ProfileUpdate,
    ) -> Result<WriteOutcome<User>, sqlx::Error>;

    /// Returns `false` if the user does not exist.
    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error>;
}
