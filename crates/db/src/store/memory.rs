//! In-process [`ComplaintStore`] and [`UserStore`].
//!
//! Used by the API test-suite and when the server starts without
//! `DATABASE_URL`. All tables sit behind a single `RwLock`, so every write
//! is atomic with respect to every other.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use redress_core::account::ProfileUpdate;
use redress_core::comment::CommentKind;
use redress_core::complaint::{generate_reference, ComplaintStatus, ComplaintDraft, ContentEdit};
use redress_core::lifecycle::TriagePlan;
use redress_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::complaint::{
    Complaint, ComplaintComment, ComplaintDetail, ComplaintFilter, StatusCount,
    StatusHistoryEntry,
};
use crate::models::user::{CreateUser, User};
use crate::store::{ComplaintStore, UserStore, WriteOutcome};

#[derive(Default)]
struct Tables {
    last_user_id: DbId,
    last_complaint_id: DbId,
    last_comment_id: DbId,
    last_history_id: DbId,
    users: BTreeMap<DbId, User>,
    complaints: BTreeMap<DbId, Complaint>,
    comments: BTreeMap<DbId, Vec<ComplaintComment>>,
    history: BTreeMap<DbId, Vec<StatusHistoryEntry>>,
}

fn next_id(counter: &mut DbId) -> DbId {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, matching the PostgreSQL ordering.
fn newest_first(a: &Complaint, b: &Complaint) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn create_complaint(
        &self,
        owner_id: DbId,
        draft: &ComplaintDraft,
    ) -> Result<Complaint, sqlx::Error> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let mut reference = generate_reference(now);
        while tables.complaints.values().any(|c| c.reference == reference) {
            reference = generate_reference(now);
        }

        let id = next_id(&mut tables.last_complaint_id);
        let complaint = Complaint {
            id,
            reference,
            owner_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            priority: draft.priority.as_str().to_string(),
            status: ComplaintStatus::Pending.as_str().to_string(),
            assigned_to: None,
            resolution: None,
            created_at: now,
            updated_at: now,
        };
        tables.complaints.insert(id, complaint.clone());
        Ok(complaint)
    }

    async fn find_complaint(&self, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        Ok(self.tables.read().await.complaints.get(&id).cloned())
    }

    async fn find_complaint_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .complaints
            .values()
            .find(|c| c.reference == reference)
            .cloned())
    }

    async fn load_detail(&self, id: DbId) -> Result<Option<ComplaintDetail>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables.complaints.get(&id).map(|complaint| ComplaintDetail {
            complaint: complaint.clone(),
            comments: tables.comments.get(&id).cloned().unwrap_or_default(),
            status_history: tables.history.get(&id).cloned().unwrap_or_default(),
        }))
    }

    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Complaint> = tables
            .complaints
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        matching.sort_by(newest_first);

        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_complaints(&self, filter: &ComplaintFilter) -> Result<i64, sqlx::Error> {
        let tables = self.tables.read().await;
        let count = tables
            .complaints
            .values()
            .filter(|c| filter.matches(c))
            .count();
        Ok(count as i64)
    }

    async fn count_by_status(
        &self,
        filter: &ComplaintFilter,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for complaint in tables.complaints.values().filter(|c| filter.matches(c)) {
            *counts.entry(complaint.status.clone()).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn update_content(
        &self,
        id: DbId,
        edit: &ContentEdit,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error> {
        let mut tables = self.tables.write().await;
        let Some(complaint) = tables.complaints.get_mut(&id) else {
            return Ok(WriteOutcome::NotFound);
        };
        if complaint.status == ComplaintStatus::Resolved.as_str() {
            return Ok(WriteOutcome::Conflict);
        }

        if let Some(title) = &edit.title {
            complaint.title = title.clone();
        }
        if let Some(description) = &edit.description {
            complaint.description = description.clone();
        }
        if let Some(category) = &edit.category {
            complaint.category = category.clone();
        }
        complaint.updated_at = Utc::now();
        Ok(WriteOutcome::Applied(complaint.clone()))
    }

    async fn apply_triage(
        &self,
        id: DbId,
        actor_id: DbId,
        plan: &TriagePlan,
    ) -> Result<WriteOutcome<Complaint>, sqlx::Error> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let Some(complaint) = tables.complaints.get_mut(&id) else {
            return Ok(WriteOutcome::NotFound);
        };
        if let Some(required) = plan.required_status() {
            if complaint.status != required.as_str() {
                return Ok(WriteOutcome::Conflict);
            }
        }

        let now = Utc::now();
        if let Some(transition) = &plan.transition {
            complaint.status = transition.to.as_str().to_string();
            let entry = StatusHistoryEntry {
                id: next_id(&mut tables.last_history_id),
                complaint_id: id,
                status: transition.to.as_str().to_string(),
                previous_status: transition.from.as_str().to_string(),
                actor_id,
                note: transition.note.clone(),
                created_at: now,
            };
            tables.history.entry(id).or_default().push(entry);
        }
        if let Some(priority) = plan.priority {
            complaint.priority = priority.as_str().to_string();
        }
        if let Some(assigned_to) = &plan.assigned_to {
            complaint.assigned_to = Some(assigned_to.clone());
        }
        if let Some(resolution) = &plan.resolution {
            complaint.resolution = Some(resolution.clone());
        }
        if plan.clears_resolution() {
            complaint.resolution = None;
        }
        complaint.updated_at = now;
        Ok(WriteOutcome::Applied(complaint.clone()))
    }

    async fn append_comment(
        &self,
        complaint_id: DbId,
        author_id: DbId,
        kind: CommentKind,
        message: &str,
    ) -> Result<Option<ComplaintComment>, sqlx::Error> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let Some(complaint) = tables.complaints.get_mut(&complaint_id) else {
            return Ok(None);
        };

        let now = Utc::now();
        complaint.updated_at = now;
        let comment = ComplaintComment {
            id: next_id(&mut tables.last_comment_id),
            complaint_id,
            author_id,
            kind: kind.as_str().to_string(),
            message: message.to_string(),
            created_at: now,
        };
        tables
            .comments
            .entry(complaint_id)
            .or_default()
            .push(comment.clone());
        Ok(Some(comment))
    }

    async fn list_comments(
        &self,
        complaint_id: DbId,
    ) -> Result<Vec<ComplaintComment>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&complaint_id).cloned().unwrap_or_default())
    }

    async fn list_status_history(
        &self,
        complaint_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables.history.get(&complaint_id).cloned().unwrap_or_default())
    }

    async fn delete_complaint(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.write().await;
        let removed = tables.complaints.remove(&id).is_some();
        tables.comments.remove(&id);
        tables.history.remove(&id);
        Ok(removed)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<Option<User>, sqlx::Error> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == input.email) {
            return Ok(None);
        }

        let now = Utc::now();
        let user = User {
            id: next_id(&mut tables.last_user_id),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        // Ids are assigned in creation order.
        Ok(tables
            .users
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_users(&self) -> Result<i64, sqlx::Error> {
        Ok(self.tables.read().await.users.len() as i64)
    }

    async fn update_profile(
        &self,
        id: DbId,
        update: &ProfileUpdate,
    ) -> Result<WriteOutcome<User>, sqlx::Error> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &update.email {
            if tables.users.values().any(|u| u.id != id && &u.email == email) {
                return Ok(WriteOutcome::Conflict);
            }
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(WriteOutcome::NotFound);
        };

        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        user.updated_at = Utc::now();
        Ok(WriteOutcome::Applied(user.clone()))
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(true)
    }
}
