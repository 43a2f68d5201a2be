//! Persistence seam shared by the PostgreSQL and in-memory backends.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::progress::{AnswerTotals, ListStats};
use crate::models::{Level, PracticeSession, User, VocabularyList};

pub use memory::MemoryStore;

/// A list without its words, plus what progress needs.
#[derive(Debug, Clone)]
pub struct ListOverview {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub stats: ListStats,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> ApiResult<()>;

    /// Fails with `Conflict` when the email or username is taken.
    async fn create_user(&self, user: User) -> ApiResult<User>;

    async fn user_exists(&self, email: &str, username: &str) -> ApiResult<bool>;

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> ApiResult<Option<User>>;

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> ApiResult<()>;

    async fn update_level(&self, id: Uuid, level: Level) -> ApiResult<Option<User>>;

    async fn create_list(&self, list: VocabularyList) -> ApiResult<VocabularyList>;

    /// Newest first.
    async fn list_overviews(&self, owner_id: Uuid) -> ApiResult<Vec<ListOverview>>;

    /// `None` when the list does not exist or belongs to someone else.
    async fn get_list(&self, owner_id: Uuid, list_id: Uuid) -> ApiResult<Option<VocabularyList>>;

    /// Returns whether a list was deleted. Practice sessions go with it.
    async fn delete_list(&self, owner_id: Uuid, list_id: Uuid) -> ApiResult<bool>;

    async fn record_practice(&self, session: PracticeSession) -> ApiResult<PracticeSession>;

    async fn answer_totals(&self, user_id: Uuid) -> ApiResult<AnswerTotals>;

    /// Every user, optionally restricted to one level, with their answer totals.
    async fn learners(&self, level: Option<Level>) -> ApiResult<Vec<(User, AnswerTotals)>>;
}
