use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{ListOverview, Store};
use crate::error::{ApiError, ApiResult};
use crate::models::progress::{AnswerTotals, ListStats};
use crate::models::{Level, PracticeSession, User, VocabularyList};

/// Process-local backend for development and tests. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryData>,
}

#[derive(Default)]
struct MemoryData {
    users: Vec<User>,
    lists: Vec<VocabularyList>,
    sessions: Vec<PracticeSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryData {
    fn totals_for(&self, user_id: Uuid) -> AnswerTotals {
        self.sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .fold(AnswerTotals::default(), |acc, s| AnswerTotals {
                correct: acc.correct + u64::from(s.correct),
                answered: acc.answered + u64::from(s.correct) + u64::from(s.incorrect),
            })
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> ApiResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: User) -> ApiResult<User> {
        let mut data = self.inner.write().await;

        if data
            .users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(ApiError::conflict("User already exists"));
        }

        data.users.push(user.clone());
        info!("Created user with id: {}", user.id);
        Ok(user)
    }

    async fn user_exists(&self, email: &str, username: &str) -> ApiResult<bool> {
        let data = self.inner.read().await;
        Ok(data
            .users
            .iter()
            .any(|u| u.email == email || u.username == username))
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> ApiResult<()> {
        let mut data = self.inner.write().await;
        if let Some(user) = data.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn update_level(&self, id: Uuid, level: Level) -> ApiResult<Option<User>> {
        let mut data = self.inner.write().await;
        Ok(data.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.level = level;
            user.clone()
        }))
    }

    async fn create_list(&self, list: VocabularyList) -> ApiResult<VocabularyList> {
        let mut data = self.inner.write().await;

        if !data.users.iter().any(|u| u.id == list.owner_id) {
            return Err(ApiError::validation("Referenced resource does not exist"));
        }

        data.lists.push(list.clone());
        Ok(list)
    }

    async fn list_overviews(&self, owner_id: Uuid) -> ApiResult<Vec<ListOverview>> {
        let data = self.inner.read().await;

        let mut overviews: Vec<ListOverview> = data
            .lists
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .map(|list| {
                let best_correct = data
                    .sessions
                    .iter()
                    .filter(|s| s.list_id == list.id)
                    .map(|s| s.correct)
                    .max()
                    .unwrap_or(0);

                ListOverview {
                    id: list.id,
                    title: list.title.clone(),
                    created_at: list.created_at,
                    stats: ListStats {
                        total_words: list.words.len() as u32,
                        best_correct,
                    },
                }
            })
            .collect();

        // Insertion order breaks ties between lists created in the same instant.
        overviews.reverse();
        overviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(overviews)
    }

    async fn get_list(&self, owner_id: Uuid, list_id: Uuid) -> ApiResult<Option<VocabularyList>> {
        let data = self.inner.read().await;
        Ok(data
            .lists
            .iter()
            .find(|l| l.id == list_id && l.owner_id == owner_id)
            .cloned())
    }

    async fn delete_list(&self, owner_id: Uuid, list_id: Uuid) -> ApiResult<bool> {
        let mut data = self.inner.write().await;

        let before = data.lists.len();
        data.lists.retain(|l| !(l.id == list_id && l.owner_id == owner_id));
        let deleted = data.lists.len() != before;

        if deleted {
            data.sessions.retain(|s| s.list_id != list_id);
        }

        Ok(deleted)
    }

    async fn record_practice(&self, session: PracticeSession) -> ApiResult<PracticeSession> {
        let mut data = self.inner.write().await;

        if !data.lists.iter().any(|l| l.id == session.list_id) {
            return Err(ApiError::validation("Referenced resource does not exist"));
        }

        data.sessions.push(session.clone());
        Ok(session)
    }

    async fn answer_totals(&self, user_id: Uuid) -> ApiResult<AnswerTotals> {
        let data = self.inner.read().await;
        Ok(data.totals_for(user_id))
    }

    async fn learners(&self, level: Option<Level>) -> ApiResult<Vec<(User, AnswerTotals)>> {
        let data = self.inner.read().await;
        Ok(data
            .users
            .iter()
            .filter(|u| level.map_or(true, |l| u.level == l))
            .map(|u| (u.clone(), data.totals_for(u.id)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListWord;

    fn user(name: &str) -> User {
        User::new(name.to_string(), format!("{}@example.com", name), "hash".to_string())
    }

    fn list_for(owner: Uuid, words: usize) -> VocabularyList {
        let words = (0..words)
            .map(|i| ListWord {
                word: format!("word{}", i),
                translation: format!("slovo{}", i),
                image_url: None,
            })
            .collect();
        VocabularyList::new(owner, "Basics".to_string(), words)
    }

    #[test]
    fn test_duplicate_email_or_username_conflicts() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store.create_user(user("anna")).await.unwrap();

            let same_email = User::new("other".into(), "anna@example.com".into(), "h".into());
            assert!(matches!(store.create_user(same_email).await, Err(ApiError::Conflict(_))));

            let same_name = User::new("anna".into(), "other@example.com".into(), "h".into());
            assert!(matches!(store.create_user(same_name).await, Err(ApiError::Conflict(_))));

            assert!(store.user_exists("anna@example.com", "nobody").await.unwrap());
            assert!(!store.user_exists("x@example.com", "nobody").await.unwrap());
        });
    }

    #[test]
    fn test_lists_are_scoped_to_owner() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let anna = store.create_user(user("anna")).await.unwrap();
            let tom = store.create_user(user("tom")).await.unwrap();

            let list = store.create_list(list_for(anna.id, 3)).await.unwrap();

            assert!(store.get_list(anna.id, list.id).await.unwrap().is_some());
            assert!(store.get_list(tom.id, list.id).await.unwrap().is_none());
            assert!(!store.delete_list(tom.id, list.id).await.unwrap());
            assert!(store.delete_list(anna.id, list.id).await.unwrap());
            assert!(store.list_overviews(anna.id).await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_practice_feeds_stats_and_totals() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let anna = store.create_user(user("anna")).await.unwrap();
            let list = store.create_list(list_for(anna.id, 4)).await.unwrap();

            store.record_practice(PracticeSession::new(list.id, anna.id, 2, 2)).await.unwrap();
            store.record_practice(PracticeSession::new(list.id, anna.id, 3, 1)).await.unwrap();

            let overviews = store.list_overviews(anna.id).await.unwrap();
            assert_eq!(overviews[0].stats, ListStats { total_words: 4, best_correct: 3 });

            let totals = store.answer_totals(anna.id).await.unwrap();
            assert_eq!(totals, AnswerTotals { correct: 5, answered: 8 });

            store.delete_list(anna.id, list.id).await.unwrap();
            assert_eq!(store.answer_totals(anna.id).await.unwrap(), AnswerTotals::default());
        });
    }

    #[test]
    fn test_learners_filter_by_level() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let anna = store.create_user(user("anna")).await.unwrap();
            store.create_user(user("tom")).await.unwrap();
            store.update_level(anna.id, Level::B2).await.unwrap();

            assert_eq!(store.learners(None).await.unwrap().len(), 2);

            let b2 = store.learners(Some(Level::B2)).await.unwrap();
            assert_eq!(b2.len(), 1);
            assert_eq!(b2[0].0.username, "anna");
        });
    }

    #[test]
    fn test_list_overviews_newest_first() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let anna = store.create_user(user("anna")).await.unwrap();

            let mut first = list_for(anna.id, 2);
            first.title = "First".to_string();
            let mut second = list_for(anna.id, 2);
            second.title = "Second".to_string();
            second.created_at = first.created_at + chrono::Duration::seconds(1);

            store.create_list(first).await.unwrap();
            store.create_list(second).await.unwrap();

            let titles: Vec<String> = store
                .list_overviews(anna.id)
                .await
                .unwrap()
                .into_iter()
                .map(|o| o.title)
                .collect();
            assert_eq!(titles, vec!["Second", "First"]);
        });
    }

    #[test]
    fn test_list_overviews_same_instant_latest_insert_first() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let anna = store.create_user(user("anna")).await.unwrap();

            let mut first = list_for(anna.id, 2);
            first.title = "First".to_string();
            let mut second = list_for(anna.id, 2);
            second.title = "Second".to_string();
            second.created_at = first.created_at;

            store.create_list(first).await.unwrap();
            store.create_list(second).await.unwrap();

            let titles: Vec<String> = store
                .list_overviews(anna.id)
                .await
                .unwrap()
                .into_iter()
                .map(|o| o.title)
                .collect();
            assert_eq!(titles, vec!["Second", "First"]);
        });
    }
}
