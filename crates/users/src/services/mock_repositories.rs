//! In-memory repository for exercising the service layer without SQLite

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use userhub_database::{DatabaseError, DatabaseResult, User};

use super::user_service::UserRepo;

#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(users: &HashMap<Uuid, User>, user: &User) -> DatabaseResult<()> {
        for existing in users.values().filter(|existing| existing.id != user.id) {
            if existing.email == user.email {
                return Err(DatabaseError::Duplicate("email".to_string()));
            }
            if existing.nickname == user.nickname {
                return Err(DatabaseError::Duplicate("nickname".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepo for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.nickname == nickname).cloned())
    }

    async fn count(&self) -> DatabaseResult<i64> {
        Ok(self.users.read().await.len() as i64)
    }

    async fn list(&self, skip: i64, limit: i64) -> DatabaseResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn insert(&self, user: &User) -> DatabaseResult<User> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn insert_claiming_first_admin(&self, user: &User) -> DatabaseResult<User> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, user)?;
        let mut user = user.clone();
        if users.is_empty() {
            user.promote_to_first_admin();
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> DatabaseResult<Option<User>> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Ok(None);
        }
        Self::check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}
