//! In-memory stores for unit and router tests.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{password::hash_password, Role},
    categories::{Category, CategoryStore},
    users::{NewUser, User, UserStore},
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub async fn seed(&self, username: &str, password: &str, role: Role) -> User {
        self.create(&NewUser {
            username: username.into(),
            password_hash: hash_password(password).expect("hash"),
            role,
        })
        .await
        .expect("seed user")
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> anyhow::Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            anyhow::bail!("duplicate username");
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, user: &NewUser) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        let Some(existing) = users.get_mut(&id) else {
            return Ok(None);
        };
        existing.username = user.username.clone();
        existing.password_hash = user.password_hash.clone();
        existing.role = user.role;
        Ok(Some(existing.clone()))
    }
}

#[derive(Default)]
pub struct MemoryCategoryStore {
    categories: RwLock<HashMap<Uuid, Category>>,
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let mut all: Vec<Category> = self.categories.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(all)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn create(&self, title: &str) -> anyhow::Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            title: title.into(),
        };
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, title: &str) -> anyhow::Result<Option<Category>> {
        let mut categories = self.categories.write().await;
        Ok(categories.get_mut(&id).map(|c| {
            c.title = title.into();
            c.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.categories.write().await.remove(&id).is_some())
    }
}

/// User store whose lookups find nothing and whose writes always fail.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_username(&self, _username: &str) -> anyhow::Result<Option<User>> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(None)
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(Vec::new())
    }

    async fn create(&self, _user: &NewUser) -> anyhow::Result<User> {
        anyhow::bail!("write rejected")
    }

    async fn update(&self, _id: Uuid, _user: &NewUser) -> anyhow::Result<Option<User>> {
        anyhow::bail!("write rejected")
    }
}

/// Category store that reads as empty and fails every write.
pub struct FailingCategoryStore;

#[async_trait]
impl CategoryStore for FailingCategoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(None)
    }

    async fn create(&self, _title: &str) -> anyhow::Result<Category> {
        anyhow::bail!("write rejected")
    }

    async fn update(&self, _id: Uuid, _title: &str) -> anyhow::Result<Option<Category>> {
        anyhow::bail!("write rejected")
    }

    async fn delete(&self, _id: Uuid) -> anyhow::Result<bool> {
        anyhow::bail!("write rejected")
    }
}
