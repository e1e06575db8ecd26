/*
 * Responsibility
 * - users の in-memory 保存 (username がキー)
 * - CRUD を提供し、重複は RepoError::Conflict で返す
 * - password はハッシュ済みの値だけを受け取る
 */
use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UserRepo {
    users: Arc<RwLock<BTreeMap<String, UserRow>>>,
}

impl UserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, row: UserRow) -> Result<UserRow, RepoError> {
        let mut users = self.users.write().await;
        if users.contains_key(&row.username) {
            return Err(RepoError::Conflict {
                resource: "username",
                key: row.username,
            });
        }
        users.insert(row.username.clone(), row.clone());
        Ok(row)
    }

    /// Ordered by username.
    pub async fn list(&self) -> Vec<UserRow> {
        self.users.read().await.values().cloned().collect()
    }

    pub async fn get(&self, username: &str) -> Option<UserRow> {
        self.users.read().await.get(username).cloned()
    }

    pub async fn update(&self, username: &str, changes: UserChanges) -> Option<UserRow> {
        let mut users = self.users.write().await;
        let row = users.get_mut(username)?;

        if let Some(v) = changes.password_hash {
            row.password_hash = v;
        }
        if let Some(v) = changes.first_name {
            row.first_name = v;
        }
        if let Some(v) = changes.last_name {
            row.last_name = v;
        }
        if let Some(v) = changes.email {
            row.email = v;
        }

        Some(row.clone())
    }

    pub async fn delete(&self, username: &str) -> bool {
        self.users.write().await.remove(username).is_some()
    }
}
