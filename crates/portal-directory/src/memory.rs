//! In-memory user directory backed by a concurrent map.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::traits::UserDirectory;
use portal_entity::user::User;

/// User directory held entirely in process memory.
///
/// Records are keyed by their stable id. Username and email lookups are
/// case-sensitive exact matches, and writes refuse to let two records
/// share either value. Every write runs its uniqueness check and its
/// insert under one writer lock; reads never take it.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    /// Id → user record.
    users: Arc<DashMap<Uuid, User>>,
    /// Serializes check-then-write sequences.
    writer: Arc<Mutex<()>>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with the given records.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let directory = Self::new();
        for user in users {
            directory.users.insert(user.id, user);
        }
        directory
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory holds no records.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn find_by(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    /// Fails with `Conflict` if a different record holds the username or
    /// email. Callers must hold the writer lock.
    fn check_unique(&self, user: &User) -> AppResult<()> {
        if let Some(other) =
            self.find_by(|u| u.id != user.id && (u.username == user.username || u.email == user.email))
        {
            let field = if other.username == user.username {
                "Username"
            } else {
                "Email"
            };
            return Err(AppError::conflict(format!("{field} already exists")));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory<User> for MemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.find_by(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_by(|u| u.email == email))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let _guard = self.writer.lock().await;
        self.check_unique(user)?;

        self.users.insert(user.id, user.clone());
        debug!(username = %user.username, user_id = %user.user_id, "Saved user record");
        Ok(user.clone())
    }

    async fn update(
        &self,
        username: &str,
        apply: Box<dyn for<'u> FnOnce(&'u mut User) + Send>,
    ) -> AppResult<Option<User>> {
        let _guard = self.writer.lock().await;
        let Some(mut user) = self.find_by(|u| u.username == username) else {
            return Ok(None);
        };

        apply(&mut user);
        self.check_unique(&user)?;

        self.users.insert(user.id, user.clone());
        debug!(username = %user.username, user_id = %user.user_id, "Updated user record");
        Ok(Some(user))
    }

    async fn delete(&self, user: &User) -> AppResult<bool> {
        let _guard = self.writer.lock().await;
        let removed = self.users.remove(&user.id).is_some();
        if removed {
            debug!(username = %user.username, "Deleted user record");
        }
        Ok(removed)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| a.join_date.cmp(&b.join_date).then_with(|| a.username.cmp(&b.username)));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::ErrorKind;
    use portal_entity::user::Role;

    fn user(username: &str) -> User {
        User::new(
            "0000000001",
            username,
            format!("{username}@example.com"),
            "hash",
            Role::User,
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let directory = MemoryUserDirectory::new();
        let alice = directory.save(&user("alice")).await.unwrap();

        let by_name = directory.find_by_username("alice").await.unwrap().unwrap();
        let by_email = directory
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, alice.id);
        assert_eq!(by_email.id, alice.id);
        assert!(directory.find_by_username("ALICE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_by_id() {
        let directory = MemoryUserDirectory::new();
        let mut alice = directory.save(&user("alice")).await.unwrap();
        alice.not_locked = false;
        directory.save(&alice).await.unwrap();

        assert_eq!(directory.len(), 1);
        assert!(directory.find_by_username("alice").await.unwrap().unwrap().is_locked());
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_conflicts() {
        let directory = MemoryUserDirectory::new();
        directory.save(&user("alice")).await.unwrap();

        let err = directory.save(&user("alice")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.starts_with("Username"));

        let mut clash = user("bob");
        clash.email = "alice@example.com".to_string();
        let err = directory.save(&clash).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.starts_with("Email"));
    }

    #[tokio::test]
    async fn test_update_applies_to_stored_record() {
        let directory = MemoryUserDirectory::new();
        let snapshot = directory.save(&user("alice")).await.unwrap();

        let mut locked = snapshot.clone();
        locked.not_locked = false;
        directory.save(&locked).await.unwrap();

        let updated = directory
            .update("alice", Box::new(|u: &mut User| u.first_name = "Alice".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.first_name, "Alice");
        assert!(updated.is_locked());

        let missing = directory
            .update("ghost", Box::new(|u: &mut User| u.active = false))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_rename_conflicts() {
        let directory = MemoryUserDirectory::with_users([user("alice"), user("bob")]);
        let err = directory
            .update("bob", Box::new(|u: &mut User| u.username = "alice".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(directory.find_by_username("bob").await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_keep_usernames_unique() {
        let directory = MemoryUserDirectory::new();
        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let directory = directory.clone();
                tokio::spawn(async move { directory.save(&user("alice")).await })
            })
            .collect();

        let mut stored = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                stored += 1;
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let directory = MemoryUserDirectory::with_users([user("alice"), user("bob")]);
        let alice = directory.find_by_username("alice").await.unwrap().unwrap();

        assert!(directory.delete(&alice).await.unwrap());
        assert!(!directory.delete(&alice).await.unwrap());
        assert_eq!(directory.find_all().await.unwrap().len(), 1);
    }
}
