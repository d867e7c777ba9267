//! User directory trait for account lookup and persistence.

use async_trait::async_trait;

use crate::result::AppResult;

/// Lookup and persistence of user records.
///
/// The trust-and-access core never assumes a storage technology. It reads
/// records through this trait and writes flag or timestamp changes back with
/// [`UserDirectory::update`], which applies the change to the stored record
/// rather than to an earlier snapshot. Implementations report their own
/// failures as `ErrorKind::DirectoryUnavailable`.
#[async_trait]
pub trait UserDirectory<Entity>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
{
    /// Find a record by its unique username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Entity>>;

    /// Find a record by its unique email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Entity>>;

    /// Insert or replace a record and return the stored version.
    async fn save(&self, entity: &Entity) -> AppResult<Entity>;

    /// Apply `apply` to the currently stored record for `username` and
    /// persist the result as one step. Returns the updated record, or
    /// `None` if no record exists.
    ///
    /// Concurrent writes to the same record must not be lost: the closure
    /// always sees the latest stored version.
    async fn update(
        &self,
        username: &str,
        apply: Box<dyn for<'u> FnOnce(&'u mut Entity) + Send>,
    ) -> AppResult<Option<Entity>>;

    /// Delete a record. Returns `true` if it existed.
    async fn delete(&self, entity: &Entity) -> AppResult<bool>;

    /// List every record.
    async fn find_all(&self) -> AppResult<Vec<Entity>>;
}
