pub mod error;
pub mod legacy;
pub mod migrations;
pub mod sqlite_store;

pub use error::StoreError;
pub use sqlite_store::SqliteProjectStore;

use async_trait::async_trait;
use shared_types::ProjectSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Durable collection of project snapshots keyed by id.
///
/// Each operation is atomic for the single record it touches. Callers that
/// need ordering between two operations must await the first before issuing
/// the second.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert or replace a snapshot and return its id. An empty id is replaced
    /// by a freshly generated one; `last_modified` is always stamped with the
    /// current time.
    async fn save(&self, snapshot: ProjectSnapshot) -> Result<String, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<ProjectSnapshot>, StoreError>;

    /// Every structurally valid snapshot, most recently modified first.
    async fn list_all(&self) -> Result<Vec<ProjectSnapshot>, StoreError>;

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}
