use async_trait::async_trait;
use sqlx::PgPool;

use crate::snapshots::{get_snapshot, list_snapshots, SnapshotRow, StoredSnapshot};
use crate::DbError;

/// Read access to persisted snapshots, as the HTTP layer needs it.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Every stored row, payloads untouched.
    async fn list(&self) -> Result<Vec<SnapshotRow>, DbError>;

    /// One snapshot with its payload normalized, or `None` if no row has `id`.
    async fn get(&self, id: i64) -> Result<Option<StoredSnapshot>, DbError>;

    async fn ping(&self) -> Result<(), DbError>;
}

#[async_trait]
impl SnapshotStore for PgPool {
    async fn list(&self) -> Result<Vec<SnapshotRow>, DbError> {
        list_snapshots(self).await
    }

    async fn get(&self, id: i64) -> Result<Option<StoredSnapshot>, DbError> {
        get_snapshot(self, id)
            .await?
            .map(StoredSnapshot::from_row)
            .transpose()
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(self).await
    }
}
