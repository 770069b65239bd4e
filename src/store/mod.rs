pub mod client;
pub mod memory;
pub mod sqlite;

use thiserror::Error;

use crate::model::{NewReview, Review};

pub use client::ReviewClient;
pub use memory::MemoryReviewStore;
pub use sqlite::SqliteReviewStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The review collection: append one record, or list one workshop's
/// records newest first.
pub trait ReviewStore: Send + Sync {
    fn insert(&self, review: NewReview) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Reviews for `workshop_id`, ordered by `created_at` descending.
    /// Equal timestamps fall back to `review_id` descending.
    fn query(
        &self,
        workshop_id: &str,
    ) -> impl Future<Output = Result<Vec<Review>, StoreError>> + Send;
}

/// Store selected at startup from the configuration.
pub enum StoreBackend {
    Sqlite(SqliteReviewStore),
    Memory(MemoryReviewStore),
}

impl ReviewStore for StoreBackend {
    async fn insert(&self, review: NewReview) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(store) => store.insert(review).await,
            StoreBackend::Memory(store) => store.insert(review).await,
        }
    }

    async fn query(&self, workshop_id: &str) -> Result<Vec<Review>, StoreError> {
        match self {
            StoreBackend::Sqlite(store) => store.query(workshop_id).await,
            StoreBackend::Memory(store) => store.query(workshop_id).await,
        }
    }
}
