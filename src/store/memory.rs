use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::RwLock;

use super::{ReviewStore, StoreError};
use crate::model::{NewReview, Review};

/// Process-local review collection, lost on restart.
///
/// Reads and writes can be made to fail on demand, which is how the
/// controller's failure paths are exercised.
#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    reviews: RwLock<Vec<Review>>,
    inserts: AtomicUsize,
    queries: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of insert attempts, including refused ones.
    pub fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of query attempts, including refused ones.
    pub fn query_attempts(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<(), StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes are disabled".into()));
        }

        let mut reviews = self.reviews.write().await;
        let review_id = reviews.len() as i32 + 1;
        reviews.push(Review {
            review_id,
            workshop_id: review.workshop_id,
            rating: review.rating,
            comment: review.comment,
            author: review.author,
            created_at: review.created_at,
        });
        Ok(())
    }

    async fn query(&self, workshop_id: &str) -> Result<Vec<Review>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads are disabled".into()));
        }

        let mut found: Vec<Review> = self
            .reviews
            .read()
            .await
            .iter()
            .filter(|review| review.workshop_id == workshop_id)
            .cloned()
            .collect();
        found.sort_by_key(|review| Reverse((review.created_at, review.review_id)));
        Ok(found)
    }
}
