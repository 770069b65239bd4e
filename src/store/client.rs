use chrono::Utc;

use super::{ReviewStore, StoreError};
use crate::model::{NewReview, Review, ReviewData};

/// Application-facing wrapper around a [`ReviewStore`].
pub struct ReviewClient<S> {
    store: S,
}

impl<S: ReviewStore> ReviewClient<S> {
    pub fn new(store: S) -> Self {
        ReviewClient { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends one review. Failures are logged and reported as `false`,
    /// never propagated.
    pub async fn save_review(&self, workshop_id: &str, data: ReviewData) -> bool {
        if workshop_id.is_empty() {
            log::warn!("Refusing to save a review without a workshop id");
            return false;
        }

        let review = NewReview::new(workshop_id, data, Utc::now().naive_utc());
        match self.store.insert(review).await {
            Ok(()) => {
                log::info!("Saved review for workshop {}", workshop_id);
                true
            }
            Err(e) => {
                log::error!("Failed to save review for workshop {}: {}", workshop_id, e);
                false
            }
        }
    }

    /// Reviews for one workshop, newest first. An empty list means the
    /// workshop has no reviews; a store failure is an `Err`.
    pub async fn get_reviews(&self, workshop_id: &str) -> Result<Vec<Review>, StoreError> {
        self.store.query(workshop_id).await.map_err(|e| {
            log::error!("Failed to load reviews for workshop {}: {}", workshop_id, e);
            e
        })
    }
}
