use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ReviewData;
use crate::rating::{RatingStats, calculate_rating_stats};
use crate::store::{ReviewClient, ReviewStore};
use crate::view::{Notice, ReviewList, ReviewView};

#[derive(Error, Debug, PartialEq)]
pub enum ControllerError {
    #[error("No workshop is open")]
    NoOpenSession,
    #[error("Rating {0} is out of range")]
    RatingOutOfRange(u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    Displaying,
    Submitting,
}

/// One visitor's open workshop detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSession {
    pub workshop_id: Option<String>,
    pub workshop_name: Option<String>,
    pub current_rating: u8,
    pub phase: SessionPhase,
}

impl ReviewSession {
    /// A session already showing `workshop_id`, for callers that submit
    /// without rendering the detail view first.
    pub fn displaying(workshop_id: &str, workshop_name: &str) -> Self {
        ReviewSession {
            workshop_id: Some(workshop_id.to_string()),
            workshop_name: Some(workshop_name.to_string()),
            current_rating: 0,
            phase: SessionPhase::Displaying,
        }
    }

    pub fn is_open_for(&self, workshop_id: &str) -> bool {
        self.workshop_id.as_deref() == Some(workshop_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Refused before reaching the store.
    Rejected,
    Saved,
    Failed,
}

pub struct ReviewController<S> {
    client: ReviewClient<S>,
}

impl<S: ReviewStore> ReviewController<S> {
    pub fn new(client: ReviewClient<S>) -> Self {
        ReviewController { client }
    }

    pub fn client(&self) -> &ReviewClient<S> {
        &self.client
    }

    /// Opens the detail view for a workshop and loads its reviews.
    pub async fn open_session<V: ReviewView>(
        &self,
        session: &mut ReviewSession,
        view: &mut V,
        workshop_id: &str,
        workshop_name: &str,
    ) -> Option<RatingStats> {
        session.workshop_id = Some(workshop_id.to_string());
        session.workshop_name = Some(workshop_name.to_string());
        session.current_rating = 0;
        view.render_rating_selector(0);
        self.reload(session, view).await
    }

    /// Re-fetches the open workshop's reviews and replaces what is rendered.
    /// Returns `None` when nothing is open or the store could not be read.
    pub async fn reload<V: ReviewView>(
        &self,
        session: &mut ReviewSession,
        view: &mut V,
    ) -> Option<RatingStats> {
        let workshop_id = session.workshop_id.clone()?;

        session.phase = SessionPhase::Loading;
        view.render_review_list(ReviewList::Loading);

        let loaded = self.client.get_reviews(&workshop_id).await;
        session.phase = SessionPhase::Displaying;

        match loaded {
            Ok(reviews) => {
                let stats = calculate_rating_stats(&reviews);
                view.render_modal_rating(&stats);
                view.render_review_list(ReviewList::from_reviews(&reviews));
                Some(stats)
            }
            Err(_) => {
                view.render_review_list(ReviewList::Unavailable);
                None
            }
        }
    }

    pub fn select_rating<V: ReviewView>(
        &self,
        session: &mut ReviewSession,
        view: &mut V,
        rating: u8,
    ) -> Result<(), ControllerError> {
        if rating > 5 {
            view.notify(Notice::InvalidRating);
            return Err(ControllerError::RatingOutOfRange(rating));
        }
        session.current_rating = rating;
        view.render_rating_selector(rating);
        Ok(())
    }

    /// Submits the selected rating with `comment` for the open workshop.
    ///
    /// An unset rating is refused without touching the store. On success
    /// the form and selector are reset and the detail view and the
    /// workshop's card are refreshed where the view shows them; on failure
    /// they are left as they were.
    /// The submit control is disabled only while the write is in flight.
    pub async fn submit_review<V: ReviewView>(
        &self,
        session: &mut ReviewSession,
        view: &mut V,
        comment: &str,
    ) -> Result<SubmitOutcome, ControllerError> {
        let workshop_id = session
            .workshop_id
            .clone()
            .ok_or(ControllerError::NoOpenSession)?;

        if session.current_rating == 0 {
            view.notify(Notice::NoRatingSelected);
            return Ok(SubmitOutcome::Rejected);
        }

        session.phase = SessionPhase::Submitting;
        view.set_submit_enabled(false);

        let data = ReviewData {
            rating: session.current_rating,
            comment: comment.to_string(),
        };
        let saved = self.client.save_review(&workshop_id, data).await;

        let outcome = if saved {
            view.notify(Notice::Thanks);
            view.reset_form();
            session.current_rating = 0;
            view.render_rating_selector(0);
            if view.shows_detail() {
                self.reload(session, view).await;
            }
            if view.shows_cards() {
                self.refresh_card_rating(view, &workshop_id).await;
            }
            SubmitOutcome::Saved
        } else {
            view.notify(Notice::SaveFailed);
            SubmitOutcome::Failed
        };

        session.phase = SessionPhase::Displaying;
        view.set_submit_enabled(true);
        Ok(outcome)
    }

    /// Renders the card aggregate for one workshop, independent of any
    /// open session. A read failure leaves the card as it was.
    pub async fn refresh_card_rating<V: ReviewView>(
        &self,
        view: &mut V,
        workshop_id: &str,
    ) -> Option<RatingStats> {
        let reviews = self.client.get_reviews(workshop_id).await.ok()?;
        let stats = calculate_rating_stats(&reviews);
        view.render_card_rating(workshop_id, &stats);
        Some(stats)
    }

    /// Page-load refresh of every card. Fetches run concurrently; rendering
    /// happens afterwards in the order given.
    pub async fn load_all_card_ratings<'a, V, I>(&self, view: &mut V, workshop_ids: I)
    where
        V: ReviewView,
        I: IntoIterator<Item = &'a str>,
    {
        let ids: Vec<&str> = workshop_ids.into_iter().collect();
        let fetched = join_all(ids.iter().map(|id| self.client.get_reviews(*id))).await;

        for (id, reviews) in ids.into_iter().zip(fetched) {
            match reviews {
                Ok(reviews) => view.render_card_rating(id, &calculate_rating_stats(&reviews)),
                Err(_) => log::warn!("Leaving card rating for {} unrendered", id),
            }
        }
    }
}
