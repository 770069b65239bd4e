use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use validator::Validate;

use super::AppState;
use crate::controller::{ReviewSession, SubmitOutcome};
use crate::error::AppError;
use crate::model::{ApiResponse, Review, ReviewForm};
use crate::rating::{RatingStats, calculate_rating_stats, stars_glyph};
use crate::view::{Notice, PageView, RatingSummary};

#[derive(Serialize)]
pub struct CardRating {
    pub workshop_id: String,
    #[serde(flatten)]
    pub rating: RatingSummary,
}

#[derive(Serialize)]
pub struct WorkshopReviews {
    pub workshop_id: String,
    pub stats: RatingStats,
    pub stars: String,
    pub reviews: Vec<Review>,
}

pub async fn card_ratings(State(state): State<AppState>) -> Json<Vec<CardRating>> {
    let mut view = PageView::new(&state.catalog);
    state
        .controller
        .load_all_card_ratings(&mut view, state.catalog.ids())
        .await;

    Json(
        state
            .catalog
            .ids()
            .map(|id| CardRating {
                workshop_id: id.to_string(),
                rating: view.card(id),
            })
            .collect(),
    )
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(workshop_id): Path<String>,
) -> Result<Json<WorkshopReviews>, AppError> {
    let reviews = state.controller.client().get_reviews(&workshop_id).await?;
    let stats = calculate_rating_stats(&reviews);

    Ok(Json(WorkshopReviews {
        workshop_id,
        stars: stars_glyph(stats.average),
        stats,
        reviews,
    }))
}

/// Workshop ids are not checked against the catalog here; reviews for an
/// unlisted id are stored like any other.
pub async fn create_review(
    State(state): State<AppState>,
    Path(workshop_id): Path<String>,
    payload: Result<Json<ReviewForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let workshop_name = state
        .catalog
        .find(&workshop_id)
        .map(|w| w.name.as_str())
        .unwrap_or(workshop_id.as_str());
    let mut review_session = ReviewSession::displaying(&workshop_id, workshop_name);
    let mut view = PageView::headless(&state.catalog);

    state
        .controller
        .select_rating(&mut review_session, &mut view, payload.rating)?;

    match state
        .controller
        .submit_review(&mut review_session, &mut view, &payload.comment)
        .await?
    {
        SubmitOutcome::Saved => Ok((
            StatusCode::CREATED,
            Json(ApiResponse {
                success: true,
                message: Notice::Thanks.message().to_string(),
            }),
        )),
        SubmitOutcome::Rejected => Err(AppError::ValidationError(
            Notice::NoRatingSelected.message().to_string(),
        )),
        SubmitOutcome::Failed => Err(AppError::SaveFailed),
    }
}
