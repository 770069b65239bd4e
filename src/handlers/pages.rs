use axum::{
    extract::{Form, Path, State},
    response::Html,
};
use serde::Serialize;
use tera::Context;
use tower_sessions::Session;
use validator::Validate;

use super::AppState;
use crate::controller::ReviewSession;
use crate::error::AppError;
use crate::model::{RatingForm, ReviewForm};
use crate::utils::{load_review_session, render_template, save_review_session};
use crate::view::{PageView, RatingSummary, ReviewView};
use crate::workshops::Workshop;

#[derive(Serialize)]
struct WorkshopCard<'a> {
    workshop: &'a Workshop,
    rating: RatingSummary,
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut view = PageView::new(&state.catalog);
    state
        .controller
        .load_all_card_ratings(&mut view, state.catalog.ids())
        .await;

    let (featured, others): (Vec<_>, Vec<_>) = state
        .catalog
        .all()
        .iter()
        .map(|workshop| WorkshopCard {
            workshop,
            rating: view.card(&workshop.id),
        })
        .partition(|card| card.workshop.featured);

    let mut context = Context::new();
    context.insert("title", "Textile workshops");
    context.insert("featured", &featured);
    context.insert("workshops", &others);
    render_template(&state.templates, "index.html", &context)
}

pub async fn workshop_detail(
    State(state): State<AppState>,
    Path(workshop_id): Path<String>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let workshop = state.workshop(&workshop_id)?;
    let mut view = PageView::detail(&state.catalog);
    let mut review_session = ReviewSession::default();

    state
        .controller
        .open_session(&mut review_session, &mut view, &workshop.id, &workshop.name)
        .await;

    save_review_session(&session, &review_session).await?;
    render_detail(&state, workshop, &view)
}

pub async fn select_rating(
    State(state): State<AppState>,
    Path(workshop_id): Path<String>,
    session: Session,
    Form(form): Form<RatingForm>,
) -> Result<Html<String>, AppError> {
    let workshop = state.workshop(&workshop_id)?;
    let mut view = PageView::detail(&state.catalog).with_comment(&form.comment);
    let mut review_session = resume(&state, &session, workshop, &mut view).await;

    if let Err(e) = state
        .controller
        .select_rating(&mut review_session, &mut view, form.rating)
    {
        log::debug!("Rating not applied: {}", e);
    }

    save_review_session(&session, &review_session).await?;
    render_detail(&state, workshop, &view)
}

pub async fn submit_review(
    State(state): State<AppState>,
    Path(workshop_id): Path<String>,
    session: Session,
    Form(form): Form<ReviewForm>,
) -> Result<Html<String>, AppError> {
    form.validate()?;

    let workshop = state.workshop(&workshop_id)?;
    let mut view = PageView::detail(&state.catalog).with_comment(&form.comment);
    let mut review_session = resume(&state, &session, workshop, &mut view).await;

    // No rating in the form means the one picked earlier with the star buttons.
    if form.rating != 0 {
        state
            .controller
            .select_rating(&mut review_session, &mut view, form.rating)?;
    }
    state
        .controller
        .submit_review(&mut review_session, &mut view, &form.comment)
        .await?;

    save_review_session(&session, &review_session).await?;
    render_detail(&state, workshop, &view)
}

/// Picks up the visitor's session for `workshop`, opening it when the
/// visitor was looking at another workshop (or none).
async fn resume(
    state: &AppState,
    session: &Session,
    workshop: &Workshop,
    view: &mut PageView,
) -> ReviewSession {
    let mut review_session = load_review_session(session).await;

    if review_session.is_open_for(&workshop.id) {
        view.render_rating_selector(review_session.current_rating);
        state.controller.reload(&mut review_session, view).await;
    } else {
        state
            .controller
            .open_session(&mut review_session, view, &workshop.id, &workshop.name)
            .await;
    }

    review_session
}

fn render_detail(
    state: &AppState,
    workshop: &Workshop,
    view: &PageView,
) -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    context.insert("title", &workshop.name);
    context.insert("workshop", workshop);
    context.insert("view", view);
    context.insert(
        "reviews_placeholder",
        &view.reviews.as_ref().and_then(|list| list.placeholder()),
    );
    context.insert("rating_choices", &[1u8, 2, 3, 4, 5]);
    render_template(&state.templates, "workshop.html", &context)
}
