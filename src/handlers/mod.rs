pub mod api;
pub mod pages;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, get_service, post},
};
use tera::Tera;
use time::Duration;
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::controller::ReviewController;
use crate::error::AppError;
use crate::store::StoreBackend;
use crate::workshops::{Catalog, Workshop};

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ReviewController<StoreBackend>>,
    pub catalog: Arc<Catalog>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn workshop(&self, workshop_id: &str) -> Result<&Workshop, AppError> {
        self.catalog
            .find(workshop_id)
            .ok_or_else(|| AppError::WorkshopNotFound(workshop_id.to_string()))
    }
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    // Sessions configuration
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)))
        .with_secure(false);

    let api_router = Router::new()
        .route("/workshops/ratings", get(api::card_ratings))
        .route(
            "/workshops/{id}/reviews",
            get(api::list_reviews).post(api::create_review),
        );

    Router::new()
        .route("/", get(pages::home))
        .route("/workshops/{id}", get(pages::workshop_detail))
        .route("/workshops/{id}/rating", post(pages::select_rating))
        .route("/workshops/{id}/reviews", post(pages::submit_review))
        .nest("/api", api_router)
        .nest_service("/static", get_service(ServeDir::new(static_dir)))
        .layer(session_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::model::EMPTY_COMMENT;
    use crate::store::{MemoryReviewStore, ReviewClient};

    fn test_state() -> AppState {
        let templates =
            Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html")).unwrap();
        AppState {
            controller: Arc::new(ReviewController::new(ReviewClient::new(
                StoreBackend::Memory(MemoryReviewStore::new()),
            ))),
            catalog: Arc::new(Catalog::builtin()),
            templates: Arc::new(templates),
        }
    }

    fn memory(state: &AppState) -> &MemoryReviewStore {
        match state.controller.client().store() {
            StoreBackend::Memory(store) => store,
            StoreBackend::Sqlite(_) => panic!("tests run on the memory store"),
        }
    }

    fn app(state: &AppState) -> Router {
        router(state.clone(), Path::new("static"))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn api_review_roundtrip() {
        let state = test_state();

        let response = app(&state)
            .oneshot(json_post(
                "/api/workshops/moda-andina/reviews",
                r#"{"rating": 5, "comment": "Beautiful knitwear"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app(&state)
            .oneshot(
                Request::get("/api/workshops/moda-andina/reviews")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["stats"]["count"], 1);
        assert_eq!(json["stats"]["average"], 5.0);
        assert_eq!(json["stars"], "★★★★★");
        assert_eq!(json["reviews"][0]["comment"], "Beautiful knitwear");
    }

    #[tokio::test]
    async fn api_refuses_unset_rating() {
        let state = test_state();
        let response = app(&state)
            .oneshot(json_post("/api/workshops/w1/reviews", r#"{"comment": "no stars"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(memory(&state).insert_attempts(), 0);
    }

    #[tokio::test]
    async fn api_malformed_body_is_a_json_bad_request() {
        let state = test_state();
        for body in [r#"{"rating": 4.5}"#, r#"{"rating": -1}"#, r#"{"rating": "4"}"#, "{"] {
            let response = app(&state)
                .oneshot(json_post("/api/workshops/w1/reviews", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            let json: serde_json::Value =
                serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(json["status"], 400);
            assert!(json["error"].as_str().unwrap().starts_with("Malformed request body"));
        }
        assert_eq!(memory(&state).insert_attempts(), 0);
    }

    #[tokio::test]
    async fn api_reports_write_failure() {
        let state = test_state();
        memory(&state).fail_writes(true);
        let response = app(&state)
            .oneshot(json_post("/api/workshops/w1/reviews", r#"{"rating": 3}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn api_read_failure_is_not_an_empty_list() {
        let state = test_state();
        memory(&state).fail_reads(true);
        let response = app(&state)
            .oneshot(
                Request::get("/api/workshops/w1/reviews")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], 502);
    }

    #[tokio::test]
    async fn card_ratings_cover_the_catalog() {
        let state = test_state();
        let response = app(&state)
            .oneshot(
                Request::get("/api/workshops/ratings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let cards = json.as_array().unwrap();
        assert_eq!(cards.len(), state.catalog.all().len());
        assert_eq!(cards[0]["workshop_id"], "confecciones-elite");
        assert_eq!(cards[0]["text"], "(0 reviews)");
    }

    #[tokio::test]
    async fn home_lists_workshops() {
        let state = test_state();
        let response = app(&state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Confecciones Elite"));
        assert!(html.contains("Bordados Luna"));
    }

    #[tokio::test]
    async fn unknown_workshop_page_is_not_found() {
        let state = test_state();
        let response = app(&state)
            .oneshot(Request::get("/workshops/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn detail_page_shows_no_reviews_placeholder() {
        let state = test_state();
        let response = app(&state)
            .oneshot(
                Request::get("/workshops/textiles-del-sur")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("No reviews for this workshop yet"));
        assert!(html.contains("No reviews yet"));
    }

    #[tokio::test]
    async fn form_submit_saves_placeholder_comment() {
        let state = test_state();
        let response = app(&state)
            .oneshot(form_post("/workshops/costura-creativa/reviews", "rating=4&comment="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Thank you for your review!"));
        assert!(html.contains("4.0 out of 5 (1 reviews)"));

        let reviews = state
            .controller
            .client()
            .get_reviews("costura-creativa")
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].comment, EMPTY_COMMENT);
    }

    #[tokio::test]
    async fn form_submit_without_rating_keeps_draft() {
        let state = test_state();
        let response = app(&state)
            .oneshot(form_post(
                "/workshops/costura-creativa/reviews",
                "comment=Quick+turnaround",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Please select a rating"));
        assert!(html.contains("Quick turnaround"));
        assert_eq!(memory(&state).insert_attempts(), 0);
    }

    fn session_cookie(response: &axum::response::Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn star_button_selects_rating_for_the_next_submit() {
        let state = test_state();
        let app = app(&state);

        let response = app
            .clone()
            .oneshot(form_post(
                "/workshops/bordados-luna/rating",
                "rating=4&comment=Neat+stitching",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);
        let html = body_string(response).await;
        assert!(html.contains(r#"<span id="ratingText">Good</span>"#));
        assert!(html.contains("Neat stitching"));
        assert!(html.contains(r#"formaction="/workshops/bordados-luna/rating""#));
        assert_eq!(memory(&state).insert_attempts(), 0);

        let mut request = form_post("/workshops/bordados-luna/reviews", "comment=Neat+stitching");
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Thank you for your review!"));

        let reviews = state
            .controller
            .client()
            .get_reviews("bordados-luna")
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 4);
        assert_eq!(reviews[0].comment, "Neat stitching");
    }

    #[tokio::test]
    async fn star_button_out_of_range_shows_notice() {
        let state = test_state();
        let response = app(&state)
            .oneshot(form_post("/workshops/bordados-luna/rating", "rating=9"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Ratings go from 1 to 5 stars"));
        assert_eq!(memory(&state).insert_attempts(), 0);
    }
}
