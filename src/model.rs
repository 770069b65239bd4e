use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::reviews;

/// Author recorded on every review; the site has no accounts.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Stored in place of an empty comment.
pub const EMPTY_COMMENT: &str = "No comment";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Review {
    pub review_id: i32,
    pub workshop_id: String,
    pub rating: i32,
    pub comment: String,
    pub author: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReview {
    pub workshop_id: String,
    pub rating: i32,
    pub comment: String,
    pub author: String,
    pub created_at: NaiveDateTime,
}

impl NewReview {
    /// Builds the full record for a submission, filling in the placeholders.
    pub fn new(workshop_id: &str, data: ReviewData, created_at: NaiveDateTime) -> Self {
        let comment = data.comment.trim();
        NewReview {
            workshop_id: workshop_id.to_string(),
            rating: i32::from(data.rating),
            comment: if comment.is_empty() {
                EMPTY_COMMENT.to_string()
            } else {
                comment.to_string()
            },
            author: ANONYMOUS_AUTHOR.to_string(),
            created_at,
        }
    }
}

/// What a visitor actually submits.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewData {
    pub rating: u8,
    pub comment: String,
}

/// Review form, shared by the HTML form and the JSON API.
/// A missing rating deserializes to 0 ("unset").
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReviewForm {
    #[serde(default)]
    #[validate(range(max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: String,
}

/// Sent by a star button; carries the comment draft along so it survives
/// the round trip.
#[derive(Debug, Deserialize)]
pub struct RatingForm {
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Standard API response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}
