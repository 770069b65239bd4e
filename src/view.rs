use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::model::Review;
use crate::rating::{RatingStats, rating_label, stars_glyph};
use crate::workshops::Catalog;

const MUTED_STARS: &str = "★★★★★";
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Rendering surface the review controller talks to.
pub trait ReviewView {
    fn render_card_rating(&mut self, workshop_id: &str, stats: &RatingStats);
    fn render_modal_rating(&mut self, stats: &RatingStats);
    fn render_review_list(&mut self, list: ReviewList);
    fn render_rating_selector(&mut self, rating: u8);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn notify(&mut self, notice: Notice);
    fn reset_form(&mut self);

    /// Whether the detail view is on screen, and so worth reloading after a save.
    fn shows_detail(&self) -> bool {
        true
    }

    /// Whether workshop cards are on screen, and so worth refreshing after a save.
    fn shows_cards(&self) -> bool {
        true
    }
}

/// State of the review list in the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum ReviewList {
    Loading,
    Empty,
    Unavailable,
    Reviews(Vec<ReviewItem>),
}

impl ReviewList {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            ReviewList::Empty
        } else {
            ReviewList::Reviews(reviews.iter().map(ReviewItem::from).collect())
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ReviewList::Loading => Some("Loading reviews..."),
            ReviewList::Empty => Some("No reviews for this workshop yet. Be the first!"),
            ReviewList::Unavailable => Some("Reviews could not be loaded. Please try again later."),
            ReviewList::Reviews(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub stars: String,
    pub author: String,
    pub date: String,
    pub comment: String,
}

impl From<&Review> for ReviewItem {
    fn from(review: &Review) -> Self {
        ReviewItem {
            stars: stars_glyph(f64::from(review.rating)),
            author: review.author.clone(),
            date: review.created_at.format(DATE_FORMAT).to_string(),
            comment: review.comment.clone(),
        }
    }
}

/// Stars plus caption for a card or the detail header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub stars: String,
    pub muted: bool,
    pub text: String,
}

impl RatingSummary {
    fn stars_for(stats: &RatingStats) -> (String, bool) {
        if stats.is_empty() {
            (MUTED_STARS.to_string(), true)
        } else {
            (stars_glyph(stats.average), false)
        }
    }

    /// Featured cards spell out "reviews"; the compact cards only show the count.
    pub fn card(stats: &RatingStats, featured: bool) -> Self {
        let (stars, muted) = Self::stars_for(stats);
        let text = match (stats.is_empty(), featured) {
            (true, true) => "(0 reviews)".to_string(),
            (true, false) => "(0)".to_string(),
            (false, true) => format!("{:.1} ({} reviews)", stats.average, stats.count),
            (false, false) => format!("{:.1} ({})", stats.average, stats.count),
        };
        RatingSummary { stars, muted, text }
    }

    pub fn modal(stats: &RatingStats) -> Self {
        let (stars, muted) = Self::stars_for(stats);
        let text = if stats.is_empty() {
            "No reviews yet".to_string()
        } else {
            format!("{:.1} out of 5 ({} reviews)", stats.average, stats.count)
        };
        RatingSummary { stars, muted, text }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoRatingSelected,
    InvalidRating,
    Thanks,
    SaveFailed,
}

impl Notice {
    pub fn level(self) -> NoticeLevel {
        match self {
            Notice::Thanks => NoticeLevel::Success,
            _ => NoticeLevel::Error,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::NoRatingSelected => "Please select a rating",
            Notice::InvalidRating => "Ratings go from 1 to 5 stars",
            Notice::Thanks => "Thank you for your review!",
            Notice::SaveFailed => "There was an error saving your review.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeView {
    pub level: NoticeLevel,
    pub message: &'static str,
}

/// Collects what the controller renders during one request so the page
/// template (or a JSON handler) can read it back.
#[derive(Debug, Serialize)]
pub struct PageView {
    #[serde(skip)]
    featured: HashSet<String>,
    #[serde(skip)]
    detail: bool,
    #[serde(skip)]
    cards_shown: bool,
    pub cards: BTreeMap<String, RatingSummary>,
    pub modal: Option<RatingSummary>,
    pub reviews: Option<ReviewList>,
    pub rating: u8,
    pub rating_label: &'static str,
    pub submit_enabled: bool,
    pub notices: Vec<NoticeView>,
    pub comment: String,
}

impl PageView {
    pub fn new(catalog: &Catalog) -> Self {
        PageView {
            featured: catalog.featured_ids().map(str::to_string).collect(),
            detail: true,
            cards_shown: true,
            cards: BTreeMap::new(),
            modal: None,
            reviews: None,
            rating: 0,
            rating_label: rating_label(0),
            submit_enabled: true,
            notices: Vec::new(),
            comment: String::new(),
        }
    }

    /// The workshop detail page, which has no cards on it.
    pub fn detail(catalog: &Catalog) -> Self {
        PageView {
            cards_shown: false,
            ..Self::new(catalog)
        }
    }

    /// Nothing on screen; only the notices are read back.
    pub fn headless(catalog: &Catalog) -> Self {
        PageView {
            detail: false,
            cards_shown: false,
            ..Self::new(catalog)
        }
    }

    /// Keeps the visitor's draft so a refused submit does not lose it.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Card summary, falling back to the muted placeholder when nothing
    /// was rendered for that workshop.
    pub fn card(&self, workshop_id: &str) -> RatingSummary {
        self.cards.get(workshop_id).cloned().unwrap_or_else(|| {
            RatingSummary::card(&RatingStats::EMPTY, self.featured.contains(workshop_id))
        })
    }
}

impl ReviewView for PageView {
    fn render_card_rating(&mut self, workshop_id: &str, stats: &RatingStats) {
        let featured = self.featured.contains(workshop_id);
        self.cards
            .insert(workshop_id.to_string(), RatingSummary::card(stats, featured));
    }

    fn render_modal_rating(&mut self, stats: &RatingStats) {
        self.modal = Some(RatingSummary::modal(stats));
    }

    fn render_review_list(&mut self, list: ReviewList) {
        self.reviews = Some(list);
    }

    fn render_rating_selector(&mut self, rating: u8) {
        self.rating = rating;
        self.rating_label = rating_label(rating);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(NoticeView {
            level: notice.level(),
            message: notice.message(),
        });
    }

    fn reset_form(&mut self) {
        self.comment.clear();
    }

    fn shows_detail(&self) -> bool {
        self.detail
    }

    fn shows_cards(&self) -> bool {
        self.cards_shown
    }
}
