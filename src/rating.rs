use serde::Serialize;

use crate::model::Review;

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';
const MAX_STARS: usize = 5;

/// Average and count over one workshop's reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingStats {
    pub average: f64,
    pub count: usize,
}

impl RatingStats {
    pub const EMPTY: RatingStats = RatingStats {
        average: 0.0,
        count: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Computes the mean rating rounded to one decimal place.
///
/// Rounding is half away from zero and done in integer arithmetic, so an
/// exact mean of 4.25 always yields 4.3 regardless of float representation.
pub fn calculate_rating_stats(reviews: &[Review]) -> RatingStats {
    if reviews.is_empty() {
        return RatingStats::EMPTY;
    }

    let count = reviews.len();
    let sum: i64 = reviews.iter().map(|review| i64::from(review.rating)).sum();

    RatingStats {
        average: round_tenths(sum, count as i64) as f64 / 10.0,
        count,
    }
}

/// `round(10 * sum / n)`, halves away from zero.
fn round_tenths(sum: i64, n: i64) -> i64 {
    let magnitude = (20 * sum.abs() + n) / (2 * n);
    if sum < 0 { -magnitude } else { magnitude }
}

/// Renders exactly five glyphs, `round(average)` of them filled.
pub fn stars_glyph(average: f64) -> String {
    let filled = if average.is_nan() {
        0
    } else {
        average.round().clamp(0.0, MAX_STARS as f64) as usize
    };

    std::iter::repeat_n(FILLED_STAR, filled)
        .chain(std::iter::repeat_n(EMPTY_STAR, MAX_STARS - filled))
        .collect()
}

/// Label shown next to the rating selector.
pub fn rating_label(rating: u8) -> &'static str {
    match rating {
        1 => "Very bad",
        2 => "Bad",
        3 => "Fair",
        4 => "Good",
        5 => "Excellent",
        _ => "Select a rating",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reviews_with(ratings: &[i32]) -> Vec<Review> {
        let created_at = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ratings
            .iter()
            .enumerate()
            .map(|(i, rating)| Review {
                review_id: i as i32 + 1,
                workshop_id: "w1".into(),
                rating: *rating,
                comment: "ok".into(),
                author: "Anonymous".into(),
                created_at,
            })
            .collect()
    }

    #[test]
    fn three_reviews_average_to_four() {
        let stats = calculate_rating_stats(&reviews_with(&[5, 3, 4]));
        assert_eq!(stats, RatingStats { average: 4.0, count: 3 });
        assert_eq!(stars_glyph(stats.average), "★★★★☆");
    }

    #[test]
    fn no_reviews_gives_zero_stats() {
        let stats = calculate_rating_stats(&[]);
        assert_eq!(stats, RatingStats { average: 0.0, count: 0 });
        assert!(stats.is_empty());
    }

    #[test]
    fn quarter_rounds_up() {
        // 17 / 4 = 4.25
        let stats = calculate_rating_stats(&reviews_with(&[5, 4, 4, 4]));
        assert_eq!(stats.average, 4.3);
    }

    #[test]
    fn three_quarters_of_a_tenth_rounds_up() {
        // 87 / 20 = 4.35, which is 4.3499.. as a float
        let mut ratings = vec![4; 13];
        ratings.extend([5; 7]);
        let stats = calculate_rating_stats(&reviews_with(&ratings));
        assert_eq!(stats.count, 20);
        assert_eq!(stats.average, 4.4);
    }

    #[test]
    fn below_half_rounds_down() {
        // 11 / 3 = 3.666..
        let stats = calculate_rating_stats(&reviews_with(&[4, 4, 3]));
        assert_eq!(stats.average, 3.7);
        // 7 / 3 = 2.333..
        let stats = calculate_rating_stats(&reviews_with(&[3, 2, 2]));
        assert_eq!(stats.average, 2.3);
    }

    #[test]
    fn single_review_is_its_own_average() {
        let stats = calculate_rating_stats(&reviews_with(&[1]));
        assert_eq!(stats, RatingStats { average: 1.0, count: 1 });
    }

    #[test]
    fn stars_always_five_glyphs() {
        for average in [-3.0, 0.0, 0.4, 0.5, 2.49, 2.5, 4.3, 4.5, 5.0, 9.0, f64::NAN] {
            let glyphs = stars_glyph(average);
            assert_eq!(glyphs.chars().count(), 5, "average {average}");
        }
    }

    #[test]
    fn stars_round_and_clamp() {
        assert_eq!(stars_glyph(0.0), "☆☆☆☆☆");
        assert_eq!(stars_glyph(0.5), "★☆☆☆☆");
        assert_eq!(stars_glyph(2.49), "★★☆☆☆");
        assert_eq!(stars_glyph(4.5), "★★★★★");
        assert_eq!(stars_glyph(7.2), "★★★★★");
        assert_eq!(stars_glyph(-1.0), "☆☆☆☆☆");
        assert_eq!(stars_glyph(f64::NAN), "☆☆☆☆☆");
    }

    #[test]
    fn labels_cover_selector_range() {
        assert_eq!(rating_label(0), "Select a rating");
        assert_eq!(rating_label(1), "Very bad");
        assert_eq!(rating_label(5), "Excellent");
        assert_eq!(rating_label(9), "Select a rating");
    }
}
