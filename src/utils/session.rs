use tower_sessions::Session;

use crate::controller::ReviewSession;
use crate::error::AppError;

const REVIEW_SESSION_KEY: &str = "review_session";

/// The visitor's review session, or a fresh idle one.
pub async fn load_review_session(session: &Session) -> ReviewSession {
    match session.get::<ReviewSession>(REVIEW_SESSION_KEY).await {
        Ok(Some(review_session)) => review_session,
        Ok(None) => ReviewSession::default(),
        Err(e) => {
            log::warn!("Discarding unreadable review session: {}", e);
            ReviewSession::default()
        }
    }
}

pub async fn save_review_session(
    session: &Session,
    review_session: &ReviewSession,
) -> Result<(), AppError> {
    session.insert(REVIEW_SESSION_KEY, review_session).await?;
    Ok(())
}
