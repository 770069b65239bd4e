pub mod session;

use axum::response::Html;
use tera::{Context, Tera};

use crate::error::AppError;

pub use session::{load_review_session, save_review_session};

pub fn render_template(tera: &Tera, template_name: &str, context: &Context) -> Result<Html<String>, AppError> {
    tera.render(template_name, context).map(Html).map_err(|e| {
        log::error!("Error rendering template {}: {}", template_name, e);
        AppError::from(e)
    })
}
