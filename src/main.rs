use std::sync::Arc;

use anyhow::Context as _;
use tera::Tera;
use tokio::net::TcpListener;

mod config;
mod controller;
mod error;
mod handlers;
mod model;
mod rating;
mod schema;
mod store;
mod utils;
mod view;
mod workshops;

use config::{Config, StoreKind};
use controller::ReviewController;
use handlers::AppState;
use store::{MemoryReviewStore, ReviewClient, SqliteReviewStore, StoreBackend};
use workshops::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("Invalid configuration")?;

    // Workshops shown on the page
    let catalog = match &config.workshops_file {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::builtin(),
    };
    log::info!("Loaded {} workshops", catalog.all().len());

    // Review store
    let store = match &config.store {
        StoreKind::Sqlite { database_url } => StoreBackend::Sqlite(
            SqliteReviewStore::connect(database_url)
                .with_context(|| format!("Failed to open review database {}", database_url))?,
        ),
        StoreKind::Memory => StoreBackend::Memory(MemoryReviewStore::new()),
    };

    // Templates configuration
    let templates = Tera::new(&config.templates_glob).context("Template parsing error")?;

    let state = AppState {
        controller: Arc::new(ReviewController::new(ReviewClient::new(store))),
        catalog: Arc::new(catalog),
        templates: Arc::new(templates),
    };
    let app = handlers::router(state, &config.static_dir);

    // Start server
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;

    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
