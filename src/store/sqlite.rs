use diesel::{connection::SimpleConnection, prelude::*, r2d2::ConnectionManager};
use r2d2::Pool;

use super::{ReviewStore, StoreError};
use crate::model::{NewReview, Review};
use crate::schema::reviews;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const CREATE_REVIEWS: &str = "
    CREATE TABLE IF NOT EXISTS reviews (
        review_id INTEGER PRIMARY KEY AUTOINCREMENT,
        workshop_id TEXT NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        comment TEXT NOT NULL,
        author TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL
    );
    CREATE INDEX IF NOT EXISTS reviews_by_workshop
        ON reviews (workshop_id, created_at DESC);
";

/// Reviews kept in a SQLite table through an r2d2 pool.
#[derive(Clone)]
pub struct SqliteReviewStore {
    pool: DbPool,
}

impl SqliteReviewStore {
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = if is_in_memory(database_url) {
            // Every connection to an in-memory URL opens its own database.
            Pool::builder()
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .build(manager)?
        } else {
            Pool::builder().build(manager)?
        };
        Self::new(pool)
    }

    /// Wraps an existing pool and makes sure the table exists.
    pub fn new(pool: DbPool) -> Result<Self, StoreError> {
        let mut conn = pool.get()?;
        conn.batch_execute(CREATE_REVIEWS)?;
        Ok(SqliteReviewStore { pool })
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url == ":memory:" || database_url.contains("mode=memory")
}

impl ReviewStore for SqliteReviewStore {
    async fn insert(&self, review: NewReview) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut conn = pool.get()?;
            diesel::insert_into(reviews::table)
                .values(&review)
                .execute(&mut conn)?;
            Ok(())
        })
        .await?
    }

    async fn query(&self, workshop_id: &str) -> Result<Vec<Review>, StoreError> {
        let pool = self.pool.clone();
        let workshop_id = workshop_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Review>, StoreError> {
            let mut conn = pool.get()?;
            let found = reviews::table
                .filter(reviews::workshop_id.eq(&workshop_id))
                .order((reviews::created_at.desc(), reviews::review_id.desc()))
                .select(Review::as_select())
                .load(&mut conn)?;
            Ok(found)
        })
        .await?
    }
}
