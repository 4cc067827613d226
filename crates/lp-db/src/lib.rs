pub mod errors;
pub mod models;
pub mod pool;
pub mod schema;
pub mod store;

use deadpool_diesel::Runtime;
use deadpool_diesel::postgres::{Manager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use url::Url;

pub use errors::{DatabaseError, InitError};
pub use pool::TrackerPool;
pub use store::{MemoryStore, PgStore, PositionStore};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const MAX_POOL_SIZE: usize = 16;

/// Tags connections with `application_name` unless the URL already sets one.
fn with_application_name(database_url: &str, app_name: &str) -> String {
    let Ok(mut url) = Url::parse(database_url) else {
        return database_url.to_string();
    };
    if !url.query_pairs().any(|(key, _)| key == "application_name") {
        url.query_pairs_mut().append_pair("application_name", app_name);
    }
    url.to_string()
}

pub fn init_pool(app_name: &str, database_url: &str) -> Result<Pool, InitError> {
    let manager = Manager::new(
        with_application_name(database_url, app_name),
        Runtime::Tokio1,
    );
    Pool::builder(manager)
        .max_size(MAX_POOL_SIZE)
        .build()
        .map_err(|e| InitError::Pool(e.to_string()))
}

pub async fn run_migrations(pool: &Pool) -> Result<(), InitError> {
    let conn = pool
        .get()
        .await
        .map_err(|e| InitError::Pool(e.to_string()))?;

    let applied = conn
        .interact(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| InitError::Migration(e.to_string()))?
        .map_err(InitError::Migration)?;

    tracing::info!(applied, "Database migrations up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_name_is_appended_once() {
        let url = with_application_name("postgres://u:p@localhost:5432/lp", "lp_tracker");
        assert_eq!(url, "postgres://u:p@localhost:5432/lp?application_name=lp_tracker");

        let url = with_application_name(
            "postgres://localhost/lp?application_name=custom",
            "lp_tracker",
        );
        assert_eq!(url, "postgres://localhost/lp?application_name=custom");
    }
}
