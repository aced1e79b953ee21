//! Fills the configured database with demo tags, posts and comments

use blog_api::config::AppConfig;
use blog_api::infrastructure::{database, seed};
use blog_api::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let config = AppConfig::from_env()?;
    let pool = database::connect(&config.database).await?;
    database::migrate(&pool).await?;

    let result = seed::seed_database(&pool).await;
    pool.close().await;

    match result {
        Ok(()) => {
            tracing::info!("Database was filled");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Seeding failed");
            Err(e.into())
        }
    }
}
