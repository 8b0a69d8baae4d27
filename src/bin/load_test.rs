//! Seeds students, courses and enrollments in bulk, then exercises the
//! populate query, a forced transaction rollback and the email index.
//!
//! Destroys all data in the configured database.

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use enrollment_backend::config::MongoConfig;
use enrollment_backend::repository::database::Database;
use enrollment_backend::seed::{LoadTest, LoadTestError};

async fn run() -> Result<(), LoadTestError> {
    let config = MongoConfig::from_env()?;
    info!("Connecting to: {}", config.redacted_uri());
    let database = Database::connect(&config).await?;
    database.ensure_indexes().await?;
    info!("Connected!");

    let result = LoadTest::new(database.clone()).run().await;
    database.shutdown().await;

    let report = result?;
    for (step, elapsed) in &report.steps {
        info!("{}: {:.2?}", step, elapsed);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        error!("Load test failed: {}", e);
        std::process::exit(1);
    }
}
