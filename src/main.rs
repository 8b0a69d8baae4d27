use dotenv::dotenv;
use tracing::{error, info, warn};

use enrollment_backend::app::App;
use enrollment_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // .env must be loaded before the logger reads RUST_LOG and LOG_DIR.
    let env_loaded = dotenv();

    let logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    info!("🚀 Starting Enrollment Backend");
    match env_loaded {
        Ok(path) => info!("✅ Loaded environment from {}", path.display()),
        Err(e) => warn!("⚠️ No .env file loaded: {} (using system env vars)", e),
    }

    let result = match App::new().await {
        Ok(app) => app.start().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        // process::exit skips destructors; flush the file writers first.
        drop(logger);
        std::process::exit(1);
    }
}
