//! Moments service binary.

use std::sync::Arc;
use std::time::Duration;

use keepsake_api::config::MomentsConfig;
use keepsake_api::state::MomentsState;
use keepsake_api::{routes, server};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    server::init_tracing("keepsake_api=debug,tower_http=debug");

    let config = match MomentsConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "Invalid moments configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(host = %config.host, port = %config.port, "Loaded moments configuration");

    let db = match keepsake_db::connect(&config.mongo_uri, &config.mongo_db_name).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "Failed to create MongoDB client");
            std::process::exit(1);
        }
    };
    let moments = keepsake_db::moments_collection(&db);

    if let Err(err) = keepsake_db::health_check(&db).await {
        tracing::error!(error = %err, "MongoDB health check failed");
        std::process::exit(1);
    }

    // Indexes and the legacy-images migration gate readiness: the
    // listener only binds once every stored record conforms.
    if let Err(err) = keepsake_db::ensure_indexes(&moments).await {
        tracing::error!(error = %err, "Failed to create MongoDB indexes");
        std::process::exit(1);
    }
    match keepsake_db::migrations::migrate_legacy_images(&moments).await {
        Ok(_) => tracing::info!("MongoDB indexes and migrations are ready"),
        Err(err) => {
            tracing::error!(error = %err, "Failed to initialize MongoDB indexes/migrations");
            std::process::exit(1);
        }
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.photostock_timeout_ms))
        .build()
        .expect("Failed to build HTTP client");

    let state = MomentsState {
        db,
        moments,
        config: Arc::new(config.clone()),
        http,
    };

    let app = server::with_middleware(routes::moments::router().with_state(state));
    server::serve(app, &config.host, config.port).await;
}
