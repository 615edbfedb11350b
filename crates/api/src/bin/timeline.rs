//! Timeline shell service binary.

use std::sync::Arc;

use keepsake_api::config::TimelineConfig;
use keepsake_api::state::TimelineState;
use keepsake_api::{routes, server};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    server::init_tracing("keepsake_api=debug,tower_http=debug");

    let config = TimelineConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded timeline configuration");

    let state = TimelineState {
        config: Arc::new(config.clone()),
    };

    let app = server::with_middleware(
        routes::timeline::router(&config.static_dir).with_state(state),
    );
    server::serve(app, &config.host, config.port).await;
}
