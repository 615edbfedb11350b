//! Carousel service binary.

use std::sync::Arc;

use keepsake_api::config::BindConfig;
use keepsake_api::state::CarouselState;
use keepsake_api::{routes, server};
use keepsake_cloud::{ObjectStore, ObjectStoreConfig};
use keepsake_core::carousel::RotationCounter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    server::init_tracing("keepsake_api=debug,tower_http=debug");

    let bind = BindConfig::from_env();
    let store_config = match ObjectStoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "Invalid carousel configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(bucket = %store_config.bucket, "Loaded carousel configuration");

    let state = CarouselState {
        store: Arc::new(ObjectStore::new(&store_config)),
        rotation: Arc::new(RotationCounter::new()),
    };

    let app = server::with_middleware(routes::carousel::router().with_state(state));
    server::serve(app, &bind.host, bind.port).await;
}
