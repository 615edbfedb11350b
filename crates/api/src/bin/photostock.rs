//! Photostock service binary.

use std::sync::Arc;

use keepsake_api::config::BindConfig;
use keepsake_api::state::StockState;
use keepsake_api::{routes, server};
use keepsake_cloud::{ObjectStore, ObjectStoreConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    server::init_tracing("keepsake_api=debug,tower_http=debug");

    let bind = BindConfig::from_env();
    let store_config = match ObjectStoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "Invalid photostock configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(bucket = %store_config.bucket, "Loaded photostock configuration");

    let state = StockState {
        store: Arc::new(ObjectStore::new(&store_config)),
    };

    let app = server::with_middleware(routes::stock::router().with_state(state));
    server::serve(app, &bind.host, bind.port).await;
}
