//! Timer service binary.

use keepsake_api::config::BindConfig;
use keepsake_api::state::TimerState;
use keepsake_api::{routes, server};
use keepsake_core::timer::parse_start;

/// The fixed instant the timer counts from.
const START_TIME: &str = "2025-03-06T18:00:00Z";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    server::init_tracing("keepsake_api=debug,tower_http=debug");

    let bind = BindConfig::from_env();
    let start = parse_start(START_TIME).expect("START_TIME is a valid RFC 3339 instant");

    let app = server::with_middleware(routes::timer::router().with_state(TimerState { start }));
    server::serve(app, &bind.host, bind.port).await;
}
