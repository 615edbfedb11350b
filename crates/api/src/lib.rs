//! HTTP layer for the keepsake content services.
//!
//! One library, five binaries (`src/bin/`): moments, carousel,
//! photostock, timer, timeline. Each binary wires its config and state
//! into the matching router from [`routes`] and serves it through
//! [`server`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;
