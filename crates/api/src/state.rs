//! Shared state types, one per service, available to handlers via
//! `State<...>`. All of them are cheaply cloneable.

use std::sync::Arc;

use bson::Document;
use keepsake_cloud::ObjectStore;
use keepsake_core::carousel::RotationCounter;
use keepsake_core::types::Timestamp;
use mongodb::{Collection, Database};

use crate::config::{MomentsConfig, TimelineConfig};

/// State of the moments service.
#[derive(Clone)]
pub struct MomentsState {
    /// Service database handle, used for health pings.
    pub db: Database,
    /// The moments collection, untyped because stored documents may
    /// carry legacy field shapes.
    pub moments: Collection<Document>,
    pub config: Arc<MomentsConfig>,
    /// Client for the media proxy, built with the photostock timeout.
    pub http: reqwest::Client,
}

/// State of the carousel service.
#[derive(Clone)]
pub struct CarouselState {
    pub store: Arc<ObjectStore>,
    /// Rotation position shared by all requests of this instance.
    pub rotation: Arc<RotationCounter>,
}

/// State of the photostock service.
#[derive(Clone)]
pub struct StockState {
    pub store: Arc<ObjectStore>,
}

/// State of the timer service.
#[derive(Clone, Copy)]
pub struct TimerState {
    pub start: Timestamp,
}

/// State of the timeline shell service.
#[derive(Clone)]
pub struct TimelineState {
    pub config: Arc<TimelineConfig>,
}
