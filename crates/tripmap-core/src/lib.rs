//! Shared domain types and configuration for the itinerary map pipeline.

pub mod app_config;
pub mod config;
pub mod destination;
pub mod geometry;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use destination::{days, group_by_day, slugify, BoundaryKey, DaySelection, Destination};
pub use geometry::{BBox, Geometry, LngLat};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
