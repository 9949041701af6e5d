//! HTTP Server Module
//!
//! Axum surface over the empathy pipeline:
//! - Synthesis and detection endpoints
//! - Emotion catalogue and audio download
//! - Health, service info and request statistics
//! - Background sweep of expired audio

pub mod config;
pub mod middleware;
pub mod routes;
pub mod server_core;
pub mod types;

pub use config::{CorsConfig, Environment, LoggingConfig, ServerConfig};
pub use middleware::{MetricsState, ServerMetrics};
pub use server_core::{create_router, spawn_sweeper, EmpathyServer, ServerState};
pub use types::*;
