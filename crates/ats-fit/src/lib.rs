pub mod analysis;
pub mod config;
pub mod connectors;
pub mod error;
pub mod gateway;
pub mod propagation;
pub mod telemetry;
