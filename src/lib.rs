pub mod agent;
pub mod config;
pub mod error;
pub mod normalize;
pub mod routes;
pub mod telemetry;
