//! AWS Lambda layer management

pub mod client;
pub mod models;

pub use client::LambdaClient;
pub use models::{CallerIdentity, LayerVersion};
