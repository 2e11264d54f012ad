pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod hiring;
pub mod onboarding;
pub mod stores;
pub mod telemetry;
pub mod views;
