//! # push-core
//!
//! Ambient pieces shared by the push message tooling: environment-driven
//! [`AppConfig`] and tracing initialization ([`init_tracing`]).

pub mod config;
pub mod logger;

pub use config::AppConfig;
pub use logger::init_tracing;
