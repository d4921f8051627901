//! # Cardlend API Library
//!
//! This library provides the core functionality for the Cardlend API
//! service: entity models, repositories, handlers and server configuration
//! for a business-card and lending backend.

pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
