//! # Notes Service
//!
//! Backend of a notes-taking web application: a JSON REST API over users
//! and notes with stateless JWT session auth.
//!
//! ## Architecture
//!
//! - **domain**: entities, value types and repository traits
//! - **application**: authentication, authorization and note use cases
//! - **infrastructure**: bcrypt, JWT and the SeaORM store
//! - **interfaces**: axum router, middleware and handlers
//! - **shared**: errors, clock and shutdown signal

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiState};
