//! Health and welcome endpoints

pub mod handlers;

pub use handlers::*;
