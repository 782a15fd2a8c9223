//! Shared HTTP building blocks: error mapping and request extractors

pub mod error;
pub mod query;
pub mod validated_json;

pub use error::{ApiError, ApiResult, MessageResponse};
pub use query::QueryParams;
pub use validated_json::{JsonBody, ValidatedJson};
