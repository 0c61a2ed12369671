//! Custom extractors for Axum handlers.
//!
//! Rejections from these extractors are rendered as [`crate::ErrorResponse`]
//! bodies instead of axum's plain-text defaults.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
