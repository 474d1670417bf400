//! Convenience re-exports for common use.

pub use crate::client::InferenceClient;
pub use crate::config::{Settings, DEFAULT_MODEL_ID, DEFAULT_PROVIDER};
pub use crate::error::{Result, RoastError};
pub use crate::types::TextGenerationRequest;
