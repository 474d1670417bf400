//! Request parameters for text generation.

use bon::Builder;

/// Token budget applied when the caller does not set one.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 200;

/// Sampling temperature applied when the caller does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.8;

/// Parameters for a single text-generation call.
///
/// `max_new_tokens` follows the task vocabulary; the router wire format
/// carries it as `max_tokens`. Constructed once, not reused.
#[derive(Debug, Clone, Builder)]
pub struct TextGenerationRequest {
    /// Continuation prompt, sent verbatim unless chat markup is applied
    /// upstream.
    #[builder(into)]
    pub prompt: String,
    /// Hub model id the call is bound to.
    #[builder(into)]
    pub model: String,
    /// Upper bound on generated tokens.
    #[builder(default = DEFAULT_MAX_NEW_TOKENS)]
    pub max_new_tokens: u32,
    /// Sampling temperature.
    #[builder(default = DEFAULT_TEMPERATURE)]
    pub temperature: f64,
    /// Nucleus sampling cutoff.
    pub top_p: Option<f64>,
    /// Sequences that end generation early.
    pub stop: Option<Vec<String>>,
}
