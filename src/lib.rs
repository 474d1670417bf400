//! Roast: one-shot text generation against Hugging Face Inference Providers.
//!
//! Reads its configuration from the environment, sends a single
//! text-generation request through the Inference Providers router (or the
//! legacy serverless Inference API for the `hf-inference` id), and hands
//! back the generated text. Nothing is retried and nothing is streamed.
//!
//! # Quick Start
//!
//! ```no_run
//! use roast::prelude::*;
//!
//! # async fn example() -> roast::error::Result<()> {
//! let settings = Settings::from_env()?;
//! let client = InferenceClient::from_settings(&settings);
//! let request = TextGenerationRequest::builder()
//!     .prompt("Can you please let us know more details about your ")
//!     .model(settings.model_id.clone())
//!     .build();
//! let text = client.text_generation(&request).await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod prompt;
pub mod sanitize;
pub mod types;
