//! Command-line surface and the one-shot run.

use clap::Parser;

use crate::client::InferenceClient;
use crate::config::{self, Settings};
use crate::error::Result;
use crate::types::{self, TextGenerationRequest};
use crate::{prompt, sanitize};

/// Prompt sent when none is given on the command line.
pub const DEFAULT_PROMPT: &str = "Can you please let us know more details about your ";

/// One-shot text generation against Hugging Face Inference Providers.
///
/// Credentials come from `HF_TOKEN` only; flags override the other
/// environment values. A bare invocation reproduces the canonical run:
/// the fixed prompt with 200 new tokens at temperature 0.8.
#[derive(Parser, Debug)]
#[command(
    name = "roast",
    version,
    about = "Send one prompt to a hosted text-generation provider and print the result"
)]
pub struct Cli {
    /// Prompt to complete (defaults to the built-in opener)
    pub prompt: Option<String>,

    /// Model to invoke (overrides ROAST_MODEL_ID)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Inference provider id (overrides HF_PROVIDER)
    #[arg(long)]
    pub provider: Option<String>,

    /// System instruction; wraps the prompt in the model family's chat markup
    #[arg(short, long)]
    pub system: Option<String>,

    /// Sampling temperature
    #[arg(short, long, default_value_t = types::DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Upper bound on generated tokens
    #[arg(long, default_value_t = types::DEFAULT_MAX_NEW_TOKENS)]
    pub max_new_tokens: u32,

    /// Nucleus sampling cutoff
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Endpoint override (overrides HF_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request deadline in seconds (overrides ROAST_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Strip chat markup artifacts from the generated text
    #[arg(long)]
    pub clean: bool,
}

impl Cli {
    /// Fold command-line overrides into environment-resolved settings.
    /// Empty flag values count as absent, like empty environment values.
    pub fn apply_to(&self, mut settings: Settings) -> Settings {
        if let Some(model) = non_empty(self.model.as_deref()) {
            settings.model_id = model;
        }
        if let Some(provider) = non_empty(self.provider.as_deref()) {
            settings.provider = config::normalize_provider(&provider);
        }
        if let Some(base_url) = non_empty(self.base_url.as_deref()) {
            settings.base_url = Some(base_url);
        }
        if let Some(secs) = self.timeout_secs {
            settings.timeout = std::time::Duration::from_secs(secs);
        }
        settings
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Run one generation: construct the client (local), build the request,
/// issue the single call, and return the text to print.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<String> {
    let client = InferenceClient::from_settings(settings);

    let user_prompt = cli.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    let prompt = match cli.system.as_deref() {
        Some(system) => prompt::render(&settings.model_id, system, user_prompt),
        None => user_prompt.to_string(),
    };

    let request = TextGenerationRequest::builder()
        .prompt(prompt)
        .model(settings.model_id.clone())
        .max_new_tokens(cli.max_new_tokens)
        .temperature(cli.temperature)
        .maybe_top_p(cli.top_p)
        .build();

    let text = client.text_generation(&request).await?;
    Ok(if cli.clean {
        sanitize::clean(&text)
    } else {
        text
    })
}
