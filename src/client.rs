//! HTTP client for Hugging Face text-generation endpoints.
//!
//! One concrete client, two routes: third-party providers go through the
//! Inference Providers router (`/{provider}/v1/completions`, OpenAI
//! completions shape), while the reserved id `hf-inference` selects the
//! legacy serverless Inference API (`/models/{id}`, TGI shape). Every call
//! issues exactly one POST; nothing is retried.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Settings, DEFAULT_TIMEOUT_SECS};
use crate::error::{Result, RoastError};
use crate::types::TextGenerationRequest;

/// Router host serving third-party inference providers.
const ROUTER_BASE_URL: &str = "https://router.huggingface.co";

/// Legacy serverless Inference API host.
const INFERENCE_API_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Provider id reserved for the legacy Inference API route.
const HF_INFERENCE_PROVIDER: &str = "hf-inference";

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// Client bound to one inference provider and one credential.
///
/// Construction is purely local: no network I/O happens until
/// [`text_generation`](Self::text_generation) is called.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    provider: String,
    api_key: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl InferenceClient {
    /// Create a client bound to `provider` and `api_key`.
    pub fn new(provider: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key: api_key.into(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a client from resolved [`Settings`].
    pub fn from_settings(settings: &Settings) -> Self {
        let mut client = Self::new(settings.provider.clone(), settings.api_key.clone());
        client.base_url = settings.base_url.clone();
        client.timeout = settings.timeout;
        client
    }

    /// Override the endpoint root. Used for self-hosted routers and by the
    /// test suite to point at a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Provider id this client routes to.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Issue one text-generation request and return the generated text.
    pub async fn text_generation(&self, request: &TextGenerationRequest) -> Result<String> {
        if self.provider == HF_INFERENCE_PROVIDER {
            self.generate_via_inference_api(request).await
        } else {
            self.generate_via_router(request).await
        }
    }

    async fn generate_via_router(&self, request: &TextGenerationRequest) -> Result<String> {
        let url = self.router_url();
        let body = CompletionsRequest {
            model: &request.model,
            prompt: &request.prompt,
            max_tokens: request.max_new_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop: request.stop.as_deref(),
        };

        debug!(provider = %self.provider, model = %request.model, %url, "dispatching completion request");

        let raw = self.execute(&url, &body, &request.model).await?;
        let parsed: CompletionsResponse = serde_json::from_str(&raw)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(CompletionsChoice::into_text)
            .ok_or_else(|| RoastError::request("no generated text in response"))?;

        debug!(chars = text.len(), "completion received");
        Ok(text)
    }

    async fn generate_via_inference_api(&self, request: &TextGenerationRequest) -> Result<String> {
        let url = self.inference_api_url(&request.model);
        let body = InferenceApiRequest {
            inputs: &request.prompt,
            parameters: InferenceApiParameters {
                max_new_tokens: request.max_new_tokens,
                temperature: request.temperature,
                top_p: request.top_p,
                stop: request.stop.as_deref(),
                return_full_text: false,
            },
            options: InferenceApiOptions {
                wait_for_model: true,
            },
        };

        debug!(model = %request.model, %url, "dispatching inference-api request");

        let raw = self.execute(&url, &body, &request.model).await?;
        let parsed: Vec<GeneratedChunk> = serde_json::from_str(&raw)?;
        let text = parsed
            .into_iter()
            .next()
            .and_then(|chunk| chunk.generated_text)
            .ok_or_else(|| RoastError::request("no generated text in response"))?;

        debug!(chars = text.len(), "completion received");
        Ok(text)
    }

    /// POST `body` to `url` and return the raw response body, shaping any
    /// transport or status failure into a request error.
    async fn execute(&self, url: &str, body: &impl Serialize, model: &str) -> Result<String> {
        let response = shared_client()
            .post(url)
            .headers(bearer_headers(&self.api_key))
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let raw = response
            .text()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        if (200..300).contains(&status) {
            return Ok(raw);
        }
        Err(status_to_error(
            status,
            &raw,
            retry_after,
            &self.provider,
            model,
        ))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> RoastError {
        if err.is_timeout() {
            return RoastError::Request {
                status: None,
                message: format!("request timed out after {:?}", self.timeout),
                source: Some(Box::new(err)),
            };
        }
        RoastError::from(err)
    }

    fn router_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(ROUTER_BASE_URL);
        format!("{}/{}/v1/completions", base.trim_end_matches('/'), self.provider)
    }

    fn inference_api_url(&self, model: &str) -> String {
        let base = self.base_url.as_deref().unwrap_or(INFERENCE_API_BASE_URL);
        format!("{}/models/{}", base.trim_end_matches('/'), model)
    }
}

/// Map a non-success HTTP status to a request error with an operator-facing
/// message. Classification feeds the message only; nothing is retried.
fn status_to_error(
    status: u16,
    raw: &str,
    retry_after: Option<u64>,
    provider: &str,
    model: &str,
) -> RoastError {
    let api_message = extract_api_message(raw);
    let message = match status {
        401 | 403 => format!(
            "{}; the token needs a scope with inference permission",
            api_message.unwrap_or_else(|| "authentication rejected".to_string()),
        ),
        404 => format!(
            "{}; provider {provider} does not serve model {model}",
            api_message.unwrap_or_else(|| "not found".to_string()),
        ),
        429 => {
            let base = api_message.unwrap_or_else(|| "rate limited".to_string());
            match retry_after {
                Some(secs) => format!("{base} (retry after {secs}s)"),
                None => base,
            }
        }
        503 => match extract_estimated_time(raw) {
            Some(secs) => format!("provider unavailable; model loading, estimated {secs:.0}s"),
            None => api_message.unwrap_or_else(|| "provider unavailable".to_string()),
        },
        _ => api_message.unwrap_or_else(|| {
            let body = raw.trim();
            if body.is_empty() {
                format!("provider returned status {status}")
            } else {
                body.to_string()
            }
        }),
    };
    RoastError::request_status(status, message)
}

/// Extract a human-readable message from a JSON error body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}`, and
/// `{"message": "..."}`.
fn extract_api_message(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let from_error = match value.get("error") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Object(o)) => o
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    };
    from_error
        .or_else(|| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|s| !s.trim().is_empty())
}

/// `estimated_time` from the Inference API "model is loading" body.
fn extract_estimated_time(raw: &str) -> Option<f64> {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.get("estimated_time").and_then(|t| t.as_f64()))
}

// Wire types for the router completions endpoint (internal)

#[derive(Serialize)]
struct CompletionsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct CompletionsResponse {
    choices: Vec<CompletionsChoice>,
}

#[derive(Deserialize)]
struct CompletionsChoice {
    text: Option<String>,
    message: Option<CompletionsMessage>,
}

#[derive(Deserialize)]
struct CompletionsMessage {
    content: Option<String>,
}

impl CompletionsChoice {
    /// Completion text, falling back to chat-style message content.
    fn into_text(self) -> Option<String> {
        self.text.or_else(|| self.message.and_then(|m| m.content))
    }
}

// Wire types for the legacy Inference API route (internal)

#[derive(Serialize)]
struct InferenceApiRequest<'a> {
    inputs: &'a str,
    parameters: InferenceApiParameters<'a>,
    options: InferenceApiOptions,
}

#[derive(Serialize)]
struct InferenceApiParameters<'a> {
    max_new_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    return_full_text: bool,
}

#[derive(Serialize)]
struct InferenceApiOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct GeneratedChunk {
    #[serde(alias = "output_text")]
    generated_text: Option<String>,
}
