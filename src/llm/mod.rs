//! Groq client for hosted text generation.
//!
//! Wraps the Groq OpenAI-compatible chat-completions API behind the
//! [`CompletionBackend`] trait. The call is synchronous and blocking; the
//! HTTP surface runs it on a blocking task. No retry, no streaming.
//!
//! Without a credential the client is marked unavailable for the process
//! lifetime and every call returns [`CONFIGURE_KEY_MESSAGE`] instead of
//! touching the network.

use miette::Diagnostic;
use thiserror::Error;

/// Fixed output returned by every generation call when no credential is
/// configured.
pub const CONFIGURE_KEY_MESSAGE: &str =
    "Please configure your GROQ API key to use this feature.";

/// Model used when `GROQ_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Base URL of the Groq API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com";

/// Sampling temperature for all templates.
const TEMPERATURE: f64 = 0.7;

/// Errors from the provider adapter.
#[derive(Debug, Error, Diagnostic)]
pub enum LlmError {
    #[error("provider request failed: {message}")]
    #[diagnostic(
        code(quill::llm::request_failed),
        help("Check network connectivity and that the GROQ API key is valid.")
    )]
    RequestFailed { message: String },

    #[error("failed to parse provider response: {message}")]
    #[diagnostic(
        code(quill::llm::parse_error),
        help("The provider returned an unexpected response format.")
    )]
    ParseError { message: String },
}

/// The seam between the HTTP surface and the hosted model.
///
/// Production uses [`GroqClient`]; tests substitute a stub that captures
/// the prompt argument.
pub trait CompletionBackend: Send + Sync {
    /// Submit a formatted prompt and return the model's text completion.
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Configuration for the Groq client.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API credential. `None` marks the client unavailable.
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 120,
        }
    }
}

impl GroqConfig {
    /// Read credential and model from the process environment.
    ///
    /// `GROQ_API_KEY` missing or empty leaves the client unavailable;
    /// `GROQ_MODEL` overrides the default model.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let model =
            std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            api_key,
            model,
            ..Default::default()
        }
    }
}

/// Client for the Groq chat-completions API.
pub struct GroqClient {
    config: GroqConfig,
}

impl GroqClient {
    /// Create a new client. Availability is fixed here for the process
    /// lifetime: there is no re-check of the credential later.
    pub fn new(config: GroqConfig) -> Self {
        Self { config }
    }

    /// Whether a credential is configured.
    pub fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl CompletionBackend for GroqClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let Some(key) = &self.config.api_key else {
            return Ok(CONFIGURE_KEY_MESSAGE.to_string());
        };

        let url = format!("{}/openai/v1/chat/completions", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": TEMPERATURE,
        });

        let body_str = serde_json::to_string(&body).map_err(|e| LlmError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&url)
            .set("Authorization", &format!("Bearer {key}"))
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| LlmError::RequestFailed {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| LlmError::ParseError {
                message: e.to_string(),
            })?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| LlmError::ParseError {
                message: "missing 'choices[0].message.content' field".into(),
            })
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("available", &self.is_available())
            .finish()
    }
}
