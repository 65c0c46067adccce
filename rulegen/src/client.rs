//! Rule-generation service: the [`RuleService`] seam and its HTTP implementation.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::error::GenerateError;
use crate::protocol::{server_error_message, GenerationResult, RuleRequest};

/// Used when neither `--url` nor [`API_URL_ENV`] is set.
pub const DEFAULT_API_URL: &str = "https://json-logic-backend.onrender.com";

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "RULEGEN_API_URL";

pub const GENERATE_RULE_PATH: &str = "/generate-rule";

/// Base URL from an explicit value, then [`API_URL_ENV`], then [`DEFAULT_API_URL`]. Blank values
/// are skipped.
pub fn resolve_api_url(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_owned)
        .filter(|u| !u.trim().is_empty())
        .or_else(|| {
            std::env::var(API_URL_ENV)
                .ok()
                .filter(|u| !u.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// `{base_url}/generate-rule`, tolerating a trailing slash on the base.
pub fn generate_rule_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), GENERATE_RULE_PATH)
}

#[async_trait]
pub trait RuleService: Send + Sync {
    /// Performs exactly one generation request.
    async fn generate(&self, request: &RuleRequest) -> Result<GenerationResult, GenerateError>;
}

/// JSON-over-HTTP client for the rule-generation backend.
#[derive(Debug, Clone)]
pub struct HttpRuleService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRuleService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: generate_rule_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RuleService for HttpRuleService {
    async fn generate(&self, request: &RuleRequest) -> Result<GenerationResult, GenerateError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            prompt_len = request.prompt.len(),
            context_docs = request.context_docs.len(),
            "POST generate-rule"
        );
        let res = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(GenerateError::transport)?;

        let status = res.status();
        if !status.is_success() {
            // An unreadable error body still yields the status-code message.
            let body = res.bytes().await.unwrap_or_default();
            let message = server_error_message(status.as_u16(), &body);
            tracing::info!(status = status.as_u16(), %message, "generate-rule rejected");
            return Err(GenerateError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = res.bytes().await.map_err(GenerateError::transport)?;
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| GenerateError::InvalidBody(format!("invalid response body: {}", e)))?;
        Ok(GenerationResult::from_value(value))
    }
}
