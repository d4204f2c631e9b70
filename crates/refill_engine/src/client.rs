use std::time::Duration;

use futures_util::StreamExt;
use refill_logging::{refill_debug, refill_warn};
use serde_json::Value;

use crate::parse::parse_response;
use crate::{ExtractError, ExtractionResult, FailureKind, SubmissionPayload};

/// Fixed path segment appended to the configured base URL.
pub const REFILL_PATH: &str = "refill";

/// How much of a failure response is kept for the diagnostic.
const ERROR_BODY_PREFIX_BYTES: usize = 4096;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> Result<reqwest::Url, ExtractError> {
        let base = self.base_url.trim_end_matches('/');
        reqwest::Url::parse(&format!("{base}/{REFILL_PATH}"))
            .map_err(|err| ExtractError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

/// One request per call, no retry. Every path ends in `Ok` or `Err`.
#[async_trait::async_trait]
pub trait ExtractionClient: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload) -> ExtractionResult;
}

#[derive(Debug, Clone)]
pub struct ReqwestExtractionClient {
    settings: ClientSettings,
}

impl ReqwestExtractionClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, ExtractError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ExtractError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ExtractError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ExtractError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ExtractError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ExtractionClient for ReqwestExtractionClient {
    async fn submit(&self, payload: SubmissionPayload) -> ExtractionResult {
        let endpoint = self.settings.endpoint()?;
        let client = self.build_client()?;
        refill_debug!(
            "POST {} files={} keys_len={} credential={}",
            endpoint,
            payload.files().len(),
            payload.keys().len(),
            refill_logging::redacted(payload.credential())
        );
        let form = payload.into_form()?;

        let response = client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let prefix = read_prefix(response, ERROR_BODY_PREFIX_BYTES).await;
            let text = String::from_utf8_lossy(&prefix).into_owned();
            let message = service_error_message(&text)
                .unwrap_or_else(|| status.to_string());
            refill_warn!("Extraction service returned {}: {}", status, message);
            return Err(
                ExtractError::new(FailureKind::HttpStatus(status.as_u16()), message)
                    .with_raw(text),
            );
        }

        let body = self.read_body(response).await?;
        let text = String::from_utf8(body).map_err(|err| {
            let raw = String::from_utf8_lossy(err.as_bytes()).into_owned();
            ExtractError::new(FailureKind::Decoding, "response is not valid UTF-8").with_raw(raw)
        })?;

        parse_response(&text).map_err(|err| {
            refill_warn!("Undecodable response ({} bytes): {}", err.raw.len(), err.message);
            ExtractError::from(err)
        })
    }
}

/// Reads at most `limit` bytes of the body. Errors end the read early; the
/// status code is the real failure and the body only decorates it.
async fn read_prefix(response: reqwest::Response, limit: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(Ok(chunk)) = stream.next().await {
        let room = limit - bytes.len();
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if bytes.len() >= limit {
            break;
        }
    }
    bytes
}

/// The service wraps handler failures as `{"error": "..."}`; fall back to the
/// trimmed body for anything else.
fn service_error_message(body: &str) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("error") {
            return Some(message.clone());
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ExtractError {
    if err.is_timeout() {
        return ExtractError::new(FailureKind::Timeout, err.to_string());
    }
    ExtractError::new(FailureKind::Network, err.to_string())
}
