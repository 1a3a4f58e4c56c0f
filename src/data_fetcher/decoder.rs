//! Body decoding that never fails outward.

use bytes::Bytes;
use reqwest::Response;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::AppError;
use crate::error_handler::FailureReporter;

/// Fallback produced when a body is not valid JSON: `{"error": true, "data": null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub error: bool,
    pub data: Option<Value>,
}

impl ParseFailure {
    pub fn new() -> Self {
        Self {
            error: true,
            data: None,
        }
    }
}

impl Default for ParseFailure {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes response bodies as JSON or text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDecoder {
    reporter: FailureReporter,
}

impl ResponseDecoder {
    pub fn new(reporter: FailureReporter) -> Self {
        Self { reporter }
    }

    /// Reads the body and parses it as JSON.
    ///
    /// Read and parse failures go through the [`FailureReporter`] with a
    /// [`ParseFailure`] fallback.
    pub async fn safe_json_parse(
        &self,
        response: Response,
        context: &str,
    ) -> Result<Value, ParseFailure> {
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let error = AppError::body_read(e.to_string(), context);
                return Err(self
                    .reporter
                    .report_with_fallback(&error, context, ParseFailure::new()));
            }
        };
        debug!("Response length: {} bytes", body.len());

        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                let error = classify_json_error(&body, e, context);
                Err(self
                    .reporter
                    .report_with_fallback(&error, context, ParseFailure::new()))
            }
        }
    }

    /// Reads the body as UTF-8 text.
    ///
    /// Unreadable or non-UTF-8 bodies yield an empty string. This path does not
    /// go through the reporter: missing text is "nothing", not a failure.
    pub async fn safe_text_parse(&self, response: Response, context: &str) -> String {
        let decoded = match response.bytes().await {
            Ok(body) => String::from_utf8(body.to_vec()).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        decoded.unwrap_or_else(|message| {
            if self.reporter.mode().is_development() {
                error!(context = context, "[{context}] Text parsing error: {message}");
            }
            String::new()
        })
    }
}

fn classify_json_error(body: &Bytes, source: serde_json::Error, context: &str) -> AppError {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim_start();

    if trimmed.is_empty() {
        AppError::api_malformed_json("Response body is empty", context)
    } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') && !trimmed.starts_with('"') {
        let preview: String = trimmed.chars().take(200).collect();
        AppError::api_malformed_json(format!("Response is not valid JSON: {preview}"), context)
    } else {
        AppError::ApiParse(source)
    }
}
