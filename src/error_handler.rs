//! Failure normalization.
//!
//! Every failure in the fetch pipeline ends here and leaves as either a
//! caller-supplied fallback or an [`ErrorEnvelope`]. Callers tell success from
//! failure the same way everywhere: an envelope always has `error == true`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use tracing::error;

use crate::config::ExecutionMode;
use crate::constants::GENERIC_ERROR_MESSAGE;
use crate::error::AppError;

/// Uniform failure value handed to callers instead of domain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} ({context})")]
pub struct ErrorEnvelope {
    /// Always `true`.
    pub error: bool,
    pub message: String,
    /// Where the failure surfaced, e.g. `getLeagueData for 1234`.
    pub context: String,
    /// RFC 3339 UTC.
    pub timestamp: String,
    /// Error source chain, only populated in development mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            error: true,
            message: GENERIC_ERROR_MESSAGE.to_string(),
            context: context.into(),
            timestamp: now_rfc3339(),
            stack: None,
        }
    }

    /// True for any JSON value shaped like a failure (`"error": true`).
    pub fn is_error_value(value: &serde_json::Value) -> bool {
        matches!(value.get("error"), Some(serde_json::Value::Bool(true)))
    }
}

/// Outcome of [`FailureReporter::handle_api_error`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reported<F> {
    /// The caller's fallback, returned verbatim.
    Fallback(F),
    /// No fallback was supplied.
    Envelope(ErrorEnvelope),
}

impl<F> Reported<F> {
    pub fn is_envelope(&self) -> bool {
        matches!(self, Reported::Envelope(_))
    }

    pub fn into_result(self) -> Result<F, ErrorEnvelope> {
        match self {
            Reported::Fallback(value) => Ok(value),
            Reported::Envelope(envelope) => Err(envelope),
        }
    }
}

/// Turns failures into fallbacks or envelopes, with an optional diagnostic
/// record in development mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureReporter {
    mode: ExecutionMode,
}

impl FailureReporter {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Normalizes `error`.
    ///
    /// `Some(fallback)` is returned unchanged whatever its value; only `None`
    /// produces the generic envelope. The diagnostic record never influences
    /// the return value.
    pub fn handle_api_error<F>(
        &self,
        error: &AppError,
        context: &str,
        fallback: Option<F>,
    ) -> Reported<F> {
        match fallback {
            Some(value) => Reported::Fallback(self.report_with_fallback(error, context, value)),
            None => Reported::Envelope(self.report(error, context)),
        }
    }

    /// Reports `error` without a fallback.
    pub fn report(&self, error: &AppError, context: &str) -> ErrorEnvelope {
        let timestamp = now_rfc3339();
        self.diagnose(error, context, &timestamp);

        ErrorEnvelope {
            error: true,
            message: GENERIC_ERROR_MESSAGE.to_string(),
            context: context.to_string(),
            timestamp,
            stack: self.mode.is_development().then(|| error_chain(error)),
        }
    }

    /// Reports `error` and hands back `fallback`.
    pub fn report_with_fallback<F>(&self, error: &AppError, context: &str, fallback: F) -> F {
        self.diagnose(error, context, &now_rfc3339());
        fallback
    }

    /// Development-only diagnostic record. Suppressed in every other mode.
    pub(crate) fn diagnose(&self, error: &AppError, context: &str, timestamp: &str) {
        if !self.mode.is_development() {
            return;
        }
        error!(
            error = %error,
            context = context,
            timestamp = timestamp,
            stack = %error_chain(error),
            kind = ?error.kind(),
            "[{context}] API Error"
        );
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders an error and its sources, outermost first.
fn error_chain(error: &AppError) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\n  caused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
