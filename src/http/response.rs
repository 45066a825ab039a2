//! Response formatting.
//!
//! # Responsibilities
//! - Choose status and body for each output mode
//! - Render the diagnostic report for `output_info=errors`
//!
//! # Design Decisions
//! - `compiled_code` with compiler errors answers 204 and drops the
//!   diagnostics; clients ask for `errors` to see them
//! - `errors` always answers 200, even with nothing to report

use std::fmt::Write;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::Rejection;
use crate::http::request::OutputInfo;
use crate::optimizer::CompileOutcome;

pub const TEXT_PLAIN: &str = "text/plain";

/// Terminal artifact of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: String,
    /// Short description of how the request ended, for logs and metrics.
    pub outcome: &'static str,
}

impl HttpResponse {
    pub fn rejected(rejection: &Rejection) -> Self {
        Self {
            status: rejection.as_status(),
            content_type: None,
            body: String::new(),
            outcome: rejection.as_label(),
        }
    }

    /// Format an optimizer outcome for the requested output mode.
    pub fn from_outcome(outcome: CompileOutcome, output_info: OutputInfo) -> Self {
        match output_info {
            OutputInfo::CompiledCode if !outcome.is_success() => Self {
                status: StatusCode::NO_CONTENT,
                content_type: None,
                body: String::new(),
                outcome: "compile_failed",
            },
            OutputInfo::CompiledCode => Self::text(outcome.output, "compiled"),
            OutputInfo::Errors => Self::text(error_report(&outcome), "diagnostics"),
        }
    }

    fn text(body: String, outcome: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some(TEXT_PLAIN),
            body,
            outcome,
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        match self.content_type {
            Some(content_type) => (
                self.status,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
                    (header::CONTENT_LENGTH, HeaderValue::from(self.body.len())),
                ],
                self.body,
            )
                .into_response(),
            None => self.status.into_response(),
        }
    }
}

/// Render the counts line followed by one line per warning, then per error.
pub fn error_report(outcome: &CompileOutcome) -> String {
    let mut report = format!(
        "{} Errors, {} Warnings\n",
        outcome.error_count(),
        outcome.warning_count()
    );
    for warning in &outcome.warnings {
        let _ = writeln!(report, "Warning: {warning}");
    }
    for error in &outcome.errors {
        let _ = writeln!(report, "Error: {error}");
    }
    report
}
