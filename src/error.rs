use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type RequestResult<T> = Result<T, Rejection>;

/// Reasons a compile request is turned away before reaching the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("method {0} is not allowed, use POST")]
    MethodNotAllowed(String),

    #[error("request body could not be read")]
    UnreadableBody,

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("missing js_code parameter")]
    MissingSource,

    #[error("unsupported output_format {0:?}")]
    UnsupportedOutputFormat(String),

    #[error("unknown compilation_level {0:?}")]
    UnknownCompilationLevel(String),

    #[error("unsupported output_info {0:?}")]
    UnsupportedOutputInfo(String),
}

impl Rejection {
    pub fn as_status(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MethodNotAllowed(_)
            | Self::UnreadableBody
            | Self::MissingSource
            | Self::UnsupportedOutputFormat(_)
            | Self::UnknownCompilationLevel(_)
            | Self::UnsupportedOutputInfo(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Label used in logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => "method_not_allowed",
            Self::UnreadableBody => "unreadable_body",
            Self::BodyTooLarge { .. } => "body_too_large",
            Self::MissingSource => "missing_js_code",
            Self::UnsupportedOutputFormat(_) => "unsupported_output_format",
            Self::UnknownCompilationLevel(_) => "unknown_compilation_level",
            Self::UnsupportedOutputInfo(_) => "unsupported_output_info",
        }
    }
}

/// Rejections carry no body; callers log the reason.
impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        self.as_status().into_response()
    }
}
