use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error taxonomy for the translation service. Validation failures are
/// rejected before any model work; model and inference failures are
/// mapped to structured responses instead of leaking internals.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("language \"{0}\" is not supported")]
    UnsupportedLanguage(String),

    #[error("{0}")]
    ModelUnavailable(String),

    #[error("translation failed: {0}")]
    Inference(String),
}

impl TranslateError {
    /// Stable machine-readable code carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnsupportedLanguage(_) => "unsupported_language",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::Inference(_) => "inference_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{self}");
        }
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
            "success": false,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_error_kind() {
        assert_eq!(
            TranslateError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TranslateError::UnsupportedLanguage("xx".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TranslateError::ModelUnavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            TranslateError::Inference("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(TranslateError::InvalidInput("x".into()).code(), "invalid_input");
        assert_eq!(
            TranslateError::UnsupportedLanguage("xx".into()).code(),
            "unsupported_language"
        );
        assert_eq!(
            TranslateError::ModelUnavailable("x".into()).code(),
            "model_unavailable"
        );
        assert_eq!(TranslateError::Inference("x".into()).code(), "inference_error");
    }
}
