use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Message shown next to the CPF field when validation fails.
pub const INVALID_CPF_MESSAGE: &str = "Por favor, insira um CPF válido";

/// Message shown for any webhook failure (non-2xx, transport, unreadable body).
pub const REQUEST_FAILED_MESSAGE: &str = "Erro ao consultar os dados. Tente novamente.";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The submitted CPF failed the local checks. Raised before any network call.
    InvalidCpf(String),
    /// Bad request error (malformed body, missing field).
    BadRequest(String),
    /// The scoring webhook could not be reached or answered with an error.
    ExternalApiError(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// The fixed, user-facing message for this error.
    ///
    /// Details stay in the logs; the form only ever shows one of two sentences.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::InvalidCpf(_) => INVALID_CPF_MESSAGE,
            AppError::ExternalApiError(_) => REQUEST_FAILED_MESSAGE,
            AppError::BadRequest(_) => INVALID_CPF_MESSAGE,
            AppError::InternalError(_) => REQUEST_FAILED_MESSAGE,
            AppError::WithContext { source, .. } => source.user_message(),
        }
    }

    /// True for errors raised before the webhook was called.
    pub fn is_validation(&self) -> bool {
        match self {
            AppError::InvalidCpf(_) | AppError::BadRequest(_) => true,
            AppError::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidCpf(input) => write!(f, "Invalid CPF: {:?}", input),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and a JSON body carrying the
    /// user-facing message.
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidCpf(input) => {
                tracing::debug!("Rejected CPF input: {:?}", input);
                StatusCode::BAD_REQUEST
            }
            AppError::BadRequest(msg) => {
                tracing::debug!("Bad request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            AppError::ExternalApiError(msg) => {
                tracing::debug!("Credit webhook error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::WithContext { source, context } => {
                tracing::debug!("Error with context: {} -> {}", context, source);
                return source.as_ref().clone().into_response();
            }
        };

        let body = Json(json!({
            "error": self.user_message(),
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApiError(format!("Webhook request failed: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ExternalApiError(format!("Unreadable response body: {}", err))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_fixed() {
        let invalid = AppError::InvalidCpf("123".to_string());
        assert_eq!(invalid.user_message(), INVALID_CPF_MESSAGE);

        let upstream = AppError::ExternalApiError("connection refused".to_string());
        assert_eq!(upstream.user_message(), REQUEST_FAILED_MESSAGE);
    }

    #[test]
    fn test_context_keeps_source_classification() {
        let err: Result<(), AppError> = Err(AppError::InvalidCpf("1".to_string()));
        let err = err.context("submitting form").unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.user_message(), INVALID_CPF_MESSAGE);
        assert!(err.to_string().starts_with("submitting form: "));
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::InvalidCpf("1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::ExternalApiError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::WithContext {
            source: Box::new(AppError::ExternalApiError("boom".to_string())),
            context: "calling webhook".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
