use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

// ─── Upstream Errors ────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("GRADIENT_AGENT_ID environment variable not set")]
    MissingAgentId,

    #[error("network error calling agent: {0}")]
    Network(#[source] reqwest::Error),

    #[error("agent returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("failed to decode agent response: {0}")]
    Decode(#[source] serde_json::Error),
}

// ─── Normalization Errors ───────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("agent response has no choices")]
    MissingChoices,

    #[error("first choice has no message object")]
    MalformedChoice,

    #[error("message content is missing or not a string")]
    MissingContent,

    #[error("failed to parse recommendations: {reason}. Raw: {snippet}")]
    RecommendationParse { reason: String, snippet: String },
}

// ─── HTTP Boundary ──────────────────────────────────────────────────────────

/// Errors surfaced to API callers. The JSON body only ever carries the
/// generic message; details stay in the server log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error(transparent)]
    Upstream(#[from] AgentError),

    #[error(transparent)]
    Processing(#[from] NormalizeError),
}

impl ApiError {
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(msg) => *msg,
            ApiError::Upstream(_) => "Failed to get AI recommendations",
            ApiError::Processing(_) => "Failed to process AI recommendations",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.public_message()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_do_not_leak_details() {
        let err = ApiError::from(AgentError::UpstreamStatus {
            status: 503,
            body: "secret upstream trace".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to get AI recommendations");
        // The Display impl keeps the detail for logging.
        assert!(err.to_string().contains("secret upstream trace"));
    }

    #[test]
    fn processing_errors_use_their_own_message() {
        let err = ApiError::from(NormalizeError::MissingChoices);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to process AI recommendations");
    }

    #[test]
    fn invalid_request_is_a_client_error() {
        let err = ApiError::InvalidRequest("Query is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Query is required");
    }
}
