use serde::Serialize;
use thiserror::Error;

/// Unified API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(serde_json::Value),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Field-level validation failure; `fields` maps field name to messages.
    pub fn validation(fields: serde_json::Value) -> Self {
        Self::Validation(fields)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Validation(_) => 422,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }
}

/// JSON error envelope: `{ "error": { "code": "…", "message": "…", "details": {} } }`
#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        let details = match e {
            ApiError::Validation(fields) => serde_json::json!({ "fields": fields }),
            _ => serde_json::Value::Object(serde_json::Map::new()),
        };
        Self {
            error: ErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
                details,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_code_and_message() {
        let err = ApiError::NotFound("movie tt0000000".into());
        let env = ErrorEnvelope::from(&err);
        assert_eq!(env.error.code, "not_found");
        assert_eq!(env.error.message, "not found: movie tt0000000");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn validation_details_include_fields() {
        let err = ApiError::validation(serde_json::json!({
            "metadata_key": ["must not be empty"]
        }));
        let env = ErrorEnvelope::from(&err);
        assert_eq!(env.error.code, "validation_failed");
        assert_eq!(
            env.error.details["fields"]["metadata_key"][0],
            "must not be empty"
        );
    }
}
