use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
    details: Vec<FieldError>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let code = status_code_to_string(status);
        Self {
            status,
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn validation(details: Vec<FieldError>) -> Self {
        let mut err = Self::new(StatusCode::BAD_REQUEST, "dados invalidos");
        err.code = "validation_error".to_string();
        err.details = details;
        err
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(message = %self.message, "request failed");
        }
        let message = if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            "erro interno".to_string()
        } else {
            self.message
        };
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message,
                details: self.details,
            },
        };
        (self.status, axum::Json(body)).into_response()
    }
}

/// Maps repository failures to the HTTP taxonomy: unique violations become
/// 409, foreign-key violations 409 (row still referenced or reference
/// missing), anything else an opaque 500.
pub fn map_db_error(err: sqlx::Error, message: &str) -> ApiError {
    if is_unique_violation(&err) {
        return ApiError::new(StatusCode::CONFLICT, message);
    }
    if is_foreign_key_violation(&err) {
        return ApiError::new(StatusCode::CONFLICT, message);
    }
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503")
    )
}

fn status_code_to_string(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::CONFLICT => "conflict",
        StatusCode::INTERNAL_SERVER_ERROR => "internal_error",
        _ => status.canonical_reason().unwrap_or("error"),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_details() {
        let err = ApiError::validation(vec![FieldError::new("nome", "obrigatorio")]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_error_message_is_opaque() {
        let err = ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "connection refused at 10.0.0.3");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn envelope_serializes_without_empty_details() {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: "not_found".into(),
                message: "contato nao encontrado".into(),
                details: Vec::new(),
            },
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert!(json["error"].get("details").is_none());
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[test]
    fn non_database_errors_map_to_500() {
        let err = map_db_error(sqlx::Error::RowNotFound, "lookup failed");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
