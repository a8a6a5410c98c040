use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

// Every way a request can terminally fail, mapped onto one status code each.
#[derive(Debug, Error)]
pub enum ApiError {
    // No credential was presented at all.
    #[error("Invalid authorization code.")]
    MissingCredentials,

    // A credential was presented, but not as a bearer token.
    #[error("Invalid authentication scheme.")]
    InvalidScheme,

    // Bad signature, malformed payload, expired token, or an embedded
    // username that no longer resolves. One response for all of them.
    #[error("Invalid or Expired token!")]
    InvalidToken,

    // Login failure. Identical for unknown username and wrong password.
    #[error("Invalid username or password!")]
    InvalidCredentials,

    // Authenticated, but not the owner of the target resource.
    #[error("You do not have access to this resource!")]
    Forbidden,

    #[error("{what} with ID: {id} not found!")]
    NotFound { what: &'static str, id: i64 },

    #[error("A {entity} with {field} {value} already exists!")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Something went wrong while processing the request")]
    Internal,

    #[error("Something bad happened while talking to the database")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials | ApiError::InvalidScheme | ApiError::Forbidden => {
                StatusCode::FORBIDDEN
            }
            ApiError::InvalidToken | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged with their source but serialized
        // with a fixed message.
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let status_label = if status.is_server_error() {
            "error"
        } else {
            "fail"
        };

        let mut body = json!({
            "status": status_label,
            "message": self.to_string(),
        });
        if let ApiError::Conflict { field, .. } = &self {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}
