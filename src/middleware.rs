use std::sync::Arc;

use axum::{
    extract::State,
    http::{self, Request},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::model::CurrentUser;
use crate::service::UserService;
use crate::{token, AppState};

// Verifies the bearer token and resolves it to a registered user before any
// protected handler runs. On success the identity travels with the request
// as a CurrentUser extension.
pub async fn mw_require_auth<B>(
    State(data): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::MissingCredentials)?;

    // The credential must be carried under the bearer scheme.
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::InvalidScheme)?;

    // Signature, shape and expiry checks all collapse into one failure.
    let claims = token::decode_token(token, &data.config).ok_or(ApiError::InvalidToken)?;

    // The embedded username must still belong to a registered user. An
    // unknown identity gets the same response as a bad token.
    let user = UserService::new(&data.db)
        .find_by_username(&claims.username)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    request.extensions_mut().insert(CurrentUser {
        username: user.username,
    });

    Ok(next.run(request).await)
}
