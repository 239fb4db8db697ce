pub mod policy;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::state::AppState;

/// Resolves the caller from the identity header set by the upstream authentication
/// layer and stores the `User` in request extensions for handlers to extract.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = req
        .headers()
        .get(state.config.identity_header.as_str())
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            tracing::warn!("Request without a valid identity header");
            AppError::Unauthorized
        })?;

    let user = state.store.find_user(user_id).await?.ok_or_else(|| {
        tracing::warn!("Identity header names unknown user {user_id}");
        AppError::Unauthorized
    })?;

    tracing::debug!("Authenticated user {} <{}>", user.id, user.email);
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
