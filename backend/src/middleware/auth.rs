//! Authentication middleware
//!
//! Verifies the bearer token and resolves it to a [`CallerIdentity`] that every handler
//! passes into the services.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shared::{CallerIdentity, UserRole};
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub organization_id: String,
    pub role: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Decode and validate a token into the caller it identifies
pub fn decode_caller(token: &str, secret: &str) -> Result<CallerIdentity, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;
    let organization_id = Uuid::parse_str(&claims.organization_id)
        .map_err(|_| AppError::Unauthorized("Invalid organization ID in token".to_string()))?;
    let role = UserRole::from_str(&claims.role)
        .ok_or_else(|| AppError::Unauthorized("Unknown role in token".to_string()))?;

    Ok(CallerIdentity::new(user_id, organization_id, role))
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        Some(token) => token.to_string(),
        None => {
            return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
                .into_response();
        }
    };

    let caller = match decode_caller(&token, &state.config.jwt.secret) {
        Ok(caller) => caller,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(user_id = %caller.user_id, role = caller.role.as_str(), "Authenticated request");
    request.extensions_mut().insert(caller);

    next.run(request).await
}

/// Extractor for the authenticated caller
#[derive(Clone, Debug)]
pub struct CurrentUser(pub CallerIdentity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
