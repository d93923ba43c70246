use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::{Error, Result};
use crate::models::user::Role;
use crate::utils::token::{decode_session_token, Claims};
use crate::AppState;

fn bearer_claims(req: &Request, secret: &str) -> Result<Claims> {
    let Some(auth_header) = req.headers().get(AUTHORIZATION) else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(Error::Unauthorized("Malformed authorization header".to_string()));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(Error::Unauthorized("Unsupported authorization scheme".to_string()));
    };
    decode_session_token(token.trim(), secret)
}

/// Admits only requests carrying a valid admin session token. The decoded
/// claims are left in the request extensions for the handlers.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let claims = bearer_claims(&req, &state.config.jwt_secret)?;
    if claims.role != Role::Admin {
        tracing::warn!(user_id = %claims.sub, role = claims.role.as_str(), "admin route refused");
        return Err(Error::Forbidden("Admin access required".to_string()));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
