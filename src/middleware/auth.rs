use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::Error, utils::token::Claims, AppState};

/// Caller identity taken from a verified `Authorization: Bearer` token.
///
/// Handlers that need an authenticated caller take this as an argument; the
/// request is rejected with 401 before the handler runs when the header is
/// missing, malformed, or carries a token that fails verification.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
            return Err(Error::Unauthorized("missing_authorization".to_string()));
        };
        let Ok(auth_str) = auth_header.to_str() else {
            return Err(Error::Unauthorized("bad_authorization".to_string()));
        };
        let Some(token) = auth_str.strip_prefix("Bearer ") else {
            return Err(Error::Unauthorized("unsupported_scheme".to_string()));
        };

        let claims = state.tokens.verify(token.trim())?;
        Ok(AuthUser(claims))
    }
}
