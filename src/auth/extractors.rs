use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::{
    claims::Identity,
    jwt::JwtKeys,
    policy::{authorize, Policy},
};
use crate::error::AppError;

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthenticated("missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("invalid Authorization header"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AppError::Unauthenticated("invalid auth scheme"))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthenticated("invalid auth scheme"));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthenticated("invalid Authorization header"));
    }
    Ok(token)
}

/// Runs the authentication gate against request headers.
pub fn authenticate_headers(headers: &HeaderMap, keys: &JwtKeys) -> Result<Identity, AppError> {
    let token = bearer_token(headers)?;
    keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::Unauthenticated("invalid or expired token")
    })
}

/// Any caller with a valid bearer token.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        authenticate_headers(&parts.headers, &keys).map(AuthUser)
    }
}

/// Authenticated caller whose role satisfies policy `P`.
pub struct RequireRole<P: Policy> {
    pub identity: Identity,
    _policy: PhantomData<P>,
}

#[async_trait]
impl<S, P> FromRequestParts<S> for RequireRole<P>
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    P: Policy,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        if let Err(e) = authorize(Some(&identity), P::ACCESS) {
            warn!(user_id = %identity.user_id, role = %identity.role, "role not permitted");
            return Err(e);
        }
        Ok(Self {
            identity,
            _policy: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&headers_with("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated("missing Authorization header")));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_rejected() {
        for value in ["Basic YWxpY2U6c2VjcmV0", "Bearer", "Bearer    ", "abc"] {
            let err = bearer_token(&headers_with(value)).unwrap_err();
            assert!(matches!(err, AppError::Unauthenticated(_)), "{value}");
        }
    }
}
