use axum::http::{header, Extensions, HeaderMap};
use jsonwebtoken::DecodingKey;

use crate::{
    error::SessionError,
    utils::jwt::{extract_cookie_value, parse_bearer_token, verify_access_token, ACCESS_COOKIE_NAME},
};

/// Profile id of the authenticated caller, inserted into request extensions
/// by an upstream authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileId(pub i64);

/// Reads the acting profile from a request's session.
pub trait SessionResolver: Send + Sync {
    fn profile_id(&self, headers: &HeaderMap, extensions: &Extensions) -> Result<i64, SessionError>;
}

/// Trusts a [`ProfileId`] extension left by the authentication layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionSession;

impl SessionResolver for ExtensionSession {
    fn profile_id(&self, _headers: &HeaderMap, extensions: &Extensions) -> Result<i64, SessionError> {
        extensions
            .get::<ProfileId>()
            .map(|profile| profile.0)
            .ok_or(SessionError::Missing)
    }
}

/// Verifies an HS256 access token from the `Authorization` header or the
/// `access_token` cookie and reads the profile id from its subject.
#[derive(Clone)]
pub struct JwtSession {
    key: DecodingKey,
}

impl JwtSession {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl SessionResolver for JwtSession {
    fn profile_id(&self, headers: &HeaderMap, _extensions: &Extensions) -> Result<i64, SessionError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer_token)
            .map(|value| value.to_string())
            .or_else(|| {
                headers
                    .get(header::COOKIE)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|raw| extract_cookie_value(raw, ACCESS_COOKIE_NAME))
            })
            .ok_or(SessionError::Missing)?;

        let claims = verify_access_token(&token, &self.key)?;
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| SessionError::InvalidSubject(claims.sub))
    }
}

/// Resolves the acting profile, mapping every session failure to 0.
pub fn resolve_profile_id(
    resolver: &dyn SessionResolver,
    headers: &HeaderMap,
    extensions: &Extensions,
) -> i64 {
    match resolver.profile_id(headers, extensions) {
        Ok(profile_id) => profile_id,
        Err(err) => {
            tracing::debug!(error = %err, "No audit actor for request");
            0
        }
    }
}
