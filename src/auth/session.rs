use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use axum_extra::extract::SignedCookieJar;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::auth::models::{Session, SessionUser};
use crate::error::AppError;

/// Name of the cookie carrying the signed-in user.
pub const SESSION_COOKIE: &str = "potluck_session";

/// Encode a user into a cookie value (base64 of its JSON form).
pub fn encode_session(user: &SessionUser) -> Result<String, AppError> {
    let json = serde_json::to_vec(user)
        .map_err(|e| AppError::Internal(format!("Failed to serialize user: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a cookie value produced by [`encode_session`].
pub fn decode_session(value: &str) -> Option<SessionUser> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Build the session cookie for `user`. It must be added to a
/// [`SignedCookieJar`] so the value carries a signature.
pub fn session_cookie(user: &SessionUser) -> Result<Cookie<'static>, AppError> {
    Ok(Cookie::build((SESSION_COOKIE, encode_session(user)?))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build())
}

/// Resolve the session from the signed session cookie. A missing, unsigned
/// or tampered cookie yields an anonymous session rather than a rejection.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_headers(&parts.headers, Key::from_ref(state));
        let user = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| decode_session(cookie.value()));

        Ok(Session(user))
    }
}
