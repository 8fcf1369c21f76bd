use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::SignedCookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::models::{Session, SessionUser};
use crate::auth::session::{session_cookie, SESSION_COOKIE};
use crate::error::AppError;

/// Built-in demo user definition.
#[derive(Debug, Clone)]
struct DemoUser {
    username: &'static str,
    password: &'static str,
    email: &'static str,
}

/// The hard-coded accounts standing in for the identity provider. Only
/// reachable when `DEMO_MODE=true`.
const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        username: "cook",
        password: "cook",
        email: "cook@demo.potluck.dev",
    },
    DemoUser {
        username: "chef",
        password: "chef",
        email: "chef@demo.potluck.dev",
    },
];

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SessionUser,
}

/// Validate demo credentials and return the corresponding user.
pub fn authenticate_demo_user(username: &str, password: &str) -> Result<SessionUser, AppError> {
    DEMO_USERS
        .iter()
        .find(|u| u.username == username && u.password == password)
        .map(|u| SessionUser {
            user_id: format!("demo-{}", u.username),
            email: u.email.to_string(),
        })
        .ok_or_else(|| AppError::Unauthenticated("Invalid username or password".into()))
}

/// `POST /api/auth/login`
///
/// Validates credentials against the built-in user table.
/// On success, sets the session cookie and returns the user info.
pub async fn login_handler(
    jar: SignedCookieJar,
    axum::Json(req): axum::Json<LoginRequest>,
) -> Result<(SignedCookieJar, axum::Json<LoginResponse>), AppError> {
    let user = authenticate_demo_user(&req.username, &req.password)?;
    tracing::info!(user_id = %user.user_id, "User signed in");

    let jar = jar.add(session_cookie(&user)?);

    Ok((
        jar,
        axum::Json(LoginResponse {
            message: "Login successful".to_string(),
            user,
        }),
    ))
}

/// `GET /api/auth/me`: the current user from the session.
pub async fn me_handler(session: Session) -> Result<axum::Json<SessionUser>, AppError> {
    let user = session.require("view your account")?;
    Ok(axum::Json(user.clone()))
}

/// `POST /api/auth/logout`: clears the session cookie.
pub async fn logout_handler(jar: SignedCookieJar) -> SignedCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").removal().build();

    jar.remove(cookie)
}
