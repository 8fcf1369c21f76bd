//! Sessions. Sign-in itself belongs to the identity provider; the
//! application only sees the resulting user through the session cookie.

pub mod demo_auth;
pub mod models;
pub mod session;
