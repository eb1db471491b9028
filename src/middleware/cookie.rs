//! Session cookie encoding. Attributes: `Path=/`, `HttpOnly`, `SameSite=Lax`,
//! and `Secure` when configured.
use axum::http::{header::COOKIE, HeaderMap};

use crate::config::SecurityConfig;

/// First non-empty value of cookie `name` across all `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
        .find(|value| !value.is_empty())
}

pub fn session_cookie(security: &SecurityConfig, token: &str) -> String {
    build(security, token, security.session_max_age_secs())
}

/// Same cookie with an immediate expiry, telling the client to drop it
pub fn expired_session_cookie(security: &SecurityConfig) -> String {
    build(security, "", 0)
}

fn build(security: &SecurityConfig, value: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        security.session_cookie_name, value, max_age
    );
    if security.session_cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
