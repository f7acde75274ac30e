//! Double-submit cookie CSRF protection for the editor form.
//!
//! The editor page hands out a random token in the `csrftoken` cookie and
//! repeats it in a hidden form field. A submission is accepted only when
//! both copies are present and equal.

use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "csrftoken";
pub const FORM_FIELD: &str = "csrfmiddlewaretoken";

const TOKEN_LEN: usize = 32;

pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns the well-formed token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| is_well_formed(token))
}

pub fn set_cookie_header(token: &str, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!("{COOKIE_NAME}={token}; Path=/; SameSite=Lax; HttpOnly");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

pub fn verify(cookie_token: Option<&str>, submitted: &str) -> bool {
    let Some(expected) = cookie_token else {
        return false;
    };
    if !is_well_formed(expected) || expected.len() != submitted.len() {
        return false;
    }
    expected
        .bytes()
        .zip(submitted.bytes())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
#[path = "tests/csrf_tests.rs"]
mod tests;
