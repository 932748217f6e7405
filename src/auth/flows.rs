//! Built-in authorization flows.

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::config::rules::AuthSpec;

type HmacSha256 = Hmac<Sha256>;

/// No verification; every request is authorized.
pub fn none(_auth: &AuthSpec, _headers: &HeaderMap, _payload: &[u8]) -> bool {
    true
}

/// The configured header must carry the shared secret verbatim.
pub fn plain_secret(auth: &AuthSpec, headers: &HeaderMap, _payload: &[u8]) -> bool {
    auth.secret == header_value(headers, &auth.header_secret_key)
}

/// `Authorization: Basic` credentials; `user:pass` must equal the secret.
pub fn basic_auth(auth: &AuthSpec, headers: &HeaderMap, _payload: &[u8]) -> bool {
    let Some(encoded) = header_value(headers, "authorization").strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = BASE64.decode(encoded.trim()) else {
        return false;
    };
    let Ok(credentials) = String::from_utf8(decoded) else {
        return false;
    };
    credentials.contains(':') && auth.secret == credentials
}

/// GitHub-style signature: HMAC-SHA256 of the raw payload, hex-encoded,
/// carried in the configured header with a `sha256=` prefix.
pub fn github(auth: &AuthSpec, headers: &HeaderMap, payload: &[u8]) -> bool {
    let signature = header_value(headers, &auth.header_secret_key);
    if signature.is_empty() {
        return false;
    }
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);

    // HMAC accepts keys of any length, so this only fails on an internal error.
    let Ok(mut mac) = HmacSha256::new_from_slice(auth.secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());

    constant_time_compare(signature, &expected)
}

/// GitLab-style token: constant-time comparison of the SHA-512 digests of the
/// configured secret and the header value.
pub fn gitlab(auth: &AuthSpec, headers: &HeaderMap, _payload: &[u8]) -> bool {
    let expected = Sha512::digest(auth.secret.as_bytes());
    let actual = Sha512::digest(header_value(headers, &auth.header_secret_key).as_bytes());
    constant_time_compare(&hex::encode(actual), &hex::encode(expected))
}

fn header_value<'h>(headers: &'h HeaderMap, key: &str) -> &'h str {
    if key.is_empty() {
        return "";
    }
    headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
