//! Request signing for the exchange API.
//!
//! Every request carries a base64 Content-MD5 of its body and an
//! `APIAuth-HMAC-SHA256 {key}:{signature}` Authorization header, where the
//! signature is an HMAC-SHA256 over the canonical string
//! `METHOD,content-type,content-md5,/path,date`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

/// Base64 MD5 of the request body; empty bodies sign as the empty string.
pub(crate) fn content_md5(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }
    BASE64.encode(Md5::digest(body))
}

pub(crate) fn canonical_string(
    method: &str,
    content_type: &str,
    content_md5: &str,
    request_uri: &str,
    date: &str,
) -> String {
    format!("{method},{content_type},{content_md5},{request_uri},{date}")
}

pub(crate) fn signature(key: &str, secret: &str, canonical: &str) -> String {
    // HMAC-SHA256 accepts keys of any length, so this cannot fail.
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(canonical.as_bytes());
    let encoded = BASE64.encode(mac.finalize().into_bytes());
    format!("APIAuth-HMAC-SHA256 {key}:{encoded}")
}
