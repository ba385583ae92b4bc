//! Webhook signature verification (`X-Hub-Signature-256`).

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Verify a webhook payload signature.
///
/// `header` is the raw `X-Hub-Signature-256` value, with or without the
/// `sha256=` prefix. Fails closed: an absent or empty header, or an empty
/// secret, is a verification failure rather than an error.
pub fn verify_signature(body: &[u8], header: Option<&str>, secret: &str) -> bool {
    let signature = match header {
        Some(s) if !s.is_empty() => s,
        _ => return false,
    };
    if secret.is_empty() {
        return false;
    }

    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);

    let expected = {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    };

    // Constant-time comparison to prevent timing attacks
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

/// Constant-time equality comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
