//! GitHub webhook signature verification.
//!
//! GitHub signs webhook deliveries using HMAC-SHA256 over the raw request body
//! and sends the result in the `X-Hub-Signature-256` header.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Algorithm tag prefixed to the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the `sha256=<hex>` signature GitHub would send for `body`.
///
/// Returns `None` only if the key is rejected by the HMAC implementation.
pub fn sign_payload(body: &[u8], secret: &str) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return None,
    };
    mac.update(body);
    Some(format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes())))
}

/// Verify a GitHub webhook signature.
///
/// # Arguments
///
/// * `body` - The raw request body, exactly as received
/// * `signature` - The `X-Hub-Signature-256` header value
/// * `secret` - The webhook secret shared with GitHub
///
/// # Returns
///
/// `true` only if `signature` is exactly `sha256=` followed by the lowercase
/// hex HMAC of `body`. Empty or malformed signatures return `false`.
pub fn verify_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    if signature.is_empty() {
        warn!("github_signature_missing");
        return false;
    }

    let expected_signature = match sign_payload(body, secret) {
        Some(s) => s,
        None => {
            warn!("github_signature_invalid_key");
            return false;
        }
    };

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected_signature, signature);

    if !valid {
        warn!(
            expected_length = expected_signature.len(),
            actual_length = signature.len(),
            has_prefix = signature.starts_with(SIGNATURE_PREFIX),
            "github_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "It's a Secret to Everybody";

    #[test]
    fn test_github_documented_example() {
        // Example delivery from GitHub's webhook validation docs.
        assert_eq!(
            sign_payload(b"Hello, World!", SECRET).as_deref(),
            Some("sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17")
        );
        assert!(verify_signature(
            b"Hello, World!",
            "sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17",
            SECRET
        ));
    }

    #[test]
    fn test_verify_signature_valid() {
        let body = br#"{"action":"created"}"#;
        let signature = sign_payload(body, SECRET).unwrap();
        assert!(verify_signature(body, &signature, SECRET));
    }

    #[test]
    fn test_verify_signature_empty() {
        assert!(!verify_signature(b"{}", "", SECRET));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let body = br#"{"action":"created"}"#;
        let signature = sign_payload(body, "other-secret").unwrap();
        assert!(!verify_signature(body, &signature, SECRET));
    }

    #[test]
    fn test_verify_signature_missing_prefix() {
        let body = br#"{"action":"created"}"#;
        let signature = sign_payload(body, SECRET).unwrap();
        let bare = signature.trim_start_matches(SIGNATURE_PREFIX);
        assert!(!verify_signature(body, bare, SECRET));
    }

    #[test]
    fn test_verify_signature_uppercase_hex_rejected() {
        let body = br#"{"action":"created"}"#;
        let signature = sign_payload(body, SECRET).unwrap();
        let upper = format!("{}{}", SIGNATURE_PREFIX, signature[SIGNATURE_PREFIX.len()..].to_uppercase());
        assert!(!verify_signature(body, &upper, SECRET));
    }

    #[test]
    fn test_verify_signature_any_bit_flip_rejected() {
        let body = br#"{"action":"created","sponsorship":{}}"#;
        let signature = sign_payload(body, SECRET).unwrap();
        let bytes = signature.as_bytes();

        for i in 0..bytes.len() {
            for bit in 0..8 {
                let mut mutated = bytes.to_vec();
                mutated[i] ^= 1 << bit;
                // Skip mutations that are not valid UTF-8; a header value
                // cannot carry them anyway.
                if let Ok(candidate) = String::from_utf8(mutated) {
                    assert!(
                        !verify_signature(body, &candidate, SECRET),
                        "flip of bit {bit} at byte {i} accepted"
                    );
                }
            }
        }
    }

    #[test]
    fn test_verify_signature_body_tampered() {
        let signature = sign_payload(br#"{"action":"cancelled"}"#, SECRET).unwrap();
        assert!(!verify_signature(br#"{"action":"created"}"#, &signature, SECRET));
    }

    #[test]
    fn test_empty_secret_still_signs() {
        let body = br#"{"action":"created"}"#;
        let signature = sign_payload(body, "").unwrap();
        assert!(signature.starts_with(SIGNATURE_PREFIX));
        assert!(verify_signature(body, &signature, ""));
        assert!(!verify_signature(body, &signature, SECRET));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
