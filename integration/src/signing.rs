// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! HMAC-SHA256 request signing, shared by every authenticated trading API client.
//!
//! Venues differ on where the signature goes (query string vs. header vs. body) but
//! every one of them signs a canonical payload with an API secret using HMAC-SHA256;
//! this module covers that common step.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the lowercase hex HMAC-SHA256 signature of `payload` under `secret`.
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts a key of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_64_hex_chars() {
        let signature = hmac_sha256_hex("secret", "hello world");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_secrets_diverge() {
        assert_ne!(
            hmac_sha256_hex("secret-a", "payload"),
            hmac_sha256_hex("secret-b", "payload")
        );
    }

    #[test]
    fn same_input_is_deterministic() {
        assert_eq!(
            hmac_sha256_hex("key", "payload"),
            hmac_sha256_hex("key", "payload")
        );
    }
}
