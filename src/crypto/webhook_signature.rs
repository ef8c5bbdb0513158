//! GitHub webhook signature verification.
//!
//! GitHub signs every delivery with `HMAC-SHA256(secret, body)` and sends the
//! result as `x-hub-signature-256: sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Hex length of a SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

pub struct WebhookSignatureVerifier {
    secret: Vec<u8>,
}

impl WebhookSignatureVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Computes the header value GitHub would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        // HMAC accepts keys of any length
        let mut mac = match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(body);
        format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns `true` only when `signature` is exactly `sha256=<hex digest of body>`.
    /// Missing prefix, uppercase or malformed hex and wrong digests all yield `false`.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> bool {
        let Some(signature) = signature else {
            return false;
        };

        let Some(signature_hex) = signature.strip_prefix(SIGNATURE_PREFIX) else {
            return false;
        };

        // GitHub always sends lowercase hex
        if signature_hex.len() != DIGEST_HEX_LEN
            || !signature_hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return false;
        }

        let signature_bytes = match hex::decode(signature_hex) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        let mut mac = match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(body);

        // Constant-time comparison
        mac.verify_slice(&signature_bytes).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"action":"opened","number":7}"#;

    #[test]
    fn test_accepts_own_signature() {
        let verifier = WebhookSignatureVerifier::new("topsecret");
        let signature = verifier.sign(BODY);
        assert!(signature.starts_with("sha256="));
        assert_eq!(signature.len(), "sha256=".len() + 64);
        assert!(verifier.verify(BODY, Some(&signature)));
    }

    #[test]
    fn test_known_vector() {
        // Example from GitHub's webhook documentation
        let verifier = WebhookSignatureVerifier::new("It's a Secret to Everybody");
        assert!(verifier.verify(
            b"Hello, World!",
            Some("sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17"),
        ));
    }

    #[test]
    fn test_rejects_single_bit_flip_in_body() {
        let verifier = WebhookSignatureVerifier::new("topsecret");
        let signature = verifier.sign(BODY);

        for i in 0..BODY.len() {
            for bit in 0..8 {
                let mut tampered = BODY.to_vec();
                tampered[i] ^= 1 << bit;
                assert!(!verifier.verify(&tampered, Some(&signature)));
            }
        }
    }

    #[test]
    fn test_rejects_single_bit_flip_in_signature() {
        let verifier = WebhookSignatureVerifier::new("topsecret");
        let signature = verifier.sign(BODY);
        let digest = hex::decode(&signature[SIGNATURE_PREFIX.len()..]).unwrap();

        for i in 0..digest.len() {
            let mut tampered = digest.clone();
            tampered[i] ^= 0x01;
            let header = format!("{}{}", SIGNATURE_PREFIX, hex::encode(&tampered));
            assert!(!verifier.verify(BODY, Some(&header)));
        }
    }

    #[test]
    fn test_rejects_single_bit_flip_in_header() {
        let verifier = WebhookSignatureVerifier::new("topsecret");
        let header = verifier.sign(BODY).into_bytes();

        for i in 0..header.len() {
            for bit in 0..8 {
                let mut tampered = header.clone();
                tampered[i] ^= 1 << bit;
                // Mutations that are not valid UTF-8 can never arrive as a header string
                if let Ok(tampered) = String::from_utf8(tampered) {
                    assert!(
                        !verifier.verify(BODY, Some(&tampered)),
                        "accepted mutation at byte {} bit {}: {}",
                        i,
                        bit,
                        tampered
                    );
                }
            }
        }
    }

    #[test]
    fn test_rejects_uppercase_hex() {
        let verifier = WebhookSignatureVerifier::new("topsecret");
        let signature = verifier.sign(BODY);
        let upper = format!(
            "{}{}",
            SIGNATURE_PREFIX,
            signature[SIGNATURE_PREFIX.len()..].to_ascii_uppercase()
        );
        assert!(!verifier.verify(BODY, Some(&upper)));
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let signature = WebhookSignatureVerifier::new("one").sign(BODY);
        assert!(!WebhookSignatureVerifier::new("two").verify(BODY, Some(&signature)));
    }

    #[test]
    fn test_rejects_malformed_headers() {
        let verifier = WebhookSignatureVerifier::new("topsecret");
        let signature = verifier.sign(BODY);
        let bare_hex = signature.trim_start_matches(SIGNATURE_PREFIX).to_string();

        assert!(!verifier.verify(BODY, None));
        assert!(!verifier.verify(BODY, Some("")));
        assert!(!verifier.verify(BODY, Some("sha256=")));
        assert!(!verifier.verify(BODY, Some("sha256=not-hex")));
        assert!(!verifier.verify(BODY, Some(&bare_hex)));
        assert!(!verifier.verify(BODY, Some(&format!("sha1={}", bare_hex))));
        assert!(!verifier.verify(BODY, Some(&signature[..signature.len() - 2])));
    }
}
