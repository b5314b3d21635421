//! GitHub webhook signature verification (`X-Hub-Signature-256`).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the `sha256=<hex>` signature header against the raw payload.
/// Any malformed input verifies as false; comparison is constant-time.
pub fn verify(secret: &str, payload: &[u8], signature_header: &str) -> bool {
    let Some(hex_signature) = signature_header.strip_prefix("sha256=") else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);

    match hex::decode(hex_signature) {
        Ok(signature) => mac.verify_slice(&signature).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn valid_signature_verifies() {
        let payload = br#"{"ref":"refs/heads/main"}"#;
        let header = sign("s3cret", payload);
        assert!(verify("s3cret", payload, &header));
    }

    #[test]
    fn wrong_secret_or_payload_fails() {
        let payload = b"payload";
        let header = sign("s3cret", payload);
        assert!(!verify("other", payload, &header));
        assert!(!verify("s3cret", b"tampered", &header));
    }

    #[test]
    fn malformed_header_fails() {
        assert!(!verify("s3cret", b"payload", "sha1=abcdef"));
        assert!(!verify("s3cret", b"payload", "sha256=nothex"));
        assert!(!verify("s3cret", b"payload", ""));
    }
}
