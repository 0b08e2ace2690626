//! HMAC-SHA1 webhook signatures.
//!
//! ```text
//! Signature = Base64(HMAC-SHA1(Secret, CanonicalString))
//! ```
//!
//! Verification does not compare base64 text. The transmitted header is
//! decoded and the raw MAC bytes are compared in constant time.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::AuthError;
use crate::secret::Secret;

type HmacSha1 = Hmac<Sha1>;

/// Length in bytes of an HMAC-SHA1 signature.
pub const SIGNATURE_LEN: usize = 20;

/// Compute the raw signature: `HMAC-SHA1(secret, canonical)`.
///
/// The canonical string is hashed as bytes; it need not be valid UTF-8.
#[must_use]
pub fn compute_signature(secret: &Secret, canonical: impl AsRef<[u8]>) -> [u8; SIGNATURE_LEN] {
    let mut mac = <HmacSha1 as KeyInit>::new_from_slice(secret.expose())
        .expect("HMAC can accept any key length");
    mac.update(canonical.as_ref());
    let digest = mac.finalize().into_bytes();

    let mut signature = [0u8; SIGNATURE_LEN];
    signature.copy_from_slice(&digest);
    signature
}

/// Compute the signature as the signer transmits it (standard padded base64).
///
/// # Examples
///
/// ```
/// use hookgate_auth::{Secret, sign};
///
/// let canonical = "https://mycompany.com/myapp.php?foo=1&bar=2\
///                  CallSidCA1234567890ABCDECaller+14158675309Digits1234\
///                  From+14158675309To+18005551212";
/// assert_eq!(sign(&Secret::from("12345"), canonical), "RSOYDt4T1cUTdK1PDd93/VVr8B8=");
/// ```
#[must_use]
pub fn sign(secret: &Secret, canonical: impl AsRef<[u8]>) -> String {
    BASE64.encode(compute_signature(secret, canonical))
}

/// Check a transmitted base64 signature against the canonical string.
///
/// # Errors
///
/// Returns [`AuthError::InvalidSignatureEncoding`] if `transmitted` is not
/// valid base64, or [`AuthError::SignatureDoesNotMatch`] if the decoded bytes
/// differ from the computed MAC.
pub fn check_signature(
    secret: &Secret,
    canonical: impl AsRef<[u8]>,
    transmitted: &str,
) -> Result<(), AuthError> {
    let received = BASE64
        .decode(transmitted)
        .map_err(|_| AuthError::InvalidSignatureEncoding)?;

    let computed = compute_signature(secret, canonical);

    if constant_time_matches(&computed, &received) {
        Ok(())
    } else {
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Whether `transmitted` is a valid signature of `canonical` under `secret`.
///
/// Malformed base64 counts as a mismatch; no error reaches the caller.
#[must_use]
pub fn verify_signature(
    secret: &Secret,
    canonical: impl AsRef<[u8]>,
    transmitted: &str,
) -> bool {
    check_signature(secret, canonical, transmitted).is_ok()
}

/// Compare a computed MAC with received bytes without early exits.
///
/// The received bytes are copied into a buffer of the MAC's length so the
/// byte comparison always covers the full digest; the length check is folded
/// in as a `Choice` rather than a branch.
fn constant_time_matches(computed: &[u8; SIGNATURE_LEN], received: &[u8]) -> bool {
    let mut padded = [0u8; SIGNATURE_LEN];
    let n = received.len().min(SIGNATURE_LEN);
    padded[..n].copy_from_slice(&received[..n]);

    let same_len = received.len().ct_eq(&SIGNATURE_LEN);
    let same_bytes = computed.as_slice().ct_eq(padded.as_slice());

    (same_len & same_bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_CANONICAL: &str = "https://mycompany.com/myapp.php?foo=1&bar=2\
        CallSidCA1234567890ABCDE\
        Caller+14158675309\
        Digits1234\
        From+14158675309\
        To+18005551212";
    const REFERENCE_SIGNATURE: &str = "RSOYDt4T1cUTdK1PDd93/VVr8B8=";

    #[test]
    fn test_should_verify_reference_signature() {
        let secret = Secret::from("12345");
        assert!(verify_signature(&secret, REFERENCE_CANONICAL, REFERENCE_SIGNATURE));
    }

    #[test]
    fn test_should_reject_reference_signature_with_wrong_secret() {
        let secret = Secret::from("55555");
        assert!(!verify_signature(&secret, REFERENCE_CANONICAL, REFERENCE_SIGNATURE));
        assert_eq!(
            check_signature(&secret, REFERENCE_CANONICAL, REFERENCE_SIGNATURE),
            Err(AuthError::SignatureDoesNotMatch)
        );
    }

    #[test]
    fn test_should_sign_non_utf8_canonical_bytes() {
        let secret = Secret::from("k");
        let canonical = b"https://h/hooka\xff";
        let signature = sign(&secret, canonical);
        assert!(verify_signature(&secret, canonical, &signature));
        assert!(!verify_signature(&secret, "https://h/hooka\u{fffd}", &signature));
    }

    #[test]
    fn test_should_be_deterministic() {
        let secret = Secret::from("secret");
        let first = compute_signature(&secret, "data");
        let second = compute_signature(&secret, "data");
        assert_eq!(first, second);
        assert_eq!(sign(&secret, "data"), sign(&secret, "data"));
    }

    #[test]
    fn test_should_produce_twenty_byte_signature() {
        let encoded = sign(&Secret::from("k"), "m");
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(decoded.len(), SIGNATURE_LEN);
    }

    #[test]
    fn test_should_roundtrip_sign_and_verify_with_binary_secret() {
        let secret = Secret::from(vec![0u8, 1, 2, 255, 254]);
        let signature = sign(&secret, "https://example.com/hook");
        assert!(verify_signature(&secret, "https://example.com/hook", &signature));
        assert!(!verify_signature(&secret, "https://example.com/hook2", &signature));
    }

    #[test]
    fn test_should_reject_tampered_signature_bytes() {
        let secret = Secret::from("12345");
        let mut raw = BASE64.decode(REFERENCE_SIGNATURE).unwrap();
        for i in 0..raw.len() {
            raw[i] ^= 0x01;
            let tampered = BASE64.encode(&raw);
            assert!(!verify_signature(&secret, REFERENCE_CANONICAL, &tampered));
            raw[i] ^= 0x01;
        }
    }

    #[test]
    fn test_should_reject_tampered_signature_text() {
        let secret = Secret::from("12345");
        let tampered = REFERENCE_SIGNATURE.replacen('R', "S", 1);
        assert!(!verify_signature(&secret, REFERENCE_CANONICAL, &tampered));
    }

    #[test]
    fn test_should_reject_malformed_base64_without_error() {
        let secret = Secret::from("12345");
        for bad in ["not base64!", "RSOYDt4T1cUTdK1PDd93/VVr8B8", "====", "RSOY\u{e9}"] {
            assert!(!verify_signature(&secret, REFERENCE_CANONICAL, bad));
            assert_eq!(
                check_signature(&secret, REFERENCE_CANONICAL, bad),
                Err(AuthError::InvalidSignatureEncoding)
            );
        }
    }

    #[test]
    fn test_should_reject_empty_signature() {
        let secret = Secret::from("12345");
        assert_eq!(
            check_signature(&secret, REFERENCE_CANONICAL, ""),
            Err(AuthError::SignatureDoesNotMatch)
        );
    }

    #[test]
    fn test_should_reject_truncated_and_extended_signatures() {
        let secret = Secret::from("12345");
        let raw = BASE64.decode(REFERENCE_SIGNATURE).unwrap();

        let truncated = BASE64.encode(&raw[..SIGNATURE_LEN - 1]);
        assert!(!verify_signature(&secret, REFERENCE_CANONICAL, &truncated));

        let mut extended = raw.clone();
        extended.push(0);
        assert!(!verify_signature(&secret, REFERENCE_CANONICAL, &BASE64.encode(&extended)));
    }

    #[test]
    fn test_should_not_match_prefix_padded_with_zeros() {
        let computed = [0u8; SIGNATURE_LEN];
        assert!(constant_time_matches(&computed, &[0u8; SIGNATURE_LEN]));
        assert!(!constant_time_matches(&computed, &[0u8; SIGNATURE_LEN - 1]));
        assert!(!constant_time_matches(&computed, &[]));
    }
}
