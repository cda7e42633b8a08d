//! HMAC-SHA512 signature generation for CoinSpot API authentication.
//!
//! CoinSpot private endpoints require a signature computed as:
//! ```text
//! hex(HMAC-SHA512(api_secret, request_body))
//! ```
//!
//! The body is the exact nonce-augmented JSON sent on the wire, so the
//! signature has to be computed after nonce injection. The signature is sent
//! in the `sign` header in lower case.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::auth::Credentials;
use crate::error::CoinSpotError;

type HmacSha512 = Hmac<Sha512>;

/// Sign a request body for CoinSpot's private API.
///
/// Returns the digest as upper-case hex (128 characters). Lower-case it
/// before putting it in the `sign` header.
///
/// # Example
///
/// ```rust
/// use coinspot_updater::auth::{Credentials, sign_body};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "api_secret");
/// let signature = sign_body(&credentials, br#"{"nonce":1700000000}"#)?;
/// assert_eq!(signature.len(), 128);
/// # Ok(())
/// # }
/// ```
pub fn sign_body(credentials: &Credentials, body: &[u8]) -> Result<String, CoinSpotError> {
    let mut hmac = HmacSha512::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| CoinSpotError::InvalidConfiguration(format!("Invalid HMAC key: {e}")))?;
    hmac.update(body);
    Ok(hex::encode_upper(hmac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_known_vector() {
        // RFC 4231 test case 2.
        let credentials = Credentials::new("key", "Jefe");
        let signature = sign_body(&credentials, b"what do ya want for nothing?").unwrap();

        assert_eq!(
            signature,
            "164B7A7BFCF819E2E395FBE73B56E0A387BD64222E831FD610270CD7EA2505549758BF75C05A994A6D034F65F8F0E6FDCAEAB1A34D4A6B4B636E070A38BCE737"
        );
    }

    #[test]
    fn test_signature_is_upper_hex() {
        let credentials = Credentials::new("key", "my_secret");
        let signature = sign_body(&credentials, br#"{"nonce":12345}"#).unwrap();

        assert_eq!(signature.len(), 128);
        assert!(
            signature
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_signature_consistency() {
        let credentials = Credentials::new("key", "my_secret");
        let body = br#"{"nonce":12345,"coin":"BTC"}"#;

        let sig1 = sign_body(&credentials, body).unwrap();
        let sig2 = sign_body(&credentials, body).unwrap();

        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_signature_changes_with_single_byte() {
        let credentials = Credentials::new("key", "my_secret");

        let sig1 = sign_body(&credentials, br#"{"nonce":12345}"#).unwrap();
        let sig2 = sign_body(&credentials, br#"{"nonce":12346}"#).unwrap();

        assert_ne!(sig1, sig2);
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let body = br#"{"nonce":12345}"#;

        let sig1 = sign_body(&Credentials::new("key", "secret_a"), body).unwrap();
        let sig2 = sign_body(&Credentials::new("key", "secret_b"), body).unwrap();

        assert_ne!(sig1, sig2);
    }
}
