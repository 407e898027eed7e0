use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::DecodePaddingMode;
use jsonwebtoken::{DecodingKey, EncodingKey};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// HS512 needs at least 512 bits of key material.
pub const MIN_SECRET_BYTES: usize = 64;

// Standard alphabet; trailing `=` padding is optional.
const SECRET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("signing secret is empty")]
    Missing,

    #[error("signing secret is not valid base64")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("signing secret is {bits} bits, HS512 requires at least 512")]
    TooShort { bits: usize },
}

/// Process-wide HMAC-SHA512 key, used for both signing and verifying.
///
/// Built once at startup and shared read-only afterwards.
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    fingerprint: String,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl SigningKey {
    /// Decode a base64 secret (standard alphabet, padding optional) into a signing key.
    pub fn from_base64_secret(secret: &str) -> Result<Self, KeyError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(KeyError::Missing);
        }

        let bytes = SECRET_ENGINE.decode(secret)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(KeyError::TooShort {
                bits: bytes.len() * 8,
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            fingerprint: fingerprint(bytes),
        })
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// First 16 hex chars of sha256(key). Safe to log.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut hex = hex::encode(hasher.finalize());
    hex.truncate(16);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

    fn secret_of(len: usize) -> String {
        STANDARD.encode(vec![0x5au8; len])
    }

    #[test]
    fn accepts_512_bit_secret() {
        let key = SigningKey::from_base64_secret(&secret_of(64)).unwrap();
        assert_eq!(key.fingerprint().len(), 16);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let secret = format!("  {}\n", secret_of(64));
        assert!(SigningKey::from_base64_secret(&secret).is_ok());
    }

    #[test]
    fn accepts_unpadded_secret() {
        let material = [0x5au8; 64];
        let padded = STANDARD.encode(material);
        let unpadded = STANDARD_NO_PAD.encode(material);
        assert!(padded.ends_with('='));
        assert!(!unpadded.ends_with('='));

        let a = SigningKey::from_base64_secret(&padded).unwrap();
        let b = SigningKey::from_base64_secret(&unpadded).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn rejects_empty_secret() {
        let err = SigningKey::from_base64_secret("   ").unwrap_err();
        assert!(matches!(err, KeyError::Missing));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = SigningKey::from_base64_secret("not base64!!").unwrap_err();
        assert!(matches!(err, KeyError::InvalidBase64(_)));
    }

    #[test]
    fn rejects_short_secret() {
        let err = SigningKey::from_base64_secret(&secret_of(32)).unwrap_err();
        assert!(matches!(err, KeyError::TooShort { bits: 256 }));
    }

    #[test]
    fn fingerprint_depends_on_key_material() {
        let a = SigningKey::from_bytes(&[1u8; 64]).unwrap();
        let b = SigningKey::from_bytes(&[2u8; 64]).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn debug_does_not_print_key_material() {
        let key = SigningKey::from_bytes(&[9u8; 64]).unwrap();
        let printed = format!("{key:?}");
        assert!(printed.contains("fingerprint"));
        assert!(!printed.contains("9, 9"));
    }
}
