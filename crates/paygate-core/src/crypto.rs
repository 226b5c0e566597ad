//! Keyed-hash signatures for processor requests and callbacks.
//!
//! Wraps HMAC-SHA256 and HMAC-SHA512 with strong types. Secrets never
//! appear in `Debug` output or error messages.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};

use crate::canonical::CanonicalString;
use crate::error::{CoreError, Result};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// The keyed-hash algorithm a processor signs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HmacAlgorithm {
    /// HMAC-SHA256, 32-byte digest.
    Sha256,
    /// HMAC-SHA512, 64-byte digest.
    Sha512,
}

impl HmacAlgorithm {
    /// Digest length in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Length of the hex rendering.
    pub const fn hex_len(self) -> usize {
        self.digest_len() * 2
    }
}

/// Letter case of a rendered hex digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    #[default]
    Lower,
    Upper,
}

/// A processor's shared signing secret.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a secret string.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the secret is unset.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl From<&str> for SecretKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A hex-rendered HMAC digest.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    fn from_digest(digest: &[u8], case: HexCase) -> Self {
        match case {
            HexCase::Lower => Self(hex::encode(digest)),
            HexCase::Upper => Self(hex::encode_upper(digest)),
        }
    }

    /// The hex string exactly as the processor expects it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the hex string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.0.get(..16).unwrap_or(&self.0);
        write!(f, "Signature({}...)", prefix)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A MAC keyed once at construction and cloned per message.
#[derive(Clone)]
enum KeyedMac {
    Sha256(HmacSha256),
    Sha512(HmacSha512),
}

impl KeyedMac {
    fn new(algorithm: HmacAlgorithm, key: &[u8]) -> Result<Self> {
        // HMAC accepts any key length; only an empty secret is refused
        if key.is_empty() {
            return Err(CoreError::EmptySecret);
        }
        let mac = match algorithm {
            HmacAlgorithm::Sha256 => Self::Sha256(
                HmacSha256::new_from_slice(key).map_err(|_| CoreError::EmptySecret)?,
            ),
            HmacAlgorithm::Sha512 => Self::Sha512(
                HmacSha512::new_from_slice(key).map_err(|_| CoreError::EmptySecret)?,
            ),
        };
        Ok(mac)
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self.clone() {
            Self::Sha256(mut mac) => {
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha512(mut mac) => {
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    fn verify(&self, data: &[u8], expected: &[u8]) -> bool {
        match self.clone() {
            Self::Sha256(mut mac) => {
                mac.update(data);
                mac.verify_slice(expected).is_ok()
            }
            Self::Sha512(mut mac) => {
                mac.update(data);
                mac.verify_slice(expected).is_ok()
            }
        }
    }
}

/// HMAC signer and verifier bound to one processor's algorithm, hex case and secret.
#[derive(Clone)]
pub struct SignatureEngine {
    algorithm: HmacAlgorithm,
    case: HexCase,
    mac: KeyedMac,
}

impl SignatureEngine {
    /// Create an engine. An empty secret is a configuration error.
    pub fn new(algorithm: HmacAlgorithm, case: HexCase, secret: &SecretKey) -> Result<Self> {
        Ok(Self {
            algorithm,
            case,
            mac: KeyedMac::new(algorithm, secret.as_bytes())?,
        })
    }

    /// The configured algorithm.
    pub fn algorithm(&self) -> HmacAlgorithm {
        self.algorithm
    }

    /// The configured hex case.
    pub fn case(&self) -> HexCase {
        self.case
    }

    /// Sign a canonical string.
    pub fn sign(&self, data: &CanonicalString) -> Signature {
        Signature::from_digest(&self.mac.digest(data.as_bytes()), self.case)
    }

    /// Check a received hex signature against a canonical string.
    ///
    /// Both sides are compared as decoded digest bytes, so hex case drift is
    /// tolerated. Malformed hex or a wrong length yields `false`.
    pub fn verify(&self, data: &CanonicalString, candidate: &str) -> bool {
        if candidate.len() != self.algorithm.hex_len() {
            return false;
        }
        match hex::decode(candidate) {
            Ok(expected) => self.mac.verify(data.as_bytes(), &expected),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("algorithm", &self.algorithm)
            .field("case", &self.case)
            .finish_non_exhaustive()
    }
}

/// Sign `data` with a one-off engine.
pub fn sign(
    data: &CanonicalString,
    secret: &SecretKey,
    algorithm: HmacAlgorithm,
    case: HexCase,
) -> Result<Signature> {
    Ok(SignatureEngine::new(algorithm, case, secret)?.sign(data))
}

/// Verify `candidate` with a one-off engine. Never fails; an empty secret verifies nothing.
pub fn verify(
    data: &CanonicalString,
    secret: &SecretKey,
    algorithm: HmacAlgorithm,
    candidate: &str,
) -> bool {
    SignatureEngine::new(algorithm, HexCase::Lower, secret)
        .map(|engine| engine.verify(data, candidate))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(s: &str) -> CanonicalString {
        CanonicalString::from_raw(s)
    }

    fn fox() -> CanonicalString {
        canonical("The quick brown fox jumps over the lazy dog")
    }

    #[test]
    fn test_known_hmac_sha256() {
        let sig = sign(&fox(), &"key".into(), HmacAlgorithm::Sha256, HexCase::Lower).unwrap();
        assert_eq!(
            sig.as_str(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_known_hmac_sha512() {
        let sig = sign(&fox(), &"key".into(), HmacAlgorithm::Sha512, HexCase::Lower).unwrap();
        assert_eq!(
            sig.as_str(),
            "b42af09057bac1e2d41708e48a902e09b5ff7f12ab428a4fe86653c73dd248fb\
             82f948a549f7b791a5b41915ee4d1ec3935357e4e2317250d0372afa2ebeeb3a"
        );
    }

    #[test]
    fn test_upper_case_rendering() {
        let sig = sign(&fox(), &"key".into(), HmacAlgorithm::Sha256, HexCase::Upper).unwrap();
        assert_eq!(
            sig.as_str(),
            "F7BC83F430538424B13298E6AA6FB143EF4D59A14946175997479DBC2D1A3CD8"
        );
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let engine =
            SignatureEngine::new(HmacAlgorithm::Sha512, HexCase::Lower, &"s3cret".into()).unwrap();
        let data = canonical("amount=1000");
        let sig = engine.sign(&data);
        assert_eq!(sig.as_str().len(), 128);
        assert!(engine.verify(&data, sig.as_str()));

        // Case drift still verifies
        assert!(engine.verify(&data, &sig.as_str().to_uppercase()));

        // Tampered data does not
        assert!(!engine.verify(&canonical("amount=1001"), sig.as_str()));
    }

    #[test]
    fn test_verify_rejects_malformed_candidates() {
        let engine =
            SignatureEngine::new(HmacAlgorithm::Sha256, HexCase::Lower, &"s3cret".into()).unwrap();
        let data = canonical("x");
        assert!(!engine.verify(&data, ""));
        assert!(!engine.verify(&data, "zz"));
        assert!(!engine.verify(&data, &"g".repeat(64)));
        // Right length for SHA-512, wrong for SHA-256
        assert!(!engine.verify(&data, &"0".repeat(128)));
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let err = SignatureEngine::new(HmacAlgorithm::Sha256, HexCase::Lower, &SecretKey::default())
            .unwrap_err();
        assert_eq!(err, CoreError::EmptySecret);
        assert!(!verify(&canonical("x"), &SecretKey::default(), HmacAlgorithm::Sha256, "00"));
    }

    #[test]
    fn test_secret_never_in_debug() {
        let secret = SecretKey::new("K951B6PE1waDMi640xX08PD3vg6EKvLz");
        let engine = SignatureEngine::new(HmacAlgorithm::Sha256, HexCase::Lower, &secret).unwrap();
        assert!(!format!("{:?}", secret).contains("K951"));
        assert!(!format!("{:?}", engine).contains("K951"));
    }
}
