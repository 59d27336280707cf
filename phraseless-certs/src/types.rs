//! Core key and signature types.
//!
//! Strongly-typed wrappers over raw Ed25519 material. A certificate's own
//! key ([`PublicKey`]) and the key that vouches for it ([`IssuerKey`]) are
//! distinct types, so the two cannot be swapped by accident at a call site.

use crate::error::{CertError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ed25519_dalek::{
    Signature, Signer, SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
    SIGNATURE_LENGTH,
};
use phraseless_common::compact_ids::compact_id;
use rand::rngs::OsRng;
use std::fmt;

/* ------------------------------ Wire widths ------------------------------ */

/// Width of the zero-padded name field in signed messages and records.
pub const NAME_WIDTH: usize = 255;
pub const KEY_WIDTH: usize = PUBLIC_KEY_LENGTH;
pub const SIG_WIDTH: usize = SIGNATURE_LENGTH;
/// Length of a binary certificate record: name | public key | signature.
pub const RECORD_LEN: usize = NAME_WIDTH + KEY_WIDTH + SIG_WIDTH;

/* ------------------------------ Verification ----------------------------- */

/// Outcome of a signature check on well-formed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Valid,
    Invalid,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        self == Verification::Valid
    }

    fn check(key: &VerifyingKey, message: &[u8], signature: &CertSignature) -> Self {
        match key.verify_strict(message, &signature.0) {
            Ok(()) => Verification::Valid,
            Err(_) => Verification::Invalid,
        }
    }
}

/* ------------------------------ Public Key ------------------------------- */

/// The Ed25519 key a certificate binds to its name.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parse raw key bytes. Fails unless the input is exactly
    /// [`KEY_WIDTH`] bytes encoding a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; KEY_WIDTH] = bytes.try_into().map_err(|_| {
            CertError::InvalidKey(format!(
                "expected {KEY_WIDTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        VerifyingKey::from_bytes(&raw)
            .map(Self)
            .map_err(|e| CertError::InvalidKey(e.to_string()))
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_WIDTH] {
        self.0.as_bytes()
    }

    pub fn to_bytes(&self) -> [u8; KEY_WIDTH] {
        self.0.to_bytes()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Short identifier for log lines.
    pub fn compact_id(&self) -> String {
        compact_id(self.as_bytes())
    }

    /// Treat this key as the issuer of other certificates.
    pub fn as_issuer(&self) -> IssuerKey {
        IssuerKey(self.0)
    }

    /// Check `signature` over `message` directly under this key.
    pub fn verify(&self, message: &[u8], signature: &CertSignature) -> Verification {
        Verification::check(&self.0, message, signature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key)
    }
}

/* ------------------------------ Issuer Key ------------------------------- */

/// The verifying key of whoever signed a certificate.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IssuerKey(VerifyingKey);

impl IssuerKey {
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0)
    }

    pub fn verify(&self, message: &[u8], signature: &CertSignature) -> Verification {
        Verification::check(&self.0, message, signature)
    }
}

impl fmt::Debug for IssuerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IssuerKey")
            .field(&hex::encode(self.0.as_bytes()))
            .finish()
    }
}

/* ------------------------------ Private Key ------------------------------ */

pub const PRIVATE_KEY_SEED_LEN: usize = SECRET_KEY_LENGTH; // 32 bytes

/// Ed25519 signing key. Never serialized into a certificate.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    pub fn generate() -> Self {
        Self(SigningKey::generate(&mut OsRng))
    }

    pub fn from_seed(seed: &[u8; PRIVATE_KEY_SEED_LEN]) -> Self {
        Self(SigningKey::from_bytes(seed))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    pub fn issuer_key(&self) -> IssuerKey {
        IssuerKey(self.0.verifying_key())
    }

    /// Sign `message`. Failures come from the signature primitive and are
    /// not expected in normal operation.
    pub fn sign(&self, message: &[u8]) -> Result<CertSignature> {
        self.0
            .try_sign(message)
            .map(CertSignature)
            .map_err(|e| CertError::Signing(e.to_string()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

/* ------------------------------ Signature -------------------------------- */

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CertSignature(Signature);

impl CertSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Signature::from_slice(bytes)
            .map(Self)
            .map_err(|_| {
                CertError::InvalidSignature(format!(
                    "expected {SIG_WIDTH} bytes, got {}",
                    bytes.len()
                ))
            })
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; SIG_WIDTH] {
        self.0.to_bytes()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }
}

impl fmt::Debug for CertSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CertSignature")
            .field(&hex::encode(self.to_bytes()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_bytes_and_base64() {
        let key = PrivateKey::generate().public_key();
        assert_eq!(PublicKey::from_bytes(key.as_bytes()).unwrap(), key);
        assert_eq!(PublicKey::from_base64(&key.to_base64()).unwrap(), key);
        assert_eq!(key.as_issuer().public_key(), key);
    }

    #[test]
    fn test_public_key_wrong_length() {
        let err = PublicKey::from_bytes(&[1u8; 31]).unwrap_err();
        assert!(matches!(err, CertError::InvalidKey(_)));
        assert!(PublicKey::from_base64("not base64!").is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let key = PrivateKey::generate();
        let sig = key.sign(b"hello").unwrap();
        assert_eq!(key.public_key().verify(b"hello", &sig), Verification::Valid);
        assert_eq!(key.issuer_key().verify(b"hello", &sig), Verification::Valid);
        assert_eq!(
            key.public_key().verify(b"hellO", &sig),
            Verification::Invalid
        );
        let other = PrivateKey::generate();
        assert!(!other.public_key().verify(b"hello", &sig).is_valid());
    }

    #[test]
    fn test_seeded_key_is_deterministic() {
        let a = PrivateKey::from_seed(&[9u8; PRIVATE_KEY_SEED_LEN]);
        let b = PrivateKey::from_seed(&[9u8; PRIVATE_KEY_SEED_LEN]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(b"m").unwrap(), b.sign(b"m").unwrap());
    }

    #[test]
    fn test_signature_length_checked() {
        let err = CertSignature::from_bytes(&[0u8; 63]).unwrap_err();
        assert!(matches!(err, CertError::InvalidSignature(_)));
        let sig = PrivateKey::generate().sign(b"x").unwrap();
        assert_eq!(CertSignature::from_base64(&sig.to_base64()).unwrap(), sig);
    }

    #[test]
    fn test_private_key_debug_hides_secret() {
        let key = PrivateKey::from_seed(&[0xAB; PRIVATE_KEY_SEED_LEN]);
        let printed = format!("{key:?}");
        assert!(!printed.contains(&"ab".repeat(32)));
        assert!(printed.contains(&key.public_key().to_hex()));
    }
}
