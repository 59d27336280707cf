//! Certificate model, issuance and single-link verification.
//!
//! A certificate binds a name to a [`PublicKey`] and carries the issuer's
//! signature over the fixed-width message `name (zero padded) | key`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::EncodedCertificate;
use crate::error::{CertError, Result};
use crate::types::{
    CertSignature, IssuerKey, PrivateKey, PublicKey, Verification, KEY_WIDTH, NAME_WIDTH,
};

/// Length of the message an issuer signs.
pub const SIGNED_MESSAGE_LEN: usize = NAME_WIDTH + KEY_WIDTH;

/// Logical certificate name: at most [`NAME_WIDTH`] bytes, no zero bytes.
///
/// Zero is the padding byte of the fixed-width field, so a name holding one
/// would share its signed encoding with a shorter name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CertificateName(Vec<u8>);

impl CertificateName {
    pub fn new(name: impl Into<Vec<u8>>) -> Result<Self> {
        let name = name.into();
        if name.len() > NAME_WIDTH {
            return Err(CertError::InvalidName(format!(
                "name is {} bytes, maximum is {NAME_WIDTH}",
                name.len()
            )));
        }
        if let Some(pos) = name.iter().position(|b| *b == 0) {
            return Err(CertError::InvalidName(format!(
                "name contains a zero byte at offset {pos}"
            )));
        }
        Ok(Self(name))
    }

    /// Recover a name from its zero-padded field. Everything after the
    /// first zero byte must be padding.
    pub fn from_padded(field: &[u8; NAME_WIDTH]) -> Result<Self> {
        let end = field.iter().position(|b| *b == 0).unwrap_or(NAME_WIDTH);
        if field[end..].iter().any(|b| *b != 0) {
            return Err(CertError::Malformed(
                "non-zero bytes after name terminator".to_string(),
            ));
        }
        Ok(Self(field[..end].to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// UTF-8 view of the name, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn padded(&self) -> [u8; NAME_WIDTH] {
        let mut field = [0u8; NAME_WIDTH];
        field[..self.0.len()].copy_from_slice(&self.0);
        field
    }
}

impl TryFrom<&str> for CertificateName {
    type Error = CertError;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name.as_bytes())
    }
}

impl TryFrom<&[u8]> for CertificateName {
    type Error = CertError;

    fn try_from(name: &[u8]) -> Result<Self> {
        Self::new(name)
    }
}

impl fmt::Display for CertificateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for CertificateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

/// Build the exact byte string an issuer signs for `(name, key)`.
pub fn signed_message(
    name: &CertificateName,
    public_key: &PublicKey,
) -> [u8; SIGNED_MESSAGE_LEN] {
    let mut message = [0u8; SIGNED_MESSAGE_LEN];
    message[..NAME_WIDTH].copy_from_slice(&name.padded());
    message[NAME_WIDTH..].copy_from_slice(public_key.as_bytes());
    message
}

/// A name bound to a public key by an issuer's signature. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    name: CertificateName,
    public_key: PublicKey,
    signature: CertSignature,
}

impl Certificate {
    /// Assemble a certificate from parts without checking the signature.
    /// Used by decoders; trust is only established by verification.
    pub fn from_parts(
        name: CertificateName,
        public_key: PublicKey,
        signature: CertSignature,
    ) -> Self {
        Self {
            name,
            public_key,
            signature,
        }
    }

    /// Issue a root certificate signed by its own key.
    pub fn self_signed(name: impl AsRef<[u8]>, key: &PrivateKey) -> Result<Self> {
        issue_certificate(name, &key.public_key(), key)
    }

    pub fn name(&self) -> &CertificateName {
        &self.name
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn signature(&self) -> &CertSignature {
        &self.signature
    }

    /// The key this certificate vouches with when it issues others.
    pub fn issuer_key(&self) -> IssuerKey {
        self.public_key.as_issuer()
    }

    pub fn signed_message(&self) -> [u8; SIGNED_MESSAGE_LEN] {
        signed_message(&self.name, &self.public_key)
    }

    pub fn check(&self, issuer: &IssuerKey) -> Verification {
        issuer.verify(&self.signed_message(), &self.signature)
    }

    pub fn verify(&self, issuer: &IssuerKey) -> bool {
        self.check(issuer).is_valid()
    }

    pub fn is_self_signed(&self) -> bool {
        self.verify(&self.issuer_key())
    }
}

/// Issue a certificate binding `name` to `subject_key`, signed by `issuer`.
///
/// Names longer than [`NAME_WIDTH`] or containing zero bytes are rejected.
pub fn issue_certificate(
    name: impl AsRef<[u8]>,
    subject_key: &PublicKey,
    issuer: &PrivateKey,
) -> Result<Certificate> {
    let name = CertificateName::new(name.as_ref())?;
    let signature = issuer.sign(&signed_message(&name, subject_key))?;
    Ok(Certificate::from_parts(name, *subject_key, signature))
}

/// Check that `cert` was signed by `issuer`. Any cryptographic failure is `false`.
pub fn verify_certificate(cert: &Certificate, issuer: &IssuerKey) -> bool {
    cert.verify(issuer)
}

impl Serialize for Certificate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let encoded = EncodedCertificate::try_from(self).map_err(|e| {
            serde::ser::Error::custom(format!("Failed to serialize certificate: {}", e))
        })?;
        encoded.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Certificate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let encoded = EncodedCertificate::deserialize(deserializer)?;
        Certificate::try_from(&encoded).map_err(|e| {
            serde::de::Error::custom(format!("Failed to deserialize certificate: {}", e))
        })
    }
}
