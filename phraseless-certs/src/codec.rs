//! Binary and textual certificate encodings.
//!
//! Binary: a fixed [`RECORD_LEN`]-byte record `name | key | signature`,
//! wrapped in standard base64 for transport.
//!
//! Textual: [`EncodedCertificate`] keeps the name as plain text and base64
//! encodes the key and signature individually, for structured config.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::certificate::{Certificate, CertificateName};
use crate::error::{CertError, Result};
use crate::types::{CertSignature, PublicKey, KEY_WIDTH, NAME_WIDTH, RECORD_LEN};

const KEY_OFFSET: usize = NAME_WIDTH;
const SIG_OFFSET: usize = NAME_WIDTH + KEY_WIDTH;

impl Certificate {
    /// Pack into the fixed-width binary record.
    pub fn to_record(&self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record[..KEY_OFFSET].copy_from_slice(&self.name().padded());
        record[KEY_OFFSET..SIG_OFFSET].copy_from_slice(self.public_key().as_bytes());
        record[SIG_OFFSET..].copy_from_slice(&self.signature().to_bytes());
        record
    }

    /// Unpack a binary record. The input must be exactly [`RECORD_LEN`] bytes.
    pub fn from_record(record: &[u8]) -> Result<Self> {
        if record.len() != RECORD_LEN {
            return Err(CertError::Malformed(format!(
                "record is {} bytes, expected {RECORD_LEN}",
                record.len()
            )));
        }

        let name_field: &[u8; NAME_WIDTH] = record[..KEY_OFFSET].try_into()?;
        let name = CertificateName::from_padded(name_field)?;
        let public_key = PublicKey::from_bytes(&record[KEY_OFFSET..SIG_OFFSET])
            .map_err(|e| CertError::Malformed(e.to_string()))?;
        let signature = CertSignature::from_bytes(&record[SIG_OFFSET..])?;

        Ok(Certificate::from_parts(name, public_key, signature))
    }
}

/// Serialize to base64 text wrapping the binary record.
pub fn serialize_certificate(cert: &Certificate) -> String {
    STANDARD.encode(cert.to_record())
}

/// Reverse of [`serialize_certificate`].
pub fn deserialize_certificate(serialized: impl AsRef<[u8]>) -> Result<Certificate> {
    let record = STANDARD.decode(serialized.as_ref())?;
    Certificate::from_record(&record)
}

/// Textual certificate: `(name, base64 public key, base64 signature)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedCertificate {
    pub name: String,
    pub public_key: String,
    pub signature: String,
}

impl EncodedCertificate {
    pub fn new(
        name: impl Into<String>,
        public_key: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            public_key: public_key.into(),
            signature: signature.into(),
        }
    }

    pub fn into_parts(self) -> (String, String, String) {
        (self.name, self.public_key, self.signature)
    }
}

impl From<(String, String, String)> for EncodedCertificate {
    fn from((name, public_key, signature): (String, String, String)) -> Self {
        Self::new(name, public_key, signature)
    }
}

/// Encode for structured text. Fails if the name is not UTF-8.
pub fn encode_certificate(cert: &Certificate) -> Result<EncodedCertificate> {
    let name = cert.name().as_str().ok_or(CertError::NonUtf8Name)?;
    Ok(EncodedCertificate::new(
        name,
        cert.public_key().to_base64(),
        cert.signature().to_base64(),
    ))
}

/// Decode a textual certificate. The signature is not checked.
pub fn decode_certificate(encoded: &EncodedCertificate) -> Result<Certificate> {
    let name = CertificateName::try_from(encoded.name.as_str())?;
    let public_key = PublicKey::from_base64(&encoded.public_key)?;
    let signature = CertSignature::from_base64(&encoded.signature)?;
    Ok(Certificate::from_parts(name, public_key, signature))
}

impl TryFrom<&Certificate> for EncodedCertificate {
    type Error = CertError;

    fn try_from(cert: &Certificate) -> Result<Self> {
        encode_certificate(cert)
    }
}

impl TryFrom<&EncodedCertificate> for Certificate {
    type Error = CertError;

    fn try_from(encoded: &EncodedCertificate) -> Result<Self> {
        decode_certificate(encoded)
    }
}
