//! Phraseless Certs – public API facade
//!
//! Minimal public-key certificates: a name bound to an Ed25519 key, signed
//! by an issuing authority, verified through a chain of trust up to a set
//! of trusted anchors.

mod macros;

pub mod certificate;
pub mod chain;
pub mod challenge;
pub mod codec;
pub mod error;
pub mod trust;
pub mod types;

pub use error::{CertError, Result};

pub use types::{
    CertSignature, IssuerKey, PrivateKey, PublicKey, Verification, KEY_WIDTH, NAME_WIDTH,
    RECORD_LEN, SIG_WIDTH,
};

pub use certificate::{
    issue_certificate, signed_message, verify_certificate, Certificate, CertificateName,
};

pub use codec::{
    decode_certificate, deserialize_certificate, encode_certificate, serialize_certificate,
    EncodedCertificate,
};

pub use chain::{verify_certificate_chain, CertificateChain};

pub use challenge::{
    check_challenge, new_challenge, sign_challenge, verify_challenge, CHALLENGE_LEN,
};

pub use trust::{TrustConfig, TrustStore};

/// A certificate treated as a trust anchor (CA).
pub type TrustAnchor = Certificate;
