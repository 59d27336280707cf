//! Challenge-response proof of key possession.
//!
//! The verifier sends fresh random bytes, the holder of a certificate signs
//! them with the matching private key, and the verifier checks the raw
//! signature against the certificate's public key.

use rand::{rngs::OsRng, RngCore};

use crate::certificate::Certificate;
use crate::error::Result;
use crate::types::{CertSignature, PrivateKey, Verification};

pub const CHALLENGE_LEN: usize = 32;

/// Fresh random challenge for a peer to sign.
pub fn new_challenge() -> [u8; CHALLENGE_LEN] {
    let mut challenge = [0u8; CHALLENGE_LEN];
    OsRng.fill_bytes(&mut challenge);
    challenge
}

/// Prover side: sign the challenge with the certificate's private key.
pub fn sign_challenge(challenge: &[u8], key: &PrivateKey) -> Result<CertSignature> {
    key.sign(challenge)
}

/// Check a challenge response. Signature bytes of the wrong length are an
/// error; a well-formed but wrong signature is [`Verification::Invalid`].
pub fn check_challenge(
    challenge: &[u8],
    signature: &[u8],
    cert: &Certificate,
) -> Result<Verification> {
    let signature = CertSignature::from_bytes(signature)?;
    Ok(cert.public_key().verify(challenge, &signature))
}

/// Whether `signature` is the certificate key's signature over `challenge`.
/// Any failure, malformed signature bytes included, is `false`.
pub fn verify_challenge(challenge: &[u8], signature: &[u8], cert: &Certificate) -> bool {
    matches!(
        check_challenge(challenge, signature, cert),
        Ok(Verification::Valid)
    )
}
