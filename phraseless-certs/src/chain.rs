//! Chain-of-trust verification.
//!
//! A chain is ordered leaf first. Certificate `i` must be signed by the key
//! in certificate `i + 1`, and the last certificate must be signed by at
//! least one trusted anchor. A single certificate is its own issuer, so it
//! has to be self-signed.

use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::error::{CertError, Result};

/// Iterate `(subject, issuer)` pairs of a non-empty chain.
fn links(
    certs: &[Certificate],
) -> impl Iterator<Item = (&Certificate, &Certificate)> + '_ {
    let single = match certs {
        [only] => Some((only, only)),
        _ => None,
    };
    single
        .into_iter()
        .chain(certs.windows(2).map(|pair| (&pair[0], &pair[1])))
}

fn links_hold(certs: &[Certificate]) -> bool {
    links(certs).all(|(subject, issuer)| subject.verify(&issuer.issuer_key()))
}

/// Whether any anchor in `trusted` signed `top`.
pub(crate) fn anchored_by<'a>(
    top: &Certificate,
    trusted: &'a [Certificate],
) -> Option<&'a Certificate> {
    trusted.iter().find(|ca| top.verify(&ca.issuer_key()))
}

/// Verify `chain` against the `trusted` anchors.
///
/// Returns `Err(CertError::EmptyChain)` for an empty chain; every other
/// outcome, including any broken signature, is a plain boolean.
pub fn verify_certificate_chain(chain: &[Certificate], trusted: &[Certificate]) -> Result<bool> {
    let top = chain.last().ok_or(CertError::EmptyChain)?;
    Ok(links_hold(chain) && anchored_by(top, trusted).is_some())
}

/// A non-empty, ordered certificate chain: index 0 is the leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Certificate>", try_from = "Vec<Certificate>")]
pub struct CertificateChain {
    certs: Vec<Certificate>,
}

impl CertificateChain {
    pub fn new(certs: Vec<Certificate>) -> Result<Self> {
        if certs.is_empty() {
            return Err(CertError::EmptyChain);
        }
        Ok(Self { certs })
    }

    pub fn single(cert: Certificate) -> Self {
        Self { certs: vec![cert] }
    }

    /// The certificate being authenticated.
    pub fn leaf(&self) -> &Certificate {
        &self.certs[0]
    }

    /// The certificate closest to a trust anchor.
    pub fn top(&self) -> &Certificate {
        &self.certs[self.certs.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certs.iter()
    }

    pub fn as_slice(&self) -> &[Certificate] {
        &self.certs
    }

    /// `(subject, issuer)` pairs in chain order.
    pub fn links(&self) -> impl Iterator<Item = (&Certificate, &Certificate)> + '_ {
        links(&self.certs)
    }

    /// Append the next issuer towards the root.
    pub fn push_issuer(&mut self, issuer: Certificate) {
        self.certs.push(issuer);
    }

    pub fn verify(&self, trusted: &[Certificate]) -> bool {
        links_hold(&self.certs) && anchored_by(self.top(), trusted).is_some()
    }

    pub fn into_inner(self) -> Vec<Certificate> {
        self.certs
    }
}

impl TryFrom<Vec<Certificate>> for CertificateChain {
    type Error = CertError;

    fn try_from(certs: Vec<Certificate>) -> Result<Self> {
        Self::new(certs)
    }
}

impl From<CertificateChain> for Vec<Certificate> {
    fn from(chain: CertificateChain) -> Self {
        chain.certs
    }
}

impl<'a> IntoIterator for &'a CertificateChain {
    type Item = &'a Certificate;
    type IntoIter = std::slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certs.iter()
    }
}
