//! Trusted anchors and their configuration file.
//!
//! Anchors arrive out of band as one textual certificate record per config
//! entry. [`TrustStore`] wraps the decoded set with logging and the
//! authentication flow (chain of trust plus proof of key possession).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use phraseless_common::logging::{Component, Logger};

use crate::certificate::Certificate;
use crate::chain::{anchored_by, verify_certificate_chain};
use crate::challenge::check_challenge;
use crate::codec::{decode_certificate, encode_certificate, EncodedCertificate};
use crate::error::{CertError, Result};
use crate::{log_debug, log_info, log_warn};

/// Trust configuration stored as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Trusted CA certificates
    #[serde(default)]
    pub anchors: Vec<EncodedCertificate>,

    /// Reject anchors that are not signed by their own key
    #[serde(default)]
    pub require_self_signed_anchors: bool,
}

impl TrustConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CertError::Config(format!(
                "Trust configuration not found: {path:?}"
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// The set of trusted anchors used to verify chains
#[derive(Debug, Clone)]
pub struct TrustStore {
    anchors: Vec<Certificate>,
    require_self_signed: bool,
    logger: Arc<Logger>,
}

impl TrustStore {
    pub fn new(anchors: Vec<Certificate>, logger: Arc<Logger>) -> Self {
        Self {
            anchors,
            require_self_signed: false,
            logger: Arc::new(logger.with_component(Component::Trust)),
        }
    }

    /// Decode every anchor in `config`. One bad anchor fails the whole load.
    pub fn from_config(config: &TrustConfig, logger: Arc<Logger>) -> Result<Self> {
        let mut store = Self::new(Vec::with_capacity(config.anchors.len()), logger);
        store.require_self_signed = config.require_self_signed_anchors;

        for (index, encoded) in config.anchors.iter().enumerate() {
            let anchor = decode_certificate(encoded).map_err(|e| {
                CertError::Config(format!("anchor #{index} ({}): {e}", encoded.name))
            })?;
            store.add_anchor(anchor)?;
        }

        log_info!(
            store.logger,
            "Loaded {} trust anchor(s), self-signed required: {}",
            store.anchors.len(),
            store.require_self_signed
        );
        Ok(store)
    }

    pub fn load(path: &Path, logger: Arc<Logger>) -> Result<Self> {
        let config = TrustConfig::load(path)?;
        Self::from_config(&config, logger)
    }

    /// Export the anchors back to their textual configuration form.
    pub fn to_config(&self) -> Result<TrustConfig> {
        let anchors = self
            .anchors
            .iter()
            .map(encode_certificate)
            .collect::<Result<Vec<_>>>()?;
        Ok(TrustConfig {
            anchors,
            require_self_signed_anchors: self.require_self_signed,
        })
    }

    pub fn add_anchor(&mut self, anchor: Certificate) -> Result<()> {
        if self.require_self_signed && !anchor.is_self_signed() {
            log_warn!(
                self.logger,
                "Rejected anchor '{}' ({}): not self-signed",
                anchor.name(),
                anchor.public_key().compact_id()
            );
            return Err(CertError::UntrustedAnchor(format!(
                "'{}' is not self-signed",
                anchor.name()
            )));
        }
        if self.contains(&anchor) {
            return Ok(());
        }
        log_debug!(
            self.logger,
            "Trusting anchor '{}' ({})",
            anchor.name(),
            anchor.public_key().compact_id()
        );
        self.anchors.push(anchor);
        Ok(())
    }

    pub fn anchors(&self) -> &[Certificate] {
        &self.anchors
    }

    pub fn contains(&self, cert: &Certificate) -> bool {
        self.anchors.iter().any(|anchor| anchor == cert)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Verify `chain` against this store. Empty chains are an error.
    pub fn verify_chain(&self, chain: &[Certificate]) -> Result<bool> {
        let trusted = verify_certificate_chain(chain, &self.anchors)?;
        let leaf = &chain[0];

        if trusted {
            let anchor = chain
                .last()
                .and_then(|top| anchored_by(top, &self.anchors))
                .map(|anchor| anchor.name().to_string())
                .unwrap_or_default();
            log_debug!(
                self.logger,
                "Chain for '{}' ({} cert(s)) trusted via anchor '{}'",
                leaf.name(),
                chain.len(),
                anchor
            );
        } else {
            log_warn!(
                self.logger,
                "Chain for '{}' ({}, {} cert(s)) is not trusted",
                leaf.name(),
                leaf.public_key().compact_id(),
                chain.len()
            );
        }
        Ok(trusted)
    }

    /// Authenticate a peer: its chain must be trusted and the leaf's key
    /// must have signed `challenge`.
    pub fn authenticate(
        &self,
        chain: &[Certificate],
        challenge: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        if !self.verify_chain(chain)? {
            return Ok(false);
        }
        let leaf = &chain[0];
        let proven = check_challenge(challenge, signature, leaf)?.is_valid();
        if proven {
            log_debug!(self.logger, "Peer '{}' proved key possession", leaf.name());
        } else {
            log_warn!(
                self.logger,
                "Peer '{}' ({}) failed the challenge",
                leaf.name(),
                leaf.public_key().compact_id()
            );
        }
        Ok(proven)
    }
}
