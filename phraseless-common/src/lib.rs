//! Phraseless Common
//!
//! Shared utilities for the Phraseless certificate stack.
//!
//! This crate provides:
//! - Component-based structured logging with identity context
//! - Logging configuration backed by `env_logger`
//! - Compact, log-friendly identifiers for public keys

pub mod logging;

pub use logging::{Component, LogLevel, Logger, LoggingConfig};

/// Utility module for compact ID encoding
pub mod compact_ids {
    use data_encoding::BASE32HEX_NOPAD;
    use sha2::{Digest, Sha256};

    /// Generate a short identifier from public key bytes using SHA-256.
    /// - Truncate: first 16 bytes of the hash
    /// - Encode: Base32hex (no padding), lowercase (26 chars)
    pub fn compact_id(public_key: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(public_key);
        let hash_result = hasher.finalize();

        let compact_hash = &hash_result[..16];
        BASE32HEX_NOPAD.encode(compact_hash).to_lowercase()
    }

}
