//! Integration tests for the certificate system
//!
//! Walks the full workflow:
//! 1. Root CA creation
//! 2. Intermediate and leaf issuance
//! 3. Transport through both encodings
//! 4. Chain verification against trust anchors
//! 5. Challenge-response authentication of the leaf holder

use phraseless_certs::{
    deserialize_certificate, issue_certificate, new_challenge, serialize_certificate,
    sign_challenge, verify_certificate, verify_certificate_chain, verify_challenge,
    Certificate, CertError, PrivateKey, Result, TrustStore, NAME_WIDTH, RECORD_LEN,
};
use phraseless_common::logging::{Component, Logger};
use std::sync::Arc;

fn create_test_logger() -> Arc<Logger> {
    Arc::new(Logger::new_root(Component::Custom("Certs"), "integration"))
}

struct Authority {
    key: PrivateKey,
    cert: Certificate,
}

impl Authority {
    fn root(name: &str) -> Result<Self> {
        let key = PrivateKey::generate();
        let cert = Certificate::self_signed(name, &key)?;
        Ok(Self { key, cert })
    }

    fn issue(&self, name: &str) -> Result<Authority> {
        let key = PrivateKey::generate();
        let cert = issue_certificate(name, &key.public_key(), &self.key)?;
        Ok(Authority { key, cert })
    }
}

#[test]
fn test_round_trip_preserves_certificate() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let longest = "x".repeat(NAME_WIDTH);
    for name in ["", "a", "node-1.example", longest.as_str()] {
        let cert = issue_certificate(name, &PrivateKey::generate().public_key(), &root.key)?;
        let serialized = serialize_certificate(&cert);
        let back = deserialize_certificate(&serialized)?;
        assert_eq!(back, cert);
        assert_eq!(back.name().as_bytes(), name.as_bytes());
    }
    Ok(())
}

#[test]
fn test_issued_certificate_verifies_against_issuer() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let leaf = root.issue("leaf")?;
    assert!(verify_certificate(&leaf.cert, &root.key.issuer_key()));
    assert!(verify_certificate(&leaf.cert, &root.cert.issuer_key()));
    assert!(!verify_certificate(&leaf.cert, &leaf.cert.issuer_key()));
    Ok(())
}

#[test]
fn test_any_flipped_bit_breaks_the_certificate() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let leaf = root.issue("leaf")?;
    let record = leaf.cert.to_record();
    let name_len = leaf.cert.name().len();

    let positions = (0..name_len).chain(NAME_WIDTH..RECORD_LEN);
    for byte in positions {
        for bit in 0..8 {
            let mut tampered = record;
            tampered[byte] ^= 1 << bit;
            // Some flips are structurally invalid (zero byte in the name,
            // key bytes off the curve); the rest must fail verification.
            if let Ok(cert) = Certificate::from_record(&tampered) {
                assert!(
                    !verify_certificate(&cert, &root.key.issuer_key()),
                    "flip of bit {bit} in byte {byte} still verified"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_chain_of_trust() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let intermediate = root.issue("intermediate")?;
    let leaf = intermediate.issue("leaf")?;

    let chain = [leaf.cert.clone(), intermediate.cert.clone()];
    assert!(verify_certificate_chain(&chain, &[root.cert.clone()])?);
    Ok(())
}

#[test]
fn test_broken_link_fails_chain() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let intermediate = root.issue("intermediate")?;
    let leaf = intermediate.issue("leaf")?;

    // Same intermediate name and key, but signed by an unrelated key.
    let rogue = PrivateKey::generate();
    let forged_intermediate =
        issue_certificate("intermediate", &intermediate.key.public_key(), &rogue)?;

    let chain = [leaf.cert.clone(), forged_intermediate];
    assert!(!verify_certificate_chain(&chain, &[root.cert.clone()])?);

    // A leaf signed by someone other than the intermediate also fails.
    let stray_leaf = root.issue("leaf")?;
    let chain = [stray_leaf.cert, intermediate.cert];
    assert!(!verify_certificate_chain(&chain, &[root.cert])?);
    Ok(())
}

#[test]
fn test_untrusted_root_fails_chain() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let other_root = Authority::root("other-ca")?;
    let intermediate = root.issue("intermediate")?;
    let leaf = intermediate.issue("leaf")?;

    let chain = [leaf.cert.clone(), intermediate.cert.clone()];
    assert!(verify_certificate(&chain[0], &chain[1].issuer_key()));
    assert!(!verify_certificate_chain(&chain, &[other_root.cert.clone()])?);
    assert!(verify_certificate_chain(&chain, &[other_root.cert, root.cert])?);
    Ok(())
}

#[test]
fn test_single_self_signed_chain() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let other_root = Authority::root("other-ca")?;

    assert!(verify_certificate_chain(&[root.cert.clone()], &[root.cert.clone()])?);
    assert!(!verify_certificate_chain(&[root.cert.clone()], &[other_root.cert])?);

    // Issued by the root and trusted root, but not self-signed.
    let child = root.issue("child")?;
    assert!(!verify_certificate_chain(&[child.cert], &[root.cert])?);
    Ok(())
}

#[test]
fn test_empty_chain_is_rejected() {
    let root = Authority::root("root-ca").expect("root");
    assert!(matches!(
        verify_certificate_chain(&[], &[root.cert]),
        Err(CertError::EmptyChain)
    ));
}

#[test]
fn test_challenge_response() -> Result<()> {
    let root = Authority::root("root-ca")?;
    let leaf = root.issue("leaf")?;

    let challenge = new_challenge();
    let response = sign_challenge(&challenge, &leaf.key)?;
    assert!(verify_challenge(&challenge, &response.to_bytes(), &leaf.cert));

    let impostor = sign_challenge(&challenge, &PrivateKey::generate())?;
    assert!(!verify_challenge(&challenge, &impostor.to_bytes(), &leaf.cert));
    Ok(())
}

#[test]
fn test_complete_authentication_workflow() -> Result<()> {
    println!("Starting complete authentication workflow test");

    // Phase 1: authorities
    let root = Authority::root("root-ca")?;
    let intermediate = root.issue("region-ca")?;
    let store = TrustStore::new(vec![root.cert.clone()], create_test_logger());
    println!(
        "   Root CA '{}' ({})",
        root.cert.name(),
        root.cert.public_key().compact_id()
    );

    // Phase 2: peer identity issued by the intermediate
    let peer = intermediate.issue("peer-42")?;

    // Phase 3: the peer ships its chain as base64 records
    let wire: Vec<String> = [&peer.cert, &intermediate.cert]
        .iter()
        .map(|cert| serialize_certificate(cert))
        .collect();
    let received = wire
        .iter()
        .map(|serialized| deserialize_certificate(serialized))
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(received[0].name().as_str(), Some("peer-42"));

    // Phase 4: challenge-response on top of the chain
    let challenge = new_challenge();
    let response = sign_challenge(&challenge, &peer.key)?;
    assert!(store.authenticate(&received, &challenge, &response.to_bytes())?);

    // A stolen chain without the private key is not enough.
    let stolen = sign_challenge(&challenge, &PrivateKey::generate())?;
    assert!(!store.authenticate(&received, &challenge, &stolen.to_bytes())?);

    // Malformed responses are input errors, not "untrusted".
    assert!(matches!(
        store.authenticate(&received, &challenge, &[0u8; 3]),
        Err(CertError::InvalidSignature(_))
    ));

    // A chain that does not reach the store is rejected before the challenge.
    let outsider = Authority::root("outsider")?.issue("peer-43")?;
    let response = sign_challenge(&challenge, &outsider.key)?;
    assert!(!store.authenticate(&[outsider.cert], &challenge, &response.to_bytes())?);

    println!("Complete authentication workflow test passed");
    Ok(())
}
