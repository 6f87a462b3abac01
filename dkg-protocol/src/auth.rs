use dkg_core::domain::{find_index, Node, Packet, Registry, Signed};
use dkg_core::foundation::{DkgError, Hash32, Result};
use secp256k1::ecdsa::Signature;
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use std::sync::Arc;

/// Signature scheme used to authenticate bundles. Signatures are opaque
/// byte strings; methods are pure and usable concurrently.
pub trait SignatureScheme: Send + Sync {
    fn sign(&self, private: &SecretKey, msg: &Hash32) -> Result<Vec<u8>>;
    fn verify(&self, public: &PublicKey, msg: &Hash32, signature: &[u8]) -> Result<()>;
}

/// ECDSA over secp256k1 with 32-byte digests and compact 64-byte
/// signatures.
pub struct EcdsaScheme {
    secp: Secp256k1<All>,
}

impl EcdsaScheme {
    pub fn new() -> Self {
        Self { secp: Secp256k1::new() }
    }
}

impl Default for EcdsaScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureScheme for EcdsaScheme {
    fn sign(&self, private: &SecretKey, msg: &Hash32) -> Result<Vec<u8>> {
        let message = Message::from_digest(*msg);
        Ok(self.secp.sign_ecdsa(&message, private).serialize_compact().to_vec())
    }

    fn verify(&self, public: &PublicKey, msg: &Hash32, signature: &[u8]) -> Result<()> {
        let message = Message::from_digest(*msg);
        let signature = Signature::from_compact(signature).map_err(|_| DkgError::SignatureVerificationFailed)?;
        self.secp.verify_ecdsa(&message, &signature, public).map_err(|_| DkgError::SignatureVerificationFailed)
    }
}

/// Verifies inbound envelopes and signs outbound bundles. The sender of a
/// packet is looked up by index in the node list its packet kind belongs
/// to: deals and justifications in the dealer list, responses in the
/// share-holder list.
pub struct Authenticator {
    old_nodes: Vec<Node>,
    new_nodes: Vec<Node>,
    long_term: SecretKey,
    scheme: Option<Arc<dyn SignatureScheme>>,
}

impl Authenticator {
    pub fn new(
        old_nodes: &[Node],
        new_nodes: &[Node],
        long_term: SecretKey,
        scheme: Option<Arc<dyn SignatureScheme>>,
    ) -> Self {
        Self { old_nodes: old_nodes.to_vec(), new_nodes: new_nodes.to_vec(), long_term, scheme }
    }

    pub fn enabled(&self) -> bool {
        self.scheme.is_some()
    }

    /// Checks the envelope signature against the sender's public key.
    /// Unconditional success when authentication is disabled.
    pub fn verify<T: Packet>(&self, packet: &mut Signed<T>) -> Result<()> {
        let Some(scheme) = self.scheme.as_ref() else {
            return Ok(());
        };
        let registry = T::registry();
        let nodes = match registry {
            Registry::Dealers => &self.old_nodes,
            Registry::ShareHolders => &self.new_nodes,
        };
        let index = packet.bundle.sender_index();
        let public = find_index(nodes, index).ok_or(DkgError::UnknownSender { index, registry: registry.as_str() })?;
        let hash = packet.bundle.hash();
        scheme.verify(public, &hash, &packet.signature)
    }

    /// Signs the bundle's canonical hash with the long-term key. Returns
    /// an empty signature when authentication is disabled.
    pub fn sign<T: Packet>(&self, bundle: &mut T) -> Result<Vec<u8>> {
        let Some(scheme) = self.scheme.as_ref() else {
            return Ok(Vec::new());
        };
        let hash = bundle.hash();
        scheme.sign(&self.long_term, &hash)
    }
}
