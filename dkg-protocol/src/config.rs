use crate::auth::SignatureScheme;
use dkg_core::domain::Node;
use secp256k1::SecretKey;
use std::collections::HashSet;
use std::sync::Arc;

/// Driver configuration. The cryptographic configuration of the engine
/// itself (threshold, entropy, previous share) travels with the engine,
/// not here.
#[derive(Clone)]
pub struct Config {
    /// Node list of the dealers. In a fresh DKG this equals `new_nodes`;
    /// in a resharing it is the previous group.
    pub old_nodes: Vec<Node>,
    /// Node list of the share holders.
    pub new_nodes: Vec<Node>,
    /// This participant's long-term signing key.
    pub long_term: SecretKey,
    /// Advance a phase as soon as the expected number of bundles arrived
    /// instead of waiting for the phaser. Requires authentication: the
    /// early-advance trigger is attacker-controllable without it.
    pub fast_sync: bool,
    /// Scheme used to authenticate packets received from the board.
    /// `None` disables authentication entirely, e.g. when the board
    /// authenticates out-of-band through a smart contract.
    pub auth: Option<Arc<dyn SignatureScheme>>,
}

impl Config {
    /// Checks the node lists. The fast-sync/authentication precondition is
    /// not re-checked here: [`crate::Protocol::new`] refuses that
    /// combination with its dedicated error before validating anything
    /// else.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.old_nodes.is_empty() {
            errors.push("old_nodes must not be empty".to_string());
        }
        if self.new_nodes.is_empty() {
            errors.push("new_nodes must not be empty".to_string());
        }
        if has_duplicate_indices(&self.old_nodes) {
            errors.push("old_nodes indices must be unique".to_string());
        }
        if has_duplicate_indices(&self.new_nodes) {
            errors.push("new_nodes indices must be unique".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn has_duplicate_indices(nodes: &[Node]) -> bool {
    let mut seen = HashSet::new();
    nodes.iter().any(|node| !seen.insert(node.index))
}
