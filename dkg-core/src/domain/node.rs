use crate::foundation::Index;
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

/// A participant identity: its long-term public key and its index amongst
/// the list of participants.
///
/// For a fresh DKG the index is usually the position in the participant
/// list. For a resharing, a node that already ran the previous round must
/// keep the index it was given in that round's node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub index: Index,
    pub public: PublicKey,
}

/// Which node list authenticates a packet kind: deals and justifications
/// come from dealers, responses from share holders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registry {
    Dealers,
    ShareHolders,
}

impl Registry {
    pub fn as_str(self) -> &'static str {
        match self {
            Registry::Dealers => "dealers",
            Registry::ShareHolders => "share_holders",
        }
    }
}

/// Looks up the public key of the node carrying `index`.
pub fn find_index(nodes: &[Node], index: Index) -> Option<&PublicKey> {
    nodes.iter().find(|node| node.index == index).map(|node| &node.public)
}
