use crate::domain::node::Node;
use crate::foundation::Index;
use secp256k1::{PublicKey, SecretKey};
use serde::{Deserialize, Serialize};

/// Private share of the distributed secret, evaluated at the holder's
/// index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriShare {
    pub index: Index,
    pub value: SecretKey,
}

/// Share of a distributed key held by one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistKeyShare {
    /// Coefficients of the public polynomial holding the group key.
    pub commits: Vec<PublicKey>,
    /// Share of the distributed secret; private information.
    pub share: PriShare,
}

impl DistKeyShare {
    /// Public key associated with the distributed private key.
    pub fn public_key(&self) -> &PublicKey {
        &self.commits[0]
    }

    pub fn pri_share(&self) -> &PriShare {
        &self.share
    }

    pub fn commitments(&self) -> &[PublicKey] {
        &self.commits
    }
}

/// Output of a finished session: the nodes that successfully ran the
/// protocol and this participant's share of the group key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkgOutput {
    pub qual: Vec<Node>,
    pub key: DistKeyShare,
}

impl DkgOutput {
    /// True when the public parts (commitments and qualified set) match.
    /// Private shares differ per participant and are not compared.
    pub fn public_equal(&self, other: &DkgOutput) -> bool {
        self.key.commits == other.key.commits && self.qual == other.qual
    }
}
