use crate::domain::node::Registry;
use crate::foundation::{Hash32, Index};
use secp256k1::{PublicKey, SecretKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// One encrypted share directed at a specific share holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// Index of the share holder this deal is destined to.
    pub share_index: Index,
    /// Evaluation of the dealer's secret polynomial at the holder's index,
    /// encrypted under the holder's public key.
    pub encrypted_share: Vec<u8>,
}

/// All deals issued by one dealer in one round, together with the public
/// coefficients of the polynomial the shares were drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealBundle {
    pub dealer_index: Index,
    pub deals: Vec<Deal>,
    /// Coefficient position is its polynomial degree; `public[0]` is the
    /// dealer's contribution to the group key. Never reordered.
    pub public: Vec<PublicKey>,
}

/// One share holder's accept or complain verdict for a single dealer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Index of the dealer this response is for.
    pub dealer_index: Index,
    pub status: bool,
}

/// All responses from one share holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBundle {
    /// Index of the share holder issuing these responses.
    pub share_index: Index,
    pub responses: Vec<Response>,
}

impl fmt::Display for ResponseBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "share holder {}: [", self.share_index)?;
        for (i, resp) in self.responses.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{{dealer {}, status {}}}", resp.dealer_index, resp.status)?;
        }
        write!(f, "]")
    }
}

/// A dealer's remediation for a single complaining share holder: the share
/// in the clear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    pub share_index: Index,
    pub share: SecretKey,
}

/// All justifications issued by one dealer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JustificationBundle {
    pub dealer_index: Index,
    pub justifications: Vec<Justification>,
}

/// A bundle that can be authenticated: canonical hash, sender index, and
/// the node list the sender belongs to.
///
/// The hash byte layout is frozen: it is the signed payload and must be
/// byte-identical across implementations. Hashing sorts the bundle's
/// sub-entries in place first, so the canonical order is observable.
pub trait Packet {
    fn hash(&mut self) -> Hash32;
    fn sender_index(&self) -> Index;
    fn registry() -> Registry;
}

impl Packet for DealBundle {
    /// `dealer_index` (u32 BE), then each public coefficient in given
    /// order (compressed), then each deal ordered by share index as
    /// `share_index` (u32 BE) followed by the encrypted share.
    fn hash(&mut self) -> Hash32 {
        self.deals.sort_by_key(|deal| deal.share_index);
        let mut hasher = Sha256::new();
        hasher.update(self.dealer_index.to_be_bytes());
        for coeff in &self.public {
            hasher.update(coeff.serialize());
        }
        for deal in &self.deals {
            hasher.update(deal.share_index.to_be_bytes());
            hasher.update(&deal.encrypted_share);
        }
        hasher.finalize().into()
    }

    fn sender_index(&self) -> Index {
        self.dealer_index
    }

    fn registry() -> Registry {
        Registry::Dealers
    }
}

impl Packet for ResponseBundle {
    /// `share_index` (u32 BE), then each response ordered by dealer index
    /// as `dealer_index` (u32 BE) followed by a status byte (0x01 / 0x00).
    fn hash(&mut self) -> Hash32 {
        self.responses.sort_by_key(|resp| resp.dealer_index);
        let mut hasher = Sha256::new();
        hasher.update(self.share_index.to_be_bytes());
        for resp in &self.responses {
            hasher.update(resp.dealer_index.to_be_bytes());
            hasher.update([u8::from(resp.status)]);
        }
        hasher.finalize().into()
    }

    fn sender_index(&self) -> Index {
        self.share_index
    }

    fn registry() -> Registry {
        Registry::ShareHolders
    }
}

impl Packet for JustificationBundle {
    /// `dealer_index` (u32 BE), then each justification ordered by share
    /// index as `share_index` (u32 BE) followed by the 32-byte share.
    fn hash(&mut self) -> Hash32 {
        self.justifications.sort_by_key(|just| just.share_index);
        let mut hasher = Sha256::new();
        hasher.update(self.dealer_index.to_be_bytes());
        for just in &self.justifications {
            hasher.update(just.share_index.to_be_bytes());
            hasher.update(just.share.secret_bytes());
        }
        hasher.finalize().into()
    }

    fn sender_index(&self) -> Index {
        self.dealer_index
    }

    fn registry() -> Registry {
        Registry::Dealers
    }
}

/// A bundle wrapped with the sender's signature over its canonical hash.
/// An empty signature is permitted only when authentication is disabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signed<T> {
    pub bundle: T,
    pub signature: Vec<u8>,
}

pub type AuthDealBundle = Signed<DealBundle>;
pub type AuthResponseBundle = Signed<ResponseBundle>;
pub type AuthJustifBundle = Signed<JustificationBundle>;
