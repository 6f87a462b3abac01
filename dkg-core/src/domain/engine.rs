use crate::domain::bundle::{DealBundle, JustificationBundle, ResponseBundle};
use crate::domain::outcome::DkgOutput;
use crate::foundation::{Index, Result};

/// What the engine decided after digesting a response set.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// Every dealer was accepted by every share holder; the session
    /// converged without a justification round.
    Finished(DkgOutput),
    /// Some share holders complained against this dealer; the bundle
    /// answers those complaints in the clear.
    Justify(JustificationBundle),
    /// Complaints exist but none target this dealer; wait for the
    /// justification phase.
    Wait,
}

/// Contract with the cryptographic engine computing the actual key
/// material. The driver owns the scheduling and the message exchange; the
/// engine owns the math.
pub trait DkgEngine: Send {
    /// Whether this participant contributes deals. False for a node that
    /// only joins as a share holder in a resharing.
    fn can_issue(&self) -> bool;

    /// Index of this participant in the share-holder list, for logging.
    fn node_index(&self) -> Index;

    /// Produces this dealer's bundle for the deal phase.
    fn deals(&mut self) -> Result<DealBundle>;

    /// Digests the deal bundles accumulated during the deal phase.
    /// `None` when this participant holds no shares and has nothing to
    /// respond.
    fn process_deals(&mut self, bundles: Vec<DealBundle>) -> Result<Option<ResponseBundle>>;

    /// Digests the response bundles accumulated during the response
    /// phase.
    fn process_responses(&mut self, bundles: Vec<ResponseBundle>) -> Result<ResponseOutcome>;

    /// Digests the justification bundles and assembles the final share.
    fn process_justifications(&mut self, bundles: Vec<JustificationBundle>) -> Result<DkgOutput>;
}
