use dkg_core::domain::{
    Deal, DealBundle, DkgEngine, DkgOutput, DistKeyShare, Justification, JustificationBundle, Node, PriShare, Response,
    ResponseBundle, ResponseOutcome,
};
use dkg_core::foundation::{DkgError, Index, Result};
use dkg_protocol::board::memory::BoardHub;
use dkg_protocol::{Config, EcdsaScheme, Protocol, ProtocolHandle, SignatureScheme, SteppedControl, SteppedPhaser};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::sync::{Arc, Mutex};

/// Behaviour knobs for one participant's scripted engine.
#[derive(Clone, Debug)]
pub struct EngineScript {
    pub can_issue: bool,
    /// Report convergence from `process_responses` when no complaint was
    /// seen, instead of waiting for the finish phase.
    pub converge_on_responses: bool,
    /// Complain against this dealer instead of accepting its deal.
    pub complain_against: Option<Index>,
    pub fail_deal_processing: bool,
}

impl Default for EngineScript {
    fn default() -> Self {
        Self { can_issue: true, converge_on_responses: false, complain_against: None, fail_deal_processing: false }
    }
}

/// Everything the driver handed to the engine, for assertions.
#[derive(Default)]
pub struct EngineCalls {
    pub deals: Vec<Vec<DealBundle>>,
    pub responses: Vec<Vec<ResponseBundle>>,
    pub justifications: Vec<Vec<JustificationBundle>>,
}

pub struct MockEngine {
    index: Index,
    nodes: Vec<Node>,
    secret: SecretKey,
    script: EngineScript,
    calls: Arc<Mutex<EngineCalls>>,
}

impl MockEngine {
    pub fn new(index: Index, nodes: Vec<Node>, secret: SecretKey, script: EngineScript) -> (Self, Arc<Mutex<EngineCalls>>) {
        let calls = Arc::new(Mutex::new(EngineCalls::default()));
        (Self { index, nodes, secret, script, calls: calls.clone() }, calls)
    }

    fn output(&self) -> DkgOutput {
        DkgOutput {
            qual: self.nodes.clone(),
            key: DistKeyShare {
                commits: self.nodes.iter().map(|node| node.public).collect(),
                share: PriShare { index: self.index, value: self.secret },
            },
        }
    }
}

impl DkgEngine for MockEngine {
    fn can_issue(&self) -> bool {
        self.script.can_issue
    }

    fn node_index(&self) -> Index {
        self.index
    }

    fn deals(&mut self) -> Result<DealBundle> {
        let secp = Secp256k1::new();
        Ok(DealBundle {
            dealer_index: self.index,
            deals: self
                .nodes
                .iter()
                .map(|node| Deal {
                    share_index: node.index,
                    encrypted_share: vec![self.index as u8, node.index as u8, 0x5A],
                })
                .collect(),
            public: vec![PublicKey::from_secret_key(&secp, &self.secret)],
        })
    }

    fn process_deals(&mut self, bundles: Vec<DealBundle>) -> Result<Option<ResponseBundle>> {
        self.calls.lock().expect("calls lock").deals.push(bundles.clone());
        if self.script.fail_deal_processing {
            return Err(DkgError::EngineFailed("deal processing failed".to_string()));
        }
        Ok(Some(ResponseBundle {
            share_index: self.index,
            responses: bundles
                .iter()
                .map(|bundle| Response {
                    dealer_index: bundle.dealer_index,
                    status: self.script.complain_against != Some(bundle.dealer_index),
                })
                .collect(),
        }))
    }

    fn process_responses(&mut self, bundles: Vec<ResponseBundle>) -> Result<ResponseOutcome> {
        self.calls.lock().expect("calls lock").responses.push(bundles.clone());
        let complaints: Vec<(Index, Index)> = bundles
            .iter()
            .flat_map(|bundle| {
                bundle
                    .responses
                    .iter()
                    .filter(|resp| !resp.status)
                    .map(|resp| (bundle.share_index, resp.dealer_index))
                    .collect::<Vec<_>>()
            })
            .collect();

        let against_us: Vec<Index> = complaints.iter().filter(|&&(_, dealer)| dealer == self.index).map(|&(holder, _)| holder).collect();
        if !against_us.is_empty() {
            return Ok(ResponseOutcome::Justify(JustificationBundle {
                dealer_index: self.index,
                justifications: against_us
                    .into_iter()
                    .map(|share_index| Justification { share_index, share: self.secret })
                    .collect(),
            }));
        }
        if !complaints.is_empty() {
            return Ok(ResponseOutcome::Wait);
        }
        if self.script.converge_on_responses {
            return Ok(ResponseOutcome::Finished(self.output()));
        }
        Ok(ResponseOutcome::Wait)
    }

    fn process_justifications(&mut self, bundles: Vec<JustificationBundle>) -> Result<DkgOutput> {
        self.calls.lock().expect("calls lock").justifications.push(bundles);
        Ok(self.output())
    }
}

/// Deterministic long-term keys and node list for an `n`-participant
/// fresh DKG (old and new sets equal).
pub fn group(n: u32) -> (Vec<SecretKey>, Vec<Node>) {
    let secp = Secp256k1::new();
    let secrets: Vec<SecretKey> =
        (0..n).map(|i| SecretKey::from_slice(&[i as u8 + 1; 32]).expect("seed key")).collect();
    let nodes = secrets
        .iter()
        .enumerate()
        .map(|(index, secret)| Node { index: index as Index, public: PublicKey::from_secret_key(&secp, secret) })
        .collect();
    (secrets, nodes)
}

pub fn ecdsa() -> Arc<dyn SignatureScheme> {
    Arc::new(EcdsaScheme::new())
}

pub struct Participant {
    pub handle: ProtocolHandle,
    pub control: SteppedControl,
    pub calls: Arc<Mutex<EngineCalls>>,
}

/// Spawns one driver on the hub with a stepped phaser and a scripted
/// engine.
pub fn spawn_participant(
    hub: &BoardHub,
    secrets: &[SecretKey],
    nodes: &[Node],
    index: Index,
    script: EngineScript,
    fast_sync: bool,
    auth: Option<Arc<dyn SignatureScheme>>,
) -> Participant {
    let phaser = SteppedPhaser::new();
    let control = phaser.controller();
    let (handle, calls) = spawn_with_phaser(hub, secrets, nodes, index, script, fast_sync, auth, Box::new(phaser));
    Participant { handle, control, calls }
}

/// Same, with a caller-provided phaser (e.g. a [`dkg_protocol::TimePhaser`]).
#[allow(clippy::too_many_arguments)]
pub fn spawn_with_phaser(
    hub: &BoardHub,
    secrets: &[SecretKey],
    nodes: &[Node],
    index: Index,
    script: EngineScript,
    fast_sync: bool,
    auth: Option<Arc<dyn SignatureScheme>>,
    phaser: Box<dyn dkg_protocol::Phaser>,
) -> (ProtocolHandle, Arc<Mutex<EngineCalls>>) {
    let config = Config {
        old_nodes: nodes.to_vec(),
        new_nodes: nodes.to_vec(),
        long_term: secrets[index as usize],
        fast_sync,
        auth,
    };
    let (engine, calls) = MockEngine::new(index, nodes.to_vec(), secrets[index as usize], script);
    let handle =
        Protocol::start(config, Box::new(engine), Box::new(hub.board()), phaser).expect("valid configuration");
    (handle, calls)
}

/// Advances every participant to `phase` in lockstep.
pub async fn advance_all(participants: &[Participant], phase: dkg_core::domain::Phase) {
    for participant in participants {
        participant.control.advance(phase).await;
    }
}
