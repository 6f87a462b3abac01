use crate::auth::Authenticator;
use crate::board::{Board, Subscription};
use crate::config::Config;
use crate::phaser::Phaser;
use dkg_core::domain::{
    AuthDealBundle, AuthJustifBundle, AuthResponseBundle, DealBundle, DkgEngine, DkgOutput, JustificationBundle, Packet, Phase,
    ResponseBundle, ResponseOutcome, Signed,
};
use dkg_core::foundation::{DkgError, Index};
use std::collections::BTreeMap;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Terminal outcome of a session: the final share and qualified set, or
/// the error that stopped the driver.
pub type ProtocolOutcome = Result<DkgOutput, DkgError>;

/// Receiving side of the single-shot result slot.
pub struct ProtocolHandle {
    rx: oneshot::Receiver<ProtocolOutcome>,
}

impl ProtocolHandle {
    /// Waits for the terminal outcome. `None` when the driver was
    /// cancelled before reaching one; callers running under their own
    /// deadline should wrap this in a timeout.
    pub async fn wait_end(self) -> Option<ProtocolOutcome> {
        self.rx.await.ok()
    }
}

/// Drives one DKG session: authenticates packets coming in from the
/// board, buffers them per phase, hands each buffer to the engine on the
/// matching transition, and pushes the engine's signed output back out.
///
/// All state lives in the single task running [`Protocol::run`]; the
/// board, phaser and engine are consumed exclusively and need not be
/// thread-safe beyond `Send`.
pub struct Protocol {
    config: Config,
    engine: Box<dyn DkgEngine>,
    board: Box<dyn Board>,
    phaser: Box<dyn Phaser>,
    authenticator: Authenticator,
    can_issue: bool,
    result: Option<oneshot::Sender<ProtocolOutcome>>,
}

impl Protocol {
    /// Validates the configuration and allocates the result slot. No task
    /// is spawned: the caller decides where [`Protocol::run`] executes.
    pub fn new(
        config: Config,
        engine: Box<dyn DkgEngine>,
        board: Box<dyn Board>,
        phaser: Box<dyn Phaser>,
    ) -> Result<(Self, ProtocolHandle), DkgError> {
        if config.fast_sync && config.auth.is_none() {
            return Err(DkgError::FastSyncWithoutAuth);
        }
        if let Err(errors) = config.validate() {
            return Err(DkgError::ConfigError(errors.join("; ")));
        }
        let authenticator = Authenticator::new(&config.old_nodes, &config.new_nodes, config.long_term, config.auth.clone());
        let can_issue = engine.can_issue();
        let (tx, rx) = oneshot::channel();
        let protocol = Self { config, engine, board, phaser, authenticator, can_issue, result: Some(tx) };
        Ok((protocol, ProtocolHandle { rx }))
    }

    /// Convenience constructor spawning the driver on the current
    /// runtime.
    pub fn start(
        config: Config,
        engine: Box<dyn DkgEngine>,
        board: Box<dyn Board>,
        phaser: Box<dyn Phaser>,
    ) -> Result<ProtocolHandle, DkgError> {
        let (protocol, handle) = Self::new(config, engine, board, phaser)?;
        tokio::spawn(protocol.run());
        Ok(handle)
    }

    pub async fn run(mut self) {
        let deals_in = self.board.incoming_deals();
        let resps_in = self.board.incoming_responses();
        let justifs_in = self.board.incoming_justifications();
        let phases = self.phaser.phases();
        info!(n_idx = self.engine.node_index(), fast_sync = self.config.fast_sync, "session started");
        if self.config.fast_sync {
            self.run_fast_sync(phases, deals_in, resps_in, justifs_in).await;
        } else {
            self.run_classic(phases, deals_in, resps_in, justifs_in).await;
        }
    }

    /// Classic mode: transitions happen on phaser ticks only. Buffers are
    /// plain lists; duplicate bundles from the same sender accumulate and
    /// the engine is expected to tolerate them.
    async fn run_classic(
        &mut self,
        mut phases: Subscription<Phase>,
        mut deals_in: Subscription<AuthDealBundle>,
        mut resps_in: Subscription<AuthResponseBundle>,
        mut justifs_in: Subscription<AuthJustifBundle>,
    ) {
        use futures_util::StreamExt;
        let mut deals: Vec<DealBundle> = Vec::new();
        let mut resps: Vec<ResponseBundle> = Vec::new();
        let mut justifs: Vec<JustificationBundle> = Vec::new();
        loop {
            tokio::select! {
                Some(phase) = phases.next() => match phase {
                    Phase::Deal => {
                        if !self.send_deals().await {
                            return;
                        }
                    }
                    Phase::Response => {
                        if !self.send_responses(deals.clone()).await {
                            return;
                        }
                    }
                    Phase::Justification => {
                        if !self.send_justifications(resps.clone()).await {
                            return;
                        }
                    }
                    Phase::Finish => {
                        self.finish(justifs.clone());
                        return;
                    }
                    Phase::Init => debug!("spurious init tick ignored"),
                },
                Some(mut packet) = deals_in.next() => {
                    if self.accept(&mut packet) {
                        deals.push(packet.bundle);
                    }
                },
                Some(mut packet) = resps_in.next() => {
                    if self.accept(&mut packet) {
                        resps.push(packet.bundle);
                    }
                },
                Some(mut packet) = justifs_in.next() => {
                    if self.accept(&mut packet) {
                        justifs.push(packet.bundle);
                    }
                },
                else => {
                    debug!(n_idx = self.engine.node_index(), "all event sources closed before finish");
                    return;
                }
            }
        }
    }

    /// Fast-sync mode: buffers are keyed by sender index (a resend
    /// replaces the previous bundle) and a transition additionally fires
    /// as soon as its buffer holds one bundle per expected sender. Phase
    /// transitions are guarded, so a tick arriving after the completeness
    /// trigger already fired is ignored.
    async fn run_fast_sync(
        &mut self,
        mut phases: Subscription<Phase>,
        mut deals_in: Subscription<AuthDealBundle>,
        mut resps_in: Subscription<AuthResponseBundle>,
        mut justifs_in: Subscription<AuthJustifBundle>,
    ) {
        use futures_util::StreamExt;
        let mut deals: BTreeMap<Index, DealBundle> = BTreeMap::new();
        let mut resps: BTreeMap<Index, ResponseBundle> = BTreeMap::new();
        let mut justifs: BTreeMap<Index, JustificationBundle> = BTreeMap::new();
        let old_n = self.config.old_nodes.len();
        let new_n = self.config.new_nodes.len();
        let mut phase = Phase::Init;
        loop {
            tokio::select! {
                Some(tick) = phases.next() => match tick {
                    Phase::Deal => {
                        phase = Phase::Deal;
                        if !self.send_deals().await {
                            return;
                        }
                    }
                    Phase::Response => {
                        if !self.fast_responses(&mut phase, &deals).await {
                            return;
                        }
                    }
                    Phase::Justification => {
                        if !self.fast_justifications(&mut phase, &resps).await {
                            return;
                        }
                    }
                    Phase::Finish => {
                        self.fast_finish(&mut phase, &justifs);
                        return;
                    }
                    Phase::Init => debug!("spurious init tick ignored"),
                },
                Some(mut packet) = deals_in.next() => {
                    if self.accept(&mut packet) {
                        deals.insert(packet.bundle.dealer_index, packet.bundle);
                    }
                    if deals.len() == old_n {
                        if !self.fast_responses(&mut phase, &deals).await {
                            return;
                        }
                    }
                },
                Some(mut packet) = resps_in.next() => {
                    if self.accept(&mut packet) {
                        resps.insert(packet.bundle.share_index, packet.bundle);
                    }
                    if resps.len() == new_n {
                        if !self.fast_justifications(&mut phase, &resps).await {
                            return;
                        }
                    }
                },
                Some(mut packet) = justifs_in.next() => {
                    if self.accept(&mut packet) {
                        justifs.insert(packet.bundle.dealer_index, packet.bundle);
                    }
                    if justifs.len() == old_n {
                        self.fast_finish(&mut phase, &justifs);
                        return;
                    }
                },
                else => {
                    debug!(n_idx = self.engine.node_index(), "all event sources closed before finish");
                    return;
                }
            }
        }
    }

    async fn fast_responses(&mut self, phase: &mut Phase, deals: &BTreeMap<Index, DealBundle>) -> bool {
        if !phase.can_transition_to(Phase::Response) {
            debug!(phase = phase.as_str(), "response transition already done, silently ignoring");
            return true;
        }
        *phase = Phase::Response;
        self.send_responses(deals.values().cloned().collect()).await
    }

    async fn fast_justifications(&mut self, phase: &mut Phase, resps: &BTreeMap<Index, ResponseBundle>) -> bool {
        if !phase.can_transition_to(Phase::Justification) {
            debug!(phase = phase.as_str(), "justification transition already done, silently ignoring");
            return true;
        }
        *phase = Phase::Justification;
        self.send_justifications(resps.values().cloned().collect()).await
    }

    fn fast_finish(&mut self, phase: &mut Phase, justifs: &BTreeMap<Index, JustificationBundle>) {
        if !phase.can_transition_to(Phase::Finish) {
            debug!(phase = phase.as_str(), "finish transition already done, silently ignoring");
            return;
        }
        *phase = Phase::Finish;
        self.finish(justifs.values().cloned().collect());
    }

    fn accept<T: Packet>(&self, packet: &mut Signed<T>) -> bool {
        match self.authenticator.verify(packet) {
            Ok(()) => true,
            Err(err) => {
                debug!(sender = packet.bundle.sender_index(), error = %err, "dropping unauthenticated packet");
                false
            }
        }
    }

    /// Returns false when the driver must stop.
    async fn send_deals(&mut self) -> bool {
        if !self.can_issue {
            debug!(n_idx = self.engine.node_index(), "not a dealer, nothing to issue");
            return true;
        }
        let mut bundle = match self.engine.deals() {
            Ok(bundle) => bundle,
            Err(err) => {
                self.deliver(Err(err));
                return false;
            }
        };
        let hash = bundle.hash();
        let signature = match self.authenticator.sign(&mut bundle) {
            Ok(signature) => signature,
            Err(err) => {
                warn!(n_idx = self.engine.node_index(), error = %err, "signing deal bundle failed");
                return false;
            }
        };
        debug!(
            n_idx = self.engine.node_index(),
            deals = bundle.deals.len(),
            hash = %hex::encode(hash),
            "pushing deal bundle"
        );
        if let Err(err) = self.board.push_deals(Signed { bundle, signature }).await {
            warn!(error = %err, "board push failed for deal bundle");
        }
        true
    }

    async fn send_responses(&mut self, deals: Vec<DealBundle>) -> bool {
        info!(n_idx = self.engine.node_index(), deals = deals.len(), "processing deal bundles");
        let bundle = match self.engine.process_deals(deals) {
            Ok(bundle) => bundle,
            Err(err) => {
                // We signal the end since we can't go on.
                self.deliver(Err(err));
                return false;
            }
        };
        let Some(mut bundle) = bundle else {
            return true;
        };
        let hash = bundle.hash();
        let signature = match self.authenticator.sign(&mut bundle) {
            Ok(signature) => signature,
            Err(err) => {
                warn!(n_idx = self.engine.node_index(), error = %err, "signing response bundle failed");
                return false;
            }
        };
        debug!(
            n_idx = self.engine.node_index(),
            bundle = %bundle,
            hash = %hex::encode(hash),
            "pushing response bundle"
        );
        if let Err(err) = self.board.push_responses(Signed { bundle, signature }).await {
            warn!(error = %err, "board push failed for response bundle");
        }
        true
    }

    async fn send_justifications(&mut self, resps: Vec<ResponseBundle>) -> bool {
        info!(n_idx = self.engine.node_index(), responses = resps.len(), "processing response bundles");
        let outcome = match self.engine.process_responses(resps) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.deliver(Err(err));
                return false;
            }
        };
        match outcome {
            ResponseOutcome::Finished(output) => {
                info!(n_idx = self.engine.node_index(), qual = output.qual.len(), "converged before the justification phase");
                self.deliver(Ok(output));
                false
            }
            ResponseOutcome::Justify(mut bundle) => {
                let hash = bundle.hash();
                let signature = match self.authenticator.sign(&mut bundle) {
                    Ok(signature) => signature,
                    Err(err) => {
                        warn!(n_idx = self.engine.node_index(), error = %err, "signing justification bundle failed");
                        return false;
                    }
                };
                debug!(
                    n_idx = self.engine.node_index(),
                    justifications = bundle.justifications.len(),
                    hash = %hex::encode(hash),
                    "pushing justification bundle"
                );
                if let Err(err) = self.board.push_justifications(Signed { bundle, signature }).await {
                    warn!(error = %err, "board push failed for justification bundle");
                }
                true
            }
            ResponseOutcome::Wait => true,
        }
    }

    fn finish(&mut self, justifs: Vec<JustificationBundle>) {
        info!(n_idx = self.engine.node_index(), justifications = justifs.len(), "finishing session");
        let outcome = self.engine.process_justifications(justifs);
        self.deliver(outcome);
    }

    /// Writes the terminal outcome. Taking the sender makes a second write
    /// impossible; the capacity-one slot never blocks, even when the
    /// caller never reads it.
    fn deliver(&mut self, outcome: ProtocolOutcome) {
        let Some(tx) = self.result.take() else {
            return;
        };
        if tx.send(outcome).is_err() {
            debug!("result receiver dropped before the outcome was read");
        }
    }
}
