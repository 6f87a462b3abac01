use crate::board::{wire, Board, Subscription};
use async_trait::async_trait;
use dkg_core::domain::{AuthDealBundle, AuthJustifBundle, AuthResponseBundle, DealBundle, JustificationBundle, ResponseBundle, Signed};
use dkg_core::foundation::Result;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::warn;

const TOPIC_CAPACITY: usize = 256;

/// In-process fan-out hub. Every push is wire-encoded and delivered to
/// every board handed out by [`BoardHub::board`], including the pushing
/// node itself. Backs the tests and local simulations.
pub struct BoardHub {
    deals: broadcast::Sender<Vec<u8>>,
    responses: broadcast::Sender<Vec<u8>>,
    justifications: broadcast::Sender<Vec<u8>>,
}

impl BoardHub {
    pub fn new() -> Self {
        Self {
            deals: broadcast::channel(TOPIC_CAPACITY).0,
            responses: broadcast::channel(TOPIC_CAPACITY).0,
            justifications: broadcast::channel(TOPIC_CAPACITY).0,
        }
    }

    /// A board for one participant. Subscriptions are taken here, so no
    /// packet pushed after this call is missed.
    pub fn board(&self) -> MemoryBoard {
        MemoryBoard {
            deals: self.deals.clone(),
            responses: self.responses.clone(),
            justifications: self.justifications.clone(),
            deals_rx: Some(self.deals.subscribe()),
            responses_rx: Some(self.responses.subscribe()),
            justifications_rx: Some(self.justifications.subscribe()),
        }
    }
}

impl Default for BoardHub {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryBoard {
    deals: broadcast::Sender<Vec<u8>>,
    responses: broadcast::Sender<Vec<u8>>,
    justifications: broadcast::Sender<Vec<u8>>,
    deals_rx: Option<broadcast::Receiver<Vec<u8>>>,
    responses_rx: Option<broadcast::Receiver<Vec<u8>>>,
    justifications_rx: Option<broadcast::Receiver<Vec<u8>>>,
}

fn subscription<T: DeserializeOwned + Send + 'static>(
    receiver: Option<broadcast::Receiver<Vec<u8>>>,
) -> Subscription<Signed<T>> {
    let Some(mut receiver) = receiver else {
        return futures_util::stream::empty().boxed();
    };
    async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(frame) => match wire::decode_envelope::<T>(&frame) {
                    Ok(envelope) => yield envelope,
                    Err(err) => warn!(error = %err, "discarding undecodable board frame"),
                },
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "memory board receiver lagged");
                }
            }
        }
    }
    .boxed()
}

#[async_trait]
impl Board for MemoryBoard {
    async fn push_deals(&self, bundle: AuthDealBundle) -> Result<()> {
        let frame = wire::encode_envelope(&bundle)?;
        // A topic with no receivers is not an error in a real transport.
        let _ = self.deals.send(frame);
        Ok(())
    }

    async fn push_responses(&self, bundle: AuthResponseBundle) -> Result<()> {
        let frame = wire::encode_envelope(&bundle)?;
        let _ = self.responses.send(frame);
        Ok(())
    }

    async fn push_justifications(&self, bundle: AuthJustifBundle) -> Result<()> {
        let frame = wire::encode_envelope(&bundle)?;
        let _ = self.justifications.send(frame);
        Ok(())
    }

    fn incoming_deals(&mut self) -> Subscription<AuthDealBundle> {
        subscription::<DealBundle>(self.deals_rx.take())
    }

    fn incoming_responses(&mut self) -> Subscription<AuthResponseBundle> {
        subscription::<ResponseBundle>(self.responses_rx.take())
    }

    fn incoming_justifications(&mut self) -> Subscription<AuthJustifBundle> {
        subscription::<JustificationBundle>(self.justifications_rx.take())
    }
}
