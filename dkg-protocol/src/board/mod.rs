//! Interface between the protocol and the external world.

pub mod memory;
pub mod wire;

use async_trait::async_trait;
use dkg_core::domain::{AuthDealBundle, AuthJustifBundle, AuthResponseBundle};
use dkg_core::foundation::Result;
use futures_util::stream::BoxStream;

/// Stream of envelopes of one packet kind arriving from the other nodes.
pub type Subscription<T> = BoxStream<'static, T>;

/// The board consists in pushing packets out to the other nodes and
/// receiving packets in from them. A common board uses the network as the
/// underlying communication mechanism, but a smart-contract based
/// approach works equally.
///
/// Pushes must reach every node of the relevant set *including the sender
/// itself*: the driver counts on seeing its own bundles come back to land
/// them in its local buffer.
#[async_trait]
pub trait Board: Send {
    async fn push_deals(&self, bundle: AuthDealBundle) -> Result<()>;
    async fn push_responses(&self, bundle: AuthResponseBundle) -> Result<()>;
    async fn push_justifications(&self, bundle: AuthJustifBundle) -> Result<()>;

    /// Each ingress accessor is called at most once; the returned stream
    /// stays live for the length of the session. The driver stops
    /// consuming after the finish phase.
    fn incoming_deals(&mut self) -> Subscription<AuthDealBundle>;
    fn incoming_responses(&mut self) -> Subscription<AuthResponseBundle>;
    fn incoming_justifications(&mut self) -> Subscription<AuthJustifBundle>;
}
