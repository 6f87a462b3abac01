use dkg_core::domain::Phase;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;

/// Announces when the protocol should move to its next phase. Phases are
/// yielded in order: Deal (start), Response, Justification, Finish.
///
/// If the session ends before the sequence does (no complaints, or
/// fast-sync completeness), the driver simply stops listening. Boards
/// backed by the network usually pair with [`TimePhaser`]; a smart
/// contract board rather ticks the [`SteppedPhaser`] at certain blocks.
pub trait Phaser: Send {
    /// Called at most once; yields at most the four phases in order.
    fn phases(&mut self) -> BoxStream<'static, Phase>;
}

type SleepFn = Box<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Phaser that sleeps between phases. The sleep is injectable so tests
/// can run against a virtual clock.
pub struct TimePhaser {
    tx: mpsc::Sender<Phase>,
    rx: Option<mpsc::Receiver<Phase>>,
    sleep: Option<SleepFn>,
}

impl TimePhaser {
    pub fn new(period: Duration) -> Self {
        Self::with_sleep(Box::new(move || Box::pin(tokio::time::sleep(period))))
    }

    pub fn with_sleep(sleep: SleepFn) -> Self {
        // Room for the full sequence, so the producer never blocks on a
        // consumer that finished early.
        let (tx, rx) = mpsc::channel(4);
        Self { tx, rx: Some(rx), sleep: Some(sleep) }
    }
}

impl Phaser for TimePhaser {
    /// Subscribing starts the clock: Deal is emitted immediately, the
    /// remaining phases after one sleep each.
    fn phases(&mut self) -> BoxStream<'static, Phase> {
        let (Some(mut rx), Some(sleep)) = (self.rx.take(), self.sleep.take()) else {
            return futures_util::stream::empty().boxed();
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Phase::Deal).await;
            sleep().await;
            let _ = tx.send(Phase::Response).await;
            sleep().await;
            let _ = tx.send(Phase::Justification).await;
            sleep().await;
            let _ = tx.send(Phase::Finish).await;
        });
        async_stream::stream! {
            while let Some(phase) = rx.recv().await {
                yield phase;
            }
        }
        .boxed()
    }
}

/// Phaser advanced by an external coordinator, e.g. on a block height
/// trigger.
pub struct SteppedPhaser {
    tx: mpsc::Sender<Phase>,
    rx: Option<mpsc::Receiver<Phase>>,
}

impl SteppedPhaser {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(4);
        Self { tx, rx: Some(rx) }
    }

    /// Handle for driving the phaser after it moved into the protocol.
    pub fn controller(&self) -> SteppedControl {
        SteppedControl { tx: self.tx.clone() }
    }
}

impl Default for SteppedPhaser {
    fn default() -> Self {
        Self::new()
    }
}

impl Phaser for SteppedPhaser {
    fn phases(&mut self) -> BoxStream<'static, Phase> {
        let Some(mut rx) = self.rx.take() else {
            return futures_util::stream::empty().boxed();
        };
        async_stream::stream! {
            while let Some(phase) = rx.recv().await {
                yield phase;
            }
        }
        .boxed()
    }
}

#[derive(Clone)]
pub struct SteppedControl {
    tx: mpsc::Sender<Phase>,
}

impl SteppedControl {
    /// Announces the next phase. Returns false once the driver is gone.
    pub async fn advance(&self, phase: Phase) -> bool {
        self.tx.send(phase).await.is_ok()
    }
}
