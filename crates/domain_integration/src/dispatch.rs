//! Non-blocking event dispatch
//!
//! Audit records and error reports must never add latency or failure to an
//! upstream call. A [`BackgroundDispatcher`] owns a bounded queue drained by
//! a worker task that forwards each event to an [`EventSink`]:
//!
//! - `dispatch` never waits; a full or closed queue drops the event with a
//!   warning
//! - sink failures are logged and swallowed by the worker
//! - `flush` resolves once every event queued before it has been handed to
//!   the sink
//!
//! The worker stops when the last dispatcher handle is dropped.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

use core_kernel::EventSink;

enum Command<E> {
    Deliver(E),
    Flush(oneshot::Sender<()>),
}

/// Handle to a background delivery queue for events of type `E`
pub struct BackgroundDispatcher<E> {
    name: &'static str,
    tx: mpsc::Sender<Command<E>>,
}

impl<E> Clone for BackgroundDispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<E: Send + 'static> BackgroundDispatcher<E> {
    /// Starts a worker on the current tokio runtime
    ///
    /// `name` labels log lines; `capacity` bounds the queue (minimum 1).
    pub fn spawn(
        name: &'static str,
        sink: Arc<dyn EventSink<E>>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Command<E>>(capacity.max(1));

        let worker = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Deliver(event) => {
                        if let Err(e) = sink.deliver(event).await {
                            warn!(dispatcher = name, error = %e, "Event sink rejected event");
                        }
                    }
                    Command::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });

        (Self { name, tx }, worker)
    }

    /// Queues an event without waiting
    pub fn dispatch(&self, event: E) {
        match self.tx.try_send(Command::Deliver(event)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(dispatcher = self.name, "Event queue full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(dispatcher = self.name, "Event worker stopped, dropping event");
            }
        }
    }

    /// Waits until every previously queued event has reached the sink
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Command::Flush(ack)).await.is_ok() {
            let _ = done.await;
        }
    }
}
