//! In-process fan-out of [`DomainEvent`]s
//!
//! Services hold an [`EventSender`] and emit after a write has been committed.
//! Consumers such as the gateway's audit logger call [`EventBus::subscribe`]
//! and see every event emitted from then on. Nothing is persisted: a consumer
//! that falls more than the channel capacity behind loses the oldest events.

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use crate::domain::DomainEvent;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Emitting half handed to application services
#[derive(Clone)]
pub struct EventSender {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventSender {
    /// Publish `event`, returning how many consumers will see it
    ///
    /// Having no consumers is normal (tests, early startup) and yields 0.
    pub fn emit(&self, event: DomainEvent) -> usize {
        let kind = event.type_name();
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(event_type = kind, receivers = delivered, "[EventBus] emit");
        delivered
    }
}

pub struct EventReceiver {
    rx: broadcast::Receiver<DomainEvent>,
}

impl EventReceiver {
    /// Next event, or `None` once every sender is gone
    ///
    /// Lag is logged and skipped over rather than surfaced.
    pub async fn recv(&mut self) -> Option<DomainEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => {
                    warn!("[EventBus] Consumer fell behind, {} events dropped", missed);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv)
    pub fn try_recv(&mut self) -> Option<DomainEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("[EventBus] Consumer fell behind, {} events dropped", missed);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_shared_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}
