//! Audit Logger - records every domain event
//!
//! Matching lifecycle, subscriptions and registrations are business facts
//! worth keeping in the log even when nothing else reacts to them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fitmatch_core::{DomainEvent, EventReceiver};
use tracing::info;

/// Domain event audit consumer
#[derive(Default)]
pub struct AuditLogger {
    handled: AtomicU64,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events recorded so far
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    /// Spawn the consumer loop. Runs until the event bus is dropped.
    pub fn start(self: Arc<Self>, mut events: EventReceiver) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("[AuditLogger] Started listening for domain events");

            while let Some(event) = events.recv().await {
                self.record(&event);
            }

            info!("[AuditLogger] Event channel closed");
        })
    }

    fn record(&self, event: &DomainEvent) {
        let users = event
            .affected_users()
            .iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join(",");

        match event.matching_id() {
            Some(matching_id) => info!(
                target: "audit",
                event_type = event.type_name(),
                matching_id = %matching_id,
                users = %users,
                "[AuditLogger] {}",
                event.type_name()
            ),
            None => info!(
                target: "audit",
                event_type = event.type_name(),
                users = %users,
                "[AuditLogger] {}",
                event.type_name()
            ),
        }

        self.handled.fetch_add(1, Ordering::Relaxed);
    }
}
