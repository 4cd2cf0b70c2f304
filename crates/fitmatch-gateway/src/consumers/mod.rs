//! Event Consumers - Domain event handlers
//!
//! Consumers subscribe to DomainEvents from the EventBus and react in their
//! own context:
//!
//! - **AuditLogger**: Writes one structured log line per domain event
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     EventBus (DomainEvent)                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                       ┌─────────────┐
//!                       │ AuditLogger │
//!                       └─────────────┘
//!                              │
//!                              ▼
//!                      tracing (target "audit")
//! ```

mod audit_logger;

pub use audit_logger::AuditLogger;
