//! # FitMatch Core Library
//!
//! Domain logic, entities, and business rules for FitMatch.
//!
//! ## Modules
//!
//! - `branding` - Product naming constants
//! - `domain` - Core entities (Athlete, Matching, Interaction, Subscription, ...)
//! - `error` - Domain error taxonomy and client-facing error keys
//! - `repository` - Data access traits
//! - `service` - Domain services (matching, athletes, subscriptions, chat, gyms)
//! - `event_bus` - In-process fan-out of domain events

pub mod branding;
pub mod domain;
pub mod error;
pub mod event_bus;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use error::{keys, DomainError, DomainResult};
pub use repository::*;
pub use service::*;

pub use event_bus::{create_shared_event_bus, EventBus, EventReceiver, EventSender, SharedEventBus};
