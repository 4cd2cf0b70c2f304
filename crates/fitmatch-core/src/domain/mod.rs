//! Domain entities, value objects, and events
//!
//! This module contains all domain-level types for FitMatch:
//! - Entities (Athlete, Matching, Interaction, Subscription, etc.)
//! - Value Objects (MatchingStatus, PairKey, WorkoutDay, etc.)
//! - Domain Events (DomainEvent enum for event-driven architecture)

mod athlete;
mod chat;
mod event;
mod gym;
mod interaction;
mod matching;
mod subscription;

pub use athlete::*;
pub use chat::*;
pub use event::DomainEvent;
pub use gym::*;
pub use interaction::*;
pub use matching::*;
pub use subscription::*;
