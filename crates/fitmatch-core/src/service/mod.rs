//! Domain services
//!
//! Business logic that operates on domain entities via repositories.

mod athlete_service;
mod billing;
mod chat_service;
mod gym_service;
mod matching_mapper;
mod matching_service;
pub mod password;
mod subscription_service;


pub use athlete_service::*;
pub use billing::*;
pub use chat_service::*;
pub use gym_service::*;
pub use matching_mapper::*;
pub use matching_service::*;
pub use subscription_service::*;
