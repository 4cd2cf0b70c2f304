//! Gateway integration tests
//!
//! Requests go through the full router (auth, rate limiting, logging, error
//! translation) without binding a socket.

mod errors;
mod matching_routes;
