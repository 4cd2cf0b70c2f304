//! Centralized product naming
//!
//! ```rust
//! use fitmatch_core::branding;
//!
//! assert_eq!(branding::LOG_PREFIX, branding::APP_ID);
//! ```

/// Machine identifier, used for the data directory
pub const APP_ID: &str = "fitmatch";

/// Human-readable product name
pub const DISPLAY_NAME: &str = "FitMatch";

/// Port the HTTP API binds to when none is configured
pub const DEFAULT_PORT: u16 = 3000;

/// Prefix of the daily rolling log files (`fitmatch.2026-01-22.log`)
pub const LOG_PREFIX: &str = APP_ID;
