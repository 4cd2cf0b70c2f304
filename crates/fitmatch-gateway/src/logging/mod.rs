//! Request logging infrastructure
//!
//! Trace IDs for request correlation and single-line entry/exit logs.

mod trace_context;

pub use trace_context::TraceContext;
