//! Per-request correlation
//!
//! Every request gets a short trace id that is attached to its span, so the
//! entry line, handler logs and exit line can be grepped together.

use std::time::Instant;

use tracing::{info, info_span, Span};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TraceContext {
    /// Eight hex chars taken from a random UUID
    pub trace_id: String,
    pub method: String,
    pub path: String,
    /// Authenticated athlete, filled in once the auth layer has run
    pub athlete: Option<Uuid>,
    started: Instant,
}

impl TraceContext {
    pub fn new(method: &str, path: &str) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            trace_id: id[..8].to_string(),
            method: method.to_string(),
            path: path.to_string(),
            athlete: None,
            started: Instant::now(),
        }
    }

    pub fn with_athlete(mut self, athlete: Uuid) -> Self {
        self.athlete = Some(athlete);
        self
    }

    pub fn span(&self) -> Span {
        info_span!(
            "request",
            trace_id = %self.trace_id,
            method = %self.method,
            path = %self.path,
        )
    }

    pub fn log_start(&self) {
        info!("→ {} {}", self.method, self.path);
    }

    /// Exit line; `error_key` is the `error` field of a failed response
    pub fn log_finish(&self, status: u16, error_key: Option<&str>) {
        let elapsed = self.started.elapsed().as_millis();
        let who = self.athlete_label();
        match error_key {
            Some(key) => info!("← {} {} ({}ms) athlete={}", status, key, elapsed, who),
            None => info!("← {} ({}ms) athlete={}", status, elapsed, who),
        }
    }

    fn athlete_label(&self) -> String {
        match self.athlete {
            Some(id) => id.simple().to_string()[..8].to_string(),
            None => "anon".to_string(),
        }
    }
}
