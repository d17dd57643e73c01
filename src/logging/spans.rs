//! Spans for the comparison pipeline
//!
//! One `similarity_run` span per invocation carries the correlation id; each
//! stage runs inside a timed child span.

use std::time::Instant;
use tracing::{span, Level, Span};
use uuid::Uuid;

/// Top-level span of one comparison run.
pub struct RunSpan {
    span: Span,
    start_time: Instant,
}

impl RunSpan {
    pub fn new(acquisition: &str, method: &str, correlation_id: Uuid) -> Self {
        let span = span!(
            Level::INFO,
            "similarity_run",
            acquisition = acquisition,
            method = method,
            correlation_id = %correlation_id
        );
        Self {
            span,
            start_time: Instant::now(),
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn record_completion(&self, masked: bool) {
        tracing::info!(
            parent: &self.span,
            masked = masked,
            execution_time_ms = self.start_time.elapsed().as_millis() as u64,
            "Similarity run completed"
        );
    }
}

/// Timed span around a single pipeline stage.
pub struct StageSpan {
    span: Span,
    start_time: Instant,
    stage: &'static str,
}

impl StageSpan {
    pub fn new(stage: &'static str) -> Self {
        let span = span!(Level::DEBUG, "stage", stage = stage);
        Self {
            span,
            start_time: Instant::now(),
            stage,
        }
    }

    /// Run `f` inside the span and log how long it took.
    pub fn in_scope<T>(self, f: impl FnOnce() -> T) -> T {
        let output = self.span.in_scope(f);
        let elapsed = self.start_time.elapsed();
        tracing::debug!(
            parent: &self.span,
            stage = self.stage,
            execution_time_ms = elapsed.as_secs_f64() * 1000.0,
            "Stage completed"
        );
        output
    }
}
