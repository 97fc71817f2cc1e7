//! Structured session logging.

use hlgen_client::ClientError;
use hlgen_models::{PipelineStage, SessionId};
use tracing::{debug, info, warn, Span};

/// Logger that tags every pipeline event with its session.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
}

impl SessionLogger {
    pub fn new(session_id: &SessionId) -> Self {
        Self {
            session_id: session_id.to_string(),
        }
    }

    /// Log a stage transition.
    pub fn log_transition(&self, from: PipelineStage, to: PipelineStage) {
        info!(
            session_id = %self.session_id,
            from = %from,
            to = %to,
            "Stage transition"
        );
    }

    /// Log a failed remote call.
    pub fn log_failure(&self, stage: PipelineStage, message: &str) {
        warn!(
            session_id = %self.session_id,
            stage = %stage,
            "Pipeline call failed: {}", message
        );
    }

    /// Log the classified cause of a failed remote call.
    pub fn log_client_error(&self, operation: &str, error: &ClientError) {
        warn!(
            session_id = %self.session_id,
            operation = operation,
            kind = ?error.kind(),
            retryable = error.is_retryable(),
            status = ?error.status(),
            "Remote call error: {}", error
        );
    }

    /// Log an operation ignored because its precondition did not hold.
    pub fn log_skipped(&self, operation: &str, reason: &str) {
        debug!(
            session_id = %self.session_id,
            operation = operation,
            "Operation skipped: {}", reason
        );
    }

    /// Log a response dropped by the stale-response guard.
    pub fn log_discarded(&self, operation: &str, ticket: u64) {
        info!(
            session_id = %self.session_id,
            operation = operation,
            ticket = ticket,
            "Discarding stale response"
        );
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Create a tracing span for one remote call of this session.
    pub fn create_span(&self, operation: &str, ticket: u64) -> Span {
        tracing::info_span!(
            "pipeline_call",
            session_id = %self.session_id,
            operation = operation,
            ticket = ticket
        )
    }
}
