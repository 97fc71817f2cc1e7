//! Pipeline state store.
//!
//! [`PipelineStore`] is the only mutator of [`PipelineState`]. Every
//! operation is a transition with explicit preconditions; remote failures
//! are folded into `state.error` and never escape.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hlgen_client::{ClientConfig, HighlightClient};
use hlgen_models::{DownloadOutcome, PipelineStage, PipelineState, PipelineView, SessionId, VideoBlob, VideoFile};
use tokio::sync::watch;
use tracing::Instrument;

use crate::blobs::BlobRegistry;
use crate::error::PipelineResult;
use crate::logging::SessionLogger;
use crate::service::HighlightService;

/// Why an operation was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `select_file` got a file whose media type is not `video/*`
    NotAVideo { media_type: String },
    /// `request_generation` without a process result
    MissingProcessResult,
    /// `request_generation` outside Editing/Generating
    WrongStage(PipelineStage),
    /// `retry` at Processing with no stored file
    MissingFile,
    /// `retry` at a stage with no remote call
    NothingToRetry(PipelineStage),
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::NotAVideo { media_type } => format!("not a video type: '{}'", media_type),
            SkipReason::MissingProcessResult => "no process result yet".to_string(),
            SkipReason::WrongStage(stage) => format!("not allowed at stage {}", stage),
            SkipReason::MissingFile => "no file selected".to_string(),
            SkipReason::NothingToRetry(stage) => format!("nothing to retry at stage {}", stage),
        }
    }
}

/// Result of one store operation, as applied to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The remote call succeeded and the stage moved forward
    Advanced(PipelineStage),
    /// The remote call failed; `error` is set and the stage is the one given
    Failed(PipelineStage),
    /// Precondition did not hold; nothing changed
    Skipped(SkipReason),
    /// The response arrived after a reset or a newer call and was dropped
    Discarded,
    /// State was restored to the initial literal
    Reset,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Advanced(_) | Transition::Failed(_) | Transition::Reset)
    }
}

/// View-facing callbacks, one per store operation.
#[derive(Debug, Clone)]
pub enum ViewAction {
    FileSelected(VideoFile),
    Continue,
    Retry,
    Reset,
}

/// Owns one session's pipeline state.
///
/// Construct one per user session. Observers either poll
/// [`PipelineStore::snapshot`] or hold a [`PipelineStore::subscribe`]
/// receiver.
pub struct PipelineStore {
    service: Arc<dyn HighlightService>,
    state: watch::Sender<PipelineState>,
    /// Ticket of the newest issued call. Bumped on every issue and on reset,
    /// always while holding the state lock.
    ticket: AtomicU64,
    blobs: BlobRegistry,
    session_id: SessionId,
    logger: SessionLogger,
}

impl PipelineStore {
    pub fn new(service: Arc<dyn HighlightService>) -> Self {
        let (state, _) = watch::channel(PipelineState::initial());
        let session_id = SessionId::new();
        let logger = SessionLogger::new(&session_id);

        Self {
            service,
            state,
            ticket: AtomicU64::new(0),
            blobs: BlobRegistry::new(),
            session_id,
            logger,
        }
    }

    /// Build a store that talks to the real endpoints in `config`.
    pub fn with_client(config: ClientConfig) -> PipelineResult<Self> {
        let client = HighlightClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    /// Read-only projection for the view layer.
    pub fn view(&self) -> PipelineView {
        PipelineView::from(&*self.state.borrow())
    }

    pub fn stage(&self) -> PipelineStage {
        self.state.borrow().stage
    }

    /// Receiver notified after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// Payload behind a `blob:` download URL, if still registered.
    pub fn blob(&self, url: &str) -> Option<VideoBlob> {
        self.blobs.get(url)
    }

    pub fn blobs(&self) -> &BlobRegistry {
        &self.blobs
    }

    /// Route a view callback to its operation.
    pub async fn dispatch(&self, action: ViewAction) -> Transition {
        match action {
            ViewAction::FileSelected(file) => self.select_file(file).await,
            ViewAction::Continue => self.request_generation().await,
            ViewAction::Retry => self.retry().await,
            ViewAction::Reset => self.reset(),
        }
    }

    /// Store the selected file and immediately submit it for processing.
    ///
    /// Files whose media type is not `video/*` are ignored.
    pub async fn select_file(&self, file: VideoFile) -> Transition {
        if !file.is_video() {
            let reason = SkipReason::NotAVideo {
                media_type: file.media_type().to_string(),
            };
            self.logger.log_skipped("select_file", &reason.describe());
            return Transition::Skipped(reason);
        }

        self.state.send_modify(|s| s.selected_file = Some(file.clone()));
        self.submit_for_processing(file).await
    }

    /// Upload `file` to the process endpoint.
    ///
    /// Success moves to Editing; failure stays at Processing with `error`
    /// set so the upload can be retried.
    pub async fn submit_for_processing(&self, file: VideoFile) -> Transition {
        let (ticket, from) = self.issue(|s| {
            let from = s.stage;
            s.stage = PipelineStage::Processing;
            s.selected_file = Some(file.clone());
            s.is_processing = true;
            s.is_generating = false;
            s.error = None;
            s.process_result = None;
            s.download_url = None;
            self.blobs.revoke_all();
            from
        });

        self.logger.log_transition(from, PipelineStage::Processing);

        let result = self
            .service
            .process(&file)
            .instrument(self.logger.create_span("process", ticket))
            .await;
        if let Err(e) = &result {
            self.logger.log_client_error("process", e);
        }

        self.finish("process", ticket, |s| match result {
            Ok(process_result) => {
                s.process_result = Some(process_result);
                s.is_processing = false;
                s.stage = PipelineStage::Editing;
                Transition::Advanced(PipelineStage::Editing)
            }
            Err(e) => {
                s.is_processing = false;
                s.error = Some(e.to_string());
                Transition::Failed(PipelineStage::Processing)
            }
        })
    }

    /// Ask the generate endpoint for the final video.
    ///
    /// No-op unless a process result exists and the stage is Editing or
    /// Generating. Success moves to Complete; failure returns to Editing so
    /// the spreadsheet stays reachable without re-uploading.
    pub async fn request_generation(&self) -> Transition {
        let mut skipped = None;
        let begun = self.begin(|s| {
            let Some(process_result) = s.process_result.clone() else {
                skipped = Some(SkipReason::MissingProcessResult);
                return None;
            };
            if !matches!(s.stage, PipelineStage::Editing | PipelineStage::Generating) {
                skipped = Some(SkipReason::WrongStage(s.stage));
                return None;
            }
            let from = s.stage;
            s.stage = PipelineStage::Generating;
            s.is_generating = true;
            s.is_processing = false;
            s.error = None;
            Some((from, process_result))
        });

        let Some((ticket, (from, process_result))) = begun else {
            let reason = skipped.unwrap_or(SkipReason::MissingProcessResult);
            self.logger.log_skipped("request_generation", &reason.describe());
            return Transition::Skipped(reason);
        };

        self.logger.log_transition(from, PipelineStage::Generating);

        let result = self
            .service
            .generate(&process_result)
            .instrument(self.logger.create_span("generate", ticket))
            .await;
        if let Err(e) = &result {
            self.logger.log_client_error("generate", e);
        }

        self.finish("generate", ticket, |s| match result {
            Ok(outcome) => {
                let url = match outcome {
                    DownloadOutcome::Remote { url } => url,
                    DownloadOutcome::LocalBlob(blob) => self.blobs.register(blob),
                };
                s.download_url = Some(url);
                s.is_generating = false;
                s.stage = PipelineStage::Complete;
                Transition::Advanced(PipelineStage::Complete)
            }
            Err(e) => {
                s.is_generating = false;
                s.error = Some(e.to_string());
                s.stage = PipelineStage::Editing;
                Transition::Failed(PipelineStage::Editing)
            }
        })
    }

    /// Re-issue the call that belongs to the current stage.
    ///
    /// Keyed on `stage` alone: Processing re-uploads the stored file,
    /// Generating re-requests generation, anything else is a no-op.
    pub async fn retry(&self) -> Transition {
        let (stage, file) = {
            let state = self.state.borrow();
            (state.stage, state.selected_file.clone())
        };

        let reason = match (stage, file) {
            (PipelineStage::Processing, Some(file)) => return self.submit_for_processing(file).await,
            (PipelineStage::Processing, None) => SkipReason::MissingFile,
            (PipelineStage::Generating, _) => return self.request_generation().await,
            (other, _) => SkipReason::NothingToRetry(other),
        };

        self.logger.log_skipped("retry", &reason.describe());
        Transition::Skipped(reason)
    }

    /// Restore the initial state. Any call still in flight becomes stale.
    ///
    /// Blobs are revoked under the state lock, so a session started right
    /// after this cannot lose a blob it has just registered.
    pub fn reset(&self) -> Transition {
        let mut from = PipelineStage::Upload;
        self.state.send_modify(|s| {
            self.ticket.fetch_add(1, Ordering::SeqCst);
            from = s.stage;
            *s = PipelineState::initial();
            self.blobs.revoke_all();
        });
        self.logger.log_transition(from, PipelineStage::Upload);
        Transition::Reset
    }

    /// Apply the opening half of an unconditional transition and issue a
    /// ticket for it.
    fn issue<T: Default>(&self, f: impl FnOnce(&mut PipelineState) -> T) -> (u64, T) {
        let mut issued = (0, T::default());
        self.state.send_modify(|s| {
            let value = f(s);
            let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
            issued = (ticket, value);
        });
        issued
    }

    /// Like [`PipelineStore::issue`], but `f` returns `None` (without
    /// mutating) when its precondition fails.
    fn begin<T>(&self, f: impl FnOnce(&mut PipelineState) -> Option<T>) -> Option<(u64, T)> {
        let mut begun = None;
        self.state.send_if_modified(|s| match f(s) {
            Some(value) => {
                let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
                begun = Some((ticket, value));
                true
            }
            None => false,
        });
        begun
    }

    /// Apply the closing half of a transition if `ticket` is still current.
    fn finish(
        &self,
        operation: &str,
        ticket: u64,
        f: impl FnOnce(&mut PipelineState) -> Transition,
    ) -> Transition {
        let mut transition = Transition::Discarded;
        let mut from = PipelineStage::Upload;
        let mut error = None;
        self.state.send_if_modified(|s| {
            if self.ticket.load(Ordering::SeqCst) != ticket {
                return false;
            }
            from = s.stage;
            transition = f(s);
            error = s.error.clone();
            true
        });

        match &transition {
            Transition::Discarded => self.logger.log_discarded(operation, ticket),
            Transition::Advanced(to) => self.logger.log_transition(from, *to),
            Transition::Failed(stage) => {
                self.logger.log_failure(from, error.as_deref().unwrap_or_default());
                if *stage != from {
                    self.logger.log_transition(from, *stage);
                }
            }
            Transition::Skipped(_) | Transition::Reset => {}
        }

        transition
    }
}

impl std::fmt::Debug for PipelineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineStore")
            .field("session_id", &self.session_id)
            .field("state", &*self.state.borrow())
            .field("ticket", &self.ticket.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_is_applied() {
        assert!(Transition::Advanced(PipelineStage::Editing).is_applied());
        assert!(Transition::Failed(PipelineStage::Processing).is_applied());
        assert!(Transition::Reset.is_applied());
        assert!(!Transition::Discarded.is_applied());
        assert!(!Transition::Skipped(SkipReason::MissingFile).is_applied());
    }

    #[test]
    fn test_skip_reason_describe() {
        let reason = SkipReason::NotAVideo {
            media_type: "text/plain".to_string(),
        };
        assert_eq!(reason.describe(), "not a video type: 'text/plain'");
        assert_eq!(
            SkipReason::NothingToRetry(PipelineStage::Complete).describe(),
            "nothing to retry at stage complete"
        );
    }
}
