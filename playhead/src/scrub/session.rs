//! Scrub session state

use tokio::task::JoinHandle;

/// Transient state for one scrub gesture
///
/// Created on drag-start, mutated on each drag-move, cleared on drag-stop or
/// shutdown. Its presence in the controller is the currently-scrubbing flag.
#[derive(Debug)]
pub(crate) struct ScrubSession {
    /// Whether playback was active when the gesture began
    pub resume_on_release: bool,

    /// Last requested seek position in milliseconds
    pub last_target_ms: u64,

    /// Supersession counter: bumped on every move, checked by the delayed
    /// seek task before it fires
    pub generation: u64,

    /// Handle to the pending delayed seek task, if one is scheduled
    pub pending: Option<JoinHandle<()>>,
}

impl ScrubSession {
    pub fn new(resume_on_release: bool, start_position_ms: u64) -> Self {
        Self {
            resume_on_release,
            last_target_ms: start_position_ms,
            generation: 0,
            pending: None,
        }
    }

    /// Abort and drop the pending delayed seek, if any
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
