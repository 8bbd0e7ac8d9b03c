//! Scrub controller
//!
//! State machine behind the time bar: Idle until a drag begins, Scrubbing
//! until it ends. While scrubbing, every player interaction is best-effort:
//! failures are logged and broadcast, never surfaced to the gesture.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::config::ScrubTuning;
use crate::events::{PlayheadEvent, EVENT_CHANNEL_CAPACITY};
use crate::player::{PlaybackState, PlayerControl, SeekMode};
use crate::scrub::ScrubSession;

/// Batches time-bar drag events into player seeks
///
/// Must be driven from within a tokio runtime: the delayed seek is a spawned
/// task cancelled by whichever event supersedes it (a newer move, the drag
/// release, or [`shutdown`]).
///
/// The controller is cheap to clone; clones share one session.
///
/// [`shutdown`]: ScrubController::shutdown
pub struct ScrubController<P: PlayerControl + 'static> {
    inner: Arc<Inner<P>>,
}

impl<P: PlayerControl + 'static> Clone for ScrubController<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<P: PlayerControl + 'static> {
    player: Arc<P>,
    tuning: ScrubTuning,

    /// Current gesture, None while idle
    session: Mutex<Option<ScrubSession>>,

    /// Event broadcaster for host observability
    event_tx: broadcast::Sender<PlayheadEvent>,
}

impl<P: PlayerControl + 'static> ScrubController<P> {
    /// Create a controller over a player with the given tuning
    pub fn new(player: Arc<P>, tuning: ScrubTuning) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                player,
                tuning,
                session: Mutex::new(None),
                event_tx,
            }),
        }
    }

    /// Subscribe to scrub/seek events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayheadEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Whether a scrub gesture is currently in progress
    pub fn is_scrubbing(&self) -> bool {
        self.inner.session.lock().unwrap().is_some()
    }

    /// Drag began on the time bar
    ///
    /// Captures the playback state for restoration on release, pauses a
    /// playing player, and switches the seek mode to exact so in-gesture
    /// position reads stay truthful.
    pub fn scrub_started(&self) {
        let inner = &self.inner;
        let mut guard = inner.session.lock().unwrap();
        if guard.is_some() {
            debug!("Scrub start while already scrubbing, ignoring");
            return;
        }

        let was_playing = inner.player.playback_state() == PlaybackState::Playing;
        info!("Scrub started: was_playing={}", was_playing);

        if was_playing {
            if let Err(e) = inner.player.pause() {
                warn!("Pause at scrub start failed, continuing: {}", e);
            }
        }
        inner.set_seek_mode(SeekMode::Exact);

        *guard = Some(ScrubSession::new(was_playing, inner.player.position_ms()));
        inner.broadcast(PlayheadEvent::ScrubStarted {
            was_playing,
            timestamp: Utc::now(),
        });
    }

    /// Drag moved to a new target position
    ///
    /// A move farther than the coarse threshold from the current playback
    /// position seeks immediately at keyframe resolution. Anything closer is
    /// deferred by the debounce period and fires only if no newer move
    /// supersedes it in the meantime.
    pub fn scrub_moved(&self, position_ms: u64) {
        let inner = &self.inner;
        let mut guard = inner.session.lock().unwrap();
        let Some(session) = guard.as_mut() else {
            debug!("Scrub move to {}ms with no active gesture, ignoring", position_ms);
            return;
        };

        session.cancel_pending();
        session.generation += 1;
        session.last_target_ms = position_ms;
        let generation = session.generation;

        let current_ms = inner.player.position_ms();
        let distance_ms = position_ms.abs_diff(current_ms);

        if distance_ms > inner.tuning.coarse_seek_threshold_ms {
            debug!(
                "Coarse scrub move: {}ms -> {}ms (distance {}ms)",
                current_ms, position_ms, distance_ms
            );
            inner.seek(position_ms, SeekMode::ClosestKeyframe, true);
        } else {
            let delay = Duration::from_millis(inner.tuning.seek_debounce_ms);
            let task_inner = Arc::clone(inner);
            session.pending = Some(tokio::spawn(async move {
                sleep(delay).await;
                task_inner.fire_delayed_seek(generation);
            }));
        }
    }

    /// Drag ended
    ///
    /// Voids any pending delayed seek, issues the final exact seek unless the
    /// gesture was cancelled, always restores the default seek mode, and
    /// resumes playback if it was active when the gesture began.
    pub fn scrub_stopped(&self, position_ms: u64, cancelled: bool) {
        let inner = &self.inner;
        let mut guard = inner.session.lock().unwrap();
        let Some(mut session) = guard.take() else {
            debug!("Scrub stop at {}ms with no active gesture, ignoring", position_ms);
            return;
        };

        session.cancel_pending();
        info!(
            "Scrub stopped: position={}ms, cancelled={}, resume={}",
            position_ms, cancelled, session.resume_on_release
        );

        if !cancelled {
            inner.seek(position_ms, SeekMode::Exact, false);
        }
        inner.set_seek_mode(SeekMode::Default);

        if session.resume_on_release {
            if let Err(e) = inner.player.play() {
                warn!("Resume after scrub failed, continuing: {}", e);
            }
        }

        inner.broadcast(PlayheadEvent::ScrubFinished {
            position_ms,
            resumed: session.resume_on_release,
            cancelled,
            timestamp: Utc::now(),
        });
    }

    /// Release controller resources
    ///
    /// Voids any pending delayed seek and clears the scrubbing flag. Does not
    /// touch the player: a teardown path must not issue transport calls.
    pub fn shutdown(&self) {
        let mut guard = self.inner.session.lock().unwrap();
        if let Some(mut session) = guard.take() {
            session.cancel_pending();
            debug!("Scrub controller shut down with a gesture in progress");
        }
    }
}

impl<P: PlayerControl + 'static> Inner<P> {
    /// Delayed seek task body: runs after the debounce period
    ///
    /// `JoinHandle::abort` alone leaves a window once the sleep has resolved,
    /// so the task re-checks that the session is still live and that its
    /// generation was not superseded, under the session lock.
    fn fire_delayed_seek(&self, generation: u64) {
        let mut guard = self.session.lock().unwrap();
        let Some(session) = guard.as_mut() else {
            return;
        };
        if session.generation != generation {
            return;
        }

        let position_ms = session.last_target_ms;
        session.pending = None;
        // Seek under the lock so a concurrent stop cannot interleave between
        // the check and the call
        self.seek(position_ms, SeekMode::Exact, false);
    }

    /// Switch seek mode and issue a seek, best-effort
    fn seek(&self, position_ms: u64, mode: SeekMode, immediate: bool) {
        self.set_seek_mode(mode);
        match self.player.seek_to(position_ms) {
            Ok(()) => {
                self.broadcast(PlayheadEvent::SeekIssued {
                    position_ms,
                    mode,
                    immediate,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                warn!("Seek to {}ms failed, discarding: {}", position_ms, e);
                self.broadcast(PlayheadEvent::SeekFailed {
                    position_ms,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Change the sticky seek mode, best-effort
    fn set_seek_mode(&self, mode: SeekMode) {
        if let Err(e) = self.player.set_seek_mode(mode) {
            warn!("Seek mode change to {} failed, continuing: {}", mode, e);
        }
    }

    /// Broadcast an event; no receivers is OK
    fn broadcast(&self, event: PlayheadEvent) {
        let _ = self.event_tx.send(event);
    }
}
