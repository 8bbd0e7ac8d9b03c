//! Scrub controller integration tests
//!
//! Drives the controller against a recording player backend and verifies:
//! - Coarse moves seek immediately, fine moves wait out the debounce period
//! - A newer move supersedes a pending delayed seek
//! - Stop voids pending work, issues one final exact seek, restores state
//! - Shutdown voids pending work and clears the scrubbing flag
//! - Player failures are swallowed and reported only as events

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use playhead::config::ScrubTuning;
use playhead::events::PlayheadEvent;
use playhead::player::{PlaybackState, PlayerControl, SeekMode};
use playhead::scrub::ScrubController;
use playhead::{Error, Result};

/// One recorded call into the player backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Play,
    Pause,
    Seek(u64),
    Mode(SeekMode),
}

/// Recording player backend
///
/// Successful seeks move the reported position, like a real engine.
struct MockPlayer {
    calls: Mutex<Vec<Call>>,
    position_ms: AtomicU64,
    state: Mutex<PlaybackState>,
    fail_seeks: AtomicBool,
}

impl MockPlayer {
    fn new(position_ms: u64, state: PlaybackState) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            position_ms: AtomicU64::new(position_ms),
            state: Mutex::new(state),
            fail_seeks: AtomicBool::new(false),
        })
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Positions of all successful seeks, in order
    fn seeks(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Seek(pos) => Some(pos),
                _ => None,
            })
            .collect()
    }

    fn set_fail_seeks(&self, fail: bool) {
        self.fail_seeks.store(fail, Ordering::SeqCst);
    }
}

impl PlayerControl for MockPlayer {
    fn play(&self) -> Result<()> {
        self.record(Call::Play);
        *self.state.lock().unwrap() = PlaybackState::Playing;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.record(Call::Pause);
        *self.state.lock().unwrap() = PlaybackState::Paused;
        Ok(())
    }

    fn seek_to(&self, position_ms: u64) -> Result<()> {
        if self.fail_seeks.load(Ordering::SeqCst) {
            return Err(Error::Seek("backend rejected seek".to_string()));
        }
        self.record(Call::Seek(position_ms));
        self.position_ms.store(position_ms, Ordering::SeqCst);
        Ok(())
    }

    fn set_seek_mode(&self, mode: SeekMode) -> Result<()> {
        self.record(Call::Mode(mode));
        Ok(())
    }

    fn position_ms(&self) -> u64 {
        self.position_ms.load(Ordering::SeqCst)
    }

    fn playback_state(&self) -> PlaybackState {
        *self.state.lock().unwrap()
    }
}

/// Controller over a fresh mock with default tuning (1000ms threshold, 100ms debounce)
fn controller(
    position_ms: u64,
    state: PlaybackState,
) -> (ScrubController<MockPlayer>, Arc<MockPlayer>) {
    let player = MockPlayer::new(position_ms, state);
    let controller = ScrubController::new(Arc::clone(&player), ScrubTuning::default());
    (controller, player)
}

/// Let pending delayed seeks (100ms debounce) come due on the paused clock
async fn run_out_debounce() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test(start_paused = true)]
async fn far_move_seeks_immediately_at_keyframe_resolution() {
    let (scrub, player) = controller(0, PlaybackState::Paused);

    scrub.scrub_started();
    scrub.scrub_moved(5_000);

    // No waiting: the coarse seek happened synchronously
    assert_eq!(player.seeks(), vec![5_000]);
    let calls = player.calls();
    let seek_at = calls.iter().position(|c| *c == Call::Seek(5_000)).unwrap();
    assert_eq!(
        calls[seek_at - 1],
        Call::Mode(SeekMode::ClosestKeyframe),
        "coarse seek must switch to keyframe resolution first"
    );
}

#[tokio::test(start_paused = true)]
async fn near_move_waits_out_the_debounce_period() {
    let (scrub, player) = controller(0, PlaybackState::Paused);

    scrub.scrub_started();
    scrub.scrub_moved(800);

    assert_eq!(player.seeks(), Vec::<u64>::new(), "no seek before the quiet period");

    run_out_debounce().await;

    assert_eq!(player.seeks(), vec![800]);
    let calls = player.calls();
    let seek_at = calls.iter().position(|c| *c == Call::Seek(800)).unwrap();
    assert_eq!(
        calls[seek_at - 1],
        Call::Mode(SeekMode::Exact),
        "debounced seek must land exactly"
    );
}

#[tokio::test(start_paused = true)]
async fn newer_move_supersedes_pending_delayed_seek() {
    let (scrub, player) = controller(0, PlaybackState::Paused);

    scrub.scrub_started();
    scrub.scrub_moved(800);
    scrub.scrub_moved(900);

    run_out_debounce().await;

    assert_eq!(player.seeks(), vec![900], "only the newest target may fire");
}

#[tokio::test(start_paused = true)]
async fn boundary_distance_is_debounced_not_immediate() {
    let (scrub, player) = controller(0, PlaybackState::Paused);

    scrub.scrub_started();
    // Exactly at the threshold: not strictly greater, so still a fine move
    scrub.scrub_moved(1_000);

    assert_eq!(player.seeks(), Vec::<u64>::new());
    run_out_debounce().await;
    assert_eq!(player.seeks(), vec![1_000]);
}

#[tokio::test(start_paused = true)]
async fn stop_voids_pending_and_issues_one_final_exact_seek() {
    let (scrub, player) = controller(0, PlaybackState::Paused);

    scrub.scrub_started();
    scrub.scrub_moved(800);
    scrub.scrub_stopped(850, false);

    run_out_debounce().await;

    assert_eq!(player.seeks(), vec![850], "pending seek voided, exactly one final seek");
    let calls = player.calls();
    let seek_at = calls.iter().position(|c| *c == Call::Seek(850)).unwrap();
    assert_eq!(calls[seek_at - 1], Call::Mode(SeekMode::Exact));
    assert_eq!(
        calls.last(),
        Some(&Call::Mode(SeekMode::Default)),
        "seek mode restored after the gesture"
    );
    assert!(!scrub.is_scrubbing());
}

#[tokio::test(start_paused = true)]
async fn cancelled_stop_skips_final_seek_but_restores_mode() {
    let (scrub, player) = controller(0, PlaybackState::Paused);

    scrub.scrub_started();
    scrub.scrub_moved(800);
    scrub.scrub_stopped(850, true);

    run_out_debounce().await;

    assert_eq!(player.seeks(), Vec::<u64>::new(), "cancelled gesture seeks nowhere");
    assert_eq!(player.calls().last(), Some(&Call::Mode(SeekMode::Default)));
}

#[tokio::test(start_paused = true)]
async fn playback_resumes_iff_active_at_scrub_start() {
    // Playing at start: paused for the gesture, resumed on release
    let (scrub, player) = controller(10_000, PlaybackState::Playing);
    scrub.scrub_started();
    scrub.scrub_stopped(12_000, false);

    let calls = player.calls();
    assert!(calls.contains(&Call::Pause));
    assert!(calls.contains(&Call::Play));
    assert_eq!(player.playback_state(), PlaybackState::Playing);

    // Paused at start: stays paused on release
    let (scrub, player) = controller(10_000, PlaybackState::Paused);
    scrub.scrub_started();
    scrub.scrub_stopped(12_000, false);

    let calls = player.calls();
    assert!(!calls.contains(&Call::Pause));
    assert!(!calls.contains(&Call::Play));
    assert_eq!(player.playback_state(), PlaybackState::Paused);
}

#[tokio::test(start_paused = true)]
async fn seek_mode_is_exact_for_the_whole_gesture() {
    let (scrub, player) = controller(0, PlaybackState::Playing);

    scrub.scrub_started();

    let calls = player.calls();
    assert_eq!(calls[0], Call::Pause);
    assert_eq!(calls[1], Call::Mode(SeekMode::Exact));
}

#[tokio::test(start_paused = true)]
async fn shutdown_voids_pending_and_clears_scrubbing_flag() {
    let (scrub, player) = controller(0, PlaybackState::Playing);

    scrub.scrub_started();
    scrub.scrub_moved(500);
    assert!(scrub.is_scrubbing());

    scrub.shutdown();
    run_out_debounce().await;

    assert_eq!(player.seeks(), Vec::<u64>::new());
    assert!(!scrub.is_scrubbing());
    // Teardown path issues no transport calls
    assert!(!player.calls().contains(&Call::Play));
}

#[tokio::test(start_paused = true)]
async fn events_without_a_gesture_are_ignored() {
    let (scrub, player) = controller(0, PlaybackState::Playing);

    scrub.scrub_moved(5_000);
    scrub.scrub_stopped(5_000, false);

    assert!(player.calls().is_empty());
    assert!(!scrub.is_scrubbing());
}

#[tokio::test(start_paused = true)]
async fn redundant_start_keeps_the_first_resume_capture() {
    let (scrub, player) = controller(0, PlaybackState::Playing);

    scrub.scrub_started();
    // The controller paused the player; a second start must not re-capture
    // the (now paused) state
    scrub.scrub_started();
    scrub.scrub_stopped(100, false);

    assert!(player.calls().contains(&Call::Play), "resume capture from the first start");
}

#[tokio::test(start_paused = true)]
async fn failing_seek_is_swallowed_and_reported_as_event() {
    let (scrub, player) = controller(0, PlaybackState::Playing);
    let mut events = scrub.subscribe();

    player.set_fail_seeks(true);
    scrub.scrub_started();
    scrub.scrub_moved(5_000);

    assert!(scrub.is_scrubbing(), "a failed seek must not end the gesture");

    let mut saw_failure = false;
    while let Ok(event) = events.try_recv() {
        if let PlayheadEvent::SeekFailed { position_ms, .. } = event {
            assert_eq!(position_ms, 5_000);
            saw_failure = true;
        }
    }
    assert!(saw_failure, "swallowed seek failure must surface as an event");

    // The gesture still completes and playback still resumes
    scrub.scrub_stopped(5_000, false);
    assert!(player.calls().contains(&Call::Play));
}

#[tokio::test(start_paused = true)]
async fn gesture_emits_started_issued_finished_events() {
    let (scrub, _player) = controller(0, PlaybackState::Playing);
    let mut events = scrub.subscribe();

    scrub.scrub_started();
    scrub.scrub_moved(5_000);
    scrub.scrub_stopped(5_500, false);

    match events.try_recv().unwrap() {
        PlayheadEvent::ScrubStarted { was_playing, .. } => assert!(was_playing),
        other => panic!("expected ScrubStarted, got {:?}", other),
    }
    match events.try_recv().unwrap() {
        PlayheadEvent::SeekIssued {
            position_ms,
            mode,
            immediate,
            ..
        } => {
            assert_eq!(position_ms, 5_000);
            assert_eq!(mode, SeekMode::ClosestKeyframe);
            assert!(immediate);
        }
        other => panic!("expected SeekIssued, got {:?}", other),
    }
    match events.try_recv().unwrap() {
        PlayheadEvent::SeekIssued { position_ms, mode, immediate, .. } => {
            assert_eq!(position_ms, 5_500);
            assert_eq!(mode, SeekMode::Exact);
            assert!(!immediate);
        }
        other => panic!("expected final SeekIssued, got {:?}", other),
    }
    match events.try_recv().unwrap() {
        PlayheadEvent::ScrubFinished {
            position_ms,
            resumed,
            cancelled,
            ..
        } => {
            assert_eq!(position_ms, 5_500);
            assert!(resumed);
            assert!(!cancelled);
        }
        other => panic!("expected ScrubFinished, got {:?}", other),
    }
}
