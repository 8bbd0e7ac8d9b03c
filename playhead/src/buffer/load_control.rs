//! Load control
//!
//! The buffering-control interface of the player engine, the stock
//! implementation of it, and the tuned delegating wrapper handed to the
//! engine at construction time.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::buffer::BufferPolicy;
use crate::config::BufferTuning;

/// Buffering-control interface of the player engine
///
/// The engine polls `should_continue_loading` while fetching media and
/// `should_start_playback` before leaving a buffering state. The remaining
/// methods expose static retention parameters.
pub trait LoadControl: Send + Sync {
    /// The engine finished preparing a media source
    fn on_prepared(&self);

    /// Playback stopped; transient loading state resets
    fn on_stopped(&self);

    /// The media source was released
    fn on_released(&self);

    /// Whether the engine should keep fetching media
    ///
    /// `buffered_ms` and `buffered_bytes` describe media buffered ahead of
    /// the playhead; `playback_speed` is the current rate (1.0 = realtime).
    fn should_continue_loading(
        &self,
        buffered_ms: u64,
        buffered_bytes: u64,
        playback_speed: f32,
    ) -> bool;

    /// Whether enough media is buffered for playback to start or resume
    ///
    /// `rebuffering` is true when playback already started once and stalled.
    fn should_start_playback(&self, buffered_ms: u64, playback_speed: f32, rebuffering: bool)
        -> bool;

    /// Duration of already-played media to retain, in milliseconds
    fn back_buffer_ms(&self) -> u64;

    /// Whether the back buffer stays anchored to the previous keyframe
    fn retain_back_buffer_from_keyframe(&self) -> bool;

    /// Byte budget for buffered media
    fn target_buffer_bytes(&self) -> u64;
}

/// Stock load control implementation
///
/// Keeps loading until the buffer reaches `max_buffer_ms`, then stays idle
/// until it drains below `min_buffer_ms`: inside the dead band the previous
/// decision is kept, so the loader neither thrashes on nor off. The byte
/// budget caps loading independently unless `prioritize_time_over_size`
/// lets the minimum-duration threshold override it.
pub struct DefaultLoadControl {
    policy: BufferPolicy,

    /// Previous loading decision, carried through the min/max dead band
    loading: AtomicBool,
}

impl DefaultLoadControl {
    /// Create a load control from a policy
    pub fn new(policy: BufferPolicy) -> Self {
        Self {
            policy,
            loading: AtomicBool::new(false),
        }
    }

    /// Minimum-buffer threshold adjusted for playback speed
    ///
    /// Above realtime the engine drains media faster than the wall clock, so
    /// the minimum scales up with the rate, capped at `max_buffer_ms`.
    fn min_buffer_for_speed(&self, playback_speed: f32) -> u64 {
        if playback_speed > 1.0 {
            let scaled = (self.policy.min_buffer_ms as f64 * playback_speed as f64) as u64;
            scaled.min(self.policy.max_buffer_ms)
        } else {
            self.policy.min_buffer_ms
        }
    }

    fn reset_loading(&self) {
        self.loading.store(false, Ordering::Release);
    }
}

impl LoadControl for DefaultLoadControl {
    fn on_prepared(&self) {
        self.reset_loading();
    }

    fn on_stopped(&self) {
        self.reset_loading();
    }

    fn on_released(&self) {
        self.reset_loading();
    }

    fn should_continue_loading(
        &self,
        buffered_ms: u64,
        buffered_bytes: u64,
        playback_speed: f32,
    ) -> bool {
        let min_buffer_ms = self.min_buffer_for_speed(playback_speed);
        let budget_reached = buffered_bytes >= self.policy.target_buffer_bytes;

        let decision = if buffered_ms < min_buffer_ms {
            // Below minimum: load, unless the byte budget is exhausted and
            // size outranks time
            self.policy.prioritize_time_over_size || !budget_reached
        } else if buffered_ms >= self.policy.max_buffer_ms || budget_reached {
            false
        } else {
            // Dead band between min and max: keep the previous decision
            self.loading.load(Ordering::Acquire)
        };

        let previous = self.loading.swap(decision, Ordering::AcqRel);
        if previous != decision {
            debug!(
                "Loading {}: buffered={}ms/{}B, min={}ms, max={}ms",
                if decision { "resumed" } else { "stopped" },
                buffered_ms,
                buffered_bytes,
                min_buffer_ms,
                self.policy.max_buffer_ms
            );
        }

        decision
    }

    fn should_start_playback(
        &self,
        buffered_ms: u64,
        playback_speed: f32,
        rebuffering: bool,
    ) -> bool {
        let gate_ms = if rebuffering {
            self.policy.buffer_for_rebuffer_ms
        } else {
            self.policy.buffer_for_playback_ms
        };

        // Compare in playout time: at 2x rate, buffered media covers half
        // the wall-clock duration
        let effective_ms = if playback_speed > 0.0 {
            (buffered_ms as f64 / playback_speed as f64) as u64
        } else {
            buffered_ms
        };

        gate_ms == 0 || effective_ms >= gate_ms
    }

    fn back_buffer_ms(&self) -> u64 {
        self.policy.back_buffer_ms
    }

    fn retain_back_buffer_from_keyframe(&self) -> bool {
        self.policy.retain_back_buffer_from_keyframe
    }

    fn target_buffer_bytes(&self) -> u64 {
        self.policy.target_buffer_bytes
    }
}

/// Tuned load control handed to the player engine
///
/// Builds a [`DefaultLoadControl`] from the tuned policy and forwards every
/// call to it. All behavior lives in the delegate; this type only fixes the
/// construction parameters.
pub struct TunedLoadControl {
    delegate: DefaultLoadControl,
}

impl TunedLoadControl {
    /// Create from an explicit policy
    pub fn new(policy: BufferPolicy) -> Self {
        Self {
            delegate: DefaultLoadControl::new(policy),
        }
    }

    /// Create from the buffer tuning table
    pub fn from_tuning(tuning: &BufferTuning) -> Self {
        Self::new(BufferPolicy::from(tuning))
    }
}

impl Default for TunedLoadControl {
    fn default() -> Self {
        Self::new(BufferPolicy::default())
    }
}

impl LoadControl for TunedLoadControl {
    fn on_prepared(&self) {
        self.delegate.on_prepared()
    }

    fn on_stopped(&self) {
        self.delegate.on_stopped()
    }

    fn on_released(&self) {
        self.delegate.on_released()
    }

    fn should_continue_loading(
        &self,
        buffered_ms: u64,
        buffered_bytes: u64,
        playback_speed: f32,
    ) -> bool {
        self.delegate
            .should_continue_loading(buffered_ms, buffered_bytes, playback_speed)
    }

    fn should_start_playback(
        &self,
        buffered_ms: u64,
        playback_speed: f32,
        rebuffering: bool,
    ) -> bool {
        self.delegate
            .should_start_playback(buffered_ms, playback_speed, rebuffering)
    }

    fn back_buffer_ms(&self) -> u64 {
        self.delegate.back_buffer_ms()
    }

    fn retain_back_buffer_from_keyframe(&self) -> bool {
        self.delegate.retain_back_buffer_from_keyframe()
    }

    fn target_buffer_bytes(&self) -> u64 {
        self.delegate.target_buffer_bytes()
    }
}
