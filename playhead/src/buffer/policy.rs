//! Buffer policy configuration
//!
//! Scalar thresholds consumed by the load control. Immutable once built.

use crate::config::BufferTuning;

/// Buffering thresholds for the player engine
///
/// Durations are in milliseconds, sizes in bytes. A policy is plain data:
/// no validation and no derived state, the load control consuming it
/// enforces its own invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPolicy {
    /// Minimum buffered duration before loading may stop
    pub min_buffer_ms: u64,

    /// Buffered duration at which loading always stops
    pub max_buffer_ms: u64,

    /// Buffered duration required before playback starts
    pub buffer_for_playback_ms: u64,

    /// Buffered duration required to resume after a rebuffer
    pub buffer_for_rebuffer_ms: u64,

    /// Already-played duration retained behind the playhead
    pub back_buffer_ms: u64,

    /// Byte budget for buffered media
    pub target_buffer_bytes: u64,

    /// Keep the back buffer anchored to the previous keyframe
    pub retain_back_buffer_from_keyframe: bool,

    /// Let duration thresholds override the byte budget while below minimum
    pub prioritize_time_over_size: bool,
}

impl BufferPolicy {
    /// Start building a policy from the tuned defaults
    pub fn builder() -> BufferPolicyBuilder {
        BufferPolicyBuilder {
            policy: BufferPolicy::default(),
        }
    }
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self::from(&BufferTuning::default())
    }
}

impl From<&BufferTuning> for BufferPolicy {
    fn from(tuning: &BufferTuning) -> Self {
        Self {
            min_buffer_ms: tuning.min_buffer_ms,
            max_buffer_ms: tuning.max_buffer_ms,
            buffer_for_playback_ms: tuning.buffer_for_playback_ms,
            buffer_for_rebuffer_ms: tuning.buffer_for_rebuffer_ms,
            back_buffer_ms: tuning.back_buffer_ms,
            target_buffer_bytes: tuning.target_buffer_bytes,
            retain_back_buffer_from_keyframe: tuning.retain_back_buffer_from_keyframe,
            prioritize_time_over_size: tuning.prioritize_time_over_size,
        }
    }
}

/// Builder for [`BufferPolicy`]
///
/// Unset fields keep the tuned defaults.
#[derive(Debug, Clone)]
pub struct BufferPolicyBuilder {
    policy: BufferPolicy,
}

impl BufferPolicyBuilder {
    /// Set the four duration thresholds (ms): minimum buffer, maximum buffer,
    /// buffer required for playback start, buffer required after a rebuffer
    pub fn buffer_durations(
        mut self,
        min_buffer_ms: u64,
        max_buffer_ms: u64,
        buffer_for_playback_ms: u64,
        buffer_for_rebuffer_ms: u64,
    ) -> Self {
        self.policy.min_buffer_ms = min_buffer_ms;
        self.policy.max_buffer_ms = max_buffer_ms;
        self.policy.buffer_for_playback_ms = buffer_for_playback_ms;
        self.policy.buffer_for_rebuffer_ms = buffer_for_rebuffer_ms;
        self
    }

    /// Set the back-buffer retention: duration behind the playhead and
    /// whether it stays anchored to the previous keyframe
    pub fn back_buffer(mut self, back_buffer_ms: u64, retain_from_keyframe: bool) -> Self {
        self.policy.back_buffer_ms = back_buffer_ms;
        self.policy.retain_back_buffer_from_keyframe = retain_from_keyframe;
        self
    }

    /// Set the byte budget for buffered media
    pub fn target_buffer_bytes(mut self, bytes: u64) -> Self {
        self.policy.target_buffer_bytes = bytes;
        self
    }

    /// Finish building
    pub fn build(self) -> BufferPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BUFFER_FOR_REBUFFER_MS, DEFAULT_TARGET_BUFFER_BYTES};

    #[test]
    fn builder_overrides_only_what_was_set() {
        let policy = BufferPolicy::builder()
            .buffer_durations(10_000, 40_000, 500, DEFAULT_BUFFER_FOR_REBUFFER_MS)
            .back_buffer(15_000, false)
            .build();

        assert_eq!(policy.min_buffer_ms, 10_000);
        assert_eq!(policy.max_buffer_ms, 40_000);
        assert_eq!(policy.buffer_for_playback_ms, 500);
        assert_eq!(policy.back_buffer_ms, 15_000);
        assert!(!policy.retain_back_buffer_from_keyframe);
        // Untouched fields keep the tuned defaults
        assert_eq!(policy.target_buffer_bytes, DEFAULT_TARGET_BUFFER_BYTES);
        assert!(policy.prioritize_time_over_size);
    }

    #[test]
    fn policy_mirrors_tuning_table() {
        let tuning = crate::config::BufferTuning {
            min_buffer_ms: 5_000,
            retain_back_buffer_from_keyframe: false,
            ..Default::default()
        };
        let policy = BufferPolicy::from(&tuning);

        assert_eq!(policy.min_buffer_ms, 5_000);
        assert!(!policy.retain_back_buffer_from_keyframe);
        assert_eq!(policy.max_buffer_ms, tuning.max_buffer_ms);
    }
}
