//! Event types for the playhead event system
//!
//! Events are broadcast via a tokio broadcast channel and can be serialized
//! for transmission to the host application's observability layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::player::SeekMode;

/// Broadcast channel capacity for playhead events
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Playhead event types
///
/// All variants carry a UTC timestamp so downstream consumers can order
/// events without relying on delivery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayheadEvent {
    /// A scrub gesture began on the time bar
    ///
    /// Triggers:
    /// - Host UI: switch position display to the drag target
    ScrubStarted {
        /// Whether playback was active when the gesture began
        was_playing: bool,
        /// When the gesture began
        timestamp: DateTime<Utc>,
    },

    /// A seek was handed to the player backend
    ///
    /// Triggers:
    /// - Host UI: optional seek spinner / position preview reconciliation
    SeekIssued {
        /// Requested position in milliseconds
        position_ms: u64,
        /// Seek resolution the backend was switched to for this request
        mode: SeekMode,
        /// True for coarse in-gesture seeks, false for debounced and final ones
        immediate: bool,
        /// When the seek was issued
        timestamp: DateTime<Utc>,
    },

    /// A seek was rejected by the player backend and discarded
    ///
    /// Scrubbing is best-effort: the failure is reported here and nowhere else.
    SeekFailed {
        /// Requested position in milliseconds
        position_ms: u64,
        /// Backend error text
        reason: String,
        /// When the failure was observed
        timestamp: DateTime<Utc>,
    },

    /// A scrub gesture ended and the session was cleared
    ///
    /// Triggers:
    /// - Host UI: return position display to live playback position
    ScrubFinished {
        /// Final requested position in milliseconds
        position_ms: u64,
        /// Whether playback was resumed (it was active at gesture start)
        resumed: bool,
        /// Whether the gesture was cancelled rather than released
        cancelled: bool,
        /// When the gesture ended
        timestamp: DateTime<Utc>,
    },
}

impl PlayheadEvent {
    /// Serialize for transport to the host application
    ///
    /// Events are plain data; serialization cannot fail for any variant.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_issued_wire_shape() {
        let event = PlayheadEvent::SeekIssued {
            position_ms: 42_000,
            mode: SeekMode::ClosestKeyframe,
            immediate: true,
            timestamp: Utc::now(),
        };

        let json = event.to_json();
        assert!(json.contains("\"type\":\"SeekIssued\""));
        assert!(json.contains("\"position_ms\":42000"));
        assert!(json.contains("\"mode\":\"closest_keyframe\""));
        assert!(json.contains("\"immediate\":true"));
    }

    #[test]
    fn scrub_finished_wire_shape() {
        let event = PlayheadEvent::ScrubFinished {
            position_ms: 1_500,
            resumed: true,
            cancelled: false,
            timestamp: Utc::now(),
        };

        let json = event.to_json();
        assert!(json.contains("\"type\":\"ScrubFinished\""));
        assert!(json.contains("\"resumed\":true"));
        assert!(json.contains("\"cancelled\":false"));
    }
}
