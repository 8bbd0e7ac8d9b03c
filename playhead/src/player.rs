//! Player control surface
//!
//! The engine that actually renders media lives outside this crate. Everything
//! the scrub controller needs from it is captured by the [`PlayerControl`]
//! trait: transport (play/pause), seeking, and the sticky seek-resolution mode.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Playback state enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// Seek resolution requested from the player backend
///
/// The mode is sticky: it applies to every subsequent seek until changed,
/// matching how player engines expose seek parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeekMode {
    /// Engine-chosen tradeoff between speed and accuracy
    Default,
    /// Land on the exact requested frame, however long it takes
    Exact,
    /// Snap to the nearest keyframe for fast, approximate positioning
    ClosestKeyframe,
}

impl std::fmt::Display for SeekMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeekMode::Default => write!(f, "default"),
            SeekMode::Exact => write!(f, "exact"),
            SeekMode::ClosestKeyframe => write!(f, "closest_keyframe"),
        }
    }
}

/// Control surface of the external player engine
///
/// Implementations are expected to be cheap to call from the UI flow; the
/// scrub controller invokes these sequentially from one logical task.
pub trait PlayerControl: Send + Sync {
    /// Start or resume playback
    fn play(&self) -> Result<()>;

    /// Pause playback
    fn pause(&self) -> Result<()>;

    /// Seek to an absolute position in the current media, in milliseconds
    ///
    /// Resolution follows the mode last set via [`set_seek_mode`].
    ///
    /// [`set_seek_mode`]: PlayerControl::set_seek_mode
    fn seek_to(&self, position_ms: u64) -> Result<()>;

    /// Change the sticky seek resolution mode
    fn set_seek_mode(&self, mode: SeekMode) -> Result<()>;

    /// Current playback position in milliseconds
    fn position_ms(&self) -> u64;

    /// Current transport state
    fn playback_state(&self) -> PlaybackState;
}
