//! # playhead
//!
//! Playback-control layer for media player front-ends:
//! - Buffer policy: tuned thresholds wrapped around a stock load control
//! - Scrub debouncing: time-bar drag events batched into player seeks
//! - Tuning configuration, event broadcasting, and the player control trait
//!   the host engine plugs into
//!
//! The player engine, gesture capture, and UI rendering live in the host
//! application; this crate only parameterizes and drives them.

pub mod buffer;
pub mod config;
pub mod error;
pub mod events;
pub mod player;
pub mod scrub;

pub use buffer::{BufferPolicy, DefaultLoadControl, LoadControl, TunedLoadControl};
pub use config::{BufferTuning, PlayheadConfig, ScrubTuning};
pub use error::{Error, Result};
pub use events::PlayheadEvent;
pub use player::{PlaybackState, PlayerControl, SeekMode};
pub use scrub::ScrubController;
