//! Scrub debouncing
//!
//! Turns raw time-bar drag events into player seeks. Large jumps seek
//! immediately at keyframe resolution for responsiveness; small adjustments
//! wait out a short quiet period and land exactly.

mod controller;
mod session;

pub use controller::ScrubController;
pub(crate) use session::ScrubSession;
