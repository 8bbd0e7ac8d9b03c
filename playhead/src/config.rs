//! Tuning configuration loading and validation
//!
//! All numeric thresholds used by the buffer policy and the scrub controller
//! live here, with compiled defaults, documented valid ranges, and TOML file
//! loading. Out-of-range values are clamped with a warning rather than
//! rejected, so a hand-edited tuning file never prevents startup.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Environment variable pointing at a tuning file
pub const CONFIG_ENV_VAR: &str = "PLAYHEAD_CONFIG";

/// Default tuning file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "playhead.toml";

/// Minimum buffered media before loading may stop
///
/// Valid range: [1_000, 600_000] ms
/// Default: 25_000 ms (25 seconds)
pub const DEFAULT_MIN_BUFFER_MS: u64 = 25_000;

/// Buffered media at which loading always stops
///
/// Valid range: [1_000, 600_000] ms
/// Default: 60_000 ms (60 seconds)
pub const DEFAULT_MAX_BUFFER_MS: u64 = 60_000;

/// Buffered media required before playback starts
///
/// Valid range: [100, 60_000] ms
/// Default: 1_000 ms
pub const DEFAULT_BUFFER_FOR_PLAYBACK_MS: u64 = 1_000;

/// Buffered media required to resume after a rebuffer
///
/// Valid range: [100, 60_000] ms
/// Default: 3_000 ms
pub const DEFAULT_BUFFER_FOR_REBUFFER_MS: u64 = 3_000;

/// Already-played media retained for fast backward seeks
///
/// Valid range: [0, 600_000] ms
/// Default: 30_000 ms (30 seconds)
pub const DEFAULT_BACK_BUFFER_MS: u64 = 30_000;

/// Byte budget for buffered media
///
/// Valid range: [65_536, 1_073_741_824] bytes
/// Default: 134_217_728 bytes (128 MiB)
pub const DEFAULT_TARGET_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Drag distance above which a seek is issued immediately
///
/// Valid range: [100, 30_000] ms
/// Default: 1_000 ms
pub const DEFAULT_COARSE_SEEK_THRESHOLD_MS: u64 = 1_000;

/// Quiet period after a small drag before the seek is issued
///
/// Valid range: [10, 5_000] ms
/// Default: 100 ms
pub const DEFAULT_SEEK_DEBOUNCE_MS: u64 = 100;

/// Buffer policy tuning table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BufferTuning {
    /// Minimum buffered duration before loading may stop (ms)
    pub min_buffer_ms: u64,

    /// Buffered duration at which loading always stops (ms)
    pub max_buffer_ms: u64,

    /// Buffered duration required before playback starts (ms)
    pub buffer_for_playback_ms: u64,

    /// Buffered duration required to resume after a rebuffer (ms)
    pub buffer_for_rebuffer_ms: u64,

    /// Already-played duration retained behind the playhead (ms)
    pub back_buffer_ms: u64,

    /// Byte budget for buffered media
    pub target_buffer_bytes: u64,

    /// Keep the back buffer anchored to the previous keyframe
    pub retain_back_buffer_from_keyframe: bool,

    /// Let duration thresholds override the byte budget while below minimum
    pub prioritize_time_over_size: bool,
}

impl Default for BufferTuning {
    fn default() -> Self {
        Self {
            min_buffer_ms: DEFAULT_MIN_BUFFER_MS,
            max_buffer_ms: DEFAULT_MAX_BUFFER_MS,
            buffer_for_playback_ms: DEFAULT_BUFFER_FOR_PLAYBACK_MS,
            buffer_for_rebuffer_ms: DEFAULT_BUFFER_FOR_REBUFFER_MS,
            back_buffer_ms: DEFAULT_BACK_BUFFER_MS,
            target_buffer_bytes: DEFAULT_TARGET_BUFFER_BYTES,
            retain_back_buffer_from_keyframe: true,
            prioritize_time_over_size: true,
        }
    }
}

impl BufferTuning {
    /// Clamp every field to its valid range, warning on each adjustment
    ///
    /// `max_buffer_ms` is additionally raised to `min_buffer_ms` if it was
    /// configured below it.
    pub fn validate(&mut self) {
        self.min_buffer_ms = clamp_param("min_buffer_ms", self.min_buffer_ms, 1_000, 600_000);
        self.max_buffer_ms = clamp_param("max_buffer_ms", self.max_buffer_ms, 1_000, 600_000);
        self.buffer_for_playback_ms =
            clamp_param("buffer_for_playback_ms", self.buffer_for_playback_ms, 100, 60_000);
        self.buffer_for_rebuffer_ms =
            clamp_param("buffer_for_rebuffer_ms", self.buffer_for_rebuffer_ms, 100, 60_000);
        self.back_buffer_ms = clamp_param("back_buffer_ms", self.back_buffer_ms, 0, 600_000);
        self.target_buffer_bytes = clamp_param(
            "target_buffer_bytes",
            self.target_buffer_bytes,
            65_536,
            1_073_741_824,
        );

        if self.max_buffer_ms < self.min_buffer_ms {
            warn!(
                "max_buffer_ms ({}) below min_buffer_ms ({}), raising to match",
                self.max_buffer_ms, self.min_buffer_ms
            );
            self.max_buffer_ms = self.min_buffer_ms;
        }
    }
}

/// Scrub controller tuning table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScrubTuning {
    /// Drag distance above which a seek is issued immediately (ms)
    pub coarse_seek_threshold_ms: u64,

    /// Quiet period after a small drag before the seek is issued (ms)
    pub seek_debounce_ms: u64,
}

impl Default for ScrubTuning {
    fn default() -> Self {
        Self {
            coarse_seek_threshold_ms: DEFAULT_COARSE_SEEK_THRESHOLD_MS,
            seek_debounce_ms: DEFAULT_SEEK_DEBOUNCE_MS,
        }
    }
}

impl ScrubTuning {
    /// Clamp every field to its valid range, warning on each adjustment
    pub fn validate(&mut self) {
        self.coarse_seek_threshold_ms = clamp_param(
            "coarse_seek_threshold_ms",
            self.coarse_seek_threshold_ms,
            100,
            30_000,
        );
        self.seek_debounce_ms = clamp_param("seek_debounce_ms", self.seek_debounce_ms, 10, 5_000);
    }
}

/// Complete playhead tuning configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlayheadConfig {
    /// Buffer policy thresholds
    pub buffer: BufferTuning,

    /// Scrub controller thresholds
    pub scrub: ScrubTuning,
}

impl PlayheadConfig {
    /// Load tuning configuration following the resolution priority order:
    /// 1. Explicit path argument (highest priority; errors surface)
    /// 2. `PLAYHEAD_CONFIG` environment variable (errors surface)
    /// 3. `playhead.toml` in the working directory, if present
    /// 4. Compiled defaults (fallback)
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // Priority 1: explicit path
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // Priority 2: environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        // Priority 3: tuning file in the working directory
        let local = Path::new(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::from_file(local);
        }

        // Priority 4: compiled defaults
        debug!("No tuning file found, using compiled defaults");
        Ok(Self::default())
    }

    /// Load and validate a tuning file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read tuning file {}: {}", path.display(), e))
        })?;

        let mut config: PlayheadConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Cannot parse tuning file {}: {}", path.display(), e))
        })?;

        config.buffer.validate();
        config.scrub.validate();

        debug!("Loaded tuning configuration from {}", path.display());
        Ok(config)
    }
}

/// Clamp a parameter into its valid range, warning when the value changes
fn clamp_param(name: &str, value: u64, min: u64, max: u64) -> u64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(
            "{} = {} outside valid range [{}, {}], clamping to {}",
            name, value, min, max, clamped
        );
    }
    clamped
}
