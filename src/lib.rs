//! Aircheck: timed capture of a live audio broadcast into hour-labeled
//! archives
//!
//! This library provides the core functionality for:
//! - Computing elapsed broadcast time from a configured event timeline,
//!   with schedule-drift correction and break-interval accounting
//! - Deciding when an invocation should skip (lead-in window, breaks)
//! - Resolving an external capture program (ffmpeg/avconv) on PATH
//! - Filing fixed-length clips under `Hour_NN/NNh_MMm.mp3`
//!
//! The binary is a single-shot run meant to be triggered by an external
//! scheduler (cron, systemd timer); it keeps no state between runs.

pub mod capture;
pub mod config;
pub mod error;
pub mod timeline;

pub use capture::{run_once, CaptureRunner, Outcome, ProcessRunner};
pub use config::Config;
pub use error::{AircheckError, Result};
pub use timeline::SkipReason;
