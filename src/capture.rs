//! Stream capture: program resolution, archive layout, and the
//! single-shot capture flow
//!
//! The actual recording is delegated to an external transcoder (ffmpeg
//! or avconv) invoked with an explicit argument list. The child process
//! is the seam: [`CaptureRunner`] lets tests verify the invocation
//! without spawning a real transcoder.

use crate::config::Config;
use crate::error::{AircheckError, Result};
use crate::timeline::{self, SkipReason};
use chrono::{DateTime, FixedOffset};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Outcome of a single scheduled invocation
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to record right now (before the event, or during a break)
    Skipped(SkipReason),
    /// A capture was attempted for this slot
    Captured {
        hours: i64,
        minutes: i64,
        destination: PathBuf,
    },
}

/// Runs the external capture program. Implemented by [`ProcessRunner`]
/// in production and by fakes in tests.
pub trait CaptureRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ExitStatus>;
}

/// Spawns the capture program as a blocking child process
pub struct ProcessRunner;

impl CaptureRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ExitStatus> {
        Command::new(program).args(args).status()
    }
}

/// Find the first usable capture executable from the ordered candidate
/// list. The only fatal environment error in the program.
pub fn resolve_capture_program(candidates: &[String]) -> Result<PathBuf> {
    resolve_in(candidates, std::env::var_os("PATH"))
}

fn resolve_in(candidates: &[String], search_path: Option<OsString>) -> Result<PathBuf> {
    for name in candidates {
        if let Ok(found) = which::which_in(name, search_path.as_ref(), Path::new(".")) {
            tracing::debug!("Resolved capture program {:?} -> {:?}", name, found);
            return Ok(found);
        }
    }
    Err(AircheckError::ProgramNotFound {
        candidates: candidates.to_vec(),
    })
}

/// Directory holding all clips for one elapsed hour
pub fn hour_dir(root: &Path, hours: i64) -> PathBuf {
    root.join(format!("Hour_{:02}", hours))
}

/// Destination file for one (hours, minutes) slot
pub fn slot_path(root: &Path, hours: i64, minutes: i64) -> PathBuf {
    hour_dir(root, hours).join(format!("{:02}h_{:02}m.mp3", hours, minutes))
}

/// Create the hour directory if it does not exist yet. Pre-existence is
/// fine; any other filesystem error propagates.
pub fn ensure_hour_directory(root: &Path, hours: i64) -> Result<PathBuf> {
    let dir = hour_dir(root, hours);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Argument list for the capture program: read the stream, copy the
/// audio codec without re-encoding, stop after the clip length.
pub fn capture_args(stream_url: &str, clip_length_secs: u32, destination: &Path) -> Vec<OsString> {
    vec![
        OsString::from("-i"),
        OsString::from(stream_url),
        OsString::from("-acodec"),
        OsString::from("copy"),
        OsString::from("-t"),
        OsString::from(clip_length_secs.to_string()),
        destination.as_os_str().to_owned(),
    ]
}

/// One scheduled invocation, end to end: skip check, slot labeling,
/// program resolution, directory setup, capture.
///
/// A failed or crashed capture child is logged and still reported as
/// [`Outcome::Captured`]; each invocation is best-effort and the next
/// scheduler tick is the retry. Program resolution happens before any
/// filesystem side effect so a misconfigured host fails cleanly.
pub fn run_once(
    config: &Config,
    now: DateTime<FixedOffset>,
    runner: &dyn CaptureRunner,
) -> Result<Outcome> {
    if let Some(reason) = timeline::should_skip(now, &config.event) {
        tracing::debug!("Skipping capture: {}", reason);
        return Ok(Outcome::Skipped(reason));
    }

    let elapsed = timeline::compute_elapsed(now, &config.event);
    let (hours, minutes) = timeline::duration_to_hours_minutes(elapsed);

    let program = resolve_capture_program(&config.capture.programs)?;
    ensure_hour_directory(&config.capture.destination_root, hours)?;
    let destination = slot_path(&config.capture.destination_root, hours, minutes);

    tracing::info!(
        "Capturing {}s clip for {:02}h {:02}m to {:?}",
        config.capture.clip_length_secs,
        hours,
        minutes,
        destination
    );

    let args = capture_args(
        &config.capture.stream_url,
        config.capture.clip_length_secs,
        &destination,
    );
    match runner.run(&program, &args) {
        Ok(status) if !status.success() => {
            tracing::warn!("Capture program exited with {}", status);
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Failed to run capture program: {}", e);
        }
    }

    Ok(Outcome::Captured {
        hours,
        minutes,
        destination,
    })
}
