//! ap-logging: append-only NDJSON events for run post-mortems.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Milliseconds since the Unix epoch, for event timestamps.
pub fn ts_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Per-episode outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TrialEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub run_id: String,
    pub domain: String,
    pub policy: String,
    pub trial: u32,
    pub cost: f64,
    pub steps: u32,
    pub reached_goal: bool,
}

/// Aggregate over all episodes of one policy.
#[derive(Debug, Clone, Serialize)]
pub struct EvalSummaryEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub run_id: String,
    pub domain: String,
    pub policy: String,
    pub trials: u32,
    pub depth: u16,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub unreachable: u32,
}

/// Engine counters accumulated across every decision of a run.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatsEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub run_id: String,
    pub policy: String,
    pub decisions: u64,
    pub expansions: u64,
    pub evaluations: u64,
    pub from_inside: u64,
    pub from_outside: u64,
    pub nodes_allocated: u64,
}

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("ndjson io: {0}")]
    Io(#[from] io::Error),
    #[error("ndjson encode: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
