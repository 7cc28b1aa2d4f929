//! Daily statistics persisted across runs.
//!
//! The store is a single JSON object keyed by local date (`YYYY-MM-DD`):
//!
//! ```json
//! {"2024-05-01": {"work": 50, "short_break": 5, "long_break": 15, "completed_cycles": 2}}
//! ```
//!
//! The file is rewritten in full on every save. Any failure to read it is
//! treated as an empty store and any failure to write it is skipped, so
//! statistics can never interrupt a running timer.

use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::timer::SessionKind;

pub const DAILY_FMT: &str = "%Y-%m-%d";
pub const STATS_FILE_NAME: &str = ".pomodoro_stats.json";
pub const NO_DATA_MESSAGE: &str = "No pomodoro statistics available yet.";

// ============================================================================
// Data Models
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DailyStats {
    #[serde(rename = "work", default)]
    pub work_minutes: u64,
    #[serde(rename = "short_break", default)]
    pub short_break_minutes: u64,
    #[serde(rename = "long_break", default)]
    pub long_break_minutes: u64,
    #[serde(default)]
    pub completed_cycles: u64,
}

impl DailyStats {
    /// Add a finished session. Only work sessions count as a cycle.
    pub fn add(&mut self, kind: SessionKind, minutes: u64) {
        let field = match kind {
            SessionKind::Work => &mut self.work_minutes,
            SessionKind::ShortBreak => &mut self.short_break_minutes,
            SessionKind::LongBreak => &mut self.long_break_minutes,
        };
        *field = field.saturating_add(minutes);

        if kind == SessionKind::Work {
            self.completed_cycles = self.completed_cycles.saturating_add(1);
        }
    }
}

/// Date string to that day's totals. Ordered so the file is written in date order.
pub type StatsMap = BTreeMap<String, DailyStats>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("failed to access stats file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed stats file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode stats: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DAILY_FMT).to_string()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.pomodoro_stats.json`, falling back to the working directory when
    /// no home directory can be determined.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STATS_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted mapping. Missing, unreadable or malformed files
    /// yield an empty mapping.
    pub fn load(&self) -> StatsMap {
        match self.try_load() {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable stats file");
                StatsMap::new()
            }
        }
    }

    fn try_load(&self) -> Result<StatsMap, StatsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StatsMap::new()),
            Err(source) => {
                return Err(StatsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| StatsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Add a completed session to today's totals and rewrite the file.
    pub fn save(&self, kind: SessionKind, minutes: u64) {
        self.save_on(today(), kind, minutes);
    }

    pub fn save_on(&self, date: NaiveDate, kind: SessionKind, minutes: u64) {
        let mut stats = self.load();
        stats.entry(date_key(date)).or_default().add(kind, minutes);

        match self.write(&stats) {
            Ok(()) => debug!(kind = kind.as_str(), minutes, "recorded session"),
            Err(e) => warn!(error = %e, "skipping stats persistence"),
        }
    }

    /// Replace the file contents via a sibling temp file so readers never
    /// observe a half-written document.
    fn write(&self, stats: &StatsMap) -> Result<(), StatsError> {
        let json = serde_json::to_string_pretty(stats)?;
        let io_err = |source| StatsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            io_err(source)
        })
    }

    pub fn render_summary(&self) -> String {
        render_summary(&self.load(), today())
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Text report of today, yesterday and all-time totals relative to `today`.
pub fn render_summary(stats: &StatsMap, today: NaiveDate) -> String {
    if stats.is_empty() {
        return format!("{NO_DATA_MESSAGE}\n");
    }

    let mut out = String::new();
    let today_key = date_key(today);
    let yesterday_key = date_key(today - ChronoDuration::days(1));

    let _ = writeln!(out, "\n=== Pomodoro Statistics ===\n");

    if let Some(day) = stats.get(&today_key) {
        let _ = writeln!(out, "Today ({today_key}):");
        let _ = writeln!(out, "  Work time: {} minutes", day.work_minutes);
        let _ = writeln!(out, "  Short breaks: {} minutes", day.short_break_minutes);
        let _ = writeln!(out, "  Long breaks: {} minutes", day.long_break_minutes);
        let _ = writeln!(out, "  Completed cycles: {}", day.completed_cycles);
    }

    if let Some(day) = stats.get(&yesterday_key) {
        let _ = writeln!(out, "\nYesterday ({yesterday_key}):");
        let _ = writeln!(out, "  Work time: {} minutes", day.work_minutes);
        let _ = writeln!(out, "  Completed cycles: {}", day.completed_cycles);
    }

    let total_work: u64 = stats.values().map(|d| d.work_minutes).sum();
    let total_cycles: u64 = stats.values().map(|d| d.completed_cycles).sum();

    let _ = writeln!(out, "\nAll time:");
    let _ = writeln!(out, "  Total work time: {total_work} minutes");
    let _ = writeln!(out, "  Total completed cycles: {total_cycles}");
    let _ = writeln!(out, "  Total days: {}", stats.len());

    out
}
