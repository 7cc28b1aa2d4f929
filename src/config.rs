use clap::{CommandFactory, Parser, error::ErrorKind};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::warn;

use crate::{
    session::SessionConfig,
    stats::StatsStore,
    timer::{DEFAULT_HANDOFF_SECS, TimerSettings},
};

pub const DEFAULT_WORK_TIME: f64 = 25.0;
pub const DEFAULT_SHORT_BREAK: f64 = 5.0;
pub const DEFAULT_LONG_BREAK: f64 = 15.0;
pub const DEFAULT_CYCLES: u32 = 4;

/// Longest accepted session, in seconds.
pub const MAX_DURATION_SECS: u64 = u32::MAX as u64;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone, Debug)]
#[command(name = "pomo", version, about = "🍅 Simple Pomodoro Timer")]
pub struct Args {
    /// Work session duration in minutes (default: 25)
    #[arg(short, long, value_parser = parse_duration)]
    pub work: Option<f64>,
    /// Short break duration in minutes (default: 5)
    #[arg(short, long, value_parser = parse_duration)]
    pub short_break: Option<f64>,
    /// Long break duration in minutes (default: 15)
    #[arg(short, long, value_parser = parse_duration)]
    pub long_break: Option<f64>,
    /// Number of work cycles (default: 4)
    #[arg(short, long)]
    pub cycles: Option<u32>,
    /// Show pomodoro statistics
    #[arg(long)]
    pub stats: bool,
    /// Don't ring the terminal bell when a session ends
    #[arg(long)]
    pub no_sound: bool,
    /// Statistics file (default: ~/.pomodoro_stats.json)
    #[arg(long, value_name = "PATH")]
    pub stats_file: Option<PathBuf>,
}

impl Args {
    /// Range checks for the timer flags. Skipped for `--stats`, which ignores them.
    pub fn validate(&self) -> Result<(), clap::Error> {
        let durations = [
            ("--work", self.work),
            ("--short-break", self.short_break),
            ("--long-break", self.long_break),
        ];
        for (flag, value) in durations {
            if let Some(minutes) = value {
                check_minutes(minutes).map_err(|reason| invalid_value(flag, minutes, &reason))?;
            }
        }

        if self.cycles == Some(0) {
            return Err(invalid_value("--cycles", 0, "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid_value(flag: &str, value: impl std::fmt::Display, reason: &str) -> clap::Error {
    Args::command().error(
        ErrorKind::ValueValidation,
        format!("invalid value '{value}' for '{flag}': {reason}"),
    )
}

/// Minutes from either a bare number (`25`, `0.5`) or unit suffixes
/// (`1h30m`, `90s`). Only the syntax is checked here; see [`check_minutes`].
pub fn parse_duration(s: &str) -> Result<f64, String> {
    let s = s.trim().to_lowercase();
    if let Ok(minutes) = s.parse::<f64>() {
        return Ok(minutes);
    }

    let mut total = 0.0;
    let mut num = String::new();

    for c in s.chars() {
        match c {
            '0'..='9' | '.' => num.push(c),
            'h' => {
                total += num.parse::<f64>().map_err(|_| "Invalid hours")? * 60.0;
                num.clear();
            }
            'm' => {
                total += num.parse::<f64>().map_err(|_| "Invalid minutes")?;
                num.clear();
            }
            's' => {
                total += num.parse::<f64>().map_err(|_| "Invalid seconds")? / 60.0;
                num.clear();
            }
            _ => return Err("Invalid format".into()),
        }
    }

    if !num.is_empty() {
        return Err("Missing unit after number".into());
    }
    Ok(total)
}

pub fn check_minutes(minutes: f64) -> Result<f64, String> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err("duration must be > 0".into());
    }
    if minutes * 60.0 > MAX_DURATION_SECS as f64 {
        return Err(format!("duration must be at most {} minutes", MAX_DURATION_SECS / 60));
    }
    Ok(minutes)
}

/// Whole seconds, at least one and at most [`MAX_DURATION_SECS`]. Out-of-range
/// values from the config file are clamped rather than rejected.
fn minutes_to_duration(minutes: f64) -> Duration {
    // `as` saturates: NaN becomes 0 and infinities hit the bounds.
    let secs = (minutes * 60.0).round() as u64;
    Duration::from_secs(secs.clamp(1, MAX_DURATION_SECS))
}

// ============================================================================
// Config File
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub work_duration: f64,
    pub short_break_duration: f64,
    pub long_break_duration: f64,
    pub cycles: u32,
    pub sound_enabled: bool,
    pub handoff_seconds: u64,
    pub stats_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_TIME,
            short_break_duration: DEFAULT_SHORT_BREAK,
            long_break_duration: DEFAULT_LONG_BREAK,
            cycles: DEFAULT_CYCLES,
            sound_enabled: true,
            handoff_seconds: DEFAULT_HANDOFF_SECS,
            stats_file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pomo").join("config.json"))
    }

    /// Missing or malformed files give the defaults.
    pub fn load(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            Self::default()
        })
    }

    /// CLI flags take precedence over file values.
    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(w) = args.work {
            self.work_duration = w;
        }
        if let Some(s) = args.short_break {
            self.short_break_duration = s;
        }
        if let Some(l) = args.long_break {
            self.long_break_duration = l;
        }
        if let Some(c) = args.cycles {
            self.cycles = c;
        }
        if args.no_sound {
            self.sound_enabled = false;
        }
        if let Some(path) = &args.stats_file {
            self.stats_file = Some(path.clone());
        }
        self
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            work: minutes_to_duration(self.work_duration),
            short_break: minutes_to_duration(self.short_break_duration),
            long_break: minutes_to_duration(self.long_break_duration),
            cycles: self.cycles.max(1),
        }
    }

    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            sound_enabled: self.sound_enabled,
            handoff_secs: self.handoff_seconds,
            ..TimerSettings::default()
        }
    }

    pub fn stats_store(&self) -> StatsStore {
        StatsStore::new(self.stats_file.clone().unwrap_or_else(StatsStore::default_path))
    }
}
