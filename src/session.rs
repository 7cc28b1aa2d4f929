//! Sequencing of work and break sessions across a full run.

use anyhow::Result;
use std::{fmt, time::Duration};
use tracing::info;

use crate::{
    control::InputSource,
    timer::{CycleProgress, SessionKind, SessionOutcome, Timer},
    ui::Screen,
};

/// Durations and cycle count for a run. Fixed once the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    pub cycles: u32,
}

impl SessionConfig {
    pub fn duration(&self, kind: SessionKind) -> Duration {
        match kind {
            SessionKind::Work => self.work,
            SessionKind::ShortBreak => self.short_break,
            SessionKind::LongBreak => self.long_break,
        }
    }

    /// The break that follows work session `cycle`: short between cycles,
    /// long after the last one.
    pub fn break_after(&self, cycle: u32) -> SessionKind {
        if cycle < self.cycles {
            SessionKind::ShortBreak
        } else {
            SessionKind::LongBreak
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let cycles = u64::from(self.cycles);
        let short_breaks = cycles.saturating_sub(1);
        let work_secs = self.work.as_secs().saturating_mul(cycles);
        let break_secs = self
            .short_break
            .as_secs()
            .saturating_mul(short_breaks)
            .saturating_add(self.long_break.as_secs());

        SessionSummary {
            work_minutes: work_secs / 60,
            break_minutes: break_secs / 60,
            cycles: self.cycles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub work_minutes: u64,
    pub break_minutes: u64,
    pub cycles: u32,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🎉 Pomodoro session completed! 🎉")?;
        writeln!(f, "\nStatistics for this session:")?;
        writeln!(f, "  Work time: {} minutes", self.work_minutes)?;
        writeln!(f, "  Break time: {} minutes", self.break_minutes)?;
        write!(f, "  Completed cycles: {}", self.cycles)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(SessionSummary),
    Cancelled,
}

/// Runs one countdown to completion or cancellation.
pub trait RunSession {
    fn run_session(
        &mut self,
        kind: SessionKind,
        duration: Duration,
        progress: Option<CycleProgress>,
    ) -> Result<SessionOutcome>;
}

impl<S: Screen, I: InputSource> RunSession for Timer<'_, S, I> {
    fn run_session(
        &mut self,
        kind: SessionKind,
        duration: Duration,
        progress: Option<CycleProgress>,
    ) -> Result<SessionOutcome> {
        Timer::run_session(self, kind, duration, progress)
    }
}

/// Run `config.cycles` work sessions, each followed by a break. Stops at the
/// first cancelled session without running anything further.
pub fn run_pomodoro(runner: &mut impl RunSession, config: &SessionConfig) -> Result<RunOutcome> {
    for cycle in 1..=config.cycles {
        let progress = CycleProgress { cycle, total: config.cycles };

        let work = runner.run_session(SessionKind::Work, config.work, Some(progress))?;
        if work == SessionOutcome::Cancelled {
            return Ok(RunOutcome::Cancelled);
        }

        let kind = config.break_after(cycle);
        let label = (kind == SessionKind::ShortBreak).then_some(progress);
        if runner.run_session(kind, config.duration(kind), label)? == SessionOutcome::Cancelled {
            return Ok(RunOutcome::Cancelled);
        }
    }

    let summary = config.summary();
    info!(cycles = summary.cycles, work_minutes = summary.work_minutes, "pomodoro run completed");
    Ok(RunOutcome::Completed(summary))
}
