//! Countdown for a single work or break session.
//!
//! ```text
//! Running -> Paused -> Running -> Completed
//!               \-> Cancelled
//! ```
//!
//! Only a completed session is recorded, rings the bell and shows the
//! completion banner. A cancelled session returns straight to the caller.
//! Cancelling during the hand-off after a completed session also reports
//! `Cancelled` so the caller stops, but the session is kept in the stats.

use anyhow::Result;
use std::{
    fmt,
    time::{Duration, Instant},
};
use tracing::info;

use crate::{
    control::{InputSource, TimerControl, dispatch},
    countdown::{Countdown, display_secs},
    stats::StatsStore,
    ui::{CompletionView, CountdownView, Screen},
};

pub const TICK_RATE: Duration = Duration::from_secs(1);
pub const DEFAULT_HANDOFF_SECS: u64 = 5;

// ============================================================================
// Data Models
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }

    pub fn header(&self, progress: Option<CycleProgress>) -> String {
        match (self, progress) {
            (Self::Work, Some(p)) => format!("🍅 WORK SESSION {p} 🍅"),
            (Self::Work, None) => "🍅 WORK SESSION 🍅".into(),
            (Self::ShortBreak, Some(p)) => format!("☕ SHORT BREAK {p} ☕"),
            (Self::ShortBreak, None) => "☕ SHORT BREAK ☕".into(),
            (Self::LongBreak, _) => "🌴 LONG BREAK 🌴".into(),
        }
    }

    pub fn completion_message(&self, progress: Option<CycleProgress>) -> String {
        match (self, progress) {
            (Self::Work, Some(p)) => format!("✅ Work session {p} completed!"),
            (Self::Work, None) => "✅ Work session completed!".into(),
            (Self::ShortBreak, _) => "✅ Short break completed! Get ready to work!".into(),
            (Self::LongBreak, _) => "✅ Long break completed! Ready for a new cycle?".into(),
        }
    }
}

/// Position of a session within the run, shown as `cycle/total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleProgress {
    pub cycle: u32,
    pub total: u32,
}

impl fmt::Display for CycleProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cycle, self.total)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
pub struct TimerSettings {
    pub sound_enabled: bool,
    /// Seconds of "next session starts in" countdown after a completed session.
    pub handoff_secs: u64,
    pub tick: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            handoff_secs: DEFAULT_HANDOFF_SECS,
            tick: TICK_RATE,
        }
    }
}

// ============================================================================
// Timer
// ============================================================================

pub struct Timer<'a, S, I> {
    screen: &'a mut S,
    input: &'a mut I,
    control: &'a TimerControl,
    store: &'a StatsStore,
    settings: TimerSettings,
}

impl<'a, S: Screen, I: InputSource> Timer<'a, S, I> {
    pub fn new(
        screen: &'a mut S,
        input: &'a mut I,
        control: &'a TimerControl,
        store: &'a StatsStore,
        settings: TimerSettings,
    ) -> Self {
        Self { screen, input, control, store, settings }
    }

    pub fn run_session(
        &mut self,
        kind: SessionKind,
        duration: Duration,
        progress: Option<CycleProgress>,
    ) -> Result<SessionOutcome> {
        info!(kind = kind.as_str(), secs = duration.as_secs(), "session started");
        let mut countdown = Countdown::start(Instant::now(), duration);

        loop {
            if !self.control.is_running() {
                info!(kind = kind.as_str(), "session cancelled");
                return Ok(SessionOutcome::Cancelled);
            }

            let now = Instant::now();
            if self.control.is_paused() {
                countdown.pause(now);
                self.draw(kind, progress, &countdown, now)?;
                self.wait(None)?;
                if !self.control.is_paused() {
                    countdown.resume(Instant::now());
                }
                continue;
            }

            if countdown.is_expired(now) {
                break;
            }

            self.draw(kind, progress, &countdown, now)?;
            let timeout = countdown.remaining(now).min(self.settings.tick);
            self.wait(Some(timeout))?;
        }

        self.complete(kind, duration, progress)?;

        // A double interrupt during the hand-off stops the run; the finished
        // session stays recorded.
        if !self.control.is_running() {
            info!(kind = kind.as_str(), "run cancelled during hand-off");
            return Ok(SessionOutcome::Cancelled);
        }
        Ok(SessionOutcome::Completed)
    }

    fn draw(
        &mut self,
        kind: SessionKind,
        progress: Option<CycleProgress>,
        countdown: &Countdown,
        now: Instant,
    ) -> Result<()> {
        self.screen.draw_countdown(&CountdownView {
            kind,
            progress,
            remaining_secs: display_secs(countdown.remaining(now)),
            ratio: countdown.progress_ratio(now),
            paused: countdown.is_paused(),
        })
    }

    fn wait(&mut self, timeout: Option<Duration>) -> Result<()> {
        if let Some(event) = self.input.wait(timeout)? {
            dispatch(self.control, event);
        }
        Ok(())
    }

    fn complete(
        &mut self,
        kind: SessionKind,
        duration: Duration,
        progress: Option<CycleProgress>,
    ) -> Result<()> {
        let minutes = duration.as_secs() / 60;
        self.store.save(kind, minutes);
        info!(kind = kind.as_str(), minutes, "session completed");

        if self.settings.sound_enabled {
            let _ = self.screen.bell();
        }

        let mut next_in = self.settings.handoff_secs;
        loop {
            self.screen.draw_completion(&CompletionView { kind, progress, next_in })?;
            if next_in == 0 {
                break;
            }

            let step_end = Instant::now() + self.settings.tick;
            loop {
                let now = Instant::now();
                if now >= step_end || !self.control.is_running() {
                    break;
                }
                self.wait(Some(step_end - now))?;
            }

            if !self.control.is_running() {
                break;
            }
            next_in -= 1;
        }

        self.screen.clear()
    }
}
