//! 🍅 pomo - a terminal Pomodoro timer.
//!
//! Alternates work sessions with short breaks, finishes with a long break,
//! and keeps per-day totals in `~/.pomodoro_stats.json`.

pub mod config;
pub mod control;
pub mod countdown;
pub mod session;
pub mod stats;
pub mod timer;
pub mod ui;

#[cfg(test)]
mod testing;
