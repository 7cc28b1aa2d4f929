//! Interrupt state shared between key handling and the countdown loop.
//!
//! The terminal runs in raw mode, so Ctrl+C arrives as a key event instead of
//! a signal. Input handling only flips the flags below; the loop polls them on
//! every tick and after every blocking wait.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tracing::info;

#[derive(Debug)]
pub struct TimerControl {
    running: AtomicBool,
    paused: AtomicBool,
}

impl Default for TimerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerControl {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// First interrupt pauses; a second one while still paused stops everything.
    pub fn interrupt(&self) {
        if self.paused.swap(true, Ordering::SeqCst) {
            self.running.store(false, Ordering::SeqCst);
        }
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Interrupt,
    Key,
}

pub trait InputSource {
    /// Wait up to `timeout` for input, or indefinitely when `None`.
    fn wait(&mut self, timeout: Option<Duration>) -> Result<Option<InputEvent>>;
}

/// Route an input event to the control flags.
pub fn dispatch(control: &TimerControl, event: InputEvent) {
    match event {
        InputEvent::Interrupt => {
            control.interrupt();
            if control.is_running() {
                info!("timer paused");
            } else {
                info!("timer cancelled");
            }
        }
        InputEvent::Key if control.is_paused() && control.is_running() => {
            control.resume();
            info!("timer resumed");
        }
        InputEvent::Key => {}
    }
}

// ============================================================================
// Terminal Input
// ============================================================================

pub struct TerminalInput;

impl TerminalInput {
    fn classify(key: KeyEvent) -> Option<InputEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            Some(InputEvent::Interrupt)
        } else {
            Some(InputEvent::Key)
        }
    }
}

impl InputSource for TerminalInput {
    fn wait(&mut self, timeout: Option<Duration>) -> Result<Option<InputEvent>> {
        match timeout {
            Some(timeout) => {
                if event::poll(timeout)? {
                    if let Event::Key(key) = event::read()? {
                        return Ok(Self::classify(key));
                    }
                }
                Ok(None)
            }
            None => loop {
                if let Event::Key(key) = event::read()? {
                    if let Some(input) = Self::classify(key) {
                        return Ok(Some(input));
                    }
                }
            },
        }
    }
}
