//! Scripted stand-ins for the terminal used by the timer and session tests.

use anyhow::{Result, bail};
use std::{collections::VecDeque, thread, time::Duration};

use crate::{
    control::{InputEvent, InputSource},
    timer::SessionKind,
    ui::{CompletionView, CountdownView, Screen},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Countdown { kind: SessionKind, remaining_secs: u64, paused: bool },
    Completion { kind: SessionKind, next_in: u64 },
    Cleared,
}

#[derive(Default)]
pub struct RecordingScreen {
    pub frames: Vec<Frame>,
    pub bells: usize,
}

impl Screen for RecordingScreen {
    fn draw_countdown(&mut self, view: &CountdownView) -> Result<()> {
        self.frames.push(Frame::Countdown {
            kind: view.kind,
            remaining_secs: view.remaining_secs,
            paused: view.paused,
        });
        Ok(())
    }

    fn draw_completion(&mut self, view: &CompletionView) -> Result<()> {
        self.frames.push(Frame::Completion { kind: view.kind, next_in: view.next_in });
        Ok(())
    }

    fn bell(&mut self) -> Result<()> {
        self.bells += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.frames.push(Frame::Cleared);
        Ok(())
    }
}

pub enum Step {
    /// Let a timed wait run out with no input.
    Idle,
    Input(InputEvent),
    After(Duration, InputEvent),
}

/// Replays scripted input; once the script is exhausted every timed wait
/// simply sleeps out its timeout.
pub struct ScriptedInput {
    steps: VecDeque<Step>,
}

impl ScriptedInput {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps: steps.into() }
    }
}

impl InputSource for ScriptedInput {
    fn wait(&mut self, timeout: Option<Duration>) -> Result<Option<InputEvent>> {
        match (self.steps.pop_front(), timeout) {
            (Some(Step::Input(event)), _) => Ok(Some(event)),
            (Some(Step::After(delay, event)), _) => {
                thread::sleep(delay);
                Ok(Some(event))
            }
            (Some(Step::Idle) | None, Some(timeout)) => {
                thread::sleep(timeout);
                Ok(None)
            }
            (Some(Step::Idle) | None, None) => {
                bail!("blocking wait with no scripted input left")
            }
        }
    }
}
