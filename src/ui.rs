use anyhow::Result;
use crossterm::{
    execute,
    style::Print,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};

use crate::{
    countdown::format_time,
    timer::{CycleProgress, SessionKind},
};

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CountdownView {
    pub kind: SessionKind,
    pub progress: Option<CycleProgress>,
    pub remaining_secs: u64,
    pub ratio: f64,
    pub paused: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CompletionView {
    pub kind: SessionKind,
    pub progress: Option<CycleProgress>,
    /// Seconds until the next session; `0` hides the countdown line.
    pub next_in: u64,
}

/// Everything the countdown loop needs from the display.
pub trait Screen {
    fn draw_countdown(&mut self, view: &CountdownView) -> Result<()>;
    fn draw_completion(&mut self, view: &CompletionView) -> Result<()>;
    fn bell(&mut self) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

fn phase_color(kind: SessionKind) -> Color {
    match kind {
        SessionKind::Work => Color::Rgb(255, 99, 71),
        SessionKind::ShortBreak => Color::Rgb(100, 181, 246),
        SessionKind::LongBreak => Color::Rgb(0, 255, 150),
    }
}

const BORDER_COLOR: Color = Color::Rgb(0, 200, 255);
const ACCENT_COLOR: Color = Color::Rgb(255, 100, 0);

// ============================================================================
// Terminal Screen
// ============================================================================

pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalScreen {
    /// Enter raw mode and the alternate screen. Call [`TerminalScreen::restore`]
    /// before printing anything to the normal screen again.
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    pub fn restore(mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Screen for TerminalScreen {
    fn draw_countdown(&mut self, view: &CountdownView) -> Result<()> {
        self.terminal.draw(|f| render_countdown(f, view))?;
        Ok(())
    }

    fn draw_completion(&mut self, view: &CompletionView) -> Result<()> {
        self.terminal.draw(|f| render_completion(f, view))?;
        Ok(())
    }

    fn bell(&mut self) -> Result<()> {
        execute!(self.terminal.backend_mut(), Print('\x07'))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.terminal.clear()?;
        Ok(())
    }
}

// ============================================================================
// UI Rendering
// ============================================================================

fn app_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(Span::styled(" 🍅 POMODORO ", Style::default()
            .fg(ACCENT_COLOR).add_modifier(Modifier::BOLD)))
        .title_alignment(Alignment::Center)
}

fn render_countdown(f: &mut Frame, view: &CountdownView) {
    let color = phase_color(view.kind);
    let area = centered_rect(60, 60, f.size());
    f.render_widget(app_block(), area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(view.kind.header(view.progress))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[1]
    );

    f.render_widget(
        Paragraph::new(format!("Time remaining: {}", format_time(view.remaining_secs)))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[3]
    );

    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent((view.ratio * 100.0) as u16),
        sections[5]
    );

    let status = if view.paused { "⏸  PAUSED" } else { "● RUNNING" };
    f.render_widget(
        Paragraph::new(status)
            .style(Style::default()
                .fg(if view.paused { Color::Yellow } else { Color::Green })
                .add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[7]
    );

    let hint = if view.paused {
        "Timer paused. Press Enter to resume or Ctrl+C again to exit."
    } else {
        "Press Ctrl+C to pause/exit"
    };
    f.render_widget(
        Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center),
        sections[9]
    );
}

fn render_completion(f: &mut Frame, view: &CompletionView) {
    let area = centered_rect(60, 40, f.size());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(view.kind.completion_message(view.progress), Style::default()
            .fg(phase_color(view.kind)).add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    if view.next_in > 0 {
        lines.push(Line::from(Span::styled(
            format!("Next session starts in {} seconds...", view.next_in),
            Style::default().fg(Color::Gray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(app_block()),
        area
    );
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_countdown_frame_shows_time_and_hint() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let view = CountdownView {
            kind: SessionKind::LongBreak,
            progress: None,
            remaining_secs: 14 * 60 + 59,
            ratio: 0.0,
            paused: false,
        };
        terminal.draw(|f| render_countdown(f, &view)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Time remaining: 14:59"));
        assert!(text.contains("Press Ctrl+C to pause/exit"));
        assert!(text.contains("RUNNING"));
    }

    #[test]
    fn test_paused_frame_shows_resume_hint() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let view = CountdownView {
            kind: SessionKind::Work,
            progress: Some(CycleProgress { cycle: 1, total: 4 }),
            remaining_secs: 600,
            ratio: 0.6,
            paused: true,
        };
        terminal.draw(|f| render_countdown(f, &view)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("PAUSED"));
        assert!(text.contains("Press Enter to resume"));
        assert!(text.contains("10:00"));
    }

    #[test]
    fn test_completion_frame_hides_zero_countdown() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let view = CompletionView { kind: SessionKind::ShortBreak, progress: None, next_in: 3 };
        terminal.draw(|f| render_completion(f, &view)).unwrap();
        assert!(buffer_text(&terminal).contains("Next session starts in 3 seconds..."));

        let view = CompletionView { next_in: 0, ..view };
        terminal.draw(|f| render_completion(f, &view)).unwrap();
        assert!(!buffer_text(&terminal).contains("Next session"));
    }
}
