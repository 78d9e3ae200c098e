//! Main dashboard application.

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::components::{Footer, Header, ProgressBar, Results, Stats, Workers};
use crate::surface::DashboardSurface;
use crate::ui::Theme;
use stoker_core::Category;

/// Dashboard application state.
///
/// All build data lives in the shared surface; the app only owns view
/// state (selection, scroll, overlays).
pub struct App {
    pub surface: DashboardSurface,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    selected: usize,
    scroll: HashMap<Category, usize>,
}

impl App {
    pub fn new(surface: DashboardSurface, theme: Theme) -> Self {
        Self {
            surface,
            theme,
            should_quit: false,
            show_help: false,
            selected: 0,
            scroll: HashMap::new(),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn selected_category(&self) -> Category {
        Category::ALL[self.selected % Category::ALL.len()]
    }

    fn cycle_category(&mut self) {
        self.selected = (self.selected + 1) % Category::ALL.len();
    }

    fn scroll_by(&mut self, delta: i64) {
        let category = self.selected_category();
        let len = self
            .surface
            .lock()
            .table(category)
            .map(|t| t.rows.len())
            .unwrap_or(0);
        let entry = self.scroll.entry(category).or_insert(0);
        let next = (*entry as i64 + delta).max(0) as usize;
        *entry = next.min(len.saturating_sub(1));
    }

    fn scroll_to_top(&mut self) {
        self.scroll.insert(self.selected_category(), 0);
    }

    fn scroll_to_bottom(&mut self) {
        let category = self.selected_category();
        let len = self
            .surface
            .lock()
            .table(category)
            .map(|t| t.rows.len())
            .unwrap_or(0);
        self.scroll.insert(category, len.saturating_sub(1));
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Tab => self.cycle_category(),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(10),
            KeyCode::PageUp => self.scroll_by(-10),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.scroll_to_bottom(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    /// Poll for events and handle them.
    pub fn poll_events(&mut self, timeout: Duration) -> std::io::Result<bool> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Render the dashboard.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let state = self.surface.lock();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Progress bar
                Constraint::Length(3), // Stats
                Constraint::Length(8), // Workers
                Constraint::Min(6),    // Result tables
                Constraint::Length(1), // Footer
            ])
            .split(area);

        Header::render(frame, chunks[0], &state, &self.theme);
        ProgressBar::render(frame, chunks[1], &state);
        Stats::render(frame, chunks[2], &state, &self.theme);
        Workers::render(frame, chunks[3], &state, &self.theme);

        let category = self.selected_category();
        let scroll = self.scroll.get(&category).copied().unwrap_or(0);
        Results::render(frame, chunks[4], &state, &self.theme, category, scroll);

        Footer::render(frame, chunks[5]);

        if state.loading {
            self.render_loading_overlay(frame);
        }
        drop(state);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_loading_overlay(&self, frame: &mut Frame) {
        let area = centered_rect(30, 20, frame.area());
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Loading build data…",
            Style::default().fg(self.theme.warning),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let area = centered_rect(50, 50, frame.area());

        let help_text = r#"
  Keyboard Shortcuts
  ──────────────────

  Tab        Next result category
  j/k / ↑↓   Scroll rows
  PgUp/PgDn  Scroll by page
  g / G      Go to first/last row
  ?          This help
  q / Ctrl+C Quit

  Press any key to close
"#;

        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help ")
                    .style(Style::default().bg(Color::DarkGray)),
            )
            .style(Style::default().fg(Color::White).bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
