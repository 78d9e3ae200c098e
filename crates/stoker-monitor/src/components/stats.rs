//! Aggregate counters and throughput figures.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::surface::SurfaceState;
use crate::ui::Theme;
use stoker_client::StatField;

pub struct Stats;

impl Stats {
    pub fn render(frame: &mut Frame, area: Rect, state: &SurfaceState, theme: &Theme) {
        let entry = |label: &str, field: StatField, color: Color| {
            vec![
                Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
                Span::styled(state.text(field).to_string(), Style::default().fg(color)),
                Span::raw("  "),
            ]
        };

        let mut spans = Vec::new();
        spans.extend(entry("Queued", StatField::Queued, theme.foreground));
        spans.extend(entry("Built", StatField::Built, theme.success));
        spans.extend(entry("Failed", StatField::Failed, theme.error));
        spans.extend(entry("Skipped", StatField::Skipped, theme.warning));
        spans.extend(entry("Ignored", StatField::Ignored, Color::Gray));
        spans.extend(entry("Remaining", StatField::Remaining, theme.foreground));
        spans.extend(entry("pkg/hr", StatField::PkgHour, theme.highlight));
        spans.extend(entry("recent", StatField::Impulse, theme.highlight));

        let paragraph =
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }
}
