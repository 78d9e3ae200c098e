//! Per-worker status table.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::surface::SurfaceState;
use crate::ui::Theme;

pub struct Workers;

impl Workers {
    pub fn render(frame: &mut Frame, area: Rect, state: &SurfaceState, theme: &Theme) {
        let header = Row::new(vec!["ID", "Origin", "Status", "Time"])
            .style(Style::default().fg(Color::Gray));

        let rows: Vec<Row> = state
            .workers
            .iter()
            .map(|worker| {
                let status_color = match worker.activity.as_str() {
                    "idle" => Color::DarkGray,
                    "build" => theme.success,
                    _ => theme.foreground,
                };
                let origin = worker
                    .origin
                    .as_ref()
                    .map(|o| o.full())
                    .unwrap_or_default();
                Row::new(vec![
                    Cell::from(worker.id.clone()),
                    Cell::from(origin),
                    Cell::from(worker.activity.clone()).style(Style::default().fg(status_color)),
                    Cell::from(worker.time.clone()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(24),
                Constraint::Length(16),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Workers ({}) ", state.workers.len())),
        );

        frame.render_widget(table, area);
    }
}
