//! Header component with build identity and master status.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::surface::SurfaceState;
use crate::ui::Theme;
use stoker_client::StatField;

pub struct Header;

impl Header {
    pub fn render(frame: &mut Frame, area: Rect, state: &SurfaceState, theme: &Theme) {
        let mastername = state.text(StatField::MasterName);
        let buildname = state.text(StatField::BuildName);
        let master_status = state.text(StatField::MasterStatus);

        let status_color = match master_status {
            "stopping_jobs" | "stopped" => theme.error,
            "parallel_build" => theme.success,
            _ => theme.warning,
        };

        let mut spans = vec![
            Span::raw("🔥 stoker"),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} {}", mastername, buildname),
                Style::default().fg(theme.highlight),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(master_status.to_string(), Style::default().fg(status_color)),
        ];

        if state.svn_visible {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                state.text(StatField::SvnUrl).to_string(),
                Style::default().fg(Color::Gray),
            ));
        }

        let datetime = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let datetime_line = Line::from(Span::styled(datetime, Style::default().fg(theme.warning)))
            .alignment(Alignment::Right);

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.title.clone())
                .title_top(datetime_line),
        );
        frame.render_widget(paragraph, area);
    }
}
