//! Segment progress bar.
//!
//! Paints the poller's budget-space segment draws into terminal
//! columns: later draws overlay earlier ones, so the track goes down
//! first and categories layer on top, exactly as drawn.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::surface::{BarDraw, SurfaceState};
use crate::ui::theme::terminal_color;
use stoker_client::{Rgb, StatField};

pub struct ProgressBar;

impl ProgressBar {
    pub fn render(frame: &mut Frame, area: Rect, state: &SurfaceState) {
        let block = Block::default().borders(Borders::ALL).title(format!(
            " {} of {} remaining ",
            state.text(StatField::Remaining),
            state.text(StatField::Queued)
        ));
        let inner_width = block.inner(area).width as usize;

        let line = Line::from(paint(&state.bar, inner_width));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

/// Resolve overlapping budget-space draws into one colored span per
/// terminal column.
fn paint(draws: &[BarDraw], columns: usize) -> Vec<Span<'static>> {
    if columns == 0 || draws.is_empty() {
        return Vec::new();
    }

    let budget = draws
        .iter()
        .map(|d| d.x + d.width)
        .max()
        .unwrap_or(0)
        .max(1);

    let mut cells: Vec<Option<Rgb>> = vec![None; columns];
    for draw in draws {
        let start = (draw.x as usize * columns) / budget as usize;
        let end = (((draw.x + draw.width) as usize * columns) / budget as usize).min(columns);
        // Nonzero segments keep at least one column, mirroring the
        // minimum-width clamp in budget space
        let end = if draw.width > 0 { end.max(start + 1).min(columns) } else { end };
        for cell in &mut cells[start..end] {
            *cell = Some(draw.color);
        }
    }

    cells
        .into_iter()
        .map(|cell| match cell {
            Some(color) => Span::styled("█", Style::default().fg(terminal_color(color))),
            None => Span::raw(" "),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: Rgb = Rgb(0xD8, 0xD8, 0xD8);
    const BUILT: Rgb = Rgb(0x33, 0x99, 0x66);

    #[test]
    fn test_paint_overlays_in_draw_order() {
        let draws = vec![
            BarDraw { x: 0, width: 500, color: TRACK },
            BarDraw { x: 0, width: 250, color: BUILT },
        ];
        let spans = paint(&draws, 10);
        assert_eq!(spans.len(), 10);
        let built_style = Style::default().fg(terminal_color(BUILT));
        assert_eq!(spans[0].style, built_style);
        assert_eq!(spans[4].style, built_style);
        assert_eq!(spans[5].style, Style::default().fg(terminal_color(TRACK)));
    }

    #[test]
    fn test_paint_keeps_tiny_segments_visible() {
        let draws = vec![
            BarDraw { x: 0, width: 500, color: TRACK },
            BarDraw { x: 0, width: 1, color: BUILT },
        ];
        let spans = paint(&draws, 20);
        assert_eq!(spans[0].style, Style::default().fg(terminal_color(BUILT)));
    }

    #[test]
    fn test_paint_empty() {
        assert!(paint(&[], 10).is_empty());
    }
}
