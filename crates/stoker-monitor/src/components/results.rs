//! Per-category result tables.
//!
//! One category is in view at a time; a tab line shows counts for the
//! others. Categories stay hidden until their first rows arrive, and
//! rows revealed by the latest poll carry a transient highlight.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::surface::{CategoryTable, SurfaceState};
use crate::ui::Theme;
use stoker_core::Category;
use stoker_state::FormattedRow;

pub struct Results;

impl Results {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        state: &SurfaceState,
        theme: &Theme,
        selected: Category,
        scroll: usize,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        render_tabs(frame, chunks[0], state, theme, selected);

        match state.table(selected) {
            Some(table) if table.visible => {
                render_table(frame, chunks[1], table, theme, selected, scroll)
            }
            _ => {
                let empty = Paragraph::new(Line::from(Span::styled(
                    "no results yet",
                    Style::default().fg(Color::DarkGray),
                )))
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(empty, chunks[1]);
            }
        }
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &SurfaceState, theme: &Theme, selected: Category) {
    let mut spans = Vec::new();
    for category in Category::ALL {
        let (count, visible) = state
            .table(category)
            .map(|t| (t.rows.len(), t.visible))
            .unwrap_or((0, false));

        let mut style = if visible {
            Style::default().fg(category_color(category, theme))
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if category == selected {
            style = style.add_modifier(Modifier::REVERSED);
        }

        spans.push(Span::styled(
            format!(" {} ({}) ", category.key(), count),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn category_color(category: Category, theme: &Theme) -> Color {
    match category {
        Category::Built => theme.success,
        Category::Failed => theme.error,
        Category::Ignored => Color::Gray,
        Category::Skipped => theme.warning,
    }
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    table: &CategoryTable,
    theme: &Theme,
    category: Category,
    scroll: usize,
) {
    let (header, widths) = table_layout(category);
    let header = Row::new(header).style(Style::default().fg(Color::Gray));

    let total = table.rows.len();
    let first_new = total - table.highlighted.min(total);
    let scroll = scroll.min(total.saturating_sub(1));

    let rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, row)| {
            let mut r = Row::new(row_cells(row));
            if i >= first_new {
                r = r.style(
                    Style::default()
                        .fg(theme.highlight)
                        .add_modifier(Modifier::BOLD),
                );
            }
            r
        })
        .collect();

    let widget = Table::new(rows, widths).header(header).block(
        Block::default().borders(Borders::ALL).title(format!(
            " {} ({}) ",
            category.key(),
            total
        )),
    );
    frame.render_widget(widget, area);
}

fn table_layout(category: Category) -> (Vec<&'static str>, Vec<Constraint>) {
    match category {
        Category::Built => (
            vec!["#", "Package", "Origin", "Log"],
            vec![
                Constraint::Length(6),
                Constraint::Min(20),
                Constraint::Min(20),
                Constraint::Min(20),
            ],
        ),
        Category::Failed => (
            vec!["#", "Package", "Origin", "Phase", "Skipped", "Log"],
            vec![
                Constraint::Length(6),
                Constraint::Min(18),
                Constraint::Min(18),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Min(18),
            ],
        ),
        Category::Skipped => (
            vec!["Package", "Origin", "Blocked by"],
            vec![
                Constraint::Min(20),
                Constraint::Min(20),
                Constraint::Min(20),
            ],
        ),
        Category::Ignored => (
            vec!["Package", "Origin", "Skipped", "Reason"],
            vec![
                Constraint::Min(18),
                Constraint::Min(18),
                Constraint::Length(8),
                Constraint::Min(24),
            ],
        ),
    }
}

fn row_cells(row: &FormattedRow) -> Vec<Cell<'static>> {
    match row {
        FormattedRow::Built {
            seq,
            pkgname,
            origin,
            log,
        } => vec![
            Cell::from(seq.to_string()),
            Cell::from(pkgname.clone()),
            Cell::from(origin.full()),
            Cell::from(log.path.clone()),
        ],
        FormattedRow::Failed {
            seq,
            pkgname,
            origin,
            phase,
            skipped_cnt,
            log,
        } => vec![
            Cell::from(seq.to_string()),
            Cell::from(pkgname.clone()),
            Cell::from(origin.full()),
            Cell::from(phase.clone()),
            Cell::from(skipped_cnt.to_string()),
            Cell::from(format!("{} ({})", log.label, log.path)),
        ],
        FormattedRow::Skipped {
            pkgname,
            origin,
            depends,
        } => vec![
            Cell::from(pkgname.clone()),
            Cell::from(origin.full()),
            Cell::from(depends.clone()),
        ],
        FormattedRow::Ignored {
            pkgname,
            origin,
            skipped_cnt,
            reason,
        } => vec![
            Cell::from(pkgname.clone()),
            Cell::from(origin.full()),
            Cell::from(skipped_cnt.to_string()),
            Cell::from(reason.clone()),
        ],
    }
}
