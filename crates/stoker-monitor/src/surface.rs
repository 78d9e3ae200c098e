//! Shared render-surface state.
//!
//! The poller task writes through the [`RenderSurface`] impl; the draw
//! loop reads the same state each frame.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use stoker_client::{Element, RenderSurface, Rgb, StatField, WorkerRow};
use stoker_core::Category;
use stoker_state::FormattedRow;

/// One drawn bar segment in budget space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarDraw {
    pub x: u64,
    pub width: u64,
    pub color: Rgb,
}

/// Rows and visibility for one category table.
#[derive(Debug, Default)]
pub struct CategoryTable {
    pub visible: bool,
    pub rows: Vec<FormattedRow>,
    /// Appended since the last reveal; not yet highlighted.
    pending: usize,
    /// Trailing rows drawn with the new-row treatment.
    pub highlighted: usize,
}

impl CategoryTable {
    fn append(&mut self, rows: &[FormattedRow]) {
        self.rows.extend_from_slice(rows);
        self.pending += rows.len();
    }

    fn reveal(&mut self) {
        self.highlighted = self.pending;
        self.pending = 0;
    }
}

/// Everything the dashboard draws from.
#[derive(Debug)]
pub struct SurfaceState {
    pub title: String,
    pub texts: HashMap<StatField, String>,
    pub workers: Vec<WorkerRow>,
    pub tables: HashMap<Category, CategoryTable>,
    /// Bar segments in draw order, track first.
    pub bar: Vec<BarDraw>,
    pub loading: bool,
    pub svn_visible: bool,
    /// Current page URL, updated by redirects.
    pub page_url: String,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            title: String::new(),
            texts: HashMap::new(),
            workers: Vec::new(),
            tables: Category::ALL
                .iter()
                .map(|c| (*c, CategoryTable::default()))
                .collect(),
            bar: Vec::new(),
            loading: true,
            svn_visible: false,
            page_url: String::new(),
        }
    }
}

impl SurfaceState {
    pub fn text(&self, field: StatField) -> &str {
        self.texts
            .get(&field)
            .map(String::as_str)
            .unwrap_or(stoker_parsers::PLACEHOLDER)
    }

    pub fn table(&self, category: Category) -> Option<&CategoryTable> {
        self.tables.get(&category)
    }
}

/// Cloneable handle to the shared surface state.
#[derive(Clone, Default)]
pub struct DashboardSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl DashboardSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the state for one frame's rendering.
    pub fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap()
    }
}

impl RenderSurface for DashboardSurface {
    fn set_text(&mut self, field: StatField, value: &str) {
        self.lock().texts.insert(field, value.to_string());
    }

    fn set_title(&mut self, title: &str) {
        self.lock().title = title.to_string();
    }

    fn show(&mut self, element: Element) {
        let mut state = self.lock();
        match element {
            Element::LoadingOverlay => state.loading = true,
            Element::SvnUrl => state.svn_visible = true,
            Element::CategoryTable(category) => {
                state.tables.entry(category).or_default().visible = true;
            }
        }
    }

    fn hide(&mut self, element: Element) {
        let mut state = self.lock();
        match element {
            Element::LoadingOverlay => state.loading = false,
            Element::SvnUrl => state.svn_visible = false,
            Element::CategoryTable(category) => {
                state.tables.entry(category).or_default().visible = false;
            }
        }
    }

    fn append_rows(&mut self, category: Category, rows: &[FormattedRow]) {
        self.lock().tables.entry(category).or_default().append(rows);
    }

    fn clear_category(&mut self, category: Category) {
        self.lock().tables.insert(category, CategoryTable::default());
    }

    fn set_workers(&mut self, rows: Vec<WorkerRow>) {
        self.lock().workers = rows;
    }

    fn begin_bar(&mut self) {
        self.lock().bar.clear();
    }

    fn draw_bar_segment(&mut self, x: u64, width: u64, color: Rgb) {
        self.lock().bar.push(BarDraw { x, width, color });
    }

    fn reveal_new_rows(&mut self) {
        for table in self.lock().tables.values_mut() {
            table.reveal();
        }
    }

    fn navigate_to(&mut self, url: &str) {
        self.lock().page_url = url.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoker_state::LogRef;

    fn built_row(name: &str, seq: usize) -> FormattedRow {
        FormattedRow::Built {
            seq,
            pkgname: name.to_string(),
            origin: stoker_parsers::format_origin("devel/x"),
            log: LogRef {
                label: "logfile".to_string(),
                path: format!("logs/{}.log", name),
            },
        }
    }

    #[test]
    fn test_append_and_reveal() {
        let mut surface = DashboardSurface::new();
        surface.append_rows(Category::Built, &[built_row("a-1", 1), built_row("b-1", 2)]);
        {
            let state = surface.lock();
            let table = state.table(Category::Built).unwrap();
            assert_eq!(table.rows.len(), 2);
            assert_eq!(table.highlighted, 0);
        }

        surface.reveal_new_rows();
        assert_eq!(surface.lock().table(Category::Built).unwrap().highlighted, 2);

        surface.append_rows(Category::Built, &[built_row("c-1", 3)]);
        surface.reveal_new_rows();
        let state = surface.lock();
        let table = state.table(Category::Built).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.highlighted, 1);
    }

    #[test]
    fn test_begin_bar_discards_previous_draws() {
        let track = Rgb(0xD8, 0xD8, 0xD8);
        let mut surface = DashboardSurface::new();
        surface.begin_bar();
        surface.draw_bar_segment(0, 500, track);
        surface.draw_bar_segment(0, 200, Rgb(0x33, 0x99, 0x66));
        assert_eq!(surface.lock().bar.len(), 2);

        // Next poll redraws from the track outward
        surface.begin_bar();
        surface.draw_bar_segment(0, 500, track);
        surface.draw_bar_segment(0, 210, Rgb(0x33, 0x99, 0x66));
        let state = surface.lock();
        assert_eq!(state.bar.len(), 2);
        assert_eq!(state.bar[1].width, 210);
    }

    #[test]
    fn test_clear_category_drops_rows_and_hides() {
        let mut surface = DashboardSurface::new();
        surface.show(Element::CategoryTable(Category::Built));
        surface.append_rows(Category::Built, &[built_row("a-1", 1)]);
        surface.reveal_new_rows();

        surface.clear_category(Category::Built);
        {
            let state = surface.lock();
            let table = state.table(Category::Built).unwrap();
            assert!(table.rows.is_empty());
            assert!(!table.visible);
            assert_eq!(table.highlighted, 0);
        }

        // A following build's rows start over, without the old build's
        // rows ahead of them
        surface.append_rows(Category::Built, &[built_row("z-2", 1)]);
        let state = surface.lock();
        let table = state.table(Category::Built).unwrap();
        assert_eq!(table.rows.len(), 1);
        match &table.rows[0] {
            FormattedRow::Built { seq, pkgname, .. } => {
                assert_eq!(*seq, 1);
                assert_eq!(pkgname, "z-2");
            }
            other => panic!("unexpected row {:?}", other),
        }
    }

    #[test]
    fn test_missing_text_degrades_to_placeholder() {
        let surface = DashboardSurface::new();
        assert_eq!(surface.lock().text(StatField::Impulse), "--");
    }
}
