//! Render surface capability.
//!
//! The poller never touches presentation primitives directly; it drives
//! whatever implements [`RenderSurface`]. The terminal implementation
//! lives in stoker-monitor.

use stoker_core::Category;
use stoker_parsers::OriginRef;
use stoker_state::FormattedRow;

/// An RGB color for bar segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Text fields the poller writes each apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    Queued,
    Built,
    Failed,
    Skipped,
    Ignored,
    Remaining,
    /// Whole-run average packages per hour.
    PkgHour,
    /// Windowed recent packages per hour.
    Impulse,
    MasterName,
    BuildName,
    SvnUrl,
    MasterStatus,
}

/// Elements shown or hidden as the build progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// Initial overlay dismissed on the first successful apply.
    LoadingOverlay,
    SvnUrl,
    /// A category's table container, hidden until its first rows.
    CategoryTable(Category),
}

/// One row of the per-worker status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRow {
    pub id: String,
    /// Origin under build; None while the worker is idle.
    pub origin: Option<OriginRef>,
    pub activity: String,
    /// Display-ready timestamp, blank when absent.
    pub time: String,
}

/// Operations the poller drives the UI through.
pub trait RenderSurface {
    fn set_text(&mut self, field: StatField, value: &str);
    fn set_title(&mut self, title: &str);
    fn show(&mut self, element: Element);
    fn hide(&mut self, element: Element);
    /// Append newly materialized rows to a category table. Previously
    /// appended rows are never sent again.
    fn append_rows(&mut self, category: Category, rows: &[FormattedRow]);
    /// Drop all rows from a category table and hide it again, e.g. when
    /// the build identity changes mid-session.
    fn clear_category(&mut self, category: Category);
    /// Replace the worker table contents.
    fn set_workers(&mut self, rows: Vec<WorkerRow>);
    /// Start a fresh bar redraw; segments drawn earlier are discarded.
    fn begin_bar(&mut self);
    /// Draw one solid bar segment at pixel offset `x`.
    fn draw_bar_segment(&mut self, x: u64, width: u64, color: Rgb);
    /// Apply the transient visual treatment to rows appended since the
    /// last reveal.
    fn reveal_new_rows(&mut self);
    fn navigate_to(&mut self, url: &str);
}
