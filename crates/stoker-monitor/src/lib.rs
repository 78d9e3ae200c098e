//! Terminal dashboard for stoker.
//!
//! Implements the poller's render-surface capability on top of ratatui.

pub mod app;
pub mod components;
pub mod surface;
pub mod ui;

pub use app::App;
pub use surface::{CategoryTable, DashboardSurface, SurfaceState};
pub use ui::Theme;
