//! UI support types.

pub mod theme;

pub use theme::Theme;
