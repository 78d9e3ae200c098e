//! Presentation formatters for stoker.
//!
//! Pure, stateless mappings from raw snapshot fields to display-ready
//! values. Every function here is total: malformed input degrades to a
//! placeholder instead of failing.

pub mod origin;
pub mod time;

pub use origin::{format_origin, log_path, OriginRef, PLACEHOLDER};
pub use time::{elapsed_seconds, format_worker_time};
