//! Dashboard components.

pub mod footer;
pub mod header;
pub mod progress;
pub mod results;
pub mod stats;
pub mod workers;

pub use footer::Footer;
pub use header::Header;
pub use progress::ProgressBar;
pub use results::Results;
pub use stats::Stats;
pub use workers::Workers;
