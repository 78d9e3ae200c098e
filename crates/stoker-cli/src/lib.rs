//! CLI argument parsing for stoker.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "stoker")]
#[command(about = "Live dashboard for bulk package build servers")]
pub struct Args {
    /// Build page URL, e.g. http://build.example.org/build/130amd64-default/latest/
    pub url: String,

    /// Poll interval in seconds
    #[arg(long, default_value = "8")]
    pub poll_interval: u64,

    /// Color theme (dark or light)
    #[arg(long, default_value = "dark")]
    pub theme: String,
}
