//! Origin and log reference formatting.

/// Glyph shown for fields that could not be derived from the input.
pub const PLACEHOLDER: &str = "--";

/// A linkable `category/name` origin pair with an external
/// cross-reference URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRef {
    /// Ports tree category (the part before the slash).
    pub category: String,
    /// Port name, or the placeholder glyph when the origin had no slash.
    pub port: String,
    /// External port overview URL.
    pub url: String,
}

impl OriginRef {
    /// The full `category/name` form.
    pub fn full(&self) -> String {
        format!("{}/{}", self.category, self.port)
    }
}

/// Split an origin string into a linkable pair. An origin without a
/// slash keeps its whole text as the category and a placeholder port.
pub fn format_origin(origin: &str) -> OriginRef {
    let mut parts = origin.splitn(2, '/');
    let category = parts.next().unwrap_or("").to_string();
    let port = parts
        .next()
        .filter(|p| !p.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string();
    let url = format!(
        "http://portsmon.freebsd.org/portoverview.py?category={}&portname={}",
        category, port
    );

    OriginRef {
        category,
        port,
        url,
    }
}

/// Relative path to a package's build log. Failed packages log under
/// `logs/errors/`.
pub fn log_path(pkgname: &str, errors: bool) -> String {
    if errors {
        format!("logs/errors/{}.log", pkgname)
    } else {
        format!("logs/{}.log", pkgname)
    }
}
