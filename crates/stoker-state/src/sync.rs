//! Incremental table synchronization.
//!
//! Per result category, tracks how many rows have already been
//! materialized into the UI and yields only the appended suffix on each
//! poll. This bounds per-poll rendering cost to the new rows; full
//! builds can carry tens of thousands of packages.

use std::collections::HashMap;
use std::ops::Range;

use stoker_core::{BuildId, BuiltRow, Category, FailedRow, IgnoredRow, Ports, SkippedRow};
use stoker_parsers::{format_origin, log_path, OriginRef};

/// A display-ready log reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRef {
    /// Link text, e.g. `logfile` or the failure's error type.
    pub label: String,
    /// Path relative to the build's log root.
    pub path: String,
}

/// One display-ready result row. Shapes are fixed per category for the
/// lifetime of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedRow {
    Built {
        seq: usize,
        pkgname: String,
        origin: OriginRef,
        log: LogRef,
    },
    Failed {
        seq: usize,
        pkgname: String,
        origin: OriginRef,
        phase: String,
        skipped_cnt: u64,
        log: LogRef,
    },
    Skipped {
        pkgname: String,
        origin: OriginRef,
        depends: String,
    },
    Ignored {
        pkgname: String,
        origin: OriginRef,
        skipped_cnt: u64,
        reason: String,
    },
}

impl FormattedRow {
    pub fn category(&self) -> Category {
        match self {
            Self::Built { .. } => Category::Built,
            Self::Failed { .. } => Category::Failed,
            Self::Skipped { .. } => Category::Skipped,
            Self::Ignored { .. } => Category::Ignored,
        }
    }
}

/// Result of applying one category's row list: the newly appended
/// formatted rows, plus whether this is the category's first nonempty
/// batch (its container should become visible).
#[derive(Debug, Clone, Default)]
pub struct AppliedRows {
    pub rows: Vec<FormattedRow>,
    pub first_rows: bool,
}

/// Per-category cursors over already-materialized rows.
///
/// Cursors start at zero, advance monotonically, and reset only when a
/// new build identity is observed.
#[derive(Debug, Default)]
pub struct TableSync {
    cursors: HashMap<Category, usize>,
    build: Option<BuildId>,
}

impl TableSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note the build a snapshot belongs to. Returns true when the
    /// identity changed and all cursors were discarded.
    pub fn observe_build(&mut self, id: &BuildId) -> bool {
        match &self.build {
            Some(current) if current == id => false,
            Some(_) => {
                self.cursors.clear();
                self.build = Some(id.clone());
                true
            }
            None => {
                self.build = Some(id.clone());
                false
            }
        }
    }

    /// Rows already materialized for a category.
    pub fn cursor(&self, category: Category) -> usize {
        self.cursors.get(&category).copied().unwrap_or(0)
    }

    /// Apply all four category lists of a snapshot, in draw order.
    pub fn apply_ports(
        &mut self,
        ports: &Ports,
        skipped_by: &HashMap<String, u64>,
    ) -> Vec<(Category, AppliedRows)> {
        vec![
            (Category::Built, self.apply_built(&ports.built)),
            (Category::Failed, self.apply_failed(&ports.failed, skipped_by)),
            (Category::Ignored, self.apply_ignored(&ports.ignored, skipped_by)),
            (Category::Skipped, self.apply_skipped(&ports.skipped)),
        ]
    }

    pub fn apply_built(&mut self, rows: &[BuiltRow]) -> AppliedRows {
        let (range, first_rows) = self.advance(Category::Built, rows.len());
        let rows = range
            .map(|i| FormattedRow::Built {
                seq: i + 1,
                pkgname: rows[i].pkgname.clone(),
                origin: format_origin(&rows[i].origin),
                log: LogRef {
                    label: "logfile".to_string(),
                    path: log_path(&rows[i].pkgname, false),
                },
            })
            .collect();
        AppliedRows { rows, first_rows }
    }

    pub fn apply_failed(
        &mut self,
        rows: &[FailedRow],
        skipped_by: &HashMap<String, u64>,
    ) -> AppliedRows {
        let (range, first_rows) = self.advance(Category::Failed, rows.len());
        let rows = range
            .map(|i| FormattedRow::Failed {
                seq: i + 1,
                pkgname: rows[i].pkgname.clone(),
                origin: format_origin(&rows[i].origin),
                phase: rows[i].phase.clone(),
                skipped_cnt: skipped_count(skipped_by, &rows[i].pkgname),
                log: LogRef {
                    label: rows[i].errortype.clone(),
                    path: log_path(&rows[i].pkgname, true),
                },
            })
            .collect();
        AppliedRows { rows, first_rows }
    }

    pub fn apply_skipped(&mut self, rows: &[SkippedRow]) -> AppliedRows {
        let (range, first_rows) = self.advance(Category::Skipped, rows.len());
        let rows = range
            .map(|i| FormattedRow::Skipped {
                pkgname: rows[i].pkgname.clone(),
                origin: format_origin(&rows[i].origin),
                depends: rows[i].depends.clone(),
            })
            .collect();
        AppliedRows { rows, first_rows }
    }

    pub fn apply_ignored(
        &mut self,
        rows: &[IgnoredRow],
        skipped_by: &HashMap<String, u64>,
    ) -> AppliedRows {
        let (range, first_rows) = self.advance(Category::Ignored, rows.len());
        let rows = range
            .map(|i| FormattedRow::Ignored {
                pkgname: rows[i].pkgname.clone(),
                origin: format_origin(&rows[i].origin),
                skipped_cnt: skipped_count(skipped_by, &rows[i].pkgname),
                reason: rows[i].reason.clone(),
            })
            .collect();
        AppliedRows { rows, first_rows }
    }

    /// Advance a category's cursor to `len` and return the suffix range
    /// of rows not yet materialized. An empty list leaves the category
    /// untouched (and invisible if never seen).
    fn advance(&mut self, category: Category, len: usize) -> (Range<usize>, bool) {
        if len == 0 {
            return (0..0, false);
        }
        let previous = self.cursors.insert(category, len);
        // Clamp against a shrunken list; only happens on anomalous feeds
        let start = previous.unwrap_or(0).min(len);
        (start..len, previous.is_none())
    }
}

fn skipped_count(skipped_by: &HashMap<String, u64>, pkgname: &str) -> u64 {
    skipped_by.get(pkgname).copied().unwrap_or(0)
}
