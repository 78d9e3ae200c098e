//! Proportional allocation of the progress bar's visual budget.

/// Fixed bar width in pixels.
pub const BAR_BUDGET: u64 = 500;

/// Rendered widths for the four result segments, drawn left to right
/// as built, failed, ignored, skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarSegments {
    pub built: u64,
    pub failed: u64,
    pub ignored: u64,
    pub skipped: u64,
}

impl BarSegments {
    pub fn total(&self) -> u64 {
        self.built + self.failed + self.ignored + self.skipped
    }

    /// Segment (x, width) pairs in draw order, with cumulative offsets.
    /// Zero-width segments are included so callers can zip with colors.
    pub fn offsets(&self) -> [(u64, u64); 4] {
        let widths = [self.built, self.failed, self.ignored, self.skipped];
        let mut x = 0;
        let mut out = [(0, 0); 4];
        for (slot, width) in out.iter_mut().zip(widths) {
            *slot = (x, width);
            x += width;
        }
        out
    }
}

/// Converts raw category counts into segment widths within the budget.
///
/// Any nonzero count renders at least one pixel; the largest category
/// absorbs all rounding slack so the other three always render at
/// their true proportional width.
#[derive(Debug, Clone, Copy)]
pub struct BarAllocator {
    budget: u64,
}

impl Default for BarAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl BarAllocator {
    pub fn new() -> Self {
        Self::with_budget(BAR_BUDGET)
    }

    pub fn with_budget(budget: u64) -> Self {
        Self {
            budget: budget.max(1),
        }
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Allocate segment widths for the four counts against `queued`.
    /// A zero queue short-circuits to all-zero widths.
    pub fn allocate(&self, built: u64, failed: u64, ignored: u64, skipped: u64, queued: u64) -> BarSegments {
        if queued == 0 {
            return BarSegments::default();
        }

        let raw = [
            self.width(built, queued),
            self.width(failed, queued),
            self.width(ignored, queued),
            self.width(skipped, queued),
        ];

        let mut sorted = raw;
        sorted.sort_unstable();
        let three_smallest: u64 = sorted[..3].iter().sum();

        if three_smallest >= self.budget {
            // Minimum-width clamping piled up past the budget; fall back
            // to uniform rescaling of all four segments.
            let total: u64 = raw.iter().sum();
            return BarSegments {
                built: raw[0] * self.budget / total,
                failed: raw[1] * self.budget / total,
                ignored: raw[2] * self.budget / total,
                skipped: raw[3] * self.budget / total,
            };
        }

        // The largest segment is capped so the naive sum cannot exceed
        // the budget; re-clamping every segment preserves which one was
        // largest.
        let cap = self.budget - three_smallest;
        BarSegments {
            built: raw[0].min(cap),
            failed: raw[1].min(cap),
            ignored: raw[2].min(cap),
            skipped: raw[3].min(cap),
        }
    }

    /// Width of one count: zero stays invisible, anything else gets at
    /// least one pixel.
    fn width(&self, count: u64, queued: u64) -> u64 {
        if count == 0 {
            return 0;
        }
        let width = count as f64 * self.budget as f64 / queued as f64;
        if width < 1.0 {
            1
        } else {
            width.round() as u64
        }
    }
}
