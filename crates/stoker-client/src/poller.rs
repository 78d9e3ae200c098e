//! The snapshot poll/parse/dispatch loop.
//!
//! One cycle is ever in flight: the next poll is scheduled only after
//! the previous cycle's apply, redirect, or failure-retry step
//! completes. The loop stops only when the master worker reports the
//! terminal sentinel.

use std::time::Duration;

use stoker_core::{parse_worker_status, Category, Counters, Snapshot};
use stoker_parsers::{elapsed_seconds, format_origin, format_worker_time, PLACEHOLDER};
use stoker_state::{overall_rate, BarAllocator, RateEstimator, TableSync, BAR_BUDGET};

use crate::source::SnapshotSource;
use crate::surface::{Element, RenderSurface, Rgb, StatField, WorkerRow};
use crate::timer::PollTimer;

/// Segment colors for the progress bar, plus the background track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarColors {
    pub built: Rgb,
    pub failed: Rgb,
    pub ignored: Rgb,
    pub skipped: Rgb,
    pub track: Rgb,
}

impl Default for BarColors {
    fn default() -> Self {
        Self {
            built: Rgb(0x33, 0x99, 0x66),
            failed: Rgb(0xCC, 0x00, 0x33),
            ignored: Rgb(0xFF, 0xCC, 0x33),
            skipped: Rgb(0xCC, 0x66, 0x33),
            track: Rgb(0xD8, 0xD8, 0xD8),
        }
    }
}

/// Configuration for the poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Build page URL; a `/latest/` path component is treated as an
    /// alias and redirected once the concrete build name is known.
    pub url: String,
    /// Delay between successful polls.
    pub poll_interval: Duration,
    /// Delay before retrying a failed poll. Retries are unconditional
    /// and unlimited.
    pub retry_delay: Duration,
    /// Progress bar pixel budget.
    pub bar_budget: u64,
    /// Throughput ring buffer capacity.
    pub rate_capacity: usize,
    /// Samples required before a windowed rate is shown.
    pub rate_min_samples: usize,
    pub colors: BarColors,
}

impl PollerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            poll_interval: Duration::from_secs(8),
            retry_delay: Duration::from_secs(4),
            bar_budget: BAR_BUDGET,
            rate_capacity: stoker_state::RING_CAPACITY,
            rate_min_samples: stoker_state::MIN_SAMPLES,
            colors: BarColors::default(),
        }
    }
}

/// What one poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Snapshot merged into the surface.
    Applied,
    /// The `/latest/` alias was substituted; nothing else ran.
    Redirected,
    /// Transport failure; retry after the fixed delay.
    Retrying,
    /// Terminal build state; no further polls.
    Stopped,
}

/// Drives the dashboard from repeated snapshots.
pub struct Poller<S, R, T> {
    config: PollerConfig,
    source: S,
    surface: R,
    timer: T,
    page_url: String,
    rate: RateEstimator,
    bar: BarAllocator,
    sync: TableSync,
    first_apply: bool,
}

impl<S, R, T> Poller<S, R, T>
where
    S: SnapshotSource,
    R: RenderSurface,
    T: PollTimer,
{
    pub fn new(config: PollerConfig, source: S, surface: R, timer: T) -> Self {
        let mut page_url = config.url.clone();
        if !page_url.ends_with('/') {
            page_url.push('/');
        }
        let rate = RateEstimator::with_window(config.rate_capacity, config.rate_min_samples);
        let bar = BarAllocator::with_budget(config.bar_budget);
        Self {
            config,
            source,
            surface,
            timer,
            page_url,
            rate,
            bar,
            sync: TableSync::new(),
            first_apply: true,
        }
    }

    /// Poll until the terminal state is reached.
    pub async fn run(mut self) {
        loop {
            match self.cycle().await {
                CycleOutcome::Stopped => break,
                CycleOutcome::Retrying => self.timer.wait(self.config.retry_delay).await,
                CycleOutcome::Applied | CycleOutcome::Redirected => {
                    self.timer.wait(self.config.poll_interval).await
                }
            }
        }
    }

    /// URL of the snapshot document for the current page.
    fn data_url(&self) -> String {
        format!("{}.data.json", self.page_url)
    }

    fn is_latest_alias(&self) -> bool {
        self.page_url.contains("/latest/")
    }

    /// One poll cycle: fetch, then redirect or apply.
    async fn cycle(&mut self) -> CycleOutcome {
        let snapshot = match self.source.fetch(&self.data_url()).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Snapshot poll failed, retrying: {}", e);
                return CycleOutcome::Retrying;
            }
        };

        if self.is_latest_alias() && !snapshot.buildname.is_empty() {
            return self.redirect(&snapshot);
        }

        self.apply(&snapshot)
    }

    /// Substitute the `/latest/` alias with the concrete build name.
    /// Happens at most once: the rewritten URL no longer matches the
    /// alias, and later polls fetch the concrete build.
    fn redirect(&mut self, snapshot: &Snapshot) -> CycleOutcome {
        let target = self
            .page_url
            .replace("/latest/", &format!("/{}/", snapshot.buildname));
        tracing::info!("Redirecting latest alias to {}", target);
        self.page_url = target.clone();
        self.surface.navigate_to(&target);
        CycleOutcome::Redirected
    }

    /// Merge one snapshot into the surface.
    fn apply(&mut self, snapshot: &Snapshot) -> CycleOutcome {
        if self.sync.observe_build(&snapshot.build_id()) {
            tracing::info!(
                "New build {} {}, discarding cursors",
                snapshot.mastername,
                snapshot.buildname
            );
            self.rate.reset();
            // Rows already rendered belong to the previous build; the
            // fresh cursors would re-append from sequence 1 on top of
            // them otherwise.
            for category in Category::ALL {
                self.surface.clear_category(category);
            }
        }

        self.surface.set_title(&format!(
            "Bulk build results for {} {}",
            snapshot.mastername, snapshot.buildname
        ));
        self.surface
            .set_text(StatField::MasterName, &snapshot.mastername);
        self.surface
            .set_text(StatField::BuildName, &snapshot.buildname);
        match &snapshot.svn_url {
            Some(url) => {
                self.surface.set_text(StatField::SvnUrl, url);
                self.surface.show(Element::SvnUrl);
            }
            None => self.surface.hide(Element::SvnUrl),
        }

        let master_stopping = self.apply_workers(snapshot);

        if let Some(stats) = &snapshot.stats {
            self.apply_stats(stats);
        }

        if let Some(ports) = &snapshot.ports {
            for (category, batch) in self.sync.apply_ports(ports, &snapshot.skipped) {
                if batch.first_rows {
                    self.surface.show(Element::CategoryTable(category));
                }
                if !batch.rows.is_empty() {
                    self.surface.append_rows(category, &batch.rows);
                }
            }
        }

        if self.first_apply {
            self.surface.hide(Element::LoadingOverlay);
            self.first_apply = false;
        } else {
            self.surface.reveal_new_rows();
        }

        if master_stopping {
            tracing::info!("Master reported {}, polling stopped", stoker_core::STOPPING_SENTINEL);
            return CycleOutcome::Stopped;
        }

        tracing::debug!("Applied snapshot for {}", snapshot.buildname);
        CycleOutcome::Applied
    }

    /// Update the worker table and master status line. Returns whether
    /// the master reported the terminal sentinel.
    fn apply_workers(&mut self, snapshot: &Snapshot) -> bool {
        let mut stopping = false;
        let mut workers = Vec::new();

        for entry in &snapshot.status {
            let status = parse_worker_status(&entry.id, &entry.status);
            if status.is_master() {
                stopping = status.is_stopping();
                self.surface
                    .set_text(StatField::MasterStatus, &status.activity);
            } else {
                // An idle worker carries no origin token; its cell
                // renders blank rather than a placeholder pair
                let origin = (!status.origin.is_empty()).then(|| format_origin(&status.origin));
                workers.push(WorkerRow {
                    time: format_worker_time(status.time.as_deref()),
                    origin,
                    id: status.id,
                    activity: status.activity,
                });
            }
        }

        self.surface.set_workers(workers);
        stopping
    }

    fn apply_stats(&mut self, stats: &Counters) {
        for (field, count) in [
            (StatField::Queued, stats.queued),
            (StatField::Built, stats.built),
            (StatField::Failed, stats.failed),
            (StatField::Skipped, stats.skipped),
            (StatField::Ignored, stats.ignored),
        ] {
            self.surface.set_text(field, &count.to_string());
        }

        let remaining = stats.remaining();
        if remaining < 0 {
            tracing::warn!("Counters exceed queued by {}, inconsistent snapshot", -remaining);
        }
        self.surface
            .set_text(StatField::Remaining, &remaining.to_string());

        let elapsed = elapsed_seconds(&stats.elapsed);
        let attempted = stats.attempted();

        let pkghour = elapsed.and_then(|secs| overall_rate(attempted, secs));
        self.surface
            .set_text(StatField::PkgHour, &display_rate(pkghour));

        // Malformed elapsed strings contribute no sample
        let impulse = elapsed.and_then(|secs| self.rate.record(attempted, secs));
        self.surface
            .set_text(StatField::Impulse, &display_rate(impulse));

        self.draw_bar(stats);
    }

    /// Redraw the progress bar: background track first, then the four
    /// category segments left to right. Rounding slack accumulates
    /// rightward into the capped largest segment.
    fn draw_bar(&mut self, stats: &Counters) {
        let segments = self.bar.allocate(
            stats.built,
            stats.failed,
            stats.ignored,
            stats.skipped,
            stats.queued,
        );

        let colors = self.config.colors;
        self.surface.begin_bar();
        self.surface
            .draw_bar_segment(0, self.bar.budget(), colors.track);
        let palette = [colors.built, colors.failed, colors.ignored, colors.skipped];
        for ((x, width), color) in segments.offsets().into_iter().zip(palette) {
            if width > 0 {
                self.surface.draw_bar_segment(x, width, color);
            }
        }
    }
}

fn display_rate(rate: Option<u64>) -> String {
    match rate {
        Some(rate) => rate.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use stoker_core::Category;
    use stoker_state::FormattedRow;

    /// Source that replays a scripted sequence of responses and records
    /// every URL fetched.
    struct ScriptSource {
        responses: Mutex<VecDeque<Result<Snapshot, SourceError>>>,
        fetched: Mutex<Vec<String>>,
    }

    impl ScriptSource {
        fn new(responses: Vec<Result<Snapshot, SourceError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    impl SnapshotSource for &ScriptSource {
        async fn fetch(&self, url: &str) -> Result<Snapshot, SourceError> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SourceError::Unavailable("script exhausted".to_string())))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Text(StatField, String),
        Title(String),
        Show(Element),
        Hide(Element),
        Rows(Category, usize),
        Cleared(Category),
        Workers(Vec<WorkerRow>),
        BarStart,
        Bar(u64, u64, Rgb),
        Reveal,
        Navigate(String),
    }

    #[derive(Default)]
    struct RecordingSurface {
        events: Vec<Event>,
    }

    impl RecordingSurface {
        fn texts(&self, field: StatField) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Text(f, v) if *f == field => Some(v.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn last_text(&self, field: StatField) -> Option<&str> {
            self.texts(field).last().copied()
        }
    }

    impl RenderSurface for &mut RecordingSurface {
        fn set_text(&mut self, field: StatField, value: &str) {
            self.events.push(Event::Text(field, value.to_string()));
        }
        fn set_title(&mut self, title: &str) {
            self.events.push(Event::Title(title.to_string()));
        }
        fn show(&mut self, element: Element) {
            self.events.push(Event::Show(element));
        }
        fn hide(&mut self, element: Element) {
            self.events.push(Event::Hide(element));
        }
        fn append_rows(&mut self, category: Category, rows: &[FormattedRow]) {
            self.events.push(Event::Rows(category, rows.len()));
        }
        fn clear_category(&mut self, category: Category) {
            self.events.push(Event::Cleared(category));
        }
        fn set_workers(&mut self, rows: Vec<WorkerRow>) {
            self.events.push(Event::Workers(rows));
        }
        fn begin_bar(&mut self) {
            self.events.push(Event::BarStart);
        }
        fn draw_bar_segment(&mut self, x: u64, width: u64, color: Rgb) {
            self.events.push(Event::Bar(x, width, color));
        }
        fn reveal_new_rows(&mut self) {
            self.events.push(Event::Reveal);
        }
        fn navigate_to(&mut self, url: &str) {
            self.events.push(Event::Navigate(url.to_string()));
        }
    }

    /// Timer that records requested delays and returns immediately.
    #[derive(Default)]
    struct VirtualTimer {
        waits: Mutex<Vec<Duration>>,
    }

    impl PollTimer for &VirtualTimer {
        async fn wait(&self, delay: Duration) {
            self.waits.lock().unwrap().push(delay);
        }
    }

    fn snapshot(json: &str) -> Snapshot {
        Snapshot::from_json(json).unwrap()
    }

    fn running_snapshot() -> Snapshot {
        snapshot(
            r#"{
                "mastername": "130amd64-default",
                "buildname": "2026-08-25_10h00m00s",
                "svn_url": "svn://svn.example.org/ports@12345",
                "status": [
                    {"id": "main", "status": "parallel_build:"},
                    {"id": "01", "status": "build:editors/vim:00_12_34"},
                    {"id": "02", "status": "idle:"}
                ],
                "stats": {"queued": 100, "built": 40, "failed": 10,
                          "skipped": 5, "ignored": 0, "elapsed": "01:30:00"},
                "ports": {
                    "built": [{"pkgname": "vim-9.0", "origin": "editors/vim"}],
                    "failed": [{"pkgname": "gcc-13", "origin": "lang/gcc13",
                                "phase": "build", "errortype": "compiler_error"}]
                },
                "skipped": {"gcc-13": 5}
            }"#,
        )
    }

    fn stopping_snapshot() -> Snapshot {
        snapshot(
            r#"{
                "mastername": "130amd64-default",
                "buildname": "2026-08-25_10h00m00s",
                "status": [{"id": "main", "status": "stopping_jobs:"}]
            }"#,
        )
    }

    fn config(url: &str) -> PollerConfig {
        PollerConfig::new(url)
    }

    #[tokio::test]
    async fn test_apply_updates_fields_and_bar() {
        let source = ScriptSource::new(vec![Ok(running_snapshot()), Ok(stopping_snapshot())]);
        let mut surface = RecordingSurface::default();
        let timer = VirtualTimer::default();

        Poller::new(
            config("http://example.org/build/130amd64-default/2026-08-25_10h00m00s"),
            &source,
            &mut surface,
            &timer,
        )
        .run()
        .await;

        assert_eq!(
            source.fetched()[0],
            "http://example.org/build/130amd64-default/2026-08-25_10h00m00s/.data.json"
        );

        assert_eq!(surface.texts(StatField::Queued)[0], "100");
        assert_eq!(surface.texts(StatField::Remaining)[0], "45");
        // Whole-run average: ceil(50 / 1.5) = 34
        assert_eq!(surface.texts(StatField::PkgHour)[0], "34");
        // One sample is far below the minimum for the windowed rate
        assert_eq!(surface.texts(StatField::Impulse)[0], PLACEHOLDER);
        assert_eq!(surface.last_text(StatField::MasterStatus), Some("stopping_jobs"));

        // Workers exclude the master entry; the idle worker's origin
        // stays blank instead of a placeholder pair
        let workers = surface
            .events
            .iter()
            .find_map(|e| match e {
                Event::Workers(rows) if !rows.is_empty() => Some(rows.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(workers.len(), 2);
        assert_eq!(workers[0].id, "01");
        assert_eq!(workers[0].origin.as_ref().unwrap().full(), "editors/vim");
        assert_eq!(workers[0].time, "00:12:34");
        assert_eq!(workers[1].id, "02");
        assert!(workers[1].origin.is_none());

        // Track segment first, then built and failed at cumulative offsets
        let colors = BarColors::default();
        let bars: Vec<_> = surface
            .events
            .iter()
            .filter(|e| matches!(e, Event::Bar(..)))
            .collect();
        assert_eq!(bars[0], &Event::Bar(0, BAR_BUDGET, colors.track));
        assert_eq!(bars[1], &Event::Bar(0, 200, colors.built));
        assert_eq!(bars[2], &Event::Bar(200, 50, colors.failed));
        // Ignored is zero-width and skipped draws right after failed
        assert_eq!(bars[3], &Event::Bar(250, 25, colors.skipped));
        assert_eq!(bars.len(), 4);

        // Categories with rows became visible and got their batches
        assert!(surface
            .events
            .contains(&Event::Show(Element::CategoryTable(Category::Built))));
        assert!(surface.events.contains(&Event::Rows(Category::Built, 1)));
        assert!(surface.events.contains(&Event::Rows(Category::Failed, 1)));
        assert!(!surface
            .events
            .contains(&Event::Show(Element::CategoryTable(Category::Skipped))));

        // First apply dismissed the overlay instead of revealing rows
        let overlay = surface
            .events
            .iter()
            .position(|e| *e == Event::Hide(Element::LoadingOverlay))
            .unwrap();
        let reveal = surface.events.iter().position(|e| *e == Event::Reveal);
        assert!(reveal.is_none() || reveal.unwrap() > overlay);
    }

    #[tokio::test]
    async fn test_stopping_sentinel_halts_scheduling() {
        let source = ScriptSource::new(vec![Ok(stopping_snapshot())]);
        let mut surface = RecordingSurface::default();
        let timer = VirtualTimer::default();

        Poller::new(config("http://example.org/b/m/1"), &source, &mut surface, &timer)
            .run()
            .await;

        assert_eq!(source.fetched().len(), 1);
        assert!(timer.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_retries_after_fixed_delay() {
        let source = ScriptSource::new(vec![
            Err(SourceError::Unavailable("not there yet".to_string())),
            Err(SourceError::Unavailable("still not there".to_string())),
            Ok(stopping_snapshot()),
        ]);
        let mut surface = RecordingSurface::default();
        let timer = VirtualTimer::default();
        let cfg = config("http://example.org/b/m/1");
        let retry = cfg.retry_delay;

        Poller::new(cfg, &source, &mut surface, &timer).run().await;

        assert_eq!(source.fetched().len(), 3);
        assert_eq!(*timer.waits.lock().unwrap(), vec![retry, retry]);
    }

    #[tokio::test]
    async fn test_latest_alias_redirects_exactly_once() {
        let source = ScriptSource::new(vec![Ok(running_snapshot()), Ok(stopping_snapshot())]);
        let mut surface = RecordingSurface::default();
        let timer = VirtualTimer::default();

        Poller::new(
            config("http://example.org/build/130amd64-default/latest/"),
            &source,
            &mut surface,
            &timer,
        )
        .run()
        .await;

        let expected = "http://example.org/build/130amd64-default/2026-08-25_10h00m00s/";
        let navigations: Vec<_> = surface
            .events
            .iter()
            .filter(|e| matches!(e, Event::Navigate(_)))
            .collect();
        assert_eq!(navigations, vec![&Event::Navigate(expected.to_string())]);

        // No Applying step ran in the redirect cycle
        let navigate_pos = surface
            .events
            .iter()
            .position(|e| matches!(e, Event::Navigate(_)))
            .unwrap();
        assert!(surface.events[..navigate_pos]
            .iter()
            .all(|e| matches!(e, Event::Navigate(_))));

        // The next poll fetched the concrete build
        assert_eq!(source.fetched()[1], format!("{}.data.json", expected));
    }

    #[tokio::test]
    async fn test_second_apply_appends_suffix_and_reveals() {
        let mut second = running_snapshot();
        let ports = second.ports.as_mut().unwrap();
        ports.built.push(stoker_core::BuiltRow {
            pkgname: "zsh-5.9".to_string(),
            origin: "shells/zsh".to_string(),
        });

        let mut terminal = second.clone();
        terminal.status = stopping_snapshot().status;

        let source = ScriptSource::new(vec![
            Ok(running_snapshot()),
            Ok(second),
            Ok(terminal),
        ]);
        let mut surface = RecordingSurface::default();
        let timer = VirtualTimer::default();

        Poller::new(config("http://example.org/b/m/1"), &source, &mut surface, &timer)
            .run()
            .await;

        let built_batches: Vec<_> = surface
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Rows(Category::Built, n) => Some(*n),
                _ => None,
            })
            .collect();
        // Full list once, then only the appended row, then nothing
        assert_eq!(built_batches, vec![1, 1]);

        assert_eq!(
            surface.events.iter().filter(|e| **e == Event::Reveal).count(),
            2
        );
        assert_eq!(
            surface
                .events
                .iter()
                .filter(|e| **e == Event::Hide(Element::LoadingOverlay))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_svn_url_hides_element() {
        let source = ScriptSource::new(vec![Ok(stopping_snapshot())]);
        let mut surface = RecordingSurface::default();
        let timer = VirtualTimer::default();

        Poller::new(config("http://example.org/b/m/1"), &source, &mut surface, &timer)
            .run()
            .await;

        assert!(surface.events.contains(&Event::Hide(Element::SvnUrl)));
        assert!(!surface.events.contains(&Event::Show(Element::SvnUrl)));
    }

    #[tokio::test]
    async fn test_new_build_resets_cursors_and_estimator() {
        let mut next_build = running_snapshot();
        next_build.buildname = "2026-08-26_09h00m00s".to_string();
        let mut terminal = next_build.clone();
        terminal.status = stopping_snapshot().status;

        let source = ScriptSource::new(vec![
            Ok(running_snapshot()),
            Ok(next_build),
            Ok(terminal),
        ]);
        let mut surface = RecordingSurface::default();
        let timer = VirtualTimer::default();

        Poller::new(config("http://example.org/b/m/x"), &source, &mut surface, &timer)
            .run()
            .await;

        // The built table was re-populated from scratch for the new build
        let built_batches: Vec<_> = surface
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Rows(Category::Built, n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(built_batches, vec![1, 1]);
        assert_eq!(
            surface
                .events
                .iter()
                .filter(|e| **e == Event::Show(Element::CategoryTable(Category::Built)))
                .count(),
            2
        );

        // All four tables were cleared exactly once, after the first
        // build's rows went out and before the new build's arrived
        let clears: Vec<usize> = surface
            .events
            .iter()
            .enumerate()
            .filter_map(|(i, e)| matches!(e, Event::Cleared(_)).then_some(i))
            .collect();
        assert_eq!(clears.len(), 4);
        let rows: Vec<usize> = surface
            .events
            .iter()
            .enumerate()
            .filter_map(|(i, e)| matches!(e, Event::Rows(Category::Built, _)).then_some(i))
            .collect();
        assert!(rows[0] < clears[0]);
        assert!(clears[3] < rows[1]);
    }
}
