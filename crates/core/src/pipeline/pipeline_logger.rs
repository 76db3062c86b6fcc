use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for blur run events: region progress, stage timings, metrics.
pub trait PipelineLogger: Send {
    /// Called after each detected box has been handled.
    fn progress(&mut self, current: usize, total: usize);

    /// Duration of one execution of a named stage (`read`, `detect`, `blur`...).
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A sampled value such as the box count or a region's pixel area.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// End-of-run report. Default: no-op.
    fn summary(&self) {}
}

/// Ignores everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and range of a sampled quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    fn first(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Logger used by the CLI.
///
/// Messages and throttled progress go straight to the `log` facade; timings
/// and metrics are folded into [`Stats`] and reported once by `summary`.
pub struct StdoutPipelineLogger {
    progress_every: usize,
    stages: BTreeMap<String, Stats>,
    metrics: BTreeMap<String, Stats>,
    started: Instant,
    regions: usize,
}

impl StdoutPipelineLogger {
    /// Logs progress every `progress_every` regions (and on the last one).
    pub fn new(progress_every: usize) -> Self {
        Self {
            progress_every: progress_every.max(1),
            stages: BTreeMap::new(),
            metrics: BTreeMap::new(),
            started: Instant::now(),
            regions: 0,
        }
    }

    pub fn stage(&self, name: &str) -> Option<Stats> {
        self.stages.get(name).copied()
    }

    pub fn metric_stats(&self, name: &str) -> Option<Stats> {
        self.metrics.get(name).copied()
    }

    /// Summary text, or `None` before anything was timed or measured.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut out = format!(
            "Blur summary ({} regions, {elapsed:.2}s total):",
            self.regions
        );
        for (name, s) in &self.stages {
            out.push_str(&format!(
                "\n  {name:8} x{:<4} avg {:8.2}ms  max {:8.2}ms  total {:9.1}ms",
                s.count,
                s.mean(),
                s.max,
                s.sum
            ));
        }
        for (name, s) in &self.metrics {
            out.push_str(&format!(
                "\n  {name}: avg {:.1}  min {}  max {}  total {}",
                s.mean(),
                s.min,
                s.max,
                s.sum
            ));
        }
        Some(out)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.regions = total;
        if total == 0 {
            return;
        }
        if current == total || current % self.progress_every == 0 {
            log::info!("Blurring: {current}/{total} regions");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        record(&mut self.stages, stage, duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        record(&mut self.metrics, name, value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}

fn record(map: &mut BTreeMap<String, Stats>, key: &str, value: f64) {
    match map.get_mut(key) {
        Some(stats) => stats.add(value),
        None => {
            map.insert(key.to_string(), Stats::first(value));
        }
    }
}
