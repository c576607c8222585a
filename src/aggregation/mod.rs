use std::collections::HashMap;
use std::fs::File;

use camino::Utf8Path;
use tracing::info;

pub mod error;
pub mod merge;
pub mod partition;
pub mod scan;

use crate::profile::Profiler;
pub use error::AggregationError;
pub use merge::AggregateReport;

pub type Result<T, E = AggregationError> = std::result::Result<T, E>;

/// One result per worker: a completed local mapping or the error that
/// terminated the chunk scan.
pub type PartialResult = Result<StationMap>;

pub type StationMap = HashMap<String, Stats>;

/// Field and record separators, passed explicitly instead of living in
/// process-wide constants.
#[derive(Debug, Clone, Copy)]
pub struct Delimiters {
    pub field: u8,
    pub record: u8,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: b';',
            record: b'\n',
        }
    }
}

/// Running statistics for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl Stats {
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    pub fn combine(&mut self, other: &Stats) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Runs the whole pipeline: partition the file, scan every range on its own
/// blocking task, join all workers and merge their results.
///
/// Workers share no mutable state; the only synchronization point is the
/// join barrier, which also guarantees every task is drained even when one
/// of them failed.
pub async fn run(
    path: &Utf8Path,
    workers: usize,
    delimiters: Delimiters,
    mut profiler: Option<&mut Profiler>,
) -> Result<AggregateReport> {
    let file = File::open(path)?;
    let ranges = partition::partition(&file, workers, delimiters.record)?;
    drop(file);
    if let Some(profiler) = profiler.as_deref_mut() {
        profiler.phase("partition");
    }

    let mut handles = Vec::with_capacity(ranges.len());
    for range in ranges {
        let path = path.to_owned();
        handles.push(tokio::task::spawn_blocking(move || {
            scan::scan_chunk(&path, range, delimiters)
        }));
    }
    let joined = futures::future::join_all(handles).await;
    if let Some(profiler) = profiler.as_deref_mut() {
        profiler.phase("scan");
    }

    let results: Vec<PartialResult> = joined
        .into_iter()
        .map(|joined| joined.unwrap_or_else(|join_err| Err(join_err.into())))
        .collect();
    let report = merge::merge(results)?;
    if let Some(profiler) = profiler {
        profiler.phase("merge");
    }

    info!(
        "Aggregated {} stations across {} workers",
        report.stations.len(),
        workers
    );
    Ok(report)
}
