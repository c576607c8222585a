use std::time::Instant;

use anyhow::Context;
use camino::Utf8Path;
use serde::Serialize;

/// Wall-clock phase timings of one run, written as JSON when requested on
/// the command line. Purely observational; the aggregate is identical with
/// or without it.
#[derive(Debug, Serialize)]
pub struct RunProfile {
    pub worker_count: usize,
    pub phases: Vec<Phase>,
    pub total_us: u128,
}

#[derive(Debug, Serialize)]
pub struct Phase {
    pub name: String,
    pub duration_us: u128,
}

pub struct Profiler {
    started: Instant,
    last_mark: Instant,
    phases: Vec<Phase>,
}

impl Profiler {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_mark: now,
            phases: Vec::new(),
        }
    }

    /// Closes the current phase under the given name.
    pub fn phase(&mut self, name: &str) {
        let now = Instant::now();
        self.phases.push(Phase {
            name: name.to_owned(),
            duration_us: now.duration_since(self.last_mark).as_micros(),
        });
        self.last_mark = now;
    }

    pub fn finish(self, worker_count: usize) -> RunProfile {
        RunProfile {
            worker_count,
            phases: self.phases,
            total_us: self.started.elapsed().as_micros(),
        }
    }

}

pub fn write_profile(path: &Utf8Path, profile: &RunProfile) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Couldn't create profile file {}", path))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), profile)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Profiler;

    #[test]
    fn test_phases_are_recorded_in_order() {
        let mut profiler = Profiler::start();
        profiler.phase("partition");
        profiler.phase("scan");
        profiler.phase("merge");
        let profile = profiler.finish(4);
        let names: Vec<_> = profile.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["partition", "scan", "merge"]);
        assert_eq!(profile.worker_count, 4);
        assert!(profile.total_us >= profile.phases.iter().map(|p| p.duration_us).sum::<u128>());
    }
}
