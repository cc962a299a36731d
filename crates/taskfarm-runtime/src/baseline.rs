use crate::error::Result;
use std::time::{Duration, Instant};
use taskfarm_core::{KindRegistry, TaskSpec};
use tracing::info;

/// Outcome of the single-threaded reference run.
#[derive(Debug)]
pub struct BaselineReport {
    pub elapsed: Duration,
    pub summaries: Vec<String>,
}

/// Execute the priority-ordered list sequentially on the coordinator,
/// for comparison against the parallel phase. Operates on its own copy
/// of the specs so the parallel phase sees pristine input.
pub fn run_sequential(tasks: &[TaskSpec], registry: &KindRegistry) -> Result<BaselineReport> {
    let tasks = tasks.to_vec();
    let start = Instant::now();
    let mut summaries = Vec::with_capacity(tasks.len());

    for spec in &tasks {
        info!(task = %spec.name, priority = %spec.priority, "processing sequentially");
        let unit = registry.build(spec)?;
        let summary = unit.execute();
        info!(task = %spec.name, summary = %summary, "completed");
        summaries.push(summary);
    }

    let elapsed = start.elapsed();
    info!(count = summaries.len(), ?elapsed, "sequential phase finished");

    Ok(BaselineReport { elapsed, summaries })
}
