use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which phases to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Baseline only, no workers.
    Sequential,
    /// Parallel distribution only, no baseline.
    Parallel,
    /// Baseline, then parallel, then the timing comparison.
    Both,
}

impl Mode {
    pub fn includes_sequential(&self) -> bool {
        matches!(self, Mode::Sequential | Mode::Both)
    }

    pub fn includes_parallel(&self) -> bool {
        matches!(self, Mode::Parallel | Mode::Both)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub mode: Mode,

    /// Worker role count; the coordinator is always one more on top.
    pub workers: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            mode: Mode::Both,
            workers: 3,
        }
    }
}

impl RunnerConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RunnerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Total role count for the parallel phase.
    pub fn world_size(&self) -> usize {
        self.workers + 1
    }
}
