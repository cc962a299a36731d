pub mod baseline;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runner;
pub mod scheduler;
pub mod worker;
pub mod workloads;

pub use baseline::{run_sequential, BaselineReport};
pub use config::{Mode, RunnerConfig};
pub use error::RunError;
pub use metrics::Comparison;
pub use runner::{run, RunReport};
pub use scheduler::{Coordinator, DispatchReport};
pub use worker::run_worker;
