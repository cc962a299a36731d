use clap::Parser;
use std::sync::Arc;
use taskfarm_runtime::workloads::{default_registry, demo_tasks};
use taskfarm_runtime::{run, Mode, RunnerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "taskfarm")]
#[command(about = "Demand-driven master/worker priority dispatcher", long_about = None)]
struct Args {
    /// Which phases to run
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Number of worker roles (the coordinator is one more on top)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        RunnerConfig::from_file(config_path)?
    } else {
        RunnerConfig::default()
    };

    // Override with CLI args
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    tracing::info!(?config, "starting taskfarm");

    let registry = Arc::new(default_registry());
    let tasks = demo_tasks();

    let report = run(&config, registry, &tasks).await?;

    if let Some(baseline) = &report.baseline {
        tracing::info!(
            elapsed = ?baseline.elapsed,
            tasks = baseline.summaries.len(),
            "sequential phase"
        );
    }
    if let Some(dispatch) = &report.dispatch {
        tracing::info!(
            elapsed = ?dispatch.elapsed,
            completed = dispatch.completed,
            workers = config.workers,
            "parallel phase"
        );
    }
    if let Some(comparison) = &report.comparison {
        match (comparison.speedup(), comparison.efficiency()) {
            (Some(speedup), Some(efficiency)) => {
                tracing::info!(
                    speedup = %format!("{speedup:.2}x"),
                    efficiency = %format!("{efficiency:.1}%"),
                    roles = comparison.world_size,
                    "performance comparison"
                );
            }
            _ => tracing::info!("performance comparison: undefined"),
        }
    }

    Ok(())
}
