use crate::baseline::{run_sequential, BaselineReport};
use crate::config::RunnerConfig;
use crate::error::{Result, RunError};
use crate::metrics::Comparison;
use crate::scheduler::{Coordinator, DispatchReport};
use crate::worker::run_worker;
use std::sync::Arc;
use taskfarm_core::{order_by_priority, KindRegistry, TaskSpec};
use taskfarm_transport::{ChannelMesh, Transport};
use tracing::info;

/// Everything one invocation produced.
#[derive(Debug)]
pub struct RunReport {
    pub baseline: Option<BaselineReport>,
    pub dispatch: Option<DispatchReport>,
    pub comparison: Option<Comparison>,
}

/// Order the task list, run the selected phases, and join every role.
///
/// The parallel phase spawns one isolated tokio task per worker rank over
/// a fresh channel mesh; the calling task acts as rank 0. All roles cross
/// a barrier between the baseline and the distribution phase.
pub async fn run(
    config: &RunnerConfig,
    registry: Arc<KindRegistry>,
    tasks: &[TaskSpec],
) -> Result<RunReport> {
    let ordered = order_by_priority(tasks);
    info!(tasks = ordered.len(), mode = ?config.mode, "starting run");

    if !config.mode.includes_parallel() {
        let baseline = run_sequential(&ordered, &registry)?;
        return Ok(RunReport {
            baseline: Some(baseline),
            dispatch: None,
            comparison: None,
        });
    }

    let world_size = config.world_size();
    if world_size < 2 {
        return Err(RunError::DegenerateTopology(world_size));
    }

    let mut mesh = ChannelMesh::create(world_size);
    let coordinator_transport = mesh.remove(0);

    let mut handles = Vec::with_capacity(mesh.len());
    for endpoint in mesh {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            endpoint.barrier().await?;
            run_worker(&endpoint, &registry).await
        }));
    }

    let baseline = if config.mode.includes_sequential() {
        Some(run_sequential(&ordered, &registry)?)
    } else {
        None
    };

    // All roles enter the parallel phase together.
    coordinator_transport.barrier().await?;

    let coordinator = Coordinator::new(&coordinator_transport, &ordered);
    let dispatch = coordinator.dispatch().await?;

    for handle in handles {
        handle.await??;
    }

    let comparison = match &baseline {
        Some(baseline) if !ordered.is_empty() => Some(Comparison {
            sequential: baseline.elapsed,
            parallel: dispatch.elapsed,
            world_size,
        }),
        _ => None,
    };

    Ok(RunReport {
        baseline,
        dispatch: Some(dispatch),
        comparison,
    })
}
