use crate::error::Result;
use taskfarm_core::KindRegistry;
use taskfarm_protocol::{AssignFrame, Completion, Tag};
use taskfarm_transport::{Source, Transport};
use tracing::{debug, info};

/// Worker role loop: receive an assignment from the coordinator, execute
/// it to completion, reply, repeat until the stop sentinel arrives.
///
/// Strictly one work item at a time; the reply is sent before the next
/// receive, which is what lets the coordinator match completions by
/// sender rank alone. An assignment whose kind has no registered
/// constructor is fatal to this worker, not skipped.
///
/// Returns the number of work items processed.
pub async fn run_worker<T: Transport>(transport: &T, registry: &KindRegistry) -> Result<usize> {
    let rank = transport.rank();
    let mut processed = 0;

    loop {
        let (_, bytes) = transport.recv(Source::Rank(0), Tag::Assign).await?;
        match AssignFrame::decode(&bytes)? {
            AssignFrame::Stop => {
                debug!(rank, processed, "stop sentinel received, exiting");
                break;
            }
            AssignFrame::Work(assignment) => {
                let index = assignment.task_index;
                let name = assignment.spec.name.clone();
                info!(rank, index, task = %name, "executing task");

                let unit = registry.build(&assignment.spec)?;
                // execute() blocks; keep it off the async threads. The
                // await keeps this worker strictly sequential.
                let summary = tokio::task::spawn_blocking(move || unit.execute()).await?;

                let done = Completion { summary };
                transport.send(0, Tag::Done, done.encode()?).await?;
                processed += 1;
            }
        }
    }

    Ok(processed)
}
