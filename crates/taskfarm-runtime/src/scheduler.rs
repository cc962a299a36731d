use crate::error::{Result, RunError};
use std::time::{Duration, Instant};
use taskfarm_core::TaskSpec;
use taskfarm_protocol::{AssignFrame, Assignment, Completion, Tag};
use taskfarm_transport::{Rank, Source, Transport};
use tracing::{debug, info};

/// Outcome of one parallel distribution phase.
#[derive(Debug)]
pub struct DispatchReport {
    /// Wall time of the whole distribution phase.
    pub elapsed: Duration,

    /// Completions received; equals the task count on a correct run.
    pub completed: usize,

    /// Every assignment in send order, as `(worker rank, task index)`.
    pub assignments: Vec<(Rank, usize)>,

    /// Completion summaries in arrival order, with the reporting worker.
    pub completions: Vec<(Rank, String)>,
}

/// Coordinator side of the demand-driven dispatch protocol.
///
/// The task list must already be priority-sorted; the coordinator treats
/// it as an indexed queue and hands out the next unassigned index to
/// whichever worker reports a completion first. Completions carry no
/// correlation id: a reply is matched to its work item purely by sender
/// rank, which is sound because the scheduler never has more than one
/// assignment outstanding per worker.
pub struct Coordinator<'a, T: Transport> {
    transport: &'a T,
    tasks: &'a [TaskSpec],
}

impl<'a, T: Transport> Coordinator<'a, T> {
    pub fn new(transport: &'a T, tasks: &'a [TaskSpec]) -> Self {
        Coordinator { transport, tasks }
    }

    /// Run the distribution phase to completion: initial wave, the
    /// receive-reassign loop, and the stop handshake for every worker.
    pub async fn dispatch(&self) -> Result<DispatchReport> {
        let world_size = self.transport.world_size();
        if world_size < 2 {
            return Err(RunError::DegenerateTopology(world_size));
        }

        let total = self.tasks.len();
        let worker_count = world_size - 1;
        info!(total, worker_count, "distributing tasks");

        let start = Instant::now();
        let mut assignments = Vec::with_capacity(total);
        let mut completions = Vec::with_capacity(total);
        let mut in_flight = vec![false; world_size];
        let mut stopped = vec![false; world_size];

        // Initial wave: one task per worker, in sorted order.
        let initial = worker_count.min(total);
        for worker in 1..=initial {
            let index = worker - 1;
            self.assign(worker, index).await?;
            in_flight[worker] = true;
            assignments.push((worker, index));
        }
        let mut next_index = initial;

        let mut completed = 0;
        while completed < total {
            let (sender, bytes) = self.transport.recv(Source::Any, Tag::Done).await?;
            let done = Completion::decode(&bytes)?;
            debug_assert!(
                in_flight[sender],
                "completion from rank {sender} with no assignment outstanding"
            );
            in_flight[sender] = false;
            completed += 1;
            info!(worker = sender, summary = %done.summary, "task completed");
            completions.push((sender, done.summary));

            if next_index < total {
                self.assign(sender, next_index).await?;
                in_flight[sender] = true;
                assignments.push((sender, next_index));
                next_index += 1;
            } else {
                self.stop(sender).await?;
                stopped[sender] = true;
            }
        }

        // Workers that never received an assignment (fewer tasks than
        // workers, or an empty list) still owe us a clean exit.
        for worker in 1..world_size {
            if !stopped[worker] {
                self.stop(worker).await?;
                stopped[worker] = true;
            }
        }

        let elapsed = start.elapsed();
        info!(completed, ?elapsed, "distribution phase finished");

        Ok(DispatchReport {
            elapsed,
            completed,
            assignments,
            completions,
        })
    }

    async fn assign(&self, worker: Rank, index: usize) -> Result<()> {
        let spec = self.tasks[index].clone();
        debug!(worker, index, task = %spec.name, "assigning task");
        let frame = AssignFrame::Work(Assignment {
            task_index: index as u32,
            spec,
        });
        self.transport.send(worker, Tag::Assign, frame.encode()?).await?;
        Ok(())
    }

    async fn stop(&self, worker: Rank) -> Result<()> {
        debug!(worker, "sending stop sentinel");
        self.transport
            .send(worker, Tag::Assign, AssignFrame::Stop.encode()?)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::run_worker;
    use std::collections::HashSet;
    use std::sync::Arc;
    use taskfarm_core::{order_by_priority, FieldMap, KindRegistry, Priority, WorkUnit};
    use taskfarm_transport::ChannelMesh;

    struct ProbeUnit {
        name: String,
        priority: Priority,
    }

    impl WorkUnit for ProbeUnit {
        fn kind(&self) -> &'static str {
            "probe"
        }

        fn spec(&self) -> TaskSpec {
            TaskSpec::new("probe", self.name.clone(), self.priority, FieldMap::new())
        }

        fn execute(&self) -> String {
            format!("{} - ok", self.name)
        }
    }

    fn probe_registry() -> Arc<KindRegistry> {
        let mut registry = KindRegistry::new();
        registry.register("probe", |spec| {
            Ok(Box::new(ProbeUnit {
                name: spec.name.clone(),
                priority: spec.priority,
            }))
        });
        Arc::new(registry)
    }

    fn probe_spec(name: &str, priority: Priority) -> TaskSpec {
        TaskSpec::new("probe", name, priority, FieldMap::new())
    }

    async fn dispatch_with_workers(
        tasks: Vec<TaskSpec>,
        worker_count: usize,
    ) -> DispatchReport {
        let sorted = order_by_priority(&tasks);
        let registry = probe_registry();

        let mut mesh = ChannelMesh::create(worker_count + 1);
        let coordinator_transport = mesh.remove(0);

        let mut handles = Vec::new();
        for endpoint in mesh {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                run_worker(&endpoint, &registry).await
            }));
        }

        let coordinator = Coordinator::new(&coordinator_transport, &sorted);
        let report = coordinator.dispatch().await.unwrap();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        report
    }

    #[tokio::test]
    async fn test_every_task_dispatched_exactly_once() {
        let tasks: Vec<TaskSpec> = (0..12)
            .map(|i| {
                let priority = Priority::from_rank((i % 3) as u8).unwrap();
                probe_spec(&format!("t{i}"), priority)
            })
            .collect();

        let report = dispatch_with_workers(tasks, 4).await;

        assert_eq!(report.completed, 12);
        assert_eq!(report.assignments.len(), 12);
        let indices: HashSet<usize> = report.assignments.iter().map(|&(_, i)| i).collect();
        assert_eq!(indices, (0..12).collect::<HashSet<_>>());
    }

    #[tokio::test]
    async fn test_initial_wave_is_deterministic() {
        let tasks: Vec<TaskSpec> =
            (0..8).map(|i| probe_spec(&format!("t{i}"), Priority::Medium)).collect();

        let report = dispatch_with_workers(tasks, 3).await;

        // Workers 1..=3 get sorted indices 0..3, in that order.
        assert_eq!(&report.assignments[..3], &[(1, 0), (2, 1), (3, 2)]);
    }

    #[tokio::test]
    async fn test_priority_scenario_two_workers() {
        let tasks = vec![
            probe_spec("A", Priority::High),
            probe_spec("B", Priority::Low),
            probe_spec("C", Priority::Medium),
        ];

        let sorted = order_by_priority(&tasks);
        let names: Vec<_> = sorted.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A", "C", "B"]);

        let report = dispatch_with_workers(tasks, 2).await;

        // Initial wave: worker 1 gets A (index 0), worker 2 gets C (index 1).
        assert_eq!(&report.assignments[..2], &[(1, 0), (2, 1)]);
        // B (index 2) goes to whichever worker replied first.
        assert_eq!(report.assignments[2].1, 2);
        assert!(report.assignments[2].0 == 1 || report.assignments[2].0 == 2);
        assert_eq!(report.completed, 3);
    }

    #[tokio::test]
    async fn test_more_workers_than_tasks_still_terminates() {
        let tasks = vec![probe_spec("only", Priority::High)];
        let report = dispatch_with_workers(tasks, 5).await;

        assert_eq!(report.completed, 1);
        assert_eq!(report.assignments, vec![(1, 0)]);
    }

    #[tokio::test]
    async fn test_empty_task_list_terminates() {
        let report = dispatch_with_workers(Vec::new(), 3).await;
        assert_eq!(report.completed, 0);
        assert!(report.assignments.is_empty());
        assert!(report.completions.is_empty());
    }

    #[tokio::test]
    async fn test_degenerate_topology_fails_before_dispatch() {
        let tasks = vec![probe_spec("t", Priority::High)];
        let sorted = order_by_priority(&tasks);
        let mut mesh = ChannelMesh::create(1);
        let transport = mesh.remove(0);

        let coordinator = Coordinator::new(&transport, &sorted);
        let err = coordinator.dispatch().await.unwrap_err();
        assert!(matches!(err, RunError::DegenerateTopology(1)));
    }
}
