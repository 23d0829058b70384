//! Run Driver: execute-then-advance until the terminal sentinel, then persist
//!
//! The driver owns the Task State for the whole run. Agent failures never
//! reach it; only loading the initial document and writing the final one can
//! fail a run.

use super::step_executor::{RetryPolicy, StepExecutor, StepOutcome};
use crate::agent::AgentRegistry;
use crate::error::ConciergeResult;
use crate::observability::metrics::metrics;
use crate::persistence::{load_initial, save_final};
use crate::run_span;
use crate::task::TaskState;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// Summary of one run
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Executor calls made before reaching the terminal sentinel
    pub iterations: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct RunDriver {
    executor: StepExecutor,
}

impl RunDriver {
    pub fn new(registry: Arc<AgentRegistry>, policy: RetryPolicy) -> Self {
        Self {
            executor: StepExecutor::new(registry, policy),
        }
    }

    /// Loop the step executor until `current_agent` is the terminal sentinel
    ///
    /// Starting from a declared agent this takes at most `len(sequence)`
    /// iterations, since every step moves strictly forward or ends the run.
    pub async fn drive(&self, state: &mut TaskState) -> RunReport {
        let mut report = RunReport {
            run_id: Uuid::new_v4(),
            ..Default::default()
        };
        let span = run_span!(run_id = %report.run_id);

        async {
            metrics().run_started();
            info!(
                start = state.current_agent.as_deref().unwrap_or("<none>"),
                agents = self.executor.registry().len(),
                "Orchestration started"
            );

            while !state.is_terminal() {
                let step = self.executor.run_step(state).await;
                report.iterations += 1;

                match step.outcome {
                    StepOutcome::Succeeded { agent, .. } => report.succeeded.push(agent),
                    StepOutcome::Exhausted { agent, .. } => report.failed.push(agent),
                    StepOutcome::Skipped { agent } => report.skipped.push(agent),
                    StepOutcome::Idle => {}
                }
                debug!(transition = ?step.transition, "Step complete");
            }

            metrics().run_completed();
            info!(
                iterations = report.iterations,
                succeeded = report.succeeded.len(),
                failed = report.failed.len(),
                skipped = report.skipped.len(),
                "All agents executed"
            );
            debug!(metrics = ?metrics().snapshot(), "Run metrics");
        }
        .instrument(span)
        .await;

        report
    }

    /// Load the initial document, drive it to completion and write the result
    ///
    /// A load failure aborts before any agent runs and writes nothing.
    pub async fn run(
        &self,
        task_path: &Path,
        result_path: &Path,
    ) -> ConciergeResult<(TaskState, RunReport)> {
        let mut state = load_initial(task_path)?;
        let report = self.drive(&mut state).await;
        save_final(result_path, &state)?;
        Ok((state, report))
    }
}
