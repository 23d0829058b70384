//! Step Executor: one agent, bounded retries, fail-soft
//!
//! Every failure inside an agent attempt is contained here. After the last
//! allowed attempt the failure becomes an `{"error": ...}` memory entry and the
//! sequence moves on; nothing is propagated to the driver.

use super::sequencer::{advance, Transition};
use crate::agent::{Agent, AgentRegistry};
use crate::error::AgentError;
use crate::observability::metrics::metrics;
use crate::step_span;
use crate::task::{AgentOutput, TaskState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Instrument};

/// How many times an agent is retried after its first attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Pause between attempts; zero retries immediately
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total attempts allowed per agent
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// What happened to the agent that was current when the step began
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Output stored after `attempts` tries
    Succeeded { agent: String, attempts: u32 },
    /// Every attempt failed; an error object was stored
    Exhausted {
        agent: String,
        attempts: u32,
        error: String,
    },
    /// No implementation registered; nothing stored
    Skipped { agent: String },
    /// The state was already terminal
    Idle,
}

/// Result of one `run_step` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub outcome: StepOutcome,
    pub transition: Transition,
}

/// Runs the current agent and hands off to the sequencer
#[derive(Debug, Clone)]
pub struct StepExecutor {
    registry: Arc<AgentRegistry>,
    policy: RetryPolicy,
}

impl StepExecutor {
    pub fn new(registry: Arc<AgentRegistry>, policy: RetryPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Execute `state.current_agent` and advance to the next agent
    ///
    /// Always terminates. Unless the agent was unregistered, its memory entry
    /// is populated afterwards with either its output or an error object.
    pub async fn run_step(&self, state: &mut TaskState) -> StepReport {
        let Some(agent_name) = state.current_agent.clone() else {
            return StepReport {
                outcome: StepOutcome::Idle,
                transition: advance(&self.registry, state),
            };
        };

        let outcome = match self.registry.lookup(&agent_name).cloned() {
            Some(agent) => {
                let span = step_span!(agent = %agent_name);
                self.execute_with_retry(agent.as_ref(), state)
                    .instrument(span)
                    .await
            }
            None => {
                warn!(agent = %agent_name, "No implementation registered; skipping agent");
                metrics().agent_skipped();
                StepOutcome::Skipped { agent: agent_name }
            }
        };

        StepReport {
            outcome,
            transition: advance(&self.registry, state),
        }
    }

    async fn execute_with_retry(&self, agent: &dyn Agent, state: &mut TaskState) -> StepOutcome {
        let name = agent.name().to_string();
        let max_attempts = self.policy.max_attempts();
        info!(agent = %name, max_attempts, "Running agent");

        let mut attempt = 1;
        loop {
            metrics().agent_attempt();

            match attempt_once(agent, state).await {
                Ok(output) => {
                    metrics().agent_succeeded();
                    info!(agent = %name, attempt, "Agent succeeded");
                    agent.update_context(&output, &mut state.context);
                    state.memory.record(&name, output);
                    return StepOutcome::Succeeded {
                        agent: name,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    metrics().agent_attempt_failed();

                    if attempt >= max_attempts {
                        metrics().agent_exhausted();
                        error!(
                            agent = %name,
                            attempt,
                            max_attempts,
                            error = %e.log_message(),
                            "Agent failed on final attempt; storing error and continuing"
                        );
                        let error_object = e.to_error_object();
                        let message = error_object
                            .get("error")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        state.memory.record(&name, error_object);
                        return StepOutcome::Exhausted {
                            agent: name,
                            attempts: attempt,
                            error: message,
                        };
                    }

                    warn!(
                        agent = %name,
                        attempt,
                        max_attempts,
                        error = %e.log_message(),
                        "Agent attempt failed; retrying"
                    );
                    if !self.policy.backoff.is_zero() {
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

/// One invocation plus the map-shape check
async fn attempt_once(agent: &dyn Agent, state: &TaskState) -> Result<AgentOutput, AgentError> {
    match agent.execute(state).await? {
        Value::Object(output) => Ok(output),
        other => Err(AgentError::invalid_output(&other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mocks::{ScriptedAgent, StaticAgent};
    use serde_json::json;

    fn executor(agents: Vec<Arc<dyn Agent>>, max_retries: u32) -> StepExecutor {
        let registry = AgentRegistry::from_agents(agents).unwrap();
        StepExecutor::new(Arc::new(registry), RetryPolicy::new(max_retries))
    }

    #[test]
    fn test_retry_policy_attempts() {
        assert_eq!(RetryPolicy::default().max_attempts(), 3);
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
        assert_eq!(RetryPolicy::new(u32::MAX).max_attempts(), u32::MAX);
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let agent = Arc::new(ScriptedAgent::succeeding("A", json!({"value": 1})));
        let executor = executor(vec![agent.clone(), Arc::new(StaticAgent::new("B", json!({})))], 2);
        let mut state = TaskState::starting_at("A");

        let report = executor.run_step(&mut state).await;

        assert_eq!(
            report.outcome,
            StepOutcome::Succeeded {
                agent: "A".to_string(),
                attempts: 1
            }
        );
        assert_eq!(report.transition, Transition::Next("B".to_string()));
        assert_eq!(agent.calls(), 1);
        assert_eq!(state.memory.get("A"), Some(&json!({"value": 1})));
        assert_eq!(state.current_agent.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_recovers_after_failures() {
        let agent = Arc::new(ScriptedAgent::failing_then_succeeding(
            "A",
            2,
            json!({"value": "late"}),
        ));
        let executor = executor(vec![agent.clone()], 2);
        let mut state = TaskState::starting_at("A");

        let report = executor.run_step(&mut state).await;

        assert_eq!(
            report.outcome,
            StepOutcome::Succeeded {
                agent: "A".to_string(),
                attempts: 3
            }
        );
        assert_eq!(agent.calls(), 3);
        assert_eq!(state.memory.get("A"), Some(&json!({"value": "late"})));
        assert_eq!(report.transition, Transition::Finished);
    }

    #[tokio::test]
    async fn test_exhausted_stores_error_object() {
        let agent = Arc::new(ScriptedAgent::always_failing("A", "service down"));
        let executor = executor(vec![agent.clone()], 2);
        let mut state = TaskState::starting_at("A");

        let report = executor.run_step(&mut state).await;

        assert_eq!(
            report.outcome,
            StepOutcome::Exhausted {
                agent: "A".to_string(),
                attempts: 3,
                error: "service down".to_string()
            }
        );
        assert_eq!(agent.calls(), 3);
        assert_eq!(state.memory.get("A"), Some(&json!({"error": "service down"})));
        assert!(state.is_terminal());
    }

    #[tokio::test]
    async fn test_non_map_output_is_a_failure() {
        let agent = Arc::new(ScriptedAgent::succeeding("A", json!(["not", "a", "map"])));
        let executor = executor(vec![agent.clone()], 1);
        let mut state = TaskState::starting_at("A");

        let report = executor.run_step(&mut state).await;

        assert!(matches!(report.outcome, StepOutcome::Exhausted { attempts: 2, .. }));
        assert_eq!(agent.calls(), 2);
        assert_eq!(
            state.memory.error_of("A"),
            Some("Agent output must be a map, got array")
        );
    }

    #[tokio::test]
    async fn test_zero_retries_single_attempt() {
        let agent = Arc::new(ScriptedAgent::always_failing("A", "nope"));
        let executor = executor(vec![agent.clone()], 0);
        let mut state = TaskState::starting_at("A");

        executor.run_step(&mut state).await;

        assert_eq!(agent.calls(), 1);
        assert_eq!(state.memory.error_of("A"), Some("nope"));
    }

    #[tokio::test]
    async fn test_unregistered_agent_skipped() {
        let sequence = vec!["Ghost".to_string(), "A".to_string()];
        let registry = AgentRegistry::from_sequence(
            &sequence,
            vec![Arc::new(StaticAgent::new("A", json!({})))],
        )
        .unwrap();
        let executor = StepExecutor::new(Arc::new(registry), RetryPolicy::default());
        let mut state = TaskState::starting_at("Ghost");

        let report = executor.run_step(&mut state).await;

        assert_eq!(
            report.outcome,
            StepOutcome::Skipped {
                agent: "Ghost".to_string()
            }
        );
        assert!(!state.memory.contains("Ghost"));
        assert_eq!(state.current_agent.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_terminal_state_is_idle() {
        let executor = executor(vec![Arc::new(StaticAgent::new("A", json!({})))], 2);
        let mut state = TaskState::default();

        let report = executor.run_step(&mut state).await;

        assert_eq!(report.outcome, StepOutcome::Idle);
        assert_eq!(report.transition, Transition::AlreadyTerminal);
        assert!(state.memory.is_empty());
    }

    #[tokio::test]
    async fn test_backoff_between_attempts() {
        tokio::time::pause();
        let agent = Arc::new(ScriptedAgent::failing_then_succeeding("A", 1, json!({})));
        let registry = AgentRegistry::from_agents(vec![agent.clone()]).unwrap();
        let policy = RetryPolicy::new(1).with_backoff(Duration::from_secs(5));
        let executor = StepExecutor::new(Arc::new(registry), policy);
        let mut state = TaskState::starting_at("A");

        let started = tokio::time::Instant::now();
        executor.run_step(&mut state).await;

        assert!(started.elapsed() >= Duration::from_secs(5));
        assert_eq!(agent.calls(), 2);
    }
}
