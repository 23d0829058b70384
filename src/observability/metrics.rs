//! Process-wide run metrics
//!
//! Atomic counters for runs and agent attempts, readable as a serializable
//! snapshot at the end of a run.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

/// Thread-safe counters for orchestration events
#[derive(Debug, Default)]
pub struct MetricsCollector {
    runs_started: AtomicU64,
    runs_completed: AtomicU64,
    agent_attempts: AtomicU64,
    agent_successes: AtomicU64,
    agent_attempt_failures: AtomicU64,
    agents_exhausted: AtomicU64,
    agents_skipped: AtomicU64,
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub agent_attempts: u64,
    pub agent_successes: u64,
    pub agent_attempt_failures: u64,
    pub agents_exhausted: u64,
    pub agents_skipped: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn run_completed(&self) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn agent_attempt(&self) {
        self.agent_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn agent_succeeded(&self) {
        self.agent_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn agent_attempt_failed(&self) {
        self.agent_attempt_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// All attempts for one agent failed
    pub fn agent_exhausted(&self) {
        self.agents_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn agent_skipped(&self) {
        self.agents_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs_started: self.runs_started.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            agent_attempts: self.agent_attempts.load(Ordering::Relaxed),
            agent_successes: self.agent_successes.load(Ordering::Relaxed),
            agent_attempt_failures: self.agent_attempt_failures.load(Ordering::Relaxed),
            agents_exhausted: self.agents_exhausted.load(Ordering::Relaxed),
            agents_skipped: self.agents_skipped.load(Ordering::Relaxed),
        }
    }
}
