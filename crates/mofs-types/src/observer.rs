//! Operation observers.
//!
//! Components receive an [`Observer`] at construction and report every
//! operation they run to it. Verbosity is a property of the observer
//! instance, never of the process.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{Classify, ErrorKind};

/// How an operation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpOutcome {
    Ok,
    Failed(ErrorKind),
}

/// A single finished operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpEvent {
    /// Component that ran the operation (`"fs"`, `"crypto"`, ...).
    pub component: &'static str,
    /// Operation name (`"read"`, `"digest"`, ...).
    pub op: &'static str,
    /// Path, blob id, or URI the operation addressed.
    pub target: String,
    /// Bytes consumed or produced, when meaningful.
    pub bytes: Option<u64>,
    pub outcome: OpOutcome,
    pub elapsed: Duration,
}

impl OpEvent {
    pub fn new(component: &'static str, op: &'static str, target: impl Into<String>) -> Self {
        Self {
            component,
            op,
            target: target.into(),
            bytes: None,
            outcome: OpOutcome::Ok,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.bytes = Some(bytes);
        self
    }

    pub fn with_outcome(mut self, outcome: OpOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

/// Measures one operation and reports it when finished.
#[derive(Debug)]
pub struct OpTimer {
    event: OpEvent,
    started: Instant,
}

impl OpTimer {
    pub fn start(component: &'static str, op: &'static str, target: impl Into<String>) -> Self {
        Self {
            event: OpEvent::new(component, op, target),
            started: Instant::now(),
        }
    }

    /// Record the outcome of `result`; `bytes` extracts a size from a success.
    pub fn finish<T, E: Classify>(
        self,
        observer: &dyn Observer,
        result: &Result<T, E>,
        bytes: impl FnOnce(&T) -> Option<u64>,
    ) {
        let mut event = self.event.with_elapsed(self.started.elapsed());
        match result {
            Ok(value) => event.bytes = bytes(value),
            Err(e) => event.outcome = OpOutcome::Failed(e.kind()),
        }
        observer.record(&event);
    }
}

/// Receives operation events from the components it was handed to.
pub trait Observer: Send + Sync {
    fn record(&self, event: &OpEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn record(&self, _event: &OpEvent) {}
}

/// Emits events through `tracing`.
///
/// Failures are always logged at `warn`; successful operations are logged at
/// `info` when `verbose` is set and at `debug` otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver {
    verbose: bool,
}

impl TracingObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl Observer for TracingObserver {
    fn record(&self, event: &OpEvent) {
        let elapsed_us = event.elapsed.as_micros() as u64;
        match event.outcome {
            OpOutcome::Failed(kind) => tracing::warn!(
                component = event.component,
                op = event.op,
                target = %event.target,
                kind = %kind,
                elapsed_us,
                "operation failed"
            ),
            OpOutcome::Ok if self.verbose => tracing::info!(
                component = event.component,
                op = event.op,
                target = %event.target,
                bytes = event.bytes,
                elapsed_us,
                "operation complete"
            ),
            OpOutcome::Ok => tracing::debug!(
                component = event.component,
                op = event.op,
                target = %event.target,
                bytes = event.bytes,
                elapsed_us,
                "operation complete"
            ),
        }
    }
}

/// Keeps every event in memory. Handy for embedding tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<OpEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<OpEvent> {
        self.events.lock().expect("observer mutex poisoned").clone()
    }

    /// Recorded `(component, op)` pairs, in order.
    pub fn ops(&self) -> Vec<(&'static str, &'static str)> {
        self.events
            .lock()
            .expect("observer mutex poisoned")
            .iter()
            .map(|e| (e.component, e.op))
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn record(&self, event: &OpEvent) {
        self.events
            .lock()
            .expect("observer mutex poisoned")
            .push(event.clone());
    }
}
