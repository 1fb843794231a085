use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::error::GenError;
use crate::provider::TableProvider;

/// One-shot completion signal for a dataset that loads asynchronously.
#[derive(Debug, Default)]
pub struct Readiness {
    ready: Mutex<bool>,
    signal: Condvar,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that is already complete.
    pub fn completed() -> Self {
        Self {
            ready: Mutex::new(true),
            signal: Condvar::new(),
        }
    }

    pub fn mark_ready(&self) {
        let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        *ready = true;
        self.signal.notify_all();
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until ready or until `timeout` elapses. Returns whether the
    /// signal completed.
    pub fn wait(&self, timeout: Duration) -> bool {
        let guard = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .signal
            .wait_timeout_while(guard, timeout, |ready| !*ready)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Wait for the provider's dataset to finish loading, then load `year`.
pub fn await_ready(
    provider: &dyn TableProvider,
    year: i32,
    timeout: Duration,
) -> Result<(), GenError> {
    let readiness = provider.readiness();
    if !readiness.is_ready() {
        tracing::info!(year, ?timeout, "waiting for unit table data");
        let started = Instant::now();
        if !readiness.wait(timeout) {
            let waited = started.elapsed();
            tracing::warn!(year, ?waited, "unit table data never became ready");
            return Err(GenError::DataNotReady { year, waited });
        }
    }
    provider.load_year(year);
    Ok(())
}
