//! Process-wide property database with a generation-tagged readiness signal.

use crate::error::ReadinessError;
use crate::model::PropertyDatabase;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct State {
    generation: u64,
    loading: bool,
    database: Option<Arc<PropertyDatabase>>,
}

/// Single-writer cache of the loaded model's properties.
///
/// Each load starts a new generation and drops the previous database
/// outright. Readers either take a non-blocking snapshot or wait, with a
/// bound, for the current generation to be published.
#[derive(Debug, Default)]
pub struct PropertyStore {
    state: Mutex<State>,
    ready: Condvar,
}

impl PropertyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load and returns its generation.
    pub fn begin_load(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.loading = true;
        state.database = None;
        info!(generation = state.generation, "property database load started");
        state.generation
    }

    /// Installs `database` if `generation` is still the current load.
    /// Returns whether it was installed.
    pub fn publish(&self, generation: u64, database: PropertyDatabase) -> bool {
        let mut state = self.lock();
        if generation != state.generation {
            warn!(
                generation,
                current = state.generation,
                "dropping property database from a superseded load"
            );
            return false;
        }

        info!(generation, elements = database.len(), "property database published");
        state.database = Some(Arc::new(database));
        state.loading = false;
        drop(state);
        self.ready.notify_all();
        true
    }

    /// Marks the current load as failed so that waiters stop waiting.
    pub fn abandon(&self, generation: u64) {
        let mut state = self.lock();
        if generation == state.generation && state.database.is_none() {
            warn!(generation, "property database load abandoned");
            state.loading = false;
            drop(state);
            self.ready.notify_all();
        }
    }

    /// The current database, or `None` when it is not ready.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<PropertyDatabase>> {
        self.lock().database.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Waits up to `timeout` for the current load to be published.
    pub fn wait_ready(&self, timeout: Duration) -> Result<Arc<PropertyDatabase>, ReadinessError> {
        let state = self.lock();
        if let Some(db) = &state.database {
            return Ok(Arc::clone(db));
        }
        if !state.loading {
            return Err(ReadinessError::NotLoaded);
        }

        let (state, _) = self
            .ready
            .wait_timeout_while(state, timeout, |s| s.database.is_none() && s.loading)
            .unwrap_or_else(PoisonError::into_inner);

        match &state.database {
            Some(db) => Ok(Arc::clone(db)),
            None if !state.loading => Err(ReadinessError::NotLoaded),
            None => {
                warn!(waited_ms = timeout.as_millis(), "property database not ready in time");
                Err(ReadinessError::Timeout { waited: timeout })
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
