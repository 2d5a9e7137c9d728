//! Loading a new store layout without stalling or corrupting the running
//! simulation.
//!
//! The heavy work (zone validation, trip grouping, matrix build) runs on a
//! worker thread and produces a [`StagedModel`] off to the side.  The running
//! scheduler is not touched until the caller decides to
//! [`install`][crate::Scheduler::install] the result, so a cancelled or
//! failed load leaves it exactly as it was.
//!
//! ```rust,ignore
//! sched.pause();
//! let mut task = LoadTask::spawn(move |cancel| {
//!     StagedModel::prepare(defs, &records, &builder, FallbackPolicy::Uniform, cancel)
//! })?;
//! // ... later, between ticks
//! match task.try_finish() {
//!     Some(LoadOutcome::Ready(staged)) => { sched.install(staged); sched.resume(); }
//!     Some(_) => sched.resume(),
//!     None => {} // still loading
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use cf_transition::{TransitionError, TransitionMatrix, TransitionMatrixBuilder, VisitRecord};
use cf_zone::{ZoneDefinition, ZoneModel, load_zones};

use crate::{SimError, SimResult};

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Shared cancellation flag.  Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(SimError::Cancelled)` once cancelled.  Loading jobs call this at
    /// each step boundary.
    pub fn check(&self) -> SimResult<()> {
        if self.is_cancelled() { Err(SimError::Cancelled) } else { Ok(()) }
    }
}

// ── StagedModel ───────────────────────────────────────────────────────────────

/// What to do when the new history yields no trips.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Fail the load with the `EmptyHistory` error.
    #[default]
    Abort,
    /// Substitute [`TransitionMatrix::uniform`].
    Uniform,
}

/// A validated zone model and matching matrix, ready to install.
#[derive(Debug)]
pub struct StagedModel {
    zones:         Arc<ZoneModel>,
    matrix:        Arc<TransitionMatrix>,
    used_fallback: bool,
}

impl StagedModel {
    /// Pair an already-built zone model and matrix.
    pub fn new(zones: impl Into<Arc<ZoneModel>>, matrix: impl Into<Arc<TransitionMatrix>>) -> SimResult<Self> {
        let (zones, matrix) = (zones.into(), matrix.into());
        if zones.is_empty() {
            return Err(SimError::Config("zone model has no zones".into()));
        }
        if matrix.zone_count() != zones.len() {
            return Err(SimError::ZoneCountMismatch { zones: zones.len(), matrix: matrix.zone_count() });
        }
        Ok(Self { zones, matrix, used_fallback: false })
    }

    /// Build zones and matrix from raw inputs, checking `cancel` between
    /// steps.
    pub fn prepare(
        definitions: Vec<ZoneDefinition>,
        records:     &[VisitRecord],
        builder:     &TransitionMatrixBuilder,
        fallback:    FallbackPolicy,
        cancel:      &CancelToken,
    ) -> SimResult<Self> {
        cancel.check()?;
        let zones = load_zones(definitions)?;

        cancel.check()?;
        let (matrix, used_fallback) = match builder.build(records, &zones) {
            Ok(m) => (m, false),
            Err(TransitionError::EmptyHistory) if fallback == FallbackPolicy::Uniform => {
                warn!(zones = zones.len(), "no usable history, falling back to a uniform matrix");
                let dwell = builder.config().default_dwell_ticks;
                (TransitionMatrix::uniform(zones.len(), dwell), true)
            }
            Err(e) => return Err(e.into()),
        };

        cancel.check()?;
        let mut staged = Self::new(zones, matrix)?;
        staged.used_fallback = used_fallback;
        Ok(staged)
    }

    pub fn zones(&self) -> &Arc<ZoneModel> {
        &self.zones
    }

    pub fn matrix(&self) -> &Arc<TransitionMatrix> {
        &self.matrix
    }

    /// `true` if the matrix is the uniform fallback.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub(crate) fn into_parts(self) -> (Arc<ZoneModel>, Arc<TransitionMatrix>) {
        (self.zones, self.matrix)
    }
}

// ── LoadTask ──────────────────────────────────────────────────────────────────

/// How a [`LoadTask`] ended.
#[derive(Debug)]
pub enum LoadOutcome {
    Ready(StagedModel),
    Cancelled,
    Failed(SimError),
}

/// A model load running on a background thread.
///
/// Dropping an unfinished task cancels it and waits for the worker.
#[derive(Debug)]
pub struct LoadTask {
    cancel: CancelToken,
    worker: Option<JoinHandle<SimResult<StagedModel>>>,
}

impl LoadTask {
    /// Start `job` on a worker thread.  The job receives the task's
    /// [`CancelToken`] and should return `SimError::Cancelled` promptly once
    /// it is set.
    pub fn spawn<F>(job: F) -> SimResult<Self>
    where
        F: FnOnce(&CancelToken) -> SimResult<StagedModel> + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let worker = thread::Builder::new()
            .name("cf-model-load".into())
            .spawn(move || job(&token))
            .map_err(|e| SimError::LoadFailed(format!("could not start loader thread: {e}")))?;
        info!("model load started");
        Ok(Self { cancel, worker: Some(worker) })
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Ask the job to stop.  The outcome will be `Cancelled` whatever the job
    /// returns afterwards.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// The outcome if the job has finished, `None` while it is running or
    /// after the outcome has already been taken.
    pub fn try_finish(&mut self) -> Option<LoadOutcome> {
        if !self.worker.as_ref()?.is_finished() {
            return None;
        }
        self.worker.take().map(|w| self.join(w))
    }

    /// Block until the job finishes.
    pub fn wait(mut self) -> LoadOutcome {
        match self.worker.take() {
            Some(w) => self.join(w),
            None => LoadOutcome::Failed(SimError::LoadFailed("outcome already taken".into())),
        }
    }

    fn join(&self, worker: JoinHandle<SimResult<StagedModel>>) -> LoadOutcome {
        let result = worker
            .join()
            .unwrap_or_else(|_| Err(SimError::LoadFailed("loader thread panicked".into())));
        let outcome = match result {
            _ if self.cancel.is_cancelled() => LoadOutcome::Cancelled,
            Ok(staged) => LoadOutcome::Ready(staged),
            Err(SimError::Cancelled) => LoadOutcome::Cancelled,
            Err(e) => LoadOutcome::Failed(e),
        };
        match &outcome {
            LoadOutcome::Ready(s) => info!(zones = s.zones.len(), fallback = s.used_fallback, "model load finished"),
            LoadOutcome::Cancelled => info!("model load cancelled"),
            LoadOutcome::Failed(e) => warn!(error = %e, "model load failed"),
        }
        outcome
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.cancel.cancel();
            let _ = worker.join();
        }
    }
}
