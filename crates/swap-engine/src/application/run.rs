//! Shared plumbing of the executor and the watcher: the run context, the
//! per-run swap state, and the poll loop that turns steps into an outcome.

use super::delay::DelayTracker;
use super::shutdown::ShutdownSignal;
use super::store::SwapStore;
use crate::config::SwapConfig;
use crate::domain::{
    LegRole, LegState, SwapError, SwapFailure, SwapId, SwapOutcome, SwapPhase, SwapRecord,
};
use crate::metrics;
use crate::ports::{BoundSwap, DelayNotifier, LedgerBinder, TimeSource};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Collaborators shared by every run.
#[derive(Clone)]
pub struct SwapContext {
    /// Swap record store.
    pub store: SwapStore,
    /// Orchestrator clock.
    pub clock: Arc<dyn TimeSource>,
    /// Optional late-counterparty notifier.
    pub notifier: Option<Arc<dyn DelayNotifier>>,
    /// Engine configuration.
    pub config: SwapConfig,
    /// Suspends runs at phase boundaries.
    pub shutdown: ShutdownSignal,
}

impl SwapContext {
    /// Context without a notifier and with a signal that never fires.
    pub fn new(store: SwapStore, clock: Arc<dyn TimeSource>, config: SwapConfig) -> Self {
        Self {
            store,
            clock,
            notifier: None,
            config,
            shutdown: ShutdownSignal::never(),
        }
    }

    /// Send delay complaints to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn DelayNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Suspend on `shutdown`.
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }
}

/// Result of one step of a phase machine.
pub(crate) enum Step {
    /// State changed. Step again right away.
    Advanced,
    /// Nothing to do until the next poll.
    Waiting,
}

/// Error raised on one leg during a step.
#[derive(Debug)]
pub(crate) struct StepError {
    pub(crate) leg: LegRole,
    pub(crate) error: SwapError,
}

/// Attach the leg to a binder or store error.
pub(crate) trait OnLeg<T> {
    fn on(self, leg: LegRole) -> Result<T, StepError>;
}

impl<T> OnLeg<T> for Result<T, SwapError> {
    fn on(self, leg: LegRole) -> Result<T, StepError> {
        self.map_err(|error| StepError { leg, error })
    }
}

/// State of one orchestrator run over a bound swap.
pub(crate) struct SwapRun {
    pub(crate) swap: BoundSwap,
    pub(crate) ctx: SwapContext,
    pub(crate) record: SwapRecord,
    pub(crate) delays: DelayTracker,
    native_seen: Option<LegState>,
    foreign_seen: Option<LegState>,
}

impl SwapRun {
    /// Resume from the stored record, or start a fresh one in memory.
    pub(crate) fn new(swap: BoundSwap, ctx: SwapContext) -> Result<Self, SwapError> {
        ctx.config.validate()?;
        let now = ctx.clock.now();
        let mut record = ctx
            .store
            .load(&swap.id)?
            .unwrap_or_else(|| SwapRecord::new(swap.id, swap.initiates_first, None, now));
        if record.secret.is_none() {
            record.secret = swap.secret.clone();
        }
        let delays = DelayTracker::new(
            swap.id,
            ctx.notifier.clone(),
            ctx.config.delay_complaint_after_secs,
        );
        Ok(Self {
            swap,
            ctx,
            record,
            delays,
            native_seen: None,
            foreign_seen: None,
        })
    }

    pub(crate) fn id(&self) -> SwapId {
        self.swap.id
    }

    pub(crate) fn now(&self) -> u64 {
        self.ctx.clock.now()
    }

    pub(crate) fn skew(&self) -> u64 {
        self.ctx.config.safety_skew_secs
    }

    pub(crate) fn native(&self) -> &dyn LedgerBinder {
        self.swap.native.as_ref()
    }

    pub(crate) fn foreign(&self) -> &dyn LedgerBinder {
        self.swap.foreign.as_ref()
    }

    pub(crate) fn native_expiry(&self) -> u64 {
        self.swap.native.descriptor().expiry
    }

    pub(crate) async fn audit_native(&mut self) -> Result<LegState, StepError> {
        let state = self.swap.native.audit().await.on(LegRole::Native)?;
        self.native_seen = Some(state.clone());
        Ok(state)
    }

    pub(crate) async fn audit_foreign(&mut self) -> Result<LegState, StepError> {
        let state = self.swap.foreign.audit().await.on(LegRole::Foreign)?;
        self.foreign_seen = Some(state.clone());
        Ok(state)
    }

    /// Write the record as it stands.
    pub(crate) fn persist(&mut self) -> Result<(), StepError> {
        self.record.updated_at = self.now();
        self.ctx.store.save(&self.record).on(LegRole::Native)
    }

    /// Move to `phase` and persist it.
    pub(crate) fn advance(&mut self, phase: SwapPhase) -> Result<(), StepError> {
        let from = self.record.phase;
        let now = self.now();
        self.record.advance(phase, now);
        self.ctx.store.save(&self.record).on(LegRole::Native)?;
        metrics::record_phase_transition(&phase.to_string());
        info!(
            swap_id = %hex::encode(self.id()),
            from = %from,
            to = %phase,
            "[swap] phase transition"
        );
        Ok(())
    }

    /// Record the failure and build the report.
    fn halt(&mut self, err: StepError) -> SwapFailure {
        self.record.failure = Some(err.error.to_string());
        if let Err(store_err) = self.persist() {
            error!(
                swap_id = %hex::encode(self.id()),
                error = %store_err.error,
                "[swap] failed to persist halted swap"
            );
        }
        metrics::record_failure(err.error.class().as_str());
        error!(
            swap_id = %hex::encode(self.id()),
            leg = %err.leg,
            phase = %self.record.phase,
            error = %err.error,
            "[swap] swap halted"
        );
        let last_audited = match err.leg {
            LegRole::Native => self.native_seen.clone(),
            LegRole::Foreign => self.foreign_seen.clone(),
        };
        SwapFailure {
            swap_id: self.id(),
            leg: err.leg,
            phase: self.record.phase,
            last_audited,
            error: err.error,
        }
    }
}

/// A protocol driven one step at a time.
#[async_trait]
pub(crate) trait PhaseMachine: Send {
    fn state(&mut self) -> &mut SwapRun;

    /// Act on the current phase.
    async fn step(&mut self) -> Result<Step, StepError>;
}

/// Step `machine` until a terminal phase, a fatal error or shutdown.
///
/// Transient errors and waits pause for one poll interval. Shutdown is only
/// observed between steps.
pub(crate) async fn drive<M: PhaseMachine>(
    machine: &mut M,
    orchestrator: &'static str,
) -> Result<SwapOutcome, SwapFailure> {
    let run = machine.state();
    let span = info_span!(
        "swap_run",
        swap_id = %hex::encode(run.id()),
        orchestrator,
        initiates_first = run.swap.initiates_first,
        run_id = %Uuid::new_v4(),
    );
    metrics::run_started();
    let result = drive_inner(machine).instrument(span).await;
    metrics::run_finished();
    result
}

async fn drive_inner<M: PhaseMachine>(machine: &mut M) -> Result<SwapOutcome, SwapFailure> {
    info!(phase = %machine.state().record.phase, "[swap] run started");
    loop {
        let run = machine.state();
        let phase = run.record.phase;
        if let Some(outcome) = SwapOutcome::from_terminal(phase) {
            metrics::record_outcome(outcome.as_str());
            info!(outcome = outcome.as_str(), "[swap] run finished");
            return Ok(outcome);
        }
        if run.ctx.shutdown.is_triggered() {
            if let Err(err) = run.persist() {
                return Err(run.halt(err));
            }
            metrics::record_outcome("suspended");
            info!(%phase, "[swap] run suspended");
            return Ok(SwapOutcome::Suspended(phase));
        }

        match machine.step().await {
            Ok(Step::Advanced) => continue,
            Ok(Step::Waiting) => {}
            Err(err) if err.error.is_retryable() => {
                warn!(leg = %err.leg, error = %err.error, "[swap] chain unavailable, retrying next poll");
            }
            Err(err) => return Err(machine.state().halt(err)),
        }

        let run = machine.state();
        let poll = run.ctx.config.poll_interval();
        let mut shutdown = run.ctx.shutdown.clone();
        tokio::select! {
            _ = tokio::time::sleep(poll) => {}
            _ = shutdown.wait() => {}
        }
    }
}
