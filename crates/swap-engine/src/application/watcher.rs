//! # Swap Watcher
//!
//! Durable, resumable protocol driver. Each poll reloads the stored record,
//! audits both legs and lets [`reconcile`] pick the next action. Chain
//! actions are bracketed by an intent phase written before the call and the
//! confirmed phase written after it, so a crash at any point resumes
//! correctly on restart.

use super::reconcile::{reconcile, Action, Observation};
use super::run::{drive, OnLeg, PhaseMachine, Step, StepError, SwapContext, SwapRun};
use crate::domain::{
    DelayKind, LegRole, LegState, SecureSecret, SwapError, SwapFailure, SwapId, SwapOutcome,
    SwapPhase,
};
use crate::ports::{BoundSwap, SwapOrchestrator};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Background orchestrator for one swap.
pub struct SwapWatcher {
    run: SwapRun,
}

impl SwapWatcher {
    /// Watcher for `swap`, picking up any stored record.
    pub fn new(swap: BoundSwap, ctx: SwapContext) -> Result<Self, SwapError> {
        Ok(Self {
            run: SwapRun::new(swap, ctx)?,
        })
    }

    /// The store is the source of truth across restarts.
    fn reload(&mut self) -> Result<(), StepError> {
        let id = self.run.id();
        if let Some(mut stored) = self.run.ctx.store.load(&id).on(LegRole::Native)? {
            if stored.secret.is_none() {
                stored.secret = self.run.record.secret.take();
            }
            self.run.record = stored;
        }
        Ok(())
    }

    /// Write an intent phase unless already there.
    fn intend(&mut self, phase: SwapPhase) -> Result<(), StepError> {
        if self.run.record.phase == phase {
            return self.run.persist();
        }
        self.run.advance(phase)
    }

    async fn apply(&mut self, action: Action) -> Result<Step, StepError> {
        match action {
            Action::Finish(phase) | Action::Advance(phase) => {
                if self.run.record.phase != phase {
                    self.run.advance(phase)?;
                }
                Ok(Step::Advanced)
            }
            Action::Initiate => {
                self.intend(SwapPhase::Initiating)?;
                let tx = self.run.native().initiate().await.on(LegRole::Native)?;
                self.run.record.native_tx = Some(tx);
                self.run.advance(SwapPhase::NativeInitiated)?;
                Ok(Step::Advanced)
            }
            Action::Redeem(secret) => self.redeem(secret).await,
            Action::Refund => {
                self.intend(SwapPhase::Refunding)?;
                match self.run.native().refund().await {
                    Ok(tx) => {
                        self.run.record.refund_tx = Some(tx);
                        self.run.advance(SwapPhase::Refunded)?;
                        Ok(Step::Advanced)
                    }
                    Err(SwapError::NotYetExpired) => Ok(Step::Waiting),
                    // Reconciled on the next step from the audited state.
                    Err(SwapError::AlreadyClaimed) => Ok(Step::Advanced),
                    Err(error) => Err(StepError {
                        leg: LegRole::Native,
                        error,
                    }),
                }
            }
            Action::Wait(kind) => {
                if let Some(kind) = kind {
                    let now = self.run.now();
                    self.run.delays.waiting(kind, now);
                }
                Ok(Step::Waiting)
            }
            Action::Halt(leg, error) => {
                if leg == LegRole::Foreign && matches!(error, SwapError::AuditMismatch { .. }) {
                    self.run.delays.complain(DelayKind::WrongCounterpartyInitiation);
                }
                Err(StepError { leg, error })
            }
        }
    }

    async fn redeem(&mut self, secret: SecureSecret) -> Result<Step, StepError> {
        self.run.record.secret = Some(secret.clone());
        self.intend(SwapPhase::Redeeming)?;
        match self.run.foreign().redeem(&secret).await {
            Ok(tx) => {
                self.run.record.redeem_tx = Some(tx);
                self.run.advance(SwapPhase::Done)?;
            }
            Err(SwapError::AlreadyRedeemed) => self.run.advance(SwapPhase::Done)?,
            Err(err @ (SwapError::Expired | SwapError::AlreadyRefunded)) => {
                warn!(error = %err, "[swap] foreign leg no longer redeemable");
                return Ok(Step::Waiting);
            }
            Err(error) => {
                return Err(StepError {
                    leg: LegRole::Foreign,
                    error,
                })
            }
        }
        Ok(Step::Advanced)
    }
}

#[async_trait]
impl PhaseMachine for SwapWatcher {
    fn state(&mut self) -> &mut SwapRun {
        &mut self.run
    }

    async fn step(&mut self) -> Result<Step, StepError> {
        self.reload()?;
        if self.run.record.phase.is_terminal() {
            return Ok(Step::Advanced);
        }

        let native = self.run.audit_native().await?;
        let foreign = self.run.audit_foreign().await?;
        if let LegState::Initiated(lock) = &foreign {
            self.run.record.foreign_tx.get_or_insert_with(|| lock.tx.clone());
        }

        let action = reconcile(&Observation {
            record: &self.run.record,
            native_leg: self.run.native().descriptor(),
            foreign_leg: self.run.foreign().descriptor(),
            native: &native,
            foreign: &foreign,
            skew: self.run.skew(),
            now: self.run.now(),
        });
        debug!(
            phase = %self.run.record.phase,
            native = native.label(),
            foreign = foreign.label(),
            ?action,
            "[swap] reconciled"
        );
        if let Action::Finish(phase) = &action {
            info!(%phase, "[swap] settled on chain");
        }
        self.apply(action).await
    }
}

#[async_trait]
impl SwapOrchestrator for SwapWatcher {
    fn swap_id(&self) -> SwapId {
        self.run.swap.id
    }

    async fn run(&mut self) -> Result<SwapOutcome, SwapFailure> {
        drive(self, "watcher").await
    }
}
