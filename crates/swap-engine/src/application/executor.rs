//! # Swap Executor
//!
//! Interactive protocol for one party. Holds the phase in memory and writes
//! every confirmed transition to the store.
//!
//! ```text
//! first mover:   Start -> NativeInitiated -> ForeignAudited -> Redeeming -> Done
//! second mover:  Start -> NativeInitiated -> ForeignAudited -> Redeeming -> Done
//!                  (audit foreign first)      (poll native secret)
//! after NativeInitiated, native expiry:  Refunding -> Refunded
//! nothing committed by the native expiry:  Abandoned
//! ```

use super::run::{drive, OnLeg, PhaseMachine, Step, StepError, SwapContext, SwapRun};
use crate::algorithms::{audit_counterparty_lock, verify_secret};
use crate::domain::{
    DelayKind, LegRole, LegState, LockInfo, SecretAudit, SwapError, SwapFailure, SwapId,
    SwapOutcome, SwapPhase,
};
use crate::ports::{BoundSwap, SwapOrchestrator};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Runs a bound swap to completion in one go.
pub struct SwapExecutor {
    run: SwapRun,
}

impl SwapExecutor {
    /// Executor for `swap`. Resumes from a stored record if one exists.
    pub fn new(swap: BoundSwap, ctx: SwapContext) -> Result<Self, SwapError> {
        Ok(Self {
            run: SwapRun::new(swap, ctx)?,
        })
    }

    async fn start(&mut self) -> Result<Step, StepError> {
        if self.run.now() >= self.run.native_expiry() {
            info!("[swap] native expiry reached before locking, abandoning");
            self.run.advance(SwapPhase::Abandoned)?;
            return Ok(Step::Advanced);
        }

        if !self.run.swap.initiates_first {
            match self.run.audit_foreign().await? {
                LegState::NotFound => {
                    let now = self.run.now();
                    self.run.delays.waiting(DelayKind::CounterpartyInitiation, now);
                    return Ok(Step::Waiting);
                }
                LegState::Initiated(lock) => {
                    self.audit_lock(&lock, false)?;
                    self.run.record.foreign_tx = Some(lock.tx);
                }
                other => {
                    info!(foreign = other.label(), "[swap] counterparty leg settled before we locked");
                    self.run.advance(SwapPhase::Abandoned)?;
                    return Ok(Step::Advanced);
                }
            }
        }

        self.run.persist()?;
        let tx = self.run.native().initiate().await.on(LegRole::Native)?;
        self.run.record.native_tx = Some(tx);
        self.run.advance(SwapPhase::NativeInitiated)?;
        Ok(Step::Advanced)
    }

    fn audit_lock(&mut self, lock: &LockInfo, initiates_first: bool) -> Result<(), StepError> {
        let expected = self.run.foreign().descriptor();
        let native_expiry = self.run.native_expiry();
        if let Err(error) =
            audit_counterparty_lock(lock, expected, native_expiry, self.run.skew(), initiates_first)
        {
            self.run.delays.complain(DelayKind::WrongCounterpartyInitiation);
            return Err(StepError {
                leg: LegRole::Foreign,
                error,
            });
        }
        debug!(tx = %lock.tx, "[swap] counterparty lock audited");
        Ok(())
    }

    async fn native_initiated(&mut self) -> Result<Step, StepError> {
        if !self.run.swap.initiates_first {
            self.run.advance(SwapPhase::ForeignAudited)?;
            return Ok(Step::Advanced);
        }
        if self.run.now() > self.run.native_expiry() {
            self.run.advance(SwapPhase::Refunding)?;
            return Ok(Step::Advanced);
        }

        match self.run.audit_foreign().await? {
            LegState::NotFound => {
                let now = self.run.now();
                self.run.delays.waiting(DelayKind::CounterpartyInitiation, now);
                Ok(Step::Waiting)
            }
            LegState::Initiated(lock) => {
                self.audit_lock(&lock, true)?;
                self.run.record.foreign_tx = Some(lock.tx);
                self.run.advance(SwapPhase::ForeignAudited)?;
                Ok(Step::Advanced)
            }
            LegState::Redeemed(_) => {
                self.run.advance(SwapPhase::Done)?;
                Ok(Step::Advanced)
            }
            // Counterparty leg gone. Refund once ours expires.
            LegState::Expired(_) | LegState::Refunded => Ok(Step::Waiting),
        }
    }

    async fn foreign_audited(&mut self) -> Result<Step, StepError> {
        if self.run.swap.initiates_first {
            self.run.advance(SwapPhase::Redeeming)?;
            return Ok(Step::Advanced);
        }
        if self.run.now() > self.run.native_expiry() {
            self.run.advance(SwapPhase::Refunding)?;
            return Ok(Step::Advanced);
        }

        match self.run.native().audit_secret().await.on(LegRole::Native)? {
            SecretAudit::Revealed(secret) => {
                let hash = self.run.native().descriptor().secret_hash;
                if !verify_secret(&secret, &hash) {
                    return Err(StepError {
                        leg: LegRole::Native,
                        error: SwapError::SecretMismatch,
                    });
                }
                info!("[swap] secret revealed on native leg");
                self.run.record.secret = Some(secret);
                self.run.advance(SwapPhase::Redeeming)?;
                Ok(Step::Advanced)
            }
            SecretAudit::NotYetRevealed => {
                let now = self.run.now();
                self.run.delays.waiting(DelayKind::CounterpartyRedemption, now);
                Ok(Step::Waiting)
            }
        }
    }

    async fn redeeming(&mut self) -> Result<Step, StepError> {
        let secret = self.run.record.secret.clone().ok_or_else(|| StepError {
            leg: LegRole::Foreign,
            error: SwapError::MalformedHash("no secret to redeem with".to_string()),
        })?;
        match self.run.foreign().redeem(&secret).await {
            Ok(tx) => {
                self.run.record.redeem_tx = Some(tx);
                self.run.advance(SwapPhase::Done)?;
            }
            Err(SwapError::AlreadyRedeemed) => self.run.advance(SwapPhase::Done)?,
            Err(err @ (SwapError::Expired | SwapError::AlreadyRefunded)) => {
                warn!(error = %err, "[swap] foreign leg no longer redeemable");
                self.run.advance(SwapPhase::Refunding)?;
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

    async fn refunding(&mut self) -> Result<Step, StepError> {
        match self.run.native().refund().await {
            Ok(tx) => {
                self.run.record.refund_tx = Some(tx);
                self.run.advance(SwapPhase::Refunded)?;
                Ok(Step::Advanced)
            }
            Err(SwapError::NotYetExpired) => Ok(Step::Waiting),
            Err(SwapError::AlreadyClaimed) => self.settled_elsewhere().await,
            Err(error) => Err(StepError {
                leg: LegRole::Native,
                error,
            }),
        }
    }

    /// The native leg was claimed by someone else's transaction.
    async fn settled_elsewhere(&mut self) -> Result<Step, StepError> {
        match self.run.audit_native().await? {
            LegState::Refunded => {
                self.run.advance(SwapPhase::Refunded)?;
                Ok(Step::Advanced)
            }
            LegState::Redeemed(secret) => {
                self.run.record.secret.get_or_insert(secret);
                match self.run.audit_foreign().await? {
                    LegState::Redeemed(_) => self.run.advance(SwapPhase::Done)?,
                    LegState::Initiated(_) => self.run.advance(SwapPhase::Redeeming)?,
                    _ => {
                        return Err(StepError {
                            leg: LegRole::Foreign,
                            error: SwapError::Expired,
                        })
                    }
                }
                Ok(Step::Advanced)
            }
            _ => Err(StepError {
                leg: LegRole::Native,
                error: SwapError::AlreadyClaimed,
            }),
        }
    }
}

#[async_trait]
impl PhaseMachine for SwapExecutor {
    fn state(&mut self) -> &mut SwapRun {
        &mut self.run
    }

    async fn step(&mut self) -> Result<Step, StepError> {
        match self.run.record.phase {
            SwapPhase::Start | SwapPhase::Initiating => self.start().await,
            SwapPhase::NativeInitiated => self.native_initiated().await,
            SwapPhase::ForeignAudited => self.foreign_audited().await,
            SwapPhase::Redeeming => self.redeeming().await,
            SwapPhase::Refunding => self.refunding().await,
            SwapPhase::Done | SwapPhase::Refunded | SwapPhase::Abandoned => Ok(Step::Advanced),
        }
    }
}

#[async_trait]
impl SwapOrchestrator for SwapExecutor {
    fn swap_id(&self) -> SwapId {
        self.run.swap.id
    }

    async fn run(&mut self) -> Result<SwapOutcome, SwapFailure> {
        drive(self, "executor").await
    }
}
