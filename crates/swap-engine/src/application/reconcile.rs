//! # Reconciliation
//!
//! Decides the watcher's next action from the persisted record and the
//! audited state of both legs. Pure: no I/O, no clock.
//!
//! Rules, first match wins:
//!
//! | Observation | Action |
//! |-------------|--------|
//! | record terminal | finish in that phase |
//! | foreign redeemed | finish `Done` |
//! | native refunded | finish `Refunded` |
//! | native redeemed | redeem foreign with the revealed secret |
//! | native missing | initiate, wait or abandon |
//! | native expired | refund |
//! | native locked | advance, audit, redeem or wait |

use crate::algorithms::audit_counterparty_lock;
use crate::domain::{
    DelayKind, LegDescriptor, LegRole, LegState, SecureSecret, SwapError, SwapPhase, SwapRecord,
};

/// Everything the decision depends on.
#[derive(Debug)]
pub struct Observation<'a> {
    /// Persisted record.
    pub record: &'a SwapRecord,
    /// Our outgoing leg as bound.
    pub native_leg: &'a LegDescriptor,
    /// Our incoming leg as agreed.
    pub foreign_leg: &'a LegDescriptor,
    /// Audited native leg.
    pub native: &'a LegState,
    /// Audited foreign leg.
    pub foreign: &'a LegState,
    /// Safety skew.
    pub skew: u64,
    /// Orchestrator time.
    pub now: u64,
}

/// Next watcher action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Persist the terminal phase and stop.
    Finish(SwapPhase),
    /// Persist a phase already confirmed on chain.
    Advance(SwapPhase),
    /// Lock the native leg.
    Initiate,
    /// Redeem the foreign leg.
    Redeem(SecureSecret),
    /// Refund the native leg.
    Refund,
    /// Nothing to do this poll. Optionally a late counterparty.
    Wait(Option<DelayKind>),
    /// Stop for manual intervention.
    Halt(LegRole, SwapError),
}

/// Next action for `obs`.
pub fn reconcile(obs: &Observation<'_>) -> Action {
    let record = obs.record;
    if record.phase.is_terminal() {
        return Action::Finish(record.phase);
    }
    if matches!(obs.foreign, LegState::Redeemed(_)) {
        return Action::Finish(SwapPhase::Done);
    }

    match obs.native {
        LegState::Refunded => Action::Finish(SwapPhase::Refunded),
        LegState::Redeemed(secret) => match obs.foreign {
            LegState::Initiated(_) => Action::Redeem(secret.clone()),
            _ => Action::Halt(LegRole::Foreign, SwapError::Expired),
        },
        LegState::NotFound => native_missing(obs),
        LegState::Expired(_) => Action::Refund,
        LegState::Initiated(_) => native_locked(obs),
    }
}

fn native_missing(obs: &Observation<'_>) -> Action {
    if obs.now >= obs.native_leg.expiry {
        return Action::Finish(SwapPhase::Abandoned);
    }
    if obs.record.initiates_first {
        return Action::Initiate;
    }
    match obs.foreign {
        LegState::NotFound => Action::Wait(Some(DelayKind::CounterpartyInitiation)),
        LegState::Initiated(lock) => {
            match audit_counterparty_lock(lock, obs.foreign_leg, obs.native_leg.expiry, obs.skew, false) {
                Ok(()) => Action::Initiate,
                Err(err) => Action::Halt(LegRole::Foreign, err),
            }
        }
        _ => Action::Finish(SwapPhase::Abandoned),
    }
}

fn native_locked(obs: &Observation<'_>) -> Action {
    let phase = obs.record.phase;
    if phase < SwapPhase::NativeInitiated {
        return Action::Advance(SwapPhase::NativeInitiated);
    }
    if !obs.record.initiates_first {
        // Foreign leg was audited before we locked.
        if phase < SwapPhase::ForeignAudited {
            return Action::Advance(SwapPhase::ForeignAudited);
        }
        return Action::Wait(Some(DelayKind::CounterpartyRedemption));
    }

    match obs.foreign {
        LegState::NotFound => Action::Wait(Some(DelayKind::CounterpartyInitiation)),
        LegState::Initiated(lock) => {
            if let Err(err) =
                audit_counterparty_lock(lock, obs.foreign_leg, obs.native_leg.expiry, obs.skew, true)
            {
                return Action::Halt(LegRole::Foreign, err);
            }
            if phase < SwapPhase::ForeignAudited {
                return Action::Advance(SwapPhase::ForeignAudited);
            }
            match &obs.record.secret {
                Some(secret) => Action::Redeem(secret.clone()),
                None => Action::Halt(
                    LegRole::Native,
                    SwapError::MalformedHash("first mover record has no secret".to_string()),
                ),
            }
        }
        // Counterparty leg gone. Our refund opens at native expiry.
        _ => Action::Wait(None),
    }
}
