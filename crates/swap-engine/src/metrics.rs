//! # Swap Metrics
//!
//! Prometheus metrics for swap orchestration.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! swap-engine = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `swap_phase_transitions_total` - Counter of persisted phase transitions (by phase)
//! - `swap_outcomes_total` - Counter of finished runs (by outcome)
//! - `swap_failures_total` - Counter of halted runs (by error class)
//! - `swap_chain_retries_total` - Counter of transient chain retries (by chain)
//! - `swap_delay_complaints_total` - Counter of delay complaints sent (by kind)
//! - `swap_active_runs` - Gauge of orchestrator runs in progress

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Persisted phase transitions, labeled by phase
    pub static ref PHASE_TRANSITIONS: IntCounterVec = register_int_counter_vec!(
        "swap_phase_transitions_total",
        "Total number of persisted swap phase transitions",
        &["phase"]
    )
    .expect("Failed to create PHASE_TRANSITIONS metric");

    /// Finished runs, labeled by outcome
    pub static ref OUTCOMES: IntCounterVec = register_int_counter_vec!(
        "swap_outcomes_total",
        "Total number of finished orchestrator runs",
        &["outcome"]
    )
    .expect("Failed to create OUTCOMES metric");

    /// Halted runs, labeled by error class
    pub static ref FAILURES: IntCounterVec = register_int_counter_vec!(
        "swap_failures_total",
        "Total number of halted orchestrator runs",
        &["class"]
    )
    .expect("Failed to create FAILURES metric");

    /// Transient chain retries, labeled by chain
    pub static ref CHAIN_RETRIES: IntCounterVec = register_int_counter_vec!(
        "swap_chain_retries_total",
        "Total number of transient chain failures retried",
        &["chain"]
    )
    .expect("Failed to create CHAIN_RETRIES metric");

    /// Delay complaints, labeled by kind
    pub static ref DELAY_COMPLAINTS: IntCounterVec = register_int_counter_vec!(
        "swap_delay_complaints_total",
        "Total number of delay complaints sent",
        &["kind"]
    )
    .expect("Failed to create DELAY_COMPLAINTS metric");

    /// Runs in progress
    pub static ref ACTIVE_RUNS: IntGauge = register_int_gauge!(
        "swap_active_runs",
        "Number of orchestrator runs in progress"
    )
    .expect("Failed to create ACTIVE_RUNS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a persisted phase transition
#[cfg(feature = "metrics")]
pub fn record_phase_transition(phase: &str) {
    PHASE_TRANSITIONS.with_label_values(&[phase]).inc();
}

/// Record a finished run
#[cfg(feature = "metrics")]
pub fn record_outcome(outcome: &str) {
    OUTCOMES.with_label_values(&[outcome]).inc();
}

/// Record a halted run
#[cfg(feature = "metrics")]
pub fn record_failure(class: &str) {
    FAILURES.with_label_values(&[class]).inc();
}

/// Record a transient chain retry
#[cfg(feature = "metrics")]
pub fn record_chain_retry(chain: &str) {
    CHAIN_RETRIES.with_label_values(&[chain]).inc();
}

/// Record a delay complaint
#[cfg(feature = "metrics")]
pub fn record_delay_complaint(kind: &str) {
    DELAY_COMPLAINTS.with_label_values(&[kind]).inc();
}

/// Mark a run started
#[cfg(feature = "metrics")]
pub fn run_started() {
    ACTIVE_RUNS.inc();
}

/// Mark a run finished
#[cfg(feature = "metrics")]
pub fn run_finished() {
    ACTIVE_RUNS.dec();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_phase_transition(_phase: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_outcome(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_failure(_class: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_chain_retry(_chain: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_delay_complaint(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn run_started() {}

#[cfg(not(feature = "metrics"))]
pub fn run_finished() {}
