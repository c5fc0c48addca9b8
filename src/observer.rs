//! Per-iteration diagnostics for visualization and auditing collaborators.
//!
//! A chain run can hand a read-only [`StepSnapshot`] to an [`Observer`] after
//! every accept/reject decision. Observers are diagnostics only: the chain
//! never reads anything back, and running with a no-op observer yields a trace
//! bit-for-bit identical to an unobserved run with the same seed.

use crate::distributions::Score;
use num_traits::Float;

/// Read-only view of one Metropolis-Hastings iteration.
///
/// Every density in the snapshot is one the acceptance test already computed;
/// nothing is re-evaluated for the snapshot's benefit.
#[derive(Debug, Clone, Copy)]
pub struct StepSnapshot<'a, T: Float> {
    /// 0-based iteration index.
    pub iteration: usize,
    /// The chain's value after the accept/reject decision.
    pub current: T,
    /// The candidate drawn this iteration.
    pub proposal: T,
    /// Whether the candidate was accepted.
    pub accepted: bool,
    /// Prior/likelihood/posterior terms at the pre-decision current value.
    pub current_score: Score<T>,
    /// Prior/likelihood/posterior terms at the candidate.
    pub proposal_score: Score<T>,
    /// The trace so far, including this iteration's entry.
    pub trace: &'a [T],
}

/// Receives one [`StepSnapshot`] per iteration of an observed run.
pub trait Observer<T: Float> {
    fn on_step(&mut self, snapshot: &StepSnapshot<'_, T>);
}

/// Observer that discards every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl<T: Float> Observer<T> for NullObserver {
    fn on_step(&mut self, _snapshot: &StepSnapshot<'_, T>) {}
}
