//! Streaming and post-hoc summaries of a single chain.

use crate::observer::{Observer, StepSnapshot};
use num_traits::{Float, ToPrimitive};

/// Streaming tracker for one chain, fed through the
/// [`Observer`](crate::observer::Observer) interface.
///
/// Tracks the draw count, the empirical acceptance rate, and running mean /
/// mean-of-squares of the trace. Accumulation happens in `f64` regardless of
/// the chain's float type. The initial value of the trace is not counted; the
/// tracker sees exactly one snapshot per iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChainTracker {
    n: u64,
    accepted: u64,
    mean: f64,
    mean_sq: f64,
}

/// Point-in-time summary produced by [`ChainTracker::stats`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    pub n: u64,
    pub p_accept: f64,
    pub mean: f64,
    pub var: f64,
}

impl ChainTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbiased sample variance of the draws seen so far; NaN with fewer than
    /// two draws.
    pub fn var(&self) -> f64 {
        if self.n < 2 {
            return f64::NAN;
        }
        let n = self.n as f64;
        (self.mean_sq - self.mean * self.mean) * n / (n - 1.0)
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats {
            n: self.n,
            p_accept: if self.n == 0 {
                0.0
            } else {
                self.accepted as f64 / self.n as f64
            },
            mean: self.mean,
            var: self.var(),
        }
    }
}

impl<T: Float> Observer<T> for ChainTracker {
    fn on_step(&mut self, snapshot: &StepSnapshot<'_, T>) {
        self.n += 1;
        if snapshot.accepted {
            self.accepted += 1;
        }

        let x = snapshot.current.to_f64().unwrap_or(f64::NAN);
        let n = self.n as f64;
        self.mean = (self.mean * (n - 1.0) + x) / n;
        self.mean_sq = if self.n == 1 {
            x * x
        } else {
            (self.mean_sq * (n - 1.0) + x * x) / n
        };
    }
}

/// Mean and unbiased variance of a slice of draws.
///
/// Burn-in is the caller's business: slice off whatever prefix you consider
/// warm-up before calling this. Variance is NaN for fewer than two draws.
pub fn mean_and_var<T: Float + ToPrimitive>(draws: &[T]) -> (f64, f64) {
    if draws.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = draws.len() as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for &x in draws {
        let x = x.to_f64().unwrap_or(f64::NAN);
        sum += x;
        sum_sq += x * x;
    }
    let mean = sum / n;
    if draws.len() < 2 {
        return (mean, f64::NAN);
    }
    (mean, (sum_sq - n * mean * mean) / (n - 1.0))
}
