//! Chain-running machinery shared by all samplers: the [`MarkovChain`] trait,
//! single-chain run loops, and the rayon-parallel [`ChainRunner`] front.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ndarray::Array2;
use num_traits::Float;
use rayon::prelude::*;

/// A Markov chain over a scalar state.
pub trait MarkovChain<T> {
    /// Does one iteration of the chain, returning the new current value.
    fn step(&mut self) -> T;

    /// The current value without stepping.
    fn current(&self) -> T;
}

/// Runs `chain` for `samples` iterations and returns the full trace: the
/// initial value followed by one entry per iteration (`samples + 1` total).
///
/// Burn-in discarding is deliberately not offered here; consumers slice off
/// whatever prefix they consider warm-up.
pub fn run_chain<T, M>(chain: &mut M, samples: usize) -> Vec<T>
where
    M: MarkovChain<T>,
{
    let mut trace = Vec::with_capacity(samples + 1);
    trace.push(chain.current());
    for _ in 0..samples {
        trace.push(chain.step());
    }
    trace
}

/// Like [`run_chain`], updating a progress bar once per iteration.
pub fn run_chain_with_progress<T, M>(chain: &mut M, samples: usize, pb: &ProgressBar) -> Vec<T>
where
    M: MarkovChain<T>,
{
    let mut trace = Vec::with_capacity(samples + 1);
    trace.push(chain.current());

    pb.set_length(samples as u64);

    for _ in 0..samples {
        trace.push(chain.step());
        pb.inc(1);
    }
    trace
}

/// A trait for "anything that owns multiple MarkovChains".
pub trait HasChains<T> {
    type Chain: MarkovChain<T> + Send;

    /// Returns a mutable reference to the vector of chains.
    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

pub trait ChainRunner<T>: HasChains<T>
where
    T: Float + Send + Sync + 'static,
{
    /// Runs every chain in parallel for `samples` iterations.
    ///
    /// Row `i` of the result is chain `i`'s full trace (`samples + 1`
    /// columns, starting at the chain's initial value).
    fn run(&mut self, samples: usize) -> Array2<T> {
        let traces: Vec<Vec<T>> = self
            .chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain(chain, samples))
            .collect();
        stack_traces(traces, samples)
    }

    /// Like [`ChainRunner::run`], with one progress bar per chain.
    fn run_progress(&mut self, samples: usize) -> Array2<T> {
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-");

        let traces: Vec<Vec<T>> = self
            .chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(samples as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                let trace = run_chain_with_progress(chain, samples, &pb);

                pb.finish_with_message("Done!");
                trace
            })
            .collect();
        stack_traces(traces, samples)
    }
}

impl<T, U: HasChains<T>> ChainRunner<T> for U where T: Float + Send + Sync + 'static {}

fn stack_traces<T: Float>(traces: Vec<Vec<T>>, samples: usize) -> Array2<T> {
    let n_chains = traces.len();
    let flat: Vec<T> = traces.into_iter().flatten().collect();
    Array2::from_shape_vec((n_chains, samples + 1), flat)
        .expect("Expected stacking chain traces to succeed")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic chain counting upwards by one.
    struct Counter {
        x: f64,
    }

    impl MarkovChain<f64> for Counter {
        fn step(&mut self) -> f64 {
            self.x += 1.0;
            self.x
        }

        fn current(&self) -> f64 {
            self.x
        }
    }

    #[test]
    fn run_chain_prepends_the_initial_value() {
        let mut chain = Counter { x: 10.0 };
        let trace = run_chain(&mut chain, 3);
        assert_eq!(trace, vec![10.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn zero_samples_yield_only_the_initial_value() {
        let mut chain = Counter { x: -1.5 };
        let trace = run_chain(&mut chain, 0);
        assert_eq!(trace, vec![-1.5]);
    }

    struct Counters {
        chains: Vec<Counter>,
    }

    impl HasChains<f64> for Counters {
        type Chain = Counter;

        fn chains_mut(&mut self) -> &mut Vec<Counter> {
            &mut self.chains
        }
    }

    #[test]
    fn runner_stacks_one_row_per_chain() {
        let mut runner = Counters {
            chains: vec![Counter { x: 0.0 }, Counter { x: 100.0 }],
        };
        let traces = runner.run(2);
        assert_eq!(traces.dim(), (2, 3));
        assert_eq!(traces.row(0).to_vec(), vec![0.0, 1.0, 2.0]);
        assert_eq!(traces.row(1).to_vec(), vec![100.0, 101.0, 102.0]);
    }
}
