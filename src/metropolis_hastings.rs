/*!
# Metropolis–Hastings Sampler

This module implements a single-site Metropolis–Hastings sampler over a scalar
mean parameter, generic over any target distribution `D` and proposal
distribution `Q` implementing the [`Target`] and [`Proposal`] traits. The
sampler can run multiple independent Markov chains in parallel, each
initialized with the same starting value. A global seed is used to ensure
reproducibility, and each chain gets a unique seed by adding its index to the
global seed.

## Overview

- **Target Distribution (`D`)**: The posterior density oracle; provides the
  unnormalized log-posterior (split into prior and likelihood terms) via the
  [`Target`] trait.
- **Proposal Distribution (`Q`)**: Generates symmetric random-walk candidates
  via the [`Proposal`] trait, drawing from the chain's own RNG.
- **Parallel Chains**: The sampler maintains a vector of [`MHMarkovChain`]
  instances, each evolving independently with a chain-local RNG.
- **Observation**: A single chain can emit a read-only snapshot per iteration
  to an [`Observer`](crate::observer::Observer); observers never influence the
  chain.

The acceptance test works entirely in log space. The one place the textbook
ratio `p(proposed) / p(current)` is ill-defined is when a density underflows
to zero: a zero-density current value is always escaped (acceptance
probability clamps to 1), and a zero-density candidate is always rejected,
which also covers the degenerate 0/0 case.

## Example Usage

```rust
use mu_mcmc::core::ChainRunner;
use mu_mcmc::distributions::{GaussianProposal, NormalMeanModel};
use mu_mcmc::metropolis_hastings::MetropolisHastings;

let model = NormalMeanModel::new(vec![0.3, -0.1, 0.8], 1.0, 0.0, 1.0)?;
let proposal = GaussianProposal::new(0.5)?;

// Two chains, both starting at 0.0.
let mut mh = MetropolisHastings::new(model, proposal, 0.0, 2).set_seed(42);

let traces = mh.run(100);
assert_eq!(traces.dim(), (2, 101));
assert_eq!(traces[(0, 0)], 0.0);
# Ok::<(), mu_mcmc::error::SamplerError>(())
```

See also the documentation for [`MHMarkovChain`] and the methods below.
*/

use num_traits::Float;
use rand::prelude::*;

use crate::core::{HasChains, MarkovChain};
use crate::distributions::{Proposal, Score, Target};
use crate::observer::{Observer, StepSnapshot};

/**
The Metropolis–Hastings sampler generates draws from a target distribution by
proposing candidate means and accepting or rejecting them with the Metropolis
criterion.

# Type Parameters
- `T`: The floating-point type of the parameter (e.g. `f32` or `f64`).
- `D`: The target distribution type. Must implement [`Target`].
- `Q`: The proposal distribution type. Must implement [`Proposal`].

The sampler maintains multiple independent Markov chains (each represented by
[`MHMarkovChain`]) that are run in parallel. A global random seed is provided,
and each chain's RNG is seeded by adding the chain's index to the global seed,
ensuring reproducibility.

# Examples

```rust
use mu_mcmc::distributions::{GaussianProposal, NormalMeanModel};
use mu_mcmc::metropolis_hastings::MetropolisHastings;

let model = NormalMeanModel::new(vec![0.5, -0.5], 1.0, 0.0, 1.0)?;
let proposal = GaussianProposal::new(1.0)?;
let mh = MetropolisHastings::new(model, proposal, 0.0, 2).set_seed(42);
assert_eq!(mh.chains[0].seed, 42);
assert_eq!(mh.chains[1].seed, 43);
# Ok::<(), mu_mcmc::error::SamplerError>(())
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct MetropolisHastings<T, D, Q> {
    /// The target distribution we want to sample from.
    pub target: D,
    /// The proposal distribution used to generate candidate means.
    pub proposal: Q,
    /// The vector of independent Markov chains.
    pub chains: Vec<MHMarkovChain<T, D, Q>>,
    /// The global random seed.
    pub seed: u64,
}

/// A single Markov chain for the Metropolis–Hastings algorithm.
///
/// Each chain stores its own copy of the target and proposal distributions,
/// maintains its current value, and owns the chain-local random number
/// generator that drives both the candidate draw and the acceptance test.
#[derive(Debug, Clone, PartialEq)]
pub struct MHMarkovChain<T, D, Q> {
    /// The target distribution to sample from.
    pub target: D,
    /// The proposal distribution used to generate candidate means.
    pub proposal: Q,
    /// The current value of the chain.
    pub current: T,
    /// The chain-specific random seed.
    pub seed: u64,
    /// The random number generator for this chain.
    pub rng: SmallRng,
}

/// Everything one iteration computed, kept for snapshot construction.
struct StepOutcome<T> {
    current: T,
    candidate: T,
    accepted: bool,
    current_score: Score<T>,
    candidate_score: Score<T>,
}

impl<T, D, Q> MetropolisHastings<T, D, Q>
where
    D: Target<T> + Clone,
    Q: Proposal<T> + Clone,
    T: Float,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /// Constructs a sampler with `n_chains` parallel chains, all initialized
    /// at `mu_init`.
    ///
    /// Chains are seeded from entropy; call [`set_seed`](Self::set_seed) for
    /// reproducible runs.
    pub fn new(target: D, proposal: Q, mu_init: T, n_chains: usize) -> Self {
        let chains = (0..n_chains)
            .map(|_| MHMarkovChain::new(target.clone(), proposal.clone(), mu_init))
            .collect();
        let seed = thread_rng().gen::<u64>();

        Self {
            target,
            proposal,
            chains,
            seed,
        }
    }

    /// Sets a new global seed and reseeds each chain with `seed + i`, where
    /// `i` is the chain index.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        for (i, chain) in self.chains.iter_mut().enumerate() {
            let chain_seed = seed + i as u64;
            chain.seed = chain_seed;
            chain.rng = SmallRng::seed_from_u64(chain_seed);
        }
        self
    }
}

impl<T, D, Q> HasChains<T> for MetropolisHastings<T, D, Q>
where
    D: Target<T> + Clone + Send,
    Q: Proposal<T> + Clone + Send,
    T: Float + Send,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    type Chain = MHMarkovChain<T, D, Q>;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
        &mut self.chains
    }
}

impl<T, D, Q> MHMarkovChain<T, D, Q>
where
    D: Target<T>,
    Q: Proposal<T>,
    T: Float,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /// Creates a chain starting at `mu_init`, seeded from entropy.
    pub fn new(target: D, proposal: Q, mu_init: T) -> Self {
        let seed = thread_rng().gen::<u64>();
        Self {
            target,
            proposal,
            current: mu_init,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Returns the chain reseeded with `seed`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Runs the chain for `samples` iterations, handing `observer` one
    /// snapshot per iteration.
    ///
    /// Returns the full trace (`samples + 1` entries, starting at the initial
    /// value), exactly as an unobserved [`run_chain`](crate::core::run_chain)
    /// with the same seed would.
    pub fn run_observed<O>(&mut self, samples: usize, observer: &mut O) -> Vec<T>
    where
        O: Observer<T>,
    {
        let mut trace = Vec::with_capacity(samples + 1);
        trace.push(self.current);
        for iteration in 0..samples {
            let outcome = self.step_full();
            trace.push(outcome.current);
            observer.on_step(&StepSnapshot {
                iteration,
                current: outcome.current,
                proposal: outcome.candidate,
                accepted: outcome.accepted,
                current_score: outcome.current_score,
                proposal_score: outcome.candidate_score,
                trace: &trace,
            });
        }
        trace
    }

    /// One Metropolis–Hastings update.
    ///
    /// Draws a candidate from the proposal, scores both points through the
    /// target exactly once each, and accepts with probability
    /// `min(1, p(candidate) / p(current))`, evaluated in log space as
    /// `ln u < log_ratio` for `u ~ Uniform[0, 1)`.
    ///
    /// Zero-density edge cases are resolved explicitly rather than left to
    /// IEEE arithmetic: a candidate whose log-density is `-inf` is always
    /// rejected (this covers the 0/0 case where the current value is equally
    /// degenerate), while a `-inf` current value with a finite candidate is
    /// always accepted.
    fn step_full(&mut self) -> StepOutcome<T> {
        let candidate = self.proposal.sample(self.current, &mut self.rng);
        let current_score = self.target.score(self.current);
        let candidate_score = self.target.score(candidate);
        let current_lp = current_score.log_posterior();
        let candidate_lp = candidate_score.log_posterior();

        let log_ratio = if candidate_lp == T::neg_infinity() {
            T::neg_infinity()
        } else if current_lp == T::neg_infinity() {
            T::infinity()
        } else {
            candidate_lp - current_lp
        };

        let u: T = self.rng.gen();
        let accepted = u.ln() < log_ratio;
        if accepted {
            self.current = candidate;
        }

        StepOutcome {
            current: self.current,
            candidate,
            accepted,
            current_score,
            candidate_score,
        }
    }
}

impl<T, D, Q> MarkovChain<T> for MHMarkovChain<T, D, Q>
where
    D: Target<T>,
    Q: Proposal<T>,
    T: Float,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    fn step(&mut self) -> T {
        self.step_full().current
    }

    fn current(&self) -> T {
        self.current
    }
}
