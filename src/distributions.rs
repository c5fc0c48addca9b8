/*!
Defines the target and proposal distributions for the scalar normal-mean model,
along with the traits the sampler is generic over.

The target side is the *posterior density oracle*: given a candidate mean, it
evaluates the unnormalized log-posterior as the sum of a Gaussian log-prior and
the summed Gaussian log-likelihood of the observations. All arithmetic stays in
log space; with dozens of data points the raw product of per-point densities
underflows `f64` long before the chain has anything interesting to say, so raw
densities are only ever formed on demand via [`Score`].

This module is generic over the floating-point precision (e.g., `f32` or `f64`)
using the [`num_traits::Float`] trait.

# Examples

```rust
use mu_mcmc::distributions::{GaussianProposal, NormalMeanModel, Target};

let model = NormalMeanModel::new(vec![0.5, -0.5], 1.0, 0.0, 1.0)?;
let score = model.score(0.2);
println!("log-posterior at 0.2: {}", score.log_posterior());

// Random-walk proposal with step standard deviation 0.5.
let proposal = GaussianProposal::new(0.5)?;
# Ok::<(), mu_mcmc::error::SamplerError>(())
```
*/

use crate::error::{check_finite, check_positive, Result};
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use std::f64::consts::PI;

/// Gaussian log-density, evaluated without forming the raw density.
fn log_normal_pdf<T: Float>(x: T, mean: T, sd: T) -> T {
    let half = T::from(0.5).unwrap();
    let log_two_pi = T::from((2.0 * PI).ln()).unwrap();
    let z = (x - mean) / sd;
    -half * z * z - sd.ln() - half * log_two_pi
}

/// One oracle evaluation: the prior and likelihood terms of the unnormalized
/// log-posterior at a candidate mean.
///
/// The sampler only ever needs [`Score::log_posterior`]; the exponentiated
/// accessors exist for observers and display code that want raw densities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score<T> {
    pub log_prior: T,
    pub log_likelihood: T,
}

impl<T: Float> Score<T> {
    /// The unnormalized log-posterior: log-prior plus log-likelihood.
    pub fn log_posterior(&self) -> T {
        self.log_prior + self.log_likelihood
    }

    /// The prior density.
    pub fn prior(&self) -> T {
        self.log_prior.exp()
    }

    /// The likelihood of the full observation set.
    pub fn likelihood(&self) -> T {
        self.log_likelihood.exp()
    }

    /// The unnormalized posterior density.
    pub fn posterior(&self) -> T {
        self.log_posterior().exp()
    }
}

/// A target distribution over the scalar mean parameter.
///
/// Implementations must be pure: no interior mutability, no side effects, so
/// independently running chains may evaluate one shared target concurrently.
pub trait Target<T: Float> {
    /// Evaluates the prior and likelihood terms at `mu`.
    fn score(&self, mu: T) -> Score<T>;

    /// Returns the log of the unnormalized posterior density at `mu`.
    fn unnorm_log_prob(&self, mu: T) -> T {
        self.score(mu).log_posterior()
    }
}

/// A proposal distribution generating candidate means for Metropolis-Hastings.
///
/// Candidates are drawn with the chain's own RNG; proposals hold no randomness
/// of their own, which keeps a seeded chain fully reproducible.
pub trait Proposal<T: Float> {
    /// Samples a candidate from q(x' | x).
    ///
    /// Implementations must be symmetric, q(x' | x) == q(x | x'): the
    /// sampler's acceptance ratio carries no Hastings correction term.
    fn sample<R: Rng>(&self, current: T, rng: &mut R) -> T;
}

/**
The normal-likelihood, normal-prior model for an unknown mean.

Holds the observation set and the run's hyperparameters: the known likelihood
standard deviation `sigma`, and the prior mean and standard deviation. All of
them are validated once at construction and immutable afterwards, so the chain
can never observe a half-configured model.

# Examples

```rust
use mu_mcmc::distributions::NormalMeanModel;

let model = NormalMeanModel::new(vec![1.0, 2.0, 3.0], 1.0, 0.0, 1.0)?;
let (mean, sd) = model.posterior_mean_sd();
assert_eq!((mean, sd), (1.5, 0.5));
# Ok::<(), mu_mcmc::error::SamplerError>(())
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMeanModel<T> {
    data: Vec<T>,
    sigma: T,
    prior_mean: T,
    prior_sd: T,
}

impl<T: Float> NormalMeanModel<T> {
    /// Creates a model from observations and hyperparameters.
    ///
    /// Fails with [`InvalidParameter`](crate::error::SamplerError) unless
    /// `sigma` and `prior_sd` are finite and strictly positive and
    /// `prior_mean` is finite. Empty data is allowed; the posterior then
    /// coincides with the prior.
    pub fn new(data: Vec<T>, sigma: T, prior_mean: T, prior_sd: T) -> Result<Self> {
        check_positive("sigma_likelihood", sigma)?;
        check_finite("prior_mean", prior_mean)?;
        check_positive("prior_sd", prior_sd)?;
        Ok(Self {
            data,
            sigma,
            prior_mean,
            prior_sd,
        })
    }

    /// The observation set.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The known likelihood standard deviation.
    pub fn sigma(&self) -> T {
        self.sigma
    }

    /// The Gaussian log-prior at `mu`.
    pub fn log_prior(&self, mu: T) -> T {
        log_normal_pdf(mu, self.prior_mean, self.prior_sd)
    }

    /// The summed Gaussian log-likelihood of all observations at `mu`.
    pub fn log_likelihood(&self, mu: T) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + log_normal_pdf(x, mu, self.sigma))
    }

    /// The closed-form conjugate posterior, as (mean, standard deviation).
    ///
    /// The normal-normal model admits an exact posterior; the sampler never
    /// uses it, but validation collaborators (tests, demos) compare the
    /// chain's empirical moments against it.
    pub fn posterior_mean_sd(&self) -> (T, T) {
        let prior_var = self.prior_sd * self.prior_sd;
        let like_var = self.sigma * self.sigma;
        let n = T::from(self.data.len()).unwrap();
        let sum = self.data.iter().fold(T::zero(), |acc, &x| acc + x);
        let precision = T::one() / prior_var + n / like_var;
        let mean = (self.prior_mean / prior_var + sum / like_var) / precision;
        (mean, (T::one() / precision).sqrt())
    }
}

impl<T: Float> Target<T> for NormalMeanModel<T> {
    fn score(&self, mu: T) -> Score<T> {
        Score {
            log_prior: self.log_prior(mu),
            log_likelihood: self.log_likelihood(mu),
        }
    }
}

/**
A Gaussian random-walk proposal: candidate = current + N(0, `width`).

The kernel is symmetric in its arguments, which is what lets the sampler use
the plain Metropolis acceptance ratio.

# Examples

```rust
use mu_mcmc::distributions::{GaussianProposal, Proposal};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let proposal = GaussianProposal::new(0.5)?;
let mut rng = SmallRng::seed_from_u64(42);
let candidate = proposal.sample(0.0, &mut rng);
println!("candidate mean: {candidate}");
# Ok::<(), mu_mcmc::error::SamplerError>(())
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianProposal<T> {
    width: T,
}

impl<T: Float> GaussianProposal<T> {
    /// Creates a random-walk proposal with the given step standard deviation.
    ///
    /// Fails with [`InvalidParameter`](crate::error::SamplerError) unless
    /// `width` is finite and strictly positive.
    pub fn new(width: T) -> Result<Self> {
        check_positive("proposal_width", width)?;
        Ok(Self { width })
    }

    /// The step standard deviation.
    pub fn width(&self) -> T {
        self.width
    }
}

impl<T: Float> Proposal<T> for GaussianProposal<T>
where
    StandardNormal: Distribution<T>,
{
    fn sample<R: Rng>(&self, current: T, rng: &mut R) -> T {
        let step = Normal::new(T::zero(), self.width)
            .expect("Expecting creation of normal distribution to succeed.");
        current + step.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SamplerError;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn score_matches_hand_computed_log_densities() {
        let model = NormalMeanModel::new(vec![0.5, -0.5], 1.0, 0.0, 1.0).unwrap();
        let score = model.score(0.0);
        // ln N(0; 0, 1) and ln N(+-0.5; 0, 1), precomputed.
        assert_abs_diff_eq!(score.log_prior, -0.9189385332046727, epsilon = 1e-12);
        assert_abs_diff_eq!(score.log_likelihood, -2.0878770664093453, epsilon = 1e-12);
        assert_abs_diff_eq!(score.log_posterior(), -3.006815599614018, epsilon = 1e-12);
    }

    #[test]
    fn prior_density_matches_standard_normal_pdf() {
        let model = NormalMeanModel::new(vec![], 1.0, 0.0, 1.0).unwrap();
        let score = model.score(1.0);
        assert_abs_diff_eq!(score.log_prior, -1.4189385332046727, epsilon = 1e-12);
        assert_abs_diff_eq!(score.prior(), 0.24197072451914337, epsilon = 1e-12);
        // With no observations the likelihood term is empty.
        assert_eq!(score.log_likelihood, 0.0);
    }

    #[test]
    fn conjugate_posterior_matches_closed_form() {
        // n = 3, sum = 6, unit variances: precision 4, mean 1.5, sd 0.5.
        let model = NormalMeanModel::new(vec![1.0, 2.0, 3.0], 1.0, 0.0, 1.0).unwrap();
        let (mean, sd) = model.posterior_mean_sd();
        assert_abs_diff_eq!(mean, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sd, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn empty_data_posterior_is_the_prior() {
        let model = NormalMeanModel::new(Vec::<f64>::new(), 1.0, 0.7, 2.0).unwrap();
        let (mean, sd) = model.posterior_mean_sd();
        assert_abs_diff_eq!(mean, 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(sd, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn far_tail_scores_underflow_to_negative_infinity_not_nan() {
        let model = NormalMeanModel::new(vec![0.0], 1.0, 0.0, 1.0).unwrap();
        let score = model.score(1e160);
        assert_eq!(score.log_posterior(), f64::NEG_INFINITY);
        assert_eq!(score.posterior(), 0.0);
    }

    #[test]
    fn model_construction_validates_hyperparameters() {
        for (data, sigma, prior_mean, prior_sd, name) in [
            (vec![0.0], 0.0, 0.0, 1.0, "sigma_likelihood"),
            (vec![0.0], -1.0, 0.0, 1.0, "sigma_likelihood"),
            (vec![0.0], 1.0, f64::NAN, 1.0, "prior_mean"),
            (vec![0.0], 1.0, 0.0, 0.0, "prior_sd"),
            (vec![0.0], 1.0, 0.0, f64::INFINITY, "prior_sd"),
        ] {
            let err = NormalMeanModel::new(data, sigma, prior_mean, prior_sd).unwrap_err();
            let SamplerError::InvalidParameter { name: got, .. } = err;
            assert_eq!(got, name);
        }
    }

    #[test]
    fn proposal_construction_validates_width() {
        assert!(GaussianProposal::new(0.5).is_ok());
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = GaussianProposal::new(bad).unwrap_err();
            let SamplerError::InvalidParameter { name, .. } = err;
            assert_eq!(name, "proposal_width");
        }
    }

    #[test]
    fn proposal_draws_are_reproducible_per_seed() {
        let proposal = GaussianProposal::new(0.5).unwrap();
        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        let a: Vec<f64> = (0..10).map(|_| proposal.sample(1.0, &mut rng_a)).collect();
        let b: Vec<f64> = (0..10).map(|_| proposal.sample(1.0, &mut rng_b)).collect();
        assert_eq!(a, b);
        // Consecutive draws from one stream differ.
        assert!(a.windows(2).any(|w| w[0] != w[1]));
    }
}
