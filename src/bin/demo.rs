//! A small demo: estimates the posterior mean of synthetic Gaussian data with
//! Metropolis-Hastings and compares the chain against the closed-form
//! conjugate posterior.

use mu_mcmc::core::ChainRunner;
use mu_mcmc::distributions::{GaussianProposal, NormalMeanModel};
use mu_mcmc::metropolis_hastings::{MHMarkovChain, MetropolisHastings};
use mu_mcmc::stats::{mean_and_var, ChainTracker};

use ndarray::{s, Array1};
use ndarray_stats::QuantileExt;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::error::Error;

#[cfg(feature = "csv")]
use mu_mcmc::io::csv::save_csv;

/// Main entry point: generates data from a standard normal, runs a single
/// observed chain plus several parallel chains, and prints posterior
/// summaries next to their closed-form counterparts.
fn main() -> Result<(), Box<dyn Error>> {
    const N_OBS: usize = 20;
    const SAMPLES: usize = 15_000;
    const BURNIN: usize = 500;
    const N_CHAINS: usize = 4;
    const SEED: u64 = 42;

    // Synthetic observations from a standard normal.
    let mut rng = SmallRng::seed_from_u64(SEED);
    let data: Vec<f64> = Normal::new(0.0, 1.0)?
        .sample_iter(&mut rng)
        .take(N_OBS)
        .collect();

    let model = NormalMeanModel::new(data, 1.0, 0.0, 1.0)?;
    let (post_mean, post_sd) = model.posterior_mean_sd();

    // One observed chain with a streaming tracker attached.
    let proposal = GaussianProposal::new(0.5)?;
    let mut chain = MHMarkovChain::new(model.clone(), proposal, 0.0).set_seed(SEED);
    let mut tracker = ChainTracker::new();
    let trace = chain.run_observed(SAMPLES, &mut tracker);

    let stats = tracker.stats();
    println!(
        "Generated {} draws, acceptance rate {:.2}",
        trace.len(),
        stats.p_accept
    );

    let (mean, var) = mean_and_var(&trace[BURNIN + 1..]);
    println!("Posterior mean: {mean:.4} (closed form: {post_mean:.4})");
    println!(
        "Posterior sd:   {:.4} (closed form: {post_sd:.4})",
        var.sqrt()
    );

    // Several parallel chains with progress bars.
    let proposal = GaussianProposal::new(0.5)?;
    let mut mh = MetropolisHastings::new(model, proposal, 0.0, N_CHAINS).set_seed(SEED);
    let traces = mh.run_progress(SAMPLES);

    let pooled: Vec<f64> = traces.slice(s![.., BURNIN + 1..]).iter().copied().collect();
    println!("Pooled {} post-burn-in draws:", pooled.len());
    print_histogram(&pooled, 20)?;

    #[cfg(feature = "csv")]
    {
        save_csv(&traces, "trace.csv")?;
        println!("Saved traces to trace.csv");
    }

    Ok(())
}

/// Prints a text histogram of the pooled draws.
fn print_histogram(draws: &[f64], bins: usize) -> Result<(), Box<dyn Error>> {
    if draws.len() < 2 || bins == 0 {
        return Ok(());
    }
    let arr = Array1::from_vec(draws.to_vec());
    let (min, max) = (*arr.min()?, *arr.max()?);
    if min == max {
        return Ok(());
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &x in draws {
        let idx = (((x - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let peak = *counts.iter().max().unwrap_or(&1);
    for (i, &count) in counts.iter().enumerate() {
        let lo = min + i as f64 * width;
        let bar = "#".repeat(count * 50 / peak.max(1));
        println!("{lo:8.3} | {bar}");
    }
    Ok(())
}
