use criterion::{criterion_group, criterion_main, Criterion};
use mu_mcmc::core::run_chain;
use mu_mcmc::distributions::{GaussianProposal, NormalMeanModel};
use mu_mcmc::metropolis_hastings::MHMarkovChain;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn bench_chain(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let data: Vec<f64> = Normal::new(0.0, 1.0)
        .unwrap()
        .sample_iter(&mut rng)
        .take(20)
        .collect();
    let model = NormalMeanModel::new(data, 1.0, 0.0, 1.0).unwrap();
    let proposal = GaussianProposal::new(0.5).unwrap();

    c.bench_function("run_chain_1k", |b| {
        b.iter(|| {
            let mut chain = MHMarkovChain::new(model.clone(), proposal, 0.0).set_seed(42);
            run_chain(&mut chain, 1_000)
        })
    });
}

criterion_group!(benches, bench_chain);
criterion_main!(benches);
