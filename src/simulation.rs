//! Synthetic elastic data for tests and examples.
//!
//! Generators for phase-perturbed curve samples and random boundary-fixing
//! warpings. A random warping is built by exponentiating a smooth random
//! field and normalizing its cumulative integral, which guarantees strict
//! monotonicity and fixed endpoints.

use crate::error::FdaError;
use crate::grid::Fdata;
use crate::helpers::cumulative_trapezoid;
use rand::prelude::*;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

/// Number of sinusoidal components in the random warping field.
const WARP_COMPONENTS: usize = 3;

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Values of one random boundary-fixing warping on `t`.
fn random_warping_values(t: &[f64], strength: f64, rng: &mut StdRng) -> Vec<f64> {
    let coefs: Vec<f64> = (0..WARP_COMPONENTS)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            z * strength
        })
        .collect();

    let (lo, hi) = (t[0], t[t.len() - 1]);
    let span = hi - lo;
    let speed: Vec<f64> = t
        .iter()
        .map(|&x| {
            let s = (x - lo) / span;
            let field: f64 = coefs
                .iter()
                .enumerate()
                .map(|(k, &a)| a * (2.0 * PI * (k + 1) as f64 * s).sin())
                .sum();
            field.exp()
        })
        .collect();

    let cum = cumulative_trapezoid(&speed, t);
    let total = cum[cum.len() - 1];
    cum.into_iter().map(|c| lo + span * c / total).collect()
}

/// A random monotone self-map of the grid's interval.
///
/// `strength` scales the random field; zero gives the identity warping.
pub fn sim_random_warping(
    t: &[f64],
    strength: f64,
    seed: Option<u64>,
) -> Result<Fdata, FdaError> {
    let mut rng = make_rng(seed);
    let values = random_warping_values(t, strength, &mut rng);
    Fdata::from_curves(&[values], t)
}

/// Sinusoids under random amplitude scaling and random time warping.
///
/// Each sample is (1 + a_i) sin(2 pi gamma_i(t)) with a_i ~ N(0,
/// amplitude_sd) and gamma_i a random warping of strength `phase_sd`.
pub fn sim_warped_sines(
    n: usize,
    t: &[f64],
    amplitude_sd: f64,
    phase_sd: f64,
    seed: Option<u64>,
) -> Result<Fdata, FdaError> {
    let mut rng = make_rng(seed);
    let (lo, hi) = (t[0], t[t.len() - 1]);
    let span = hi - lo;

    let curves: Vec<Vec<f64>> = (0..n)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            let amplitude = 1.0 + z * amplitude_sd;
            let gamma = random_warping_values(t, phase_sd, &mut rng);
            gamma
                .iter()
                .map(|&g| amplitude * (2.0 * PI * (g - lo) / span).sin())
                .collect()
        })
        .collect();
    Fdata::from_curves(&curves, t)
}
