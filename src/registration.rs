//! Elastic registration: optimal time warping of curves onto a template.
//!
//! The warping that best aligns a curve to a template under the Fisher-Rao
//! metric is found by a dynamic program over the evaluation grid: monotone
//! piecewise-linear paths from the grid's lower-left corner to its upper-right
//! corner, with segment slopes restricted to small rational steps. Cost is
//! accumulated in SRSF space, where warping acts isometrically.

use crate::error::FdaError;
use crate::grid::Fdata;
use crate::helpers::interp_linear;
use crate::iter_maybe_parallel;
use crate::srsf::srsf_transform;
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Largest numerator/denominator of the rational slope steps searched.
const MAX_SLOPE_STEP: usize = 7;

fn gcd(a: usize, b: usize) -> usize {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Grid moves (p, q): advance p points in t, q points in warped time.
fn dp_moves() -> Vec<(usize, usize)> {
    let mut moves = Vec::new();
    for p in 1..=MAX_SLOPE_STEP {
        for q in 1..=MAX_SLOPE_STEP {
            if gcd(p, q) == 1 {
                moves.push((p, q));
            }
        }
    }
    moves
}

/// Cost of the linear path segment from grid node (i0, j0) to (i1, j1).
///
/// Integrates (q1(gamma(t)) * sqrt(gamma') - q2(t))^2 by the trapezoid rule
/// over the t points the segment spans, plus the warping-intensity penalty
/// lambda * (sqrt(gamma') - 1)^2 * dt.
#[allow(clippy::too_many_arguments)]
fn segment_cost(
    q1: &[f64],
    q2: &[f64],
    t: &[f64],
    i0: usize,
    j0: usize,
    i1: usize,
    j1: usize,
    lam: f64,
) -> f64 {
    let dt = t[i1] - t[i0];
    let slope = (t[j1] - t[j0]) / dt;
    let sqrt_slope = slope.sqrt();

    let residual = |k: usize| -> f64 {
        let gamma_k = t[j0] + slope * (t[k] - t[i0]);
        let r = interp_linear(t, q1, gamma_k) * sqrt_slope - q2[k];
        r * r
    };

    let mut cost = 0.0;
    let mut prev = residual(i0);
    for k in (i0 + 1)..=i1 {
        let cur = residual(k);
        cost += 0.5 * (prev + cur) * (t[k] - t[k - 1]);
        prev = cur;
    }
    if lam > 0.0 {
        let dev = sqrt_slope - 1.0;
        cost += lam * dev * dev * dt;
    }
    cost
}

/// Optimal reparametrization of `q1` toward `q2` over the grid `t`.
///
/// Returns the warping evaluated at every grid point. The identity path is in
/// the search set, so the returned warping never costs more than no warping
/// at all.
fn optimum_reparam(q1: &[f64], q2: &[f64], t: &[f64], lam: f64) -> Vec<f64> {
    let l = t.len();
    let moves = dp_moves();

    let mut cost = vec![f64::INFINITY; l * l];
    let mut pred = vec![usize::MAX; l * l];
    cost[0] = 0.0;

    for i in 1..l {
        for j in 1..l {
            let mut best = f64::INFINITY;
            let mut best_pred = usize::MAX;
            for &(p, q) in &moves {
                if p > i || q > j {
                    continue;
                }
                let from = (i - p) * l + (j - q);
                let base = cost[from];
                if !base.is_finite() {
                    continue;
                }
                let c = base + segment_cost(q1, q2, t, i - p, j - q, i, j, lam);
                if c < best {
                    best = c;
                    best_pred = from;
                }
            }
            cost[i * l + j] = best;
            pred[i * l + j] = best_pred;
        }
    }

    // Backtrack the knot sequence from the far corner.
    let mut knots = vec![(l - 1, l - 1)];
    let mut cur = (l - 1) * l + (l - 1);
    while cur != 0 && pred[cur] != usize::MAX {
        cur = pred[cur];
        knots.push((cur / l, cur % l));
    }
    knots.reverse();

    let t_knots: Vec<f64> = knots.iter().map(|&(i, _)| t[i]).collect();
    let g_knots: Vec<f64> = knots.iter().map(|&(_, j)| t[j]).collect();
    let mut gamma: Vec<f64> = t
        .iter()
        .map(|&x| interp_linear(&t_knots, &g_knots, x))
        .collect();
    gamma[0] = t[0];
    gamma[l - 1] = t[l - 1];
    gamma
}

/// Aligns curves to a template by optimal time warping.
///
/// Construction fixes the template, the warping penalty, and the grid the
/// optimization runs on; [`fit_transform`](Self::fit_transform) warps each
/// input curve and records the warping, exposed through
/// [`warping`](Self::warping).
#[derive(Debug, Clone)]
pub struct ElasticRegistration {
    template: Fdata,
    penalty: f64,
    output_points: Vec<f64>,
    warping: Option<Fdata>,
}

impl ElasticRegistration {
    pub fn new(
        template: Fdata,
        penalty: f64,
        output_points: Vec<f64>,
    ) -> Result<Self, FdaError> {
        if template.dim_codomain() != 1 {
            return Err(FdaError::VectorValued(template.dim_codomain()));
        }
        if template.dim_domain() != 1 {
            return Err(FdaError::NonUnivariateDomain(template.dim_domain()));
        }
        if penalty < 0.0 {
            return Err(FdaError::NegativePenalty(penalty));
        }
        if output_points.len() < 2 || output_points.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FdaError::InvalidGrid { axis: 0 });
        }
        Ok(Self {
            template,
            penalty,
            output_points,
            warping: None,
        })
    }

    /// The warping fitted by the last [`fit_transform`](Self::fit_transform).
    pub fn warping(&self) -> Option<&Fdata> {
        self.warping.as_ref()
    }

    /// Warp each sample of `f` onto the template; returns the aligned sample.
    ///
    /// A single-sample template is broadcast; otherwise sample counts must
    /// match and curves are aligned pairwise.
    pub fn fit_transform(&mut self, f: &Fdata) -> Result<Fdata, FdaError> {
        if f.dim_codomain() != 1 {
            return Err(FdaError::VectorValued(f.dim_codomain()));
        }
        if f.dim_domain() != 1 {
            return Err(FdaError::NonUnivariateDomain(f.dim_domain()));
        }
        let broadcast = self.template.n_samples() == 1;
        if !broadcast && self.template.n_samples() != f.n_samples() {
            return Err(FdaError::SampleCountMismatch {
                left: f.n_samples(),
                right: self.template.n_samples(),
            });
        }

        let f_grid = f.to_grid(&self.output_points)?;
        let template_grid = self.template.to_grid(&self.output_points)?;
        let q_f = srsf_transform(&f_grid)?;
        let q_template = srsf_transform(&template_grid)?;

        let t = &self.output_points;
        let l = t.len();
        let n = f_grid.n_samples();
        let penalty = self.penalty;

        let aligned: Vec<(Vec<f64>, Vec<f64>)> = iter_maybe_parallel!(0..n)
            .map(|i| {
                let q1 = q_f.sample_slice(i);
                let q2 = q_template.sample_slice(if broadcast { 0 } else { i });
                let gamma = optimum_reparam(q1, q2, t, penalty);
                let warped: Vec<f64> = gamma.iter().map(|&g| f_grid.eval(i, g)).collect();
                (gamma, warped)
            })
            .collect();

        let mut warp_values = Vec::with_capacity(n * l);
        let mut warped_values = Vec::with_capacity(n * l);
        for (gamma, warped) in aligned {
            warp_values.extend(gamma);
            warped_values.extend(warped);
        }

        let warp_range = (t[0], t[l - 1]);
        self.warping = Some(Fdata::new(
            warp_values,
            vec![t.clone()],
            vec![warp_range],
            n,
            1,
        )?);
        Fdata::new(
            warped_values,
            vec![t.clone()],
            vec![f_grid.domain_range()[0]],
            n,
            1,
        )
    }
}

/// Rescale a warping onto the unit square.
///
/// A warping maps [a, b] onto itself; both its abscissas and its values are
/// affinely mapped onto [0, 1].
pub fn normalize_warping(w: &Fdata) -> Result<Fdata, FdaError> {
    if w.dim_codomain() != 1 {
        return Err(FdaError::VectorValued(w.dim_codomain()));
    }
    if w.dim_domain() != 1 {
        return Err(FdaError::NonUnivariateDomain(w.dim_domain()));
    }
    let (lo, hi) = w.domain_range()[0];
    let relabeled = w.with_domain(&[(0.0, 1.0)])?;
    let scale = 1.0 / (hi - lo);
    let values: Vec<f64> = relabeled.values().iter().map(|&v| (v - lo) * scale).collect();
    Fdata::new(
        values,
        relabeled.grid_points().to_vec(),
        vec![(0.0, 1.0)],
        w.n_samples(),
        1,
    )
}
