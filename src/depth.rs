//! Functional depth measures.
//!
//! Three estimators ordering a sample of functions from most central to most
//! outlying: [`IntegratedDepth`] (pointwise depth averaged over the domain),
//! [`ModifiedBandDepth`] (its simplicial specialization), and [`BandDepth`]
//! (all-or-nothing graph containment in bands spanned by reference pairs).
//! All follow the `fit` / `predict` shape and declare their score bounds via
//! `min` / `max`.

use crate::error::FdaError;
use crate::grid::Fdata;
use crate::helpers::integrate_simpson;
use crate::iter_maybe_parallel;
use crate::multivariate::{MultivariateDepth, SimplicialDepth, UnivariateFraimanMuniz};
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Functional depth as the domain average of a pointwise depth.
///
/// Applies the wrapped [`MultivariateDepth`] at every grid location, then
/// integrates axis by axis (last domain axis first) with Simpson's rule,
/// dividing by each axis's interval length. The result is the average
/// pointwise depth over the domain, so the wrapped primitive's bounds carry
/// over unchanged.
#[derive(Debug, Clone)]
pub struct IntegratedDepth<D: MultivariateDepth> {
    multivariate: D,
    grid_points: Vec<Vec<f64>>,
    domain_range: Vec<(f64, f64)>,
    fitted: bool,
}

impl Default for IntegratedDepth<UnivariateFraimanMuniz> {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegratedDepth<UnivariateFraimanMuniz> {
    /// Integrated depth with the Fraiman-Muniz pointwise primitive.
    pub fn new() -> Self {
        Self::with_multivariate(UnivariateFraimanMuniz::new())
    }
}

impl<D: MultivariateDepth> IntegratedDepth<D> {
    /// Integrated depth over an arbitrary pointwise primitive.
    pub fn with_multivariate(multivariate: D) -> Self {
        Self {
            multivariate,
            grid_points: Vec::new(),
            domain_range: Vec::new(),
            fitted: false,
        }
    }

    /// Record the sample's domain and fit the pointwise primitive.
    pub fn fit(&mut self, sample: &Fdata) -> Result<(), FdaError> {
        self.multivariate.fit(sample)?;
        self.grid_points = sample.grid_points().to_vec();
        self.domain_range = sample.domain_range().to_vec();
        self.fitted = true;
        Ok(())
    }

    /// One depth score per member of `query`.
    pub fn predict(&self, query: &Fdata) -> Result<Vec<f64>, FdaError> {
        if !self.fitted {
            return Err(FdaError::NotFitted);
        }
        let g_total: usize = self.grid_points.iter().map(Vec::len).product();
        if query.total_grid() != g_total {
            return Err(FdaError::GridSizeMismatch {
                left: query.total_grid(),
                right: g_total,
            });
        }
        let pointwise = self.multivariate.predict(query)?;

        let depths = (0..query.n_samples())
            .map(|i| {
                let mut vals = pointwise[i * g_total..(i + 1) * g_total].to_vec();
                // Integrate the last axis first: its points are contiguous in
                // the row-major layout, so each chunk is one fibre.
                for axis in (0..self.grid_points.len()).rev() {
                    let argvals = &self.grid_points[axis];
                    let (lo, hi) = self.domain_range[axis];
                    vals = vals
                        .chunks(argvals.len())
                        .map(|fibre| integrate_simpson(fibre, argvals) / (hi - lo))
                        .collect();
                }
                vals[0]
            })
            .collect();
        Ok(depths)
    }

    /// Smallest reachable depth score (forwarded from the primitive).
    pub fn min(&self) -> f64 {
        self.multivariate.min()
    }

    /// Largest reachable depth score (forwarded from the primitive).
    pub fn max(&self) -> f64 {
        self.multivariate.max()
    }
}

/// Modified band depth: integrated simplicial depth.
///
/// Per sample function, the average over the domain of the fraction of
/// reference pairs whose band contains the function's value at that location:
/// containment as a proportion of the domain rather than [`BandDepth`]'s
/// all-or-nothing criterion.
#[derive(Debug, Clone)]
pub struct ModifiedBandDepth {
    inner: IntegratedDepth<SimplicialDepth>,
}

impl Default for ModifiedBandDepth {
    fn default() -> Self {
        Self::new()
    }
}

impl ModifiedBandDepth {
    pub fn new() -> Self {
        Self {
            inner: IntegratedDepth::with_multivariate(SimplicialDepth::new()),
        }
    }

    pub fn fit(&mut self, sample: &Fdata) -> Result<(), FdaError> {
        self.inner.fit(sample)
    }

    pub fn predict(&self, query: &Fdata) -> Result<Vec<f64>, FdaError> {
        self.inner.predict(query)
    }

    pub fn min(&self) -> f64 {
        self.inner.min()
    }

    pub fn max(&self) -> f64 {
        self.inner.max()
    }
}

/// Band depth: fraction of reference pairs whose band contains the whole
/// graph of the queried function.
///
/// Containment must hold at every grid point simultaneously; the band has no
/// orientation (the query may run between the pair in either order pointwise).
/// The C(N,2) pair enumeration is the definition, not an implementation
/// shortcut, and is iterated lazily rather than materialized.
#[derive(Debug, Clone, Default)]
pub struct BandDepth {
    reference: Option<Fdata>,
}

impl BandDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the reference sample.
    ///
    /// Requires scalar-valued functions and at least two reference members
    /// (a single member spans no pairs, leaving the depth undefined).
    pub fn fit(&mut self, sample: &Fdata) -> Result<(), FdaError> {
        if sample.dim_codomain() != 1 {
            return Err(FdaError::VectorValued(sample.dim_codomain()));
        }
        if sample.n_samples() < 2 {
            return Err(FdaError::InsufficientSample {
                required: 2,
                got: sample.n_samples(),
            });
        }
        self.reference = Some(sample.clone());
        Ok(())
    }

    /// One depth score per member of `query`.
    pub fn predict(&self, query: &Fdata) -> Result<Vec<f64>, FdaError> {
        let reference = self.reference.as_ref().ok_or(FdaError::NotFitted)?;
        if query.dim_codomain() != 1 {
            return Err(FdaError::VectorValued(query.dim_codomain()));
        }
        let g = reference.total_grid();
        if query.total_grid() != g {
            return Err(FdaError::GridSizeMismatch {
                left: query.total_grid(),
                right: g,
            });
        }
        let n_ref = reference.n_samples();
        let n_pairs = (n_ref * (n_ref - 1) / 2) as f64;

        let depths: Vec<f64> = iter_maybe_parallel!(0..query.n_samples())
            .map(|i| {
                let x = query.sample_slice(i);
                let mut contained = 0usize;
                for j in 0..n_ref {
                    let f1 = reference.sample_slice(j);
                    for k in (j + 1)..n_ref {
                        let f2 = reference.sample_slice(k);
                        let inside = (0..g).all(|t| {
                            (f1[t] <= x[t] && x[t] <= f2[t])
                                || (f2[t] <= x[t] && x[t] <= f1[t])
                        });
                        if inside {
                            contained += 1;
                        }
                    }
                }
                contained as f64 / n_pairs
            })
            .collect();
        Ok(depths)
    }

    pub fn min(&self) -> f64 {
        0.0
    }

    pub fn max(&self) -> f64 {
        1.0
    }
}
