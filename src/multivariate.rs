//! Pointwise (multivariate) depth primitives.
//!
//! A [`MultivariateDepth`] scores each grid location of a queried function
//! against the cloud of reference values at that same location. The
//! functional depth estimators in [`crate::depth`] lift these primitives to
//! whole functions by integrating over the domain.

use crate::error::FdaError;
use crate::grid::Fdata;

/// Strategy interface for pointwise depth computation.
///
/// `fit` stores whatever the primitive needs from the reference sample;
/// `predict` returns one depth value per (sample, grid point) of the query,
/// sample-major (`i * total_grid + g`). Implementations declare their
/// theoretical depth bounds through `min` / `max`.
pub trait MultivariateDepth {
    fn fit(&mut self, reference: &Fdata) -> Result<(), FdaError>;

    fn predict(&self, query: &Fdata) -> Result<Vec<f64>, FdaError>;

    /// Smallest depth value the primitive can produce.
    fn min(&self) -> f64 {
        0.0
    }

    /// Largest depth value the primitive can produce.
    fn max(&self) -> f64 {
        1.0
    }
}

/// Sorted reference values per grid location, shared by both primitives.
fn sorted_columns(reference: &Fdata) -> Result<Vec<Vec<f64>>, FdaError> {
    if reference.dim_codomain() != 1 {
        return Err(FdaError::VectorValued(reference.dim_codomain()));
    }
    let n = reference.n_samples();
    let g = reference.total_grid();
    let mut columns = vec![Vec::with_capacity(n); g];
    for i in 0..n {
        let row = reference.sample_slice(i);
        for (gi, &v) in row.iter().enumerate() {
            columns[gi].push(v);
        }
    }
    for col in &mut columns {
        col.sort_by(|a, b| a.partial_cmp(b).unwrap());
    }
    Ok(columns)
}

fn check_query(query: &Fdata, n_cols: usize) -> Result<(), FdaError> {
    if query.dim_codomain() != 1 {
        return Err(FdaError::VectorValued(query.dim_codomain()));
    }
    if query.total_grid() != n_cols {
        return Err(FdaError::GridSizeMismatch {
            left: query.total_grid(),
            right: n_cols,
        });
    }
    Ok(())
}

/// Univariate Fraiman-Muniz depth: D(x) = 1 - |1/2 - F(x)|.
///
/// F is the empirical distribution of the reference values at each grid
/// location, with ties counted as below-or-equal. Depth values lie in
/// [1/2, 1].
#[derive(Debug, Clone, Default)]
pub struct UnivariateFraimanMuniz {
    columns: Vec<Vec<f64>>,
}

impl UnivariateFraimanMuniz {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MultivariateDepth for UnivariateFraimanMuniz {
    fn fit(&mut self, reference: &Fdata) -> Result<(), FdaError> {
        if reference.n_samples() == 0 {
            return Err(FdaError::InsufficientSample {
                required: 1,
                got: 0,
            });
        }
        self.columns = sorted_columns(reference)?;
        Ok(())
    }

    fn predict(&self, query: &Fdata) -> Result<Vec<f64>, FdaError> {
        if self.columns.is_empty() {
            return Err(FdaError::NotFitted);
        }
        check_query(query, self.columns.len())?;
        let n_ref = self.columns[0].len() as f64;
        let g = self.columns.len();
        let mut out = Vec::with_capacity(query.n_samples() * g);
        for i in 0..query.n_samples() {
            let row = query.sample_slice(i);
            for (gi, &x) in row.iter().enumerate() {
                let le = self.columns[gi].partition_point(|&v| v <= x);
                let ecdf = le as f64 / n_ref;
                out.push(1.0 - (0.5 - ecdf).abs());
            }
        }
        Ok(out)
    }

    fn min(&self) -> f64 {
        0.5
    }
}

/// Simplicial depth for scalar values.
///
/// Scores a point by the fraction of unordered pairs of reference values
/// whose segment contains it. Computed in closed form from the counts of
/// reference values strictly below and strictly above:
/// D(x) = 1 - [b(b-1) + a(a-1)] / [N(N-1)].
#[derive(Debug, Clone, Default)]
pub struct SimplicialDepth {
    columns: Vec<Vec<f64>>,
}

impl SimplicialDepth {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MultivariateDepth for SimplicialDepth {
    fn fit(&mut self, reference: &Fdata) -> Result<(), FdaError> {
        if reference.n_samples() < 2 {
            return Err(FdaError::InsufficientSample {
                required: 2,
                got: reference.n_samples(),
            });
        }
        self.columns = sorted_columns(reference)?;
        Ok(())
    }

    fn predict(&self, query: &Fdata) -> Result<Vec<f64>, FdaError> {
        if self.columns.is_empty() {
            return Err(FdaError::NotFitted);
        }
        check_query(query, self.columns.len())?;
        let n_ref = self.columns[0].len();
        let total_pairs = (n_ref * (n_ref - 1)) as f64;
        let g = self.columns.len();
        let mut out = Vec::with_capacity(query.n_samples() * g);
        for i in 0..query.n_samples() {
            let row = query.sample_slice(i);
            for (gi, &x) in row.iter().enumerate() {
                let col = &self.columns[gi];
                let below = col.partition_point(|&v| v < x);
                let above = n_ref - col.partition_point(|&v| v <= x);
                let outside = (below * below.saturating_sub(1)
                    + above * above.saturating_sub(1)) as f64;
                out.push(1.0 - outside / total_pairs);
            }
        }
        Ok(out)
    }
}
