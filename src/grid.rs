//! Functional data container: samples of functions on a shared grid.
//!
//! [`Fdata`] stores N functions evaluated on a common rectangular grid over a
//! k-dimensional domain, with values in R^m. The value buffer is flat and
//! sample-major: sample `i`, flattened grid index `g` (row-major across
//! domain axes, last axis contiguous) and codomain component `c` live at
//! `(i * total_grid + g) * dim_codomain + c`.
//!
//! Construction validates the shape once; afterwards the container is
//! immutable and every operation returns a new `Fdata`.

use crate::error::FdaError;
use crate::helpers::{interp_linear, same_grid, NUMERICAL_EPS};

/// A sample of functions on a shared rectangular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Fdata {
    values: Vec<f64>,
    grid_points: Vec<Vec<f64>>,
    domain_range: Vec<(f64, f64)>,
    n_samples: usize,
    dim_codomain: usize,
}

impl Fdata {
    /// Build a functional sample from a flat sample-major value buffer.
    ///
    /// Validates that every grid is strictly increasing and contained in its
    /// domain interval, that domain intervals are non-degenerate, and that
    /// the buffer length matches `n_samples * total_grid * dim_codomain`.
    pub fn new(
        values: Vec<f64>,
        grid_points: Vec<Vec<f64>>,
        domain_range: Vec<(f64, f64)>,
        n_samples: usize,
        dim_codomain: usize,
    ) -> Result<Self, FdaError> {
        if grid_points.is_empty() || grid_points.len() != domain_range.len() {
            return Err(FdaError::GridSizeMismatch {
                left: grid_points.len(),
                right: domain_range.len(),
            });
        }
        if dim_codomain == 0 {
            return Err(FdaError::VectorValued(0));
        }
        for (axis, (grid, &(lo, hi))) in
            grid_points.iter().zip(domain_range.iter()).enumerate()
        {
            if hi - lo <= 0.0 {
                return Err(FdaError::DegenerateDomain { lo, hi });
            }
            if grid.is_empty() || grid.windows(2).any(|w| w[1] <= w[0]) {
                return Err(FdaError::InvalidGrid { axis });
            }
            if grid[0] < lo - NUMERICAL_EPS || grid[grid.len() - 1] > hi + NUMERICAL_EPS {
                return Err(FdaError::InvalidGrid { axis });
            }
        }
        let total_grid: usize = grid_points.iter().map(Vec::len).product();
        let expected = n_samples * total_grid * dim_codomain;
        if values.len() != expected {
            return Err(FdaError::ValueLength {
                expected,
                got: values.len(),
            });
        }
        Ok(Self {
            values,
            grid_points,
            domain_range,
            n_samples,
            dim_codomain,
        })
    }

    /// Build a scalar sample over a one-dimensional domain from curve rows.
    ///
    /// The domain range is taken from the grid endpoints.
    pub fn from_curves(curves: &[Vec<f64>], argvals: &[f64]) -> Result<Self, FdaError> {
        let m = argvals.len();
        if m < 2 {
            return Err(FdaError::InvalidGrid { axis: 0 });
        }
        for c in curves {
            if c.len() != m {
                return Err(FdaError::GridSizeMismatch {
                    left: c.len(),
                    right: m,
                });
            }
        }
        let mut values = Vec::with_capacity(curves.len() * m);
        for c in curves {
            values.extend_from_slice(c);
        }
        Self::new(
            values,
            vec![argvals.to_vec()],
            vec![(argvals[0], argvals[m - 1])],
            curves.len(),
            1,
        )
    }

    /// Number of functions in the sample.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Domain dimension k.
    #[inline]
    pub fn dim_domain(&self) -> usize {
        self.grid_points.len()
    }

    /// Codomain dimension m.
    #[inline]
    pub fn dim_codomain(&self) -> usize {
        self.dim_codomain
    }

    /// Per-axis grid points.
    #[inline]
    pub fn grid_points(&self) -> &[Vec<f64>] {
        &self.grid_points
    }

    /// Per-axis closed domain intervals.
    #[inline]
    pub fn domain_range(&self) -> &[(f64, f64)] {
        &self.domain_range
    }

    /// Total number of grid points across all axes.
    #[inline]
    pub fn total_grid(&self) -> usize {
        self.grid_points.iter().map(Vec::len).product()
    }

    /// Flat sample-major value buffer.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of sample `i` at flattened grid index `g`, component `c`.
    #[inline]
    pub fn value(&self, i: usize, g: usize, c: usize) -> f64 {
        self.values[(i * self.total_grid() + g) * self.dim_codomain + c]
    }

    /// Contiguous block of all values of sample `i`.
    #[inline]
    pub fn sample_slice(&self, i: usize) -> &[f64] {
        let block = self.total_grid() * self.dim_codomain;
        &self.values[i * block..(i + 1) * block]
    }

    /// Whether `other` shares this sample's grid (within tolerance).
    pub fn shares_grid(&self, other: &Fdata) -> bool {
        self.grid_points.len() == other.grid_points.len()
            && self
                .grid_points
                .iter()
                .zip(other.grid_points.iter())
                .all(|(a, b)| same_grid(a, b))
    }

    /// Affinely re-label the grid onto new domain intervals.
    ///
    /// Values are untouched: each axis's abscissas are mapped from the old
    /// domain interval onto the new one. This is the normalization step used
    /// by the elastic metrics (new range `[(0.0, 1.0)]`).
    pub fn with_domain(&self, new_range: &[(f64, f64)]) -> Result<Fdata, FdaError> {
        if new_range.len() != self.domain_range.len() {
            return Err(FdaError::GridSizeMismatch {
                left: new_range.len(),
                right: self.domain_range.len(),
            });
        }
        let mut new_grids = Vec::with_capacity(self.grid_points.len());
        for (axis, grid) in self.grid_points.iter().enumerate() {
            let (old_lo, old_hi) = self.domain_range[axis];
            let (lo, hi) = new_range[axis];
            if hi - lo <= 0.0 {
                return Err(FdaError::DegenerateDomain { lo, hi });
            }
            let scale = (hi - lo) / (old_hi - old_lo);
            new_grids.push(grid.iter().map(|&t| lo + (t - old_lo) * scale).collect());
        }
        Fdata::new(
            self.values.clone(),
            new_grids,
            new_range.to_vec(),
            self.n_samples,
            self.dim_codomain,
        )
    }

    /// Resample onto new abscissas by linear interpolation (1-d domain).
    ///
    /// Resampling onto the existing grid is an identity copy.
    pub fn to_grid(&self, eval_points: &[f64]) -> Result<Fdata, FdaError> {
        if self.dim_domain() != 1 {
            return Err(FdaError::NonUnivariateDomain(self.dim_domain()));
        }
        let old = &self.grid_points[0];
        if same_grid(old, eval_points) {
            return Ok(self.clone());
        }
        if eval_points.len() < 2 || eval_points.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FdaError::InvalidGrid { axis: 0 });
        }
        let (lo, hi) = self.domain_range[0];
        if eval_points[0] < lo - NUMERICAL_EPS
            || eval_points[eval_points.len() - 1] > hi + NUMERICAL_EPS
        {
            return Err(FdaError::InvalidGrid { axis: 0 });
        }

        let g_old = old.len();
        let g_new = eval_points.len();
        let m = self.dim_codomain;
        let mut values = Vec::with_capacity(self.n_samples * g_new * m);
        let mut component = vec![0.0; g_old];
        for i in 0..self.n_samples {
            for c in 0..m {
                for g in 0..g_old {
                    component[g] = self.value(i, g, c);
                }
                // Components interleave in the output, so stage per component
                // and write through strided positions.
                if m == 1 {
                    for &t in eval_points {
                        values.push(interp_linear(old, &component, t));
                    }
                } else {
                    if c == 0 {
                        values.resize(values.len() + g_new * m, 0.0);
                    }
                    let base = i * g_new * m;
                    for (gi, &t) in eval_points.iter().enumerate() {
                        values[base + gi * m + c] = interp_linear(old, &component, t);
                    }
                }
            }
        }
        Fdata::new(
            values,
            vec![eval_points.to_vec()],
            vec![self.domain_range[0]],
            self.n_samples,
            m,
        )
    }

    /// First derivative by finite differences along the domain axis (1-d).
    ///
    /// Central differences over the two-step span in the interior, one-sided
    /// differences at the boundaries. The one-sided boundary estimates are
    /// where derivative artifacts (e.g., small negative values for monotone
    /// warpings) concentrate.
    pub fn derivative(&self) -> Result<Fdata, FdaError> {
        if self.dim_domain() != 1 {
            return Err(FdaError::NonUnivariateDomain(self.dim_domain()));
        }
        let t = &self.grid_points[0];
        let g = t.len();
        if g < 2 {
            return Err(FdaError::InvalidGrid { axis: 0 });
        }
        let m = self.dim_codomain;
        let mut values = vec![0.0; self.values.len()];
        for i in 0..self.n_samples {
            for c in 0..m {
                let at = |gi: usize| self.value(i, gi, c);
                let base = i * g * m;
                values[base + c] = (at(1) - at(0)) / (t[1] - t[0]);
                for gi in 1..g - 1 {
                    values[base + gi * m + c] =
                        (at(gi + 1) - at(gi - 1)) / (t[gi + 1] - t[gi - 1]);
                }
                values[base + (g - 1) * m + c] =
                    (at(g - 1) - at(g - 2)) / (t[g - 1] - t[g - 2]);
            }
        }
        Fdata::new(
            values,
            self.grid_points.clone(),
            self.domain_range.clone(),
            self.n_samples,
            m,
        )
    }

    /// Evaluate scalar sample `i` at an arbitrary point (1-d domain).
    pub fn eval(&self, i: usize, t: f64) -> f64 {
        debug_assert_eq!(self.dim_domain(), 1);
        debug_assert_eq!(self.dim_codomain, 1);
        interp_linear(&self.grid_points[0], self.sample_slice(i), t)
    }
}
