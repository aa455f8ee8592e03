//! Square-root slope function (SRSF) representation.
//!
//! The SRSF of a function f is q = sign(f') * sqrt(|f'|). It is the
//! representation under which time warping acts by isometries, making the L2
//! distance between SRSFs (the Fisher-Rao distance) the base metric for
//! elastic comparison.

use crate::error::FdaError;
use crate::grid::Fdata;
use crate::helpers::cumulative_trapezoid;

/// SRSF transform of a scalar functional sample.
///
/// The derivative comes from finite differences on the sample's grid; each
/// value is mapped through sign(d) * sqrt(|d|).
pub fn srsf_transform(f: &Fdata) -> Result<Fdata, FdaError> {
    if f.dim_codomain() != 1 {
        return Err(FdaError::VectorValued(f.dim_codomain()));
    }
    let deriv = f.derivative()?;
    let values: Vec<f64> = deriv
        .values()
        .iter()
        .map(|&d| if d >= 0.0 { d.sqrt() } else { -(-d).sqrt() })
        .collect();
    Fdata::new(
        values,
        f.grid_points().to_vec(),
        f.domain_range().to_vec(),
        f.n_samples(),
        1,
    )
}

/// Reconstruct a function from its SRSF.
///
/// f(t) = initial + integral of q|q|, with the integration constant supplied
/// by the caller (the SRSF forgets the function's level).
pub fn srsf_inverse(q: &Fdata, initial: f64) -> Result<Fdata, FdaError> {
    if q.dim_codomain() != 1 {
        return Err(FdaError::VectorValued(q.dim_codomain()));
    }
    if q.dim_domain() != 1 {
        return Err(FdaError::NonUnivariateDomain(q.dim_domain()));
    }
    let argvals = &q.grid_points()[0];
    let mut values = Vec::with_capacity(q.values().len());
    for i in 0..q.n_samples() {
        let qi = q.sample_slice(i);
        let integrand: Vec<f64> = qi.iter().map(|&v| v * v.abs()).collect();
        let cum = cumulative_trapezoid(&integrand, argvals);
        values.extend(cum.into_iter().map(|v| v + initial));
    }
    Fdata::new(
        values,
        q.grid_points().to_vec(),
        q.domain_range().to_vec(),
        q.n_samples(),
        1,
    )
}
