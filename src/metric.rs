//! Elastic distance metrics for functional data.
//!
//! Four related distances built on the SRSF representation: the Fisher-Rao
//! distance (L2 between SRSFs), the amplitude distance (Fisher-Rao minimized
//! over warpings, optionally penalized), the phase distance (how far the
//! optimal warping is from the identity), and the distance between warping
//! functions on the unit Hilbert sphere of their SRSFs.
//!
//! All four operate elementwise on equal-length samples: the i-th curve of
//! the first operand is compared with the i-th curve of the second, and a
//! scalar distance is the single-sample case. Inputs over a domain other than
//! [0, 1] are affinely normalized first; the inputs themselves are never
//! modified.

use crate::error::FdaError;
use crate::grid::Fdata;
use crate::helpers::{clamp_unit, floor_negative, integrate_simpson, l2_distance};
use crate::registration::{normalize_warping, ElasticRegistration};
use crate::srsf::srsf_transform;

/// Check the operand pair and bring both onto one grid.
fn cast_to_grid(
    fdata1: &Fdata,
    fdata2: &Fdata,
    eval_points: Option<&[f64]>,
) -> Result<(Fdata, Fdata), FdaError> {
    for f in [fdata1, fdata2] {
        if f.dim_codomain() != 1 {
            return Err(FdaError::VectorValued(f.dim_codomain()));
        }
        if f.dim_domain() != 1 {
            return Err(FdaError::NonUnivariateDomain(f.dim_domain()));
        }
    }
    if fdata1.n_samples() != fdata2.n_samples() {
        return Err(FdaError::SampleCountMismatch {
            left: fdata1.n_samples(),
            right: fdata2.n_samples(),
        });
    }
    match eval_points {
        Some(points) => Ok((fdata1.to_grid(points)?, fdata2.to_grid(points)?)),
        None => {
            if fdata1.shares_grid(fdata2) {
                Ok((fdata1.clone(), fdata2.clone()))
            } else {
                let points = fdata1.grid_points()[0].clone();
                Ok((fdata1.clone(), fdata2.to_grid(&points)?))
            }
        }
    }
}

/// Normalize a pair onto the unit domain (grid re-labeled, values untouched).
fn normalize_pair(fdata1: &Fdata, fdata2: &Fdata) -> Result<(Fdata, Fdata), FdaError> {
    Ok((
        fdata1.with_domain(&[(0.0, 1.0)])?,
        fdata2.with_domain(&[(0.0, 1.0)])?,
    ))
}

/// Per-pair L2 distance between the SRSFs of two aligned samples.
fn srsf_l2(fdata1: &Fdata, fdata2: &Fdata) -> Result<Vec<f64>, FdaError> {
    let q1 = srsf_transform(fdata1)?;
    let q2 = srsf_transform(fdata2)?;
    let argvals = &q1.grid_points()[0];
    Ok((0..q1.n_samples())
        .map(|i| l2_distance(q1.sample_slice(i), q2.sample_slice(i), argvals))
        .collect())
}

/// Fisher-Rao distance between two functional samples.
///
/// Both samples are cast onto a common grid (resampling the second onto the
/// first's grid when they differ, or onto `eval_points` when given),
/// normalized onto the unit domain, and compared as SRSFs in L2. Returns one
/// distance per sample pair.
pub fn fisher_rao_distance(
    fdata1: &Fdata,
    fdata2: &Fdata,
    eval_points: Option<&[f64]>,
) -> Result<Vec<f64>, FdaError> {
    let (f1, f2) = cast_to_grid(fdata1, fdata2, eval_points)?;
    let (f1, f2) = normalize_pair(&f1, &f2)?;
    srsf_l2(&f1, &f2)
}

/// Amplitude distance: Fisher-Rao distance minimized over time warpings.
///
/// The first sample is elastically registered to the second under the
/// penalty `lam`; the distance is the Fisher-Rao distance of the aligned
/// pair. For `lam > 0`, the warping intensity lam * integral (sqrt(gamma') -
/// 1)^2 is added under the square root; for `lam == 0` the warping derivative
/// is never evaluated.
pub fn amplitude_distance(
    fdata1: &Fdata,
    fdata2: &Fdata,
    lam: f64,
    eval_points: Option<&[f64]>,
) -> Result<Vec<f64>, FdaError> {
    let (f1, f2) = cast_to_grid(fdata1, fdata2, eval_points)?;
    let (f1, f2) = normalize_pair(&f1, &f2)?;
    let points = f1.grid_points()[0].clone();

    let mut registration = ElasticRegistration::new(f2.clone(), lam, points.clone())?;
    let f1_aligned = registration.fit_transform(&f1)?;
    let mut distances = srsf_l2(&f1_aligned, &f2)?;

    if lam > 0.0 {
        let warping = registration.warping().ok_or(FdaError::NotFitted)?;
        let warping_deriv = warping.derivative()?;
        for (i, d) in distances.iter_mut().enumerate() {
            let mut deriv = warping_deriv.sample_slice(i).to_vec();
            floor_negative(&mut deriv);
            let integrand: Vec<f64> = deriv
                .iter()
                .map(|&v| {
                    let r = v.sqrt() - 1.0;
                    r * r
                })
                .collect();
            let roughness = integrate_simpson(&integrand, &points);
            *d = (*d * *d + lam * roughness).sqrt();
        }
    }
    Ok(distances)
}

/// Phase distance: how much warping the optimal alignment needed.
///
/// The Fisher-Rao distance between the fitted warping and the identity,
/// arccos of the integral of sqrt(gamma'). Values lie in [0, pi/2].
pub fn phase_distance(
    fdata1: &Fdata,
    fdata2: &Fdata,
    lam: f64,
    eval_points: Option<&[f64]>,
) -> Result<Vec<f64>, FdaError> {
    let (f1, f2) = cast_to_grid(fdata1, fdata2, eval_points)?;
    let (f1, f2) = normalize_pair(&f1, &f2)?;
    let points = f1.grid_points()[0].clone();

    let mut registration = ElasticRegistration::new(f2, lam, points.clone())?;
    registration.fit_transform(&f1)?;
    let warping = registration.warping().ok_or(FdaError::NotFitted)?;
    let warping_deriv = warping.derivative()?;

    Ok((0..f1.n_samples())
        .map(|i| {
            let mut deriv = warping_deriv.sample_slice(i).to_vec();
            floor_negative(&mut deriv);
            for v in deriv.iter_mut() {
                *v = v.sqrt();
            }
            let d = integrate_simpson(&deriv, &points);
            clamp_unit(d).acos()
        })
        .collect())
}

/// Distance between two warping functions.
///
/// The SRSF of a warping is sqrt(gamma'), a point on the unit Hilbert sphere;
/// the distance is the arc length between the two SRSFs, arccos of their
/// inner product. Values lie in [0, pi/2].
pub fn warping_distance(
    warping1: &Fdata,
    warping2: &Fdata,
    eval_points: Option<&[f64]>,
) -> Result<Vec<f64>, FdaError> {
    let (w1, w2) = cast_to_grid(warping1, warping2, eval_points)?;
    let w1 = normalize_warping(&w1)?;
    let w2 = normalize_warping(&w2)?;

    let deriv1 = w1.derivative()?;
    let deriv2 = w2.derivative()?;
    let argvals = &w1.grid_points()[0];

    Ok((0..w1.n_samples())
        .map(|i| {
            let mut d1 = deriv1.sample_slice(i).to_vec();
            let mut d2 = deriv2.sample_slice(i).to_vec();
            floor_negative(&mut d1);
            floor_negative(&mut d2);
            let product: Vec<f64> = d1
                .iter()
                .zip(d2.iter())
                .map(|(a, b)| (a.sqrt()) * (b.sqrt()))
                .collect();
            let d = integrate_simpson(&product, argvals);
            clamp_unit(d).acos()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn uniform_grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
    }

    fn sine_sample(t: &[f64]) -> Fdata {
        Fdata::from_curves(
            &[t.iter().map(|&x| (2.0 * PI * x).sin()).collect::<Vec<_>>()],
            t,
        )
        .unwrap()
    }

    fn cosine_sample(t: &[f64]) -> Fdata {
        Fdata::from_curves(
            &[t.iter().map(|&x| (2.0 * PI * x).cos()).collect::<Vec<_>>()],
            t,
        )
        .unwrap()
    }

    /// sin(2 pi gamma(t)) for the warping t + 0.1 sin(pi t).
    fn warped_sine_sample(t: &[f64]) -> Fdata {
        Fdata::from_curves(
            &[t.iter()
                .map(|&x| (2.0 * PI * (x + 0.1 * (PI * x).sin())).sin())
                .collect::<Vec<_>>()],
            t,
        )
        .unwrap()
    }

    #[test]
    fn test_fisher_rao_self_distance_zero() {
        let t = uniform_grid(51);
        let f = sine_sample(&t);
        let d = fisher_rao_distance(&f, &f, None).unwrap();
        assert!(d[0].abs() < 1e-10);
    }

    #[test]
    fn test_fisher_rao_symmetric() {
        let t = uniform_grid(51);
        let f = sine_sample(&t);
        let g = cosine_sample(&t);
        let d1 = fisher_rao_distance(&f, &g, None).unwrap();
        let d2 = fisher_rao_distance(&g, &f, None).unwrap();
        assert!(d1[0] > 0.0);
        assert!((d1[0] - d2[0]).abs() < 1e-10);
    }

    #[test]
    fn test_fisher_rao_domain_invariance() {
        // The same shapes on [0, 10] and on [0, 1] give the same distance
        // after normalization.
        let t_unit = uniform_grid(41);
        let t_wide: Vec<f64> = t_unit.iter().map(|&x| 10.0 * x).collect();
        let f_unit = sine_sample(&t_unit);
        let g_unit = cosine_sample(&t_unit);
        let f_wide = Fdata::from_curves(&[f_unit.sample_slice(0).to_vec()], &t_wide).unwrap();
        let g_wide = Fdata::from_curves(&[g_unit.sample_slice(0).to_vec()], &t_wide).unwrap();

        let d_unit = fisher_rao_distance(&f_unit, &g_unit, None).unwrap();
        let d_wide = fisher_rao_distance(&f_wide, &g_wide, None).unwrap();
        assert!((d_unit[0] - d_wide[0]).abs() < 1e-9);
    }

    #[test]
    fn test_fisher_rao_resamples_second_operand() {
        let t_fine = uniform_grid(81);
        let t_coarse = uniform_grid(41);
        let f = sine_sample(&t_fine);
        let g = Fdata::from_curves(
            &[t_coarse
                .iter()
                .map(|&x| (2.0 * PI * x).cos())
                .collect::<Vec<_>>()],
            &t_coarse,
        )
        .unwrap();
        let d = fisher_rao_distance(&f, &g, None).unwrap();
        assert_eq!(d.len(), 1);
        assert!(d[0].is_finite() && d[0] > 0.0);
    }

    #[test]
    fn test_fisher_rao_rejects_vector_valued() {
        let fd = Fdata::new(
            vec![0.0; 8],
            vec![vec![0.0, 1.0]],
            vec![(0.0, 1.0)],
            2,
            2,
        )
        .unwrap();
        assert_eq!(
            fisher_rao_distance(&fd, &fd, None),
            Err(FdaError::VectorValued(2))
        );
    }

    #[test]
    fn test_amplitude_identical_inputs_zero() {
        let t = uniform_grid(51);
        let f = sine_sample(&t);
        let d = amplitude_distance(&f, &f, 0.0, None).unwrap();
        assert!(d[0].abs() < 1e-10);
    }

    #[test]
    fn test_amplitude_never_exceeds_fisher_rao() {
        let t = uniform_grid(64);
        let f = sine_sample(&t);
        let g = warped_sine_sample(&t);
        let amp = amplitude_distance(&f, &g, 0.0, None).unwrap();
        let fr = fisher_rao_distance(&f, &g, None).unwrap();
        assert!(amp[0] <= fr[0] + 1e-9, "{} vs {}", amp[0], fr[0]);
    }

    #[test]
    fn test_amplitude_removes_pure_phase_variation() {
        let t = uniform_grid(64);
        let f = sine_sample(&t);
        let g = warped_sine_sample(&t);
        let amp = amplitude_distance(&f, &g, 0.0, None).unwrap();
        let fr = fisher_rao_distance(&f, &g, None).unwrap();
        assert!(
            amp[0] < 0.8 * fr[0],
            "warping should absorb most of the difference: {} vs {}",
            amp[0],
            fr[0]
        );
    }

    #[test]
    fn test_amplitude_penalty_increases_distance() {
        let t = uniform_grid(64);
        let f = sine_sample(&t);
        let g = warped_sine_sample(&t);
        let free = amplitude_distance(&f, &g, 0.0, None).unwrap();
        let penalized = amplitude_distance(&f, &g, 0.5, None).unwrap();
        assert!(penalized[0] >= free[0] - 1e-3);
    }

    #[test]
    fn test_phase_identical_inputs_zero() {
        let t = uniform_grid(51);
        let f = sine_sample(&t);
        // arccos is steep near 1, so rounding in the integral is amplified.
        let d = phase_distance(&f, &f, 0.0, None).unwrap();
        assert!(d[0].abs() < 1e-6);
    }

    #[test]
    fn test_phase_within_range() {
        let t = uniform_grid(64);
        let f = sine_sample(&t);
        let g = warped_sine_sample(&t);
        let d = phase_distance(&f, &g, 0.0, None).unwrap();
        assert!(d[0] > 0.0, "warped pair needs nonzero phase");
        assert!(d[0] <= FRAC_PI_2 + 1e-12);
    }

    #[test]
    fn test_warping_distance_identity_zero() {
        let t = uniform_grid(41);
        let identity = Fdata::from_curves(&[t.clone()], &t).unwrap();
        let d = warping_distance(&identity, &identity, None).unwrap();
        assert!(d[0].abs() < 1e-6);
    }

    #[test]
    fn test_warping_distance_positive_and_bounded() {
        let t = uniform_grid(41);
        let identity = Fdata::from_curves(&[t.clone()], &t).unwrap();
        let bent: Vec<f64> = t.iter().map(|&x| x + 0.2 * (PI * x).sin()).collect();
        let w = Fdata::from_curves(&[bent], &t).unwrap();
        let d = warping_distance(&identity, &w, None).unwrap();
        assert!(d[0] > 0.0);
        assert!(d[0] <= FRAC_PI_2 + 1e-12);
        let d_rev = warping_distance(&w, &identity, None).unwrap();
        assert!((d[0] - d_rev[0]).abs() < 1e-10);
    }

    #[test]
    fn test_warping_distance_rescales_domain() {
        // The same warping shape on [0, 5] must give the same distance as on
        // [0, 1].
        let t = uniform_grid(41);
        let t5: Vec<f64> = t.iter().map(|&x| 5.0 * x).collect();
        let bent_unit: Vec<f64> = t.iter().map(|&x| x + 0.2 * (PI * x).sin()).collect();
        let bent_5: Vec<f64> = bent_unit.iter().map(|&v| 5.0 * v).collect();

        let id_unit = Fdata::from_curves(&[t.clone()], &t).unwrap();
        let w_unit = Fdata::from_curves(&[bent_unit], &t).unwrap();
        let id_5 = Fdata::from_curves(&[t5.clone()], &t5).unwrap();
        let w_5 = Fdata::from_curves(&[bent_5], &t5).unwrap();

        let d_unit = warping_distance(&id_unit, &w_unit, None).unwrap();
        let d_5 = warping_distance(&id_5, &w_5, None).unwrap();
        assert!((d_unit[0] - d_5[0]).abs() < 1e-9);
    }

    #[test]
    fn test_sample_count_mismatch() {
        let t = uniform_grid(21);
        let one = sine_sample(&t);
        let c: Vec<f64> = t.iter().map(|&x| x).collect();
        let two = Fdata::from_curves(&[c.clone(), c], &t).unwrap();
        assert!(matches!(
            fisher_rao_distance(&one, &two, None),
            Err(FdaError::SampleCountMismatch { .. })
        ));
    }

    #[test]
    fn test_explicit_eval_points() {
        let t = uniform_grid(81);
        let f = sine_sample(&t);
        let g = cosine_sample(&t);
        let coarse = uniform_grid(41);
        let d = fisher_rao_distance(&f, &g, Some(coarse.as_slice())).unwrap();
        let d_full = fisher_rao_distance(&f, &g, None).unwrap();
        // Coarser quadrature, same quantity.
        assert!((d[0] - d_full[0]).abs() < 0.05);
    }
}
