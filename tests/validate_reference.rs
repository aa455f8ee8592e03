//! Integration tests against published reference values.
//!
//! The 4-curve sample on grid [0, 2, 4, 6, 8, 10] is the standard worked
//! example from the band-depth literature (Lopez-Pintado & Romo 2009;
//! Fraiman & Muniz 2001 for the integrated depth); the expected depths below
//! are the published values.

use fdametrics::{
    amplitude_distance, fisher_rao_distance, phase_distance, warping_distance, BandDepth,
    Fdata, IntegratedDepth, ModifiedBandDepth,
};
use std::f64::consts::{FRAC_PI_2, PI};

const GRID: [f64; 6] = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];

fn literature_sample() -> Fdata {
    Fdata::from_curves(
        &[
            vec![1.0, 1.0, 2.0, 3.0, 2.5, 2.0],
            vec![0.5, 0.5, 1.0, 2.0, 1.5, 1.0],
            vec![-1.0, -1.0, -0.5, 1.0, 1.0, 0.5],
            vec![-0.5, -0.5, -0.5, -1.0, -1.0, -1.0],
        ],
        &GRID,
    )
    .unwrap()
}

fn assert_close(actual: &[f64], expected: &[f64], tol: f64, label: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: length", label);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() < tol,
            "{}: sample {}: {} vs expected {}",
            label,
            i,
            a,
            e
        );
    }
}

#[test]
fn integrated_depth_literature_values() {
    let fd = literature_sample();
    let mut depth = IntegratedDepth::new();
    depth.fit(&fd).unwrap();
    let d = depth.predict(&fd).unwrap();
    assert_close(&d, &[0.5, 0.75, 0.925, 0.875], 1e-6, "integrated depth");
}

#[test]
fn modified_band_depth_literature_values() {
    let fd = literature_sample();
    let mut mbd = ModifiedBandDepth::new();
    mbd.fit(&fd).unwrap();
    let d = mbd.predict(&fd).unwrap();
    assert_close(
        &d,
        &[0.5, 5.0 / 6.0, 0.7333333333, 0.6666666667],
        1e-6,
        "modified band depth",
    );
}

#[test]
fn band_depth_literature_values() {
    let fd = literature_sample();
    let mut bd = BandDepth::new();
    bd.fit(&fd).unwrap();
    let d = bd.predict(&fd).unwrap();
    assert_close(&d, &[0.5, 5.0 / 6.0, 0.5, 0.5], 1e-9, "band depth");
}

#[test]
fn depth_scores_within_declared_bounds() {
    let fd = literature_sample();

    let mut int_depth = IntegratedDepth::new();
    int_depth.fit(&fd).unwrap();
    for d in int_depth.predict(&fd).unwrap() {
        assert!(d >= int_depth.min() - 1e-12 && d <= int_depth.max() + 1e-12);
    }

    let mut mbd = ModifiedBandDepth::new();
    mbd.fit(&fd).unwrap();
    for d in mbd.predict(&fd).unwrap() {
        assert!(d >= mbd.min() - 1e-12 && d <= mbd.max() + 1e-12);
    }

    let mut bd = BandDepth::new();
    bd.fit(&fd).unwrap();
    for d in bd.predict(&fd).unwrap() {
        assert!(d >= bd.min() - 1e-12 && d <= bd.max() + 1e-12);
    }
}

#[test]
fn band_and_modified_band_agree_on_symmetric_sample() {
    // Nested, non-crossing curves: both variants must produce the same
    // ranking, with the innermost curve deepest.
    let t: Vec<f64> = (0..21).map(|i| i as f64 / 20.0).collect();
    let curves: Vec<Vec<f64>> = [-2.0, -1.0, 0.0, 1.0, 2.0]
        .iter()
        .map(|&level| t.iter().map(|&x| level * (1.0 + x)).collect())
        .collect();
    let fd = Fdata::from_curves(&curves, &t).unwrap();

    let mut bd = BandDepth::new();
    bd.fit(&fd).unwrap();
    let d_bd = bd.predict(&fd).unwrap();
    let mut mbd = ModifiedBandDepth::new();
    mbd.fit(&fd).unwrap();
    let d_mbd = mbd.predict(&fd).unwrap();

    let rank = |d: &[f64]| -> Vec<usize> {
        let mut idx: Vec<usize> = (0..d.len()).collect();
        idx.sort_by(|&a, &b| d[b].partial_cmp(&d[a]).unwrap());
        idx
    };
    assert_eq!(rank(&d_bd)[0], 2, "central curve deepest under BD");
    assert_eq!(rank(&d_mbd)[0], 2, "central curve deepest under MBD");
    assert_eq!(rank(&d_bd), rank(&d_mbd), "rankings agree");
}

#[test]
fn elastic_distances_on_shared_domain() {
    // Distances on a non-unit domain: normalization makes the answers agree
    // with the unit-domain equivalents.
    let t: Vec<f64> = (0..65).map(|i| i as f64 * 10.0 / 64.0).collect();
    let f = Fdata::from_curves(
        &[t.iter().map(|&x| (2.0 * PI * x / 10.0).sin()).collect::<Vec<_>>()],
        &t,
    )
    .unwrap();
    let g = Fdata::from_curves(
        &[t.iter()
            .map(|&x| {
                let s = x / 10.0;
                (2.0 * PI * (s + 0.1 * (PI * s).sin())).sin()
            })
            .collect::<Vec<_>>()],
        &t,
    )
    .unwrap();

    let fr = fisher_rao_distance(&f, &g, None).unwrap()[0];
    let amp = amplitude_distance(&f, &g, 0.0, None).unwrap()[0];
    let phase = phase_distance(&f, &g, 0.0, None).unwrap()[0];

    assert!(fr > 0.0);
    assert!(amp <= fr + 1e-9, "amplitude {} vs fisher-rao {}", amp, fr);
    assert!(phase > 0.0 && phase <= FRAC_PI_2 + 1e-12);

    // Symmetry and identity of the base metric.
    let fr_rev = fisher_rao_distance(&g, &f, None).unwrap()[0];
    assert!((fr - fr_rev).abs() < 1e-10);
    let self_dist = fisher_rao_distance(&f, &f, None).unwrap()[0];
    assert!(self_dist.abs() < 1e-10);
}

#[test]
fn warping_space_distance_properties() {
    let t: Vec<f64> = (0..41).map(|i| i as f64 / 40.0).collect();
    let identity = Fdata::from_curves(&[t.clone()], &t).unwrap();
    let bent: Vec<f64> = t.iter().map(|&x| x + 0.15 * (PI * x).sin()).collect();
    let w = Fdata::from_curves(&[bent], &t).unwrap();

    let self_dist = warping_distance(&w, &w, None).unwrap()[0];
    assert!(self_dist.abs() < 1e-6);

    let d = warping_distance(&identity, &w, None).unwrap()[0];
    assert!(d > 0.0 && d <= FRAC_PI_2 + 1e-12);
}
