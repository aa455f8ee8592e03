//! # fdametrics
//!
//! Depth measures and elastic distance metrics for functional data in pure
//! Rust.
//!
//! This crate analyzes samples whose observations are functions sampled on a
//! shared grid rather than scalars or vectors. It provides:
//! - Functional depth measures ordering a sample from most central to most
//!   outlying: integrated (Fraiman-Muniz) depth, band depth, modified band
//!   depth
//! - Elastic distances built on the square-root slope function (SRSF)
//!   representation: Fisher-Rao, amplitude, phase, and warping-space
//!   distances
//! - The supporting pieces: a grid-sampled functional data container,
//!   pointwise depth primitives, the SRSF transform, an elastic registration
//!   optimizer, Simpson quadrature, and synthetic data generators
//!
//! ## Data Layout
//!
//! [`grid::Fdata`] stores N functions on a shared rectangular grid in a flat
//! sample-major buffer: sample `i`, flattened grid index `g`, codomain
//! component `c` at `(i * total_grid + g) * dim_codomain + c`. Scalar curves
//! over a one-dimensional domain (the common case) are contiguous rows.
//!
//! ## Parallelism
//!
//! With the `parallel` feature, per-sample loops run on rayon; results are
//! identical to the sequential default.
//!
//! ## Example
//!
//! ```
//! use fdametrics::{Fdata, IntegratedDepth};
//!
//! let grid = vec![0.0, 0.25, 0.5, 0.75, 1.0];
//! let sample = Fdata::from_curves(
//!     &[
//!         vec![0.0, 0.2, 0.4, 0.6, 0.8],
//!         vec![0.1, 0.3, 0.5, 0.7, 0.9],
//!         vec![0.3, 0.5, 0.7, 0.9, 1.1],
//!     ],
//!     &grid,
//! )?;
//!
//! let mut depth = IntegratedDepth::new();
//! depth.fit(&sample)?;
//! let scores = depth.predict(&sample)?;
//! assert_eq!(scores.len(), 3);
//! assert!(scores[1] > scores[2]);
//! # Ok::<(), fdametrics::FdaError>(())
//! ```

#![allow(clippy::needless_range_loop)]

pub mod parallel;

pub mod depth;
pub mod error;
pub mod grid;
pub mod helpers;
pub mod metric;
pub mod multivariate;
pub mod registration;
pub mod simulation;
pub mod srsf;

// Re-export the primary surface.
pub use depth::{BandDepth, IntegratedDepth, ModifiedBandDepth};
pub use error::FdaError;
pub use grid::Fdata;
pub use helpers::{integrate_simpson, NUMERICAL_EPS};
pub use metric::{
    amplitude_distance, fisher_rao_distance, phase_distance, warping_distance,
};
pub use multivariate::{MultivariateDepth, SimplicialDepth, UnivariateFraimanMuniz};
pub use registration::{normalize_warping, ElasticRegistration};
pub use srsf::{srsf_inverse, srsf_transform};
