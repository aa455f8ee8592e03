//! Conditional parallel iteration.
//!
//! Per-sample loops (depth prediction, per-pair registration) are sequential
//! by default and data-parallel via rayon when the `parallel` cargo feature
//! is enabled. Results are identical either way.

/// Iterate a range or owned collection, in parallel when the `parallel`
/// feature is enabled.
///
/// ```ignore
/// let depths: Vec<f64> = iter_maybe_parallel!(0..n)
///     .map(|i| depth_of_sample(i))
///     .collect();
/// ```
#[macro_export]
macro_rules! iter_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::IntoParallelIterator;

            IntoParallelIterator::into_par_iter($expr)
        }
        #[cfg(not(feature = "parallel"))]
        {
            IntoIterator::into_iter($expr)
        }
    }};
}

pub use iter_maybe_parallel;
