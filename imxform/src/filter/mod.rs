//! Frequency-domain lowpass and highpass filters over integer matrices.

use crate::kernel::{Cached, ExecInvariantViolation, KernelLifecycle, Read2D};
use crate::matrix::IntMatrix;
use crate::traits::SpectralFilter2D;
use num_traits::{Float, FloatConst};

mod kernels;
pub use kernels::*;

/// Keep spectrum cells within `cutoff` of the index-grid center.
///
/// ```
/// use imxform::filter::lowpass;
/// use ndarray::array;
///
/// let out = lowpass::<f64, _>(&array![[11, 12], [21, 22]], 1.0, 1).unwrap();
/// assert_eq!(out, array![[-6, -5], [5, 6]]);
/// ```
pub fn lowpass<F, I>(input: &I, cutoff: f64, step: usize) -> Result<IntMatrix, ExecInvariantViolation>
where
    F: Float + FloatConst,
    I: Read2D<i32> + ?Sized,
{
    SpectralFilterKernel::<F>::try_new(SpectralFilterConfig {
        band: FilterBandType::Lowpass,
        cutoff,
        step,
    })?
    .run_alloc(input)
}

/// Keep spectrum cells farther than `cutoff` from the index-grid center.
pub fn highpass<F, I>(
    input: &I,
    cutoff: f64,
    step: usize,
) -> Result<IntMatrix, ExecInvariantViolation>
where
    F: Float + FloatConst,
    I: Read2D<i32> + ?Sized,
{
    SpectralFilterKernel::<F>::try_new(SpectralFilterConfig {
        band: FilterBandType::Highpass,
        cutoff,
        step,
    })?
    .run_alloc(input)
}

/// Spectral filter instance caching its most recent filtered matrix.
pub type Filter<F = f64> = Cached<SpectralFilterKernel<F>, IntMatrix>;

impl<F> Filter<F>
where
    F: Float + FloatConst,
{
    /// Filter `input`, cache the result, and return it.
    pub fn transform<I>(&mut self, input: &I) -> Result<&IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        self.compute(|kernel| kernel.run_alloc(input))
    }

    /// Filtered matrix of the most recent `transform()`.
    pub fn filtered(&self) -> Result<&IntMatrix, ExecInvariantViolation> {
        self.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::LifecycleState;
    use ndarray::array;

    #[test]
    fn cached_filter_gates_reads_until_transform() {
        let mut filter =
            Filter::<f64>::try_new(SpectralFilterConfig::lowpass(1.0)).expect("valid config");
        assert_eq!(filter.state(), LifecycleState::NotComputed);
        assert_eq!(
            filter.filtered().expect_err("not computed"),
            ExecInvariantViolation::NotComputedYet
        );

        let out = filter
            .transform(&array![[11, 12], [21, 22]])
            .expect("power-of-two extents")
            .clone();
        assert_eq!(out, array![[-6, -5], [5, 6]]);
        assert_eq!(filter.state(), LifecycleState::Computed);
        assert_eq!(filter.filtered().expect("computed"), &out);
        assert_eq!(filter.kernel().band(), FilterBandType::Lowpass);
    }

    #[test]
    fn free_functions_match_kernels() {
        let input = array![[11, 12], [21, 22]];
        assert_eq!(
            highpass::<f64, _>(&input, 1.0, 1).expect("filtered"),
            array![[17, 17], [17, 17]]
        );
        assert_eq!(lowpass::<f32, _>(&input, 5.0, 1).expect("filtered"), input);
        assert!(matches!(
            lowpass::<f64, _>(&input, f64::INFINITY, 1),
            Err(ExecInvariantViolation::Config(_))
        ));
    }
}
