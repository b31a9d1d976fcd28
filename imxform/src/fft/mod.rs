//! Orthonormal forward and inverse FFTs over integer matrices.
//!
//! The 1D pair operates on the row-major flattening of the input and produces a `1 x N` row. The
//! 2D pair is separable: every row is transformed, then every column. Both directions divide by
//! `√N`, so a forward transform followed by its inverse reproduces the input exactly once the real
//! parts are rounded back to integers.
//!
//! The kernels are stateless and return a [`Spectrum`] directly. [`Fft1D`] and [`Fft2D`] wrap them
//! in a [`Cached`] instance for callers that want to run once and read the frequency or magnitude
//! matrix later.

use crate::kernel::{Cached, ExecInvariantViolation, KernelLifecycle, Read2D};
use crate::matrix::{ComplexMatrix, IntMatrix, RealMatrix, Spectrum};
use crate::traits::{ForwardFft1D, ForwardFft2D, InverseFft1D, InverseFft2D};
use num_traits::{Float, FloatConst};

mod kernels;
pub use kernels::*;
pub(crate) use kernels::{forward_2d, inverse_2d};

/// 1D forward FFT of the row-major flattening of `input`.
///
/// `rows * cols` must address a power-of-two number of elements at the given `step`.
///
/// ```
/// use imxform::fft::fft1d;
/// use ndarray::array;
///
/// let spectrum = fft1d::<f64, _>(&array![[11, 12], [21, 22]], 1).unwrap();
/// assert_eq!(spectrum.dim(), (1, 4));
/// assert!((spectrum.frequency[(0, 1)].im - 5.0).abs() < 1e-12);
/// ```
pub fn fft1d<F, I>(input: &I, step: usize) -> Result<Spectrum<F>, ExecInvariantViolation>
where
    F: Float + FloatConst,
    I: Read2D<i32> + ?Sized,
{
    Fft1DKernel::try_new(Fft1DConfig { step })?.run_alloc(input)
}

/// 1D inverse FFT, rounding every real part to the nearest integer.
pub fn ifft1d<F, I>(frequency: &I) -> Result<IntMatrix, ExecInvariantViolation>
where
    F: Float + FloatConst,
    I: Read2D<num_complex::Complex<F>> + ?Sized,
{
    Ifft1DKernel::<F>::try_new(Ifft1DConfig)?.run_alloc(frequency)
}

/// Separable 2D forward FFT. Rows and columns must both be powers of two.
///
/// ```
/// use imxform::fft::{fft2d, ifft2d};
/// use ndarray::array;
///
/// let image = array![[11, 12], [21, 22]];
/// let spectrum = fft2d::<f64, _>(&image, 1).unwrap();
/// assert!((spectrum.frequency[(1, 0)].re + 10.0).abs() < 1e-12);
/// assert_eq!(ifft2d(&spectrum.frequency).unwrap(), image);
/// ```
pub fn fft2d<F, I>(input: &I, step: usize) -> Result<Spectrum<F>, ExecInvariantViolation>
where
    F: Float + FloatConst,
    I: Read2D<i32> + ?Sized,
{
    Fft2DKernel::try_new(Fft2DConfig { step })?.run_alloc(input)
}

/// Separable 2D inverse FFT, rounding every real part to the nearest integer.
pub fn ifft2d<F, I>(frequency: &I) -> Result<IntMatrix, ExecInvariantViolation>
where
    F: Float + FloatConst,
    I: Read2D<num_complex::Complex<F>> + ?Sized,
{
    Ifft2DKernel::<F>::try_new(Ifft2DConfig)?.run_alloc(frequency)
}

/// 1D forward FFT instance caching its most recent spectrum.
pub type Fft1D<F = f64> = Cached<Fft1DKernel<F>, Spectrum<F>>;

/// 2D forward FFT instance caching its most recent spectrum.
pub type Fft2D<F = f64> = Cached<Fft2DKernel<F>, Spectrum<F>>;

impl<F> Fft1D<F>
where
    F: Float + FloatConst,
{
    /// Transform `input`, cache frequency and magnitude, and return the frequency row.
    pub fn transform<I>(&mut self, input: &I) -> Result<&ComplexMatrix<F>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        self.compute(|kernel| kernel.run_alloc(input))
            .map(|spectrum| &spectrum.frequency)
    }

    /// Frequency row of the most recent `transform()`.
    pub fn frequency(&self) -> Result<&ComplexMatrix<F>, ExecInvariantViolation> {
        self.output().map(|spectrum| &spectrum.frequency)
    }

    /// Magnitude row of the most recent `transform()`.
    pub fn magnitude(&self) -> Result<&RealMatrix<F>, ExecInvariantViolation> {
        self.output().map(|spectrum| &spectrum.magnitude)
    }
}

impl<F> Fft2D<F>
where
    F: Float + FloatConst,
{
    /// Transform `input`, cache frequency and magnitude, and return the frequency matrix.
    pub fn transform<I>(&mut self, input: &I) -> Result<&ComplexMatrix<F>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        self.compute(|kernel| kernel.run_alloc(input))
            .map(|spectrum| &spectrum.frequency)
    }

    /// Frequency matrix of the most recent `transform()`.
    pub fn frequency(&self) -> Result<&ComplexMatrix<F>, ExecInvariantViolation> {
        self.output().map(|spectrum| &spectrum.frequency)
    }

    /// Magnitude matrix of the most recent `transform()`.
    pub fn magnitude(&self) -> Result<&RealMatrix<F>, ExecInvariantViolation> {
        self.output().map(|spectrum| &spectrum.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::LifecycleState;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn cached_fft2d_gates_reads_until_transform() {
        let mut fft = Fft2D::<f64>::try_new(Fft2DConfig::default()).expect("valid config");
        assert_eq!(fft.state(), LifecycleState::NotComputed);
        assert_eq!(
            fft.magnitude().expect_err("not computed"),
            ExecInvariantViolation::NotComputedYet
        );
        assert_eq!(
            fft.frequency().expect_err("not computed"),
            ExecInvariantViolation::NotComputedYet
        );

        let frequency = fft
            .transform(&array![[11, 12], [21, 22]])
            .expect("power-of-two extents");
        assert_abs_diff_eq!(frequency[(0, 0)].re, 33.0, epsilon = 1e-9);

        assert_eq!(fft.state(), LifecycleState::Computed);
        let magnitude = fft.magnitude().expect("computed");
        assert_abs_diff_eq!(magnitude[(0, 1)], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(magnitude[(1, 1)], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn cached_fft1d_keeps_previous_spectrum_after_failed_transform() {
        let mut fft = Fft1D::<f64>::try_new(Fft1DConfig::default()).expect("valid config");
        fft.transform(&[4, 0, 0, 0]).expect("length four");
        fft.transform(&[1, 2, 3]).expect_err("length three");

        let frequency = fft.frequency().expect("previous run cached");
        assert_eq!(frequency.dim(), (1, 4));
        frequency
            .iter()
            .for_each(|c| assert_abs_diff_eq!(c.re, 2.0, epsilon = 1e-12));
    }

    #[test]
    fn inverse_is_usable_without_forward_run() {
        let frequency = array![[
            num_complex::Complex::new(33.0, 0.0),
            num_complex::Complex::new(-5.0, 5.0),
            num_complex::Complex::new(-1.0, 0.0),
            num_complex::Complex::new(-5.0, -5.0)
        ]];
        assert_eq!(
            ifft1d(&frequency).expect("power-of-two length"),
            array![[11, 12, 21, 22]]
        );
    }

    #[test]
    fn free_functions_propagate_config_errors() {
        let err = fft2d::<f64, _>(&array![[1, 2], [3, 4]], 0).expect_err("zero step");
        assert!(matches!(err, ExecInvariantViolation::Config(_)));
    }

    #[test]
    fn free_functions_round_trip() {
        let image = array![[0, 255, 17, -3], [8, 8, 8, 8]];
        let spectrum = fft2d::<f32, _>(&image, 1).expect("forward");
        assert_eq!(ifft2d(&spectrum.frequency).expect("inverse"), image);

        let spectrum = fft1d::<f64, _>(&image, 1).expect("forward");
        assert_eq!(
            ifft1d(&spectrum.frequency).expect("inverse"),
            image.into_shape_with_order((1, 8)).expect("same size")
        );
    }
}
