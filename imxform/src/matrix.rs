//! Matrix containers consumed and produced by the transform kernels.

use crate::kernel::ExecInvariantViolation;
use alloc::vec::Vec;
use ndarray::{Array2, ArrayView2};
use num_complex::Complex;
use num_traits::{Float, ToPrimitive};

/// Rectangular grid of signed integers, the canonical signal/image input.
pub type IntMatrix = Array2<i32>;

/// Rectangular grid of reals.
pub type RealMatrix<F = f64> = Array2<F>;

/// Rectangular grid of complex numbers, the frequency-domain representation.
pub type ComplexMatrix<F = f64> = Array2<Complex<F>>;

/// Result of a forward transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<F = f64> {
    /// Frequency coefficients.
    pub frequency: ComplexMatrix<F>,
    /// Element-wise modulus of `frequency`.
    pub magnitude: RealMatrix<F>,
}

impl<F> Spectrum<F>
where
    F: Float,
{
    /// Build a spectrum, deriving the magnitude matrix from `frequency`.
    pub fn from_frequency(frequency: ComplexMatrix<F>) -> Self {
        let magnitude = frequency.mapv(|c| c.norm());
        Self {
            frequency,
            magnitude,
        }
    }

    /// `(rows, cols)` of the spectrum.
    pub fn dim(&self) -> (usize, usize) {
        self.frequency.dim()
    }
}

/// Flatten an integer matrix row-major into a complex buffer with zero imaginary parts.
pub(crate) fn to_complex_buffer<F: Float>(view: ArrayView2<'_, i32>) -> Vec<Complex<F>> {
    view.iter()
        .map(|&v| Complex::new(F::from(v).unwrap_or_else(F::nan), F::zero()))
        .collect()
}

/// Round the real part to the nearest integer, halves away from zero.
pub(crate) fn round_to_int<F: Float>(value: Complex<F>) -> Result<i32, ExecInvariantViolation> {
    value
        .re
        .round()
        .to_i32()
        .ok_or(ExecInvariantViolation::InvalidState {
            reason: "rounded value does not fit in i32",
        })
}

/// Wrap a row-major buffer as a matrix of the given shape.
pub(crate) fn from_row_major<T>(
    shape: (usize, usize),
    buffer: Vec<T>,
) -> Result<Array2<T>, ExecInvariantViolation> {
    Array2::from_shape_vec(shape, buffer).map_err(|_| ExecInvariantViolation::InvalidState {
        reason: "buffer length does not match matrix shape",
    })
}

/// Reject an output whose shape differs from the computed result.
pub(crate) fn ensure_shape(
    arg: &'static str,
    expected: (usize, usize),
    got: (usize, usize),
) -> Result<(), ExecInvariantViolation> {
    if expected != got {
        return Err(ExecInvariantViolation::ShapeMismatch { arg, expected, got });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn spectrum_magnitude_is_modulus() {
        let spectrum = Spectrum::from_frequency(array![[
            Complex::new(3.0, 4.0),
            Complex::new(-5.0, 0.0)
        ]]);
        assert_eq!(spectrum.dim(), (1, 2));
        assert_abs_diff_eq!(spectrum.magnitude[(0, 0)], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum.magnitude[(0, 1)], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn complex_buffer_is_row_major() {
        let m = array![[11, 12], [21, 22]];
        let buffer = to_complex_buffer::<f64>(m.view());
        let re: Vec<f64> = buffer.iter().map(|c| c.re).collect();
        assert_eq!(re, vec![11.0, 12.0, 21.0, 22.0]);
        assert!(buffer.iter().all(|c| c.im == 0.0));

        let transposed = to_complex_buffer::<f64>(m.t());
        assert_eq!(transposed[1].re, 21.0);
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_to_int(Complex::new(16.5, 3.0)), Ok(17));
        assert_eq!(round_to_int(Complex::new(-5.5, 0.0)), Ok(-6));
        assert_eq!(round_to_int(Complex::new(4.49f32, 0.0)), Ok(4));
        assert!(round_to_int(Complex::new(1e12, 0.0)).is_err());
        assert!(round_to_int(Complex::new(f64::NAN, 0.0)).is_err());
    }
}
