//! Recursive radix-2 Cooley–Tukey FFT over strided sub-sequences.
//!
//! The transform addresses the elements `start, start + stride, ..., end` of a flat buffer and
//! rewrites them in place with their discrete Fourier transform (or its un-normalized inverse).
//! Row and column passes of a row-major matrix are both expressed this way: a row is a contiguous
//! run with `stride = step`, a column starts at its column index with `stride = cols`.

use crate::{Complex, Error, Result};
use num_traits::{Float, FloatConst};

/// Sign of the exponent in the twiddle factors `exp(sign · 2πi·k/n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Forward transform, negative exponent.
    Forward,
    /// Un-normalized inverse transform, positive exponent.
    Inverse,
}

impl Direction {
    /// `-1` for [`Direction::Forward`], `+1` for [`Direction::Inverse`].
    pub fn sign<T: Float>(self) -> T {
        match self {
            Direction::Forward => -T::one(),
            Direction::Inverse => T::one(),
        }
    }
}

/// Number of elements addressed by `start..=end` with the given stride.
///
/// Matches `(end - start) / stride + 1` with truncating division, so `end` does not need to sit
/// exactly on the last addressed element.
pub fn addressed_len(start: usize, end: usize, stride: usize) -> Result<usize> {
    if stride == 0 {
        return Err(invalid_arg("stride", "stride must be at least 1"));
    }
    if end < start {
        return Err(invalid_arg("end", "end offset must not precede start offset"));
    }
    Ok((end - start) / stride + 1)
}

/// Run the radix-2 FFT in place over `signal[start], signal[start + stride], ..., signal[end]`.
///
/// The addressed count `n = (end - start) / stride + 1` must be a power of two and `scratch` must
/// hold at least `n` elements. The scratch contents on return are unspecified. No normalization is
/// applied; pair with [`normalize`] and [`ortho_norm`] for the orthonormal convention.
///
/// # Examples
/// ```
/// use imxform_core::fft::{radix2, Direction};
/// use imxform_core::Complex;
///
/// let mut signal = [11.0, 12.0, 21.0, 22.0].map(|re| Complex::new(re, 0.0));
/// let mut scratch = [Complex::new(0.0, 0.0); 4];
/// radix2(&mut signal, 0, 3, 1, Direction::Forward, &mut scratch).unwrap();
///
/// assert!((signal[0] - Complex::new(66.0, 0.0)).norm() < 1e-12);
/// assert!((signal[1] - Complex::new(-10.0, 10.0)).norm() < 1e-12);
/// assert!((signal[2] - Complex::new(-2.0, 0.0)).norm() < 1e-12);
/// assert!((signal[3] - Complex::new(-10.0, -10.0)).norm() < 1e-12);
/// ```
pub fn radix2<T>(
    signal: &mut [Complex<T>],
    start: usize,
    end: usize,
    stride: usize,
    direction: Direction,
    scratch: &mut [Complex<T>],
) -> Result<()>
where
    T: Float + FloatConst,
{
    let n = addressed_len(start, end, stride)?;
    if end >= signal.len() {
        return Err(Error::OutOfBounds {
            end,
            len: signal.len(),
        });
    }
    if !n.is_power_of_two() {
        return Err(Error::NotPowerOfTwo { len: n });
    }
    if scratch.len() < n {
        return Err(Error::ScratchTooSmall {
            needed: n,
            got: scratch.len(),
        });
    }
    radix2_unchecked(signal, start, n, stride, direction.sign(), scratch);
    Ok(())
}

/// Decimation-in-time recursion over `n` elements starting at `start`.
///
/// Both halves finish before the combine step copies into `scratch`, so one scratch buffer of the
/// outermost length serves every level.
fn radix2_unchecked<T>(
    signal: &mut [Complex<T>],
    start: usize,
    n: usize,
    stride: usize,
    sign: T,
    scratch: &mut [Complex<T>],
) where
    T: Float + FloatConst,
{
    if n <= 1 {
        return;
    }
    let half = n / 2;
    radix2_unchecked(signal, start, half, 2 * stride, sign, scratch);
    radix2_unchecked(signal, start + stride, half, 2 * stride, sign, scratch);

    for (k, slot) in scratch[..n].iter_mut().enumerate() {
        *slot = signal[start + k * stride];
    }

    let theta = sign * (T::PI() + T::PI()) / to_float::<T>(n);
    for k in 0..half {
        let twiddle = Complex::from_polar(T::one(), theta * to_float::<T>(k));
        let even = scratch[2 * k];
        let odd = twiddle * scratch[2 * k + 1];
        signal[start + k * stride] = even + odd;
        signal[start + (k + half) * stride] = even - odd;
    }
}

/// Divide every element of `signal` by `norm`.
pub fn normalize<T: Float>(signal: &mut [Complex<T>], norm: T) {
    for value in signal.iter_mut() {
        *value = *value / norm;
    }
}

/// Orthonormal normalizer `√n`; dividing by it after both the forward and the inverse pass makes
/// the round trip the identity.
pub fn ortho_norm<T: Float>(n: usize) -> T {
    to_float::<T>(n).sqrt()
}

fn to_float<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

#[cfg(feature = "alloc")]
fn invalid_arg(arg: &str, reason: &str) -> Error {
    use alloc::string::ToString;

    Error::InvalidArg {
        arg: arg.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(not(feature = "alloc"))]
fn invalid_arg(_arg: &str, _reason: &str) -> Error {
    Error::InvalidArg
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rustfft::FftPlanner;

    fn complex_signal(values: &[f64]) -> std::vec::Vec<Complex<f64>> {
        values.iter().map(|&re| Complex::new(re, 0.0)).collect()
    }

    fn assert_complex_close(actual: &[Complex<f64>], expected: &[Complex<f64>], epsilon: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a.re, e.re, epsilon = epsilon);
            assert_abs_diff_eq!(a.im, e.im, epsilon = epsilon);
        }
    }

    #[test]
    fn length_one_is_identity() {
        let mut signal = [Complex::new(7.5, -1.0)];
        let mut scratch = [Complex::new(0.0, 0.0)];
        radix2(&mut signal, 0, 0, 1, Direction::Forward, &mut scratch).expect("n = 1 is valid");
        assert_eq!(signal[0], Complex::new(7.5, -1.0));
    }

    #[test]
    fn forward_matches_rustfft_reference() {
        let values: std::vec::Vec<f64> = (0..32)
            .map(|i| ((i * 7) % 11) as f64 - 3.0 + 0.25 * i as f64)
            .collect();
        let mut signal = complex_signal(&values);
        let mut scratch = std::vec![Complex::new(0.0, 0.0); signal.len()];
        radix2(&mut signal, 0, 31, 1, Direction::Forward, &mut scratch).expect("valid length");

        let mut reference = complex_signal(&values);
        FftPlanner::<f64>::new()
            .plan_fft_forward(reference.len())
            .process(&mut reference);

        assert_complex_close(&signal, &reference, 1e-9);
    }

    #[test]
    fn inverse_matches_rustfft_reference() {
        let mut signal: std::vec::Vec<Complex<f64>> = (0..16)
            .map(|i| Complex::new(i as f64, (i % 3) as f64 - 1.0))
            .collect();
        let mut reference = signal.clone();
        let mut scratch = std::vec![Complex::new(0.0, 0.0); 16];
        radix2(&mut signal, 0, 15, 1, Direction::Inverse, &mut scratch).expect("valid length");
        FftPlanner::<f64>::new()
            .plan_fft_inverse(16)
            .process(&mut reference);

        assert_complex_close(&signal, &reference, 1e-9);
    }

    #[test]
    fn strided_column_leaves_other_elements_untouched() {
        // 4x2 row-major matrix; transform column 1 only.
        let mut signal = complex_signal(&[1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0]);
        let mut scratch = [Complex::new(0.0, 0.0); 4];
        radix2(&mut signal, 1, 7, 2, Direction::Forward, &mut scratch).expect("valid column");

        let untouched: std::vec::Vec<f64> = signal.iter().step_by(2).map(|c| c.re).collect();
        assert_eq!(untouched, std::vec![1.0, 2.0, 3.0, 4.0]);

        let column: std::vec::Vec<Complex<f64>> = signal.iter().skip(1).step_by(2).copied().collect();
        let expected = [
            Complex::new(100.0, 0.0),
            Complex::new(-20.0, 20.0),
            Complex::new(-20.0, 0.0),
            Complex::new(-20.0, -20.0),
        ];
        assert_complex_close(&column, &expected, 1e-9);
    }

    #[test]
    fn truncating_end_offset_matches_aligned_end() {
        let values = [5.0, 1.0, -2.0, 8.0, 0.5, 3.0, 9.0, -4.0];
        let mut aligned = complex_signal(&values);
        let mut loose = complex_signal(&values);
        let mut scratch = [Complex::new(0.0, 0.0); 4];
        radix2(&mut aligned, 0, 6, 2, Direction::Forward, &mut scratch).expect("aligned end");
        radix2(&mut loose, 0, 7, 2, Direction::Forward, &mut scratch).expect("loose end");
        assert_complex_close(&aligned, &loose, 0.0);
    }

    #[test]
    fn forward_then_inverse_with_ortho_norm_is_identity() {
        let original = complex_signal(&[3.0, -1.0, 4.0, 1.0, -5.0, 9.0, 2.0, -6.0]);
        let mut signal = original.clone();
        let mut scratch = [Complex::new(0.0, 0.0); 8];
        let norm = ortho_norm::<f64>(8);

        radix2(&mut signal, 0, 7, 1, Direction::Forward, &mut scratch).expect("forward");
        normalize(&mut signal, norm);
        radix2(&mut signal, 0, 7, 1, Direction::Inverse, &mut scratch).expect("inverse");
        normalize(&mut signal, norm);

        assert_complex_close(&signal, &original, 1e-12);
    }

    #[test]
    fn single_precision_is_supported() {
        let mut signal = [11.0f32, 12.0, 21.0, 22.0].map(|re| Complex::new(re, 0.0));
        let mut scratch = [Complex::new(0.0f32, 0.0); 4];
        radix2(&mut signal, 0, 3, 1, Direction::Forward, &mut scratch).expect("valid length");
        normalize(&mut signal, ortho_norm::<f32>(4));
        assert_abs_diff_eq!(signal[1].re, -5.0f32, epsilon = 1e-5);
        assert_abs_diff_eq!(signal[1].im, 5.0f32, epsilon = 1e-5);
    }

    #[test]
    fn rejects_non_power_of_two_length() {
        let mut signal = complex_signal(&[1.0, 2.0, 3.0]);
        let mut scratch = [Complex::new(0.0, 0.0); 3];
        let err = radix2(&mut signal, 0, 2, 1, Direction::Forward, &mut scratch)
            .expect_err("length 3 must fail");
        assert_eq!(err, Error::NotPowerOfTwo { len: 3 });
    }

    #[test]
    fn rejects_short_scratch_and_out_of_bounds_end() {
        let mut signal = complex_signal(&[1.0, 2.0, 3.0, 4.0]);
        let mut scratch = [Complex::new(0.0, 0.0); 2];
        let err = radix2(&mut signal, 0, 3, 1, Direction::Forward, &mut scratch)
            .expect_err("scratch of 2 cannot hold 4");
        assert_eq!(err, Error::ScratchTooSmall { needed: 4, got: 2 });

        let mut scratch = [Complex::new(0.0, 0.0); 8];
        let err = radix2(&mut signal, 0, 7, 1, Direction::Forward, &mut scratch)
            .expect_err("end beyond buffer");
        assert_eq!(err, Error::OutOfBounds { end: 7, len: 4 });
    }

    #[test]
    fn rejects_zero_stride_and_reversed_offsets() {
        assert!(matches!(
            addressed_len(0, 3, 0),
            Err(Error::InvalidArg { .. })
        ));
        assert!(matches!(
            addressed_len(4, 3, 1),
            Err(Error::InvalidArg { .. })
        ));
        assert_eq!(addressed_len(2, 14, 4), Ok(4));
    }
}
