//! Trait interfaces for the spectral transform capabilities.
//!
//! Every capability offers `run_alloc`, which allocates its output, and `run_into`, which writes
//! into a caller-provided matrix of the exact output shape.

use crate::kernel::{ExecInvariantViolation, Read2D, Write2D};
use crate::matrix::{ComplexMatrix, IntMatrix, Spectrum};
use num_complex::Complex;

/// 1D forward FFT over a row-major flattened integer matrix.
pub trait ForwardFft1D<F> {
    /// Write the `1 x (rows * cols)` frequency row into a caller-provided output.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<Complex<F>> + ?Sized;

    /// Run the transform and allocate frequency and magnitude rows.
    fn run_alloc<I>(&self, input: &I) -> Result<Spectrum<F>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized;
}

/// 1D inverse FFT recovering an integer signal row.
pub trait InverseFft1D<F> {
    /// Write the `1 x N` integer row into a caller-provided output.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized,
        O: Write2D<i32> + ?Sized;

    /// Run the inverse transform and allocate the integer row.
    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized;
}

/// Separable 2D forward FFT.
pub trait ForwardFft2D<F> {
    /// Write the `rows x cols` frequency matrix into a caller-provided output.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<Complex<F>> + ?Sized;

    /// Run the transform and allocate frequency and magnitude matrices.
    fn run_alloc<I>(&self, input: &I) -> Result<Spectrum<F>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized;
}

/// Separable 2D inverse FFT recovering an integer matrix.
pub trait InverseFft2D<F> {
    /// Write the `rows x cols` integer matrix into a caller-provided output.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized,
        O: Write2D<i32> + ?Sized;

    /// Run the inverse transform and allocate the integer matrix.
    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized;
}

/// Frequency-domain masking filter: forward 2D FFT, mask, inverse 2D FFT.
pub trait SpectralFilter2D {
    /// Write the filtered matrix into a caller-provided output.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<i32> + ?Sized;

    /// Filter and allocate the output matrix.
    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized;
}

/// Spectrum masking step in isolation, for callers that already hold a frequency matrix.
pub trait SpectralMask2D<F> {
    /// Zero every cell the mask rejects, in place.
    fn apply(&self, spectrum: &mut ComplexMatrix<F>);
}
