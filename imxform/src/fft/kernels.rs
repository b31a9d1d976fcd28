//! Trait-first kernels for the 1D and 2D FFT pairs.

use crate::kernel::{
    validate_step, ConfigError, ExecInvariantViolation, KernelLifecycle, Read2D, Write2D,
};
use crate::matrix::{
    ensure_shape, from_row_major, round_to_int, to_complex_buffer, ComplexMatrix, IntMatrix,
    Spectrum,
};
use crate::traits::{ForwardFft1D, ForwardFft2D, InverseFft1D, InverseFft2D};
use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;
use imxform_core::fft::{addressed_len, normalize, ortho_norm, radix2, Direction};
use ndarray::ArrayView2;
use num_complex::Complex;
use num_traits::{Float, FloatConst, Zero};

/// Constructor config for [`Fft1DKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fft1DConfig {
    /// FFT stride multiplier. `1` is the ordinary FFT.
    pub step: usize,
}

impl Default for Fft1DConfig {
    fn default() -> Self {
        Self { step: 1 }
    }
}

/// 1D forward FFT over the row-major flattening of an integer matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fft1DKernel<F = f64> {
    step: usize,
    _precision: PhantomData<F>,
}

impl<F> Fft1DKernel<F> {
    /// FFT stride multiplier.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl<F> KernelLifecycle for Fft1DKernel<F> {
    type Config = Fft1DConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            step: validate_step(config.step)?,
            _precision: PhantomData,
        })
    }
}

impl<F> ForwardFft1D<F> for Fft1DKernel<F>
where
    F: Float + FloatConst,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<Complex<F>> + ?Sized,
    {
        let frequency = forward_1d::<F>(input.read_view(), self.step)?;
        let mut out = out.write_view_mut();
        ensure_shape("out", frequency.dim(), out.dim())?;
        out.assign(&frequency);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Spectrum<F>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        forward_1d::<F>(input.read_view(), self.step).map(Spectrum::from_frequency)
    }
}

/// Constructor config for [`Ifft1DKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ifft1DConfig;

/// 1D inverse FFT returning the rounded real parts as an integer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ifft1DKernel<F = f64> {
    _precision: PhantomData<F>,
}

impl<F> KernelLifecycle for Ifft1DKernel<F> {
    type Config = Ifft1DConfig;

    fn try_new(_config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            _precision: PhantomData,
        })
    }
}

impl<F> InverseFft1D<F> for Ifft1DKernel<F>
where
    F: Float + FloatConst,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized,
        O: Write2D<i32> + ?Sized,
    {
        let signal = inverse_1d(input.read_view())?;
        let mut out = out.write_view_mut();
        ensure_shape("out", signal.dim(), out.dim())?;
        out.assign(&signal);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized,
    {
        inverse_1d(input.read_view())
    }
}

/// Constructor config for [`Fft2DKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fft2DConfig {
    /// FFT stride multiplier for the row pass. `1` is the ordinary FFT.
    pub step: usize,
}

impl Default for Fft2DConfig {
    fn default() -> Self {
        Self { step: 1 }
    }
}

/// Separable 2D forward FFT: every row, then every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fft2DKernel<F = f64> {
    step: usize,
    _precision: PhantomData<F>,
}

impl<F> Fft2DKernel<F> {
    /// FFT stride multiplier for the row pass.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl<F> KernelLifecycle for Fft2DKernel<F> {
    type Config = Fft2DConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            step: validate_step(config.step)?,
            _precision: PhantomData,
        })
    }
}

impl<F> ForwardFft2D<F> for Fft2DKernel<F>
where
    F: Float + FloatConst,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<Complex<F>> + ?Sized,
    {
        let frequency = forward_2d::<F>(input.read_view(), self.step)?;
        let mut out = out.write_view_mut();
        ensure_shape("out", frequency.dim(), out.dim())?;
        out.assign(&frequency);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Spectrum<F>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        forward_2d::<F>(input.read_view(), self.step).map(Spectrum::from_frequency)
    }
}

/// Constructor config for [`Ifft2DKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ifft2DConfig;

/// Separable 2D inverse FFT returning the rounded real parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ifft2DKernel<F = f64> {
    _precision: PhantomData<F>,
}

impl<F> KernelLifecycle for Ifft2DKernel<F> {
    type Config = Ifft2DConfig;

    fn try_new(_config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            _precision: PhantomData,
        })
    }
}

impl<F> InverseFft2D<F> for Ifft2DKernel<F>
where
    F: Float + FloatConst,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized,
        O: Write2D<i32> + ?Sized,
    {
        let signal = inverse_2d(input.read_view())?;
        let mut out = out.write_view_mut();
        ensure_shape("out", signal.dim(), out.dim())?;
        out.assign(&signal);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<Complex<F>> + ?Sized,
    {
        inverse_2d(input.read_view())
    }
}

fn forward_1d<F>(
    input: ArrayView2<'_, i32>,
    step: usize,
) -> Result<ComplexMatrix<F>, ExecInvariantViolation>
where
    F: Float + FloatConst,
{
    let (rows, cols) = input.dim();
    let size = rows * cols;
    ensure_non_empty("input", rows, cols)?;
    if !addressed_len(0, size - 1, step)?.is_power_of_two() {
        return Err(ExecInvariantViolation::InvalidShape {
            arg: "input",
            rows,
            cols,
            reason: "rows * cols / step must address a power-of-two number of elements",
        });
    }

    let mut buffer = to_complex_buffer::<F>(input);
    let mut scratch = vec![Complex::zero(); size];
    radix2(
        &mut buffer,
        0,
        size - 1,
        step,
        Direction::Forward,
        &mut scratch,
    )?;
    normalize(&mut buffer, ortho_norm(size));
    from_row_major((1, size), buffer)
}

fn inverse_1d<F>(input: ArrayView2<'_, Complex<F>>) -> Result<IntMatrix, ExecInvariantViolation>
where
    F: Float + FloatConst,
{
    let (rows, cols) = input.dim();
    let size = rows * cols;
    ensure_non_empty("input", rows, cols)?;
    if !size.is_power_of_two() {
        return Err(ExecInvariantViolation::InvalidShape {
            arg: "input",
            rows,
            cols,
            reason: "frequency row length must be a power of two",
        });
    }

    let mut buffer: Vec<Complex<F>> = input.iter().copied().collect();
    let mut scratch = vec![Complex::zero(); size];
    radix2(
        &mut buffer,
        0,
        size - 1,
        1,
        Direction::Inverse,
        &mut scratch,
    )?;
    normalize(&mut buffer, ortho_norm(size));
    let signal = buffer
        .into_iter()
        .map(round_to_int)
        .collect::<Result<Vec<_>, _>>()?;
    from_row_major((1, size), signal)
}

/// Forward separable transform shared by [`Fft2DKernel`] and the spectral filters.
pub(crate) fn forward_2d<F>(
    input: ArrayView2<'_, i32>,
    step: usize,
) -> Result<ComplexMatrix<F>, ExecInvariantViolation>
where
    F: Float + FloatConst,
{
    let (rows, cols) = input.dim();
    ensure_radix2_extents(rows, cols)?;
    if !addressed_len(0, cols - 1, step)?.is_power_of_two() {
        return Err(ExecInvariantViolation::InvalidShape {
            arg: "input",
            rows,
            cols,
            reason: "cols / step must address a power-of-two number of elements",
        });
    }

    let mut buffer = to_complex_buffer::<F>(input);
    separable_passes(&mut buffer, rows, cols, step, Direction::Forward)?;
    normalize(&mut buffer, ortho_norm(rows * cols));
    from_row_major((rows, cols), buffer)
}

/// Inverse separable transform shared by [`Ifft2DKernel`] and the spectral filters.
pub(crate) fn inverse_2d<F>(
    input: ArrayView2<'_, Complex<F>>,
) -> Result<IntMatrix, ExecInvariantViolation>
where
    F: Float + FloatConst,
{
    let (rows, cols) = input.dim();
    ensure_radix2_extents(rows, cols)?;

    let mut buffer: Vec<Complex<F>> = input.iter().copied().collect();
    separable_passes(&mut buffer, rows, cols, 1, Direction::Inverse)?;
    normalize(&mut buffer, ortho_norm(rows * cols));
    let signal = buffer
        .into_iter()
        .map(round_to_int)
        .collect::<Result<Vec<_>, _>>()?;
    from_row_major((rows, cols), signal)
}

/// Row pass with `row_stride`, then column pass with stride `cols` starting at each column.
///
/// All rows complete before any column starts. One scratch buffer serves both passes.
fn separable_passes<F>(
    buffer: &mut [Complex<F>],
    rows: usize,
    cols: usize,
    row_stride: usize,
    direction: Direction,
) -> Result<(), ExecInvariantViolation>
where
    F: Float + FloatConst,
{
    let mut scratch = vec![Complex::zero(); rows.max(cols)];
    for i in 0..rows {
        radix2(
            buffer,
            i * cols,
            (i + 1) * cols - 1,
            row_stride,
            direction,
            &mut scratch,
        )?;
    }
    for j in 0..cols {
        radix2(
            buffer,
            j,
            cols * (rows - 1) + j,
            cols,
            direction,
            &mut scratch,
        )?;
    }
    Ok(())
}

fn ensure_non_empty(
    arg: &'static str,
    rows: usize,
    cols: usize,
) -> Result<(), ExecInvariantViolation> {
    if rows == 0 || cols == 0 {
        return Err(ExecInvariantViolation::InvalidShape {
            arg,
            rows,
            cols,
            reason: "matrix must not be empty",
        });
    }
    Ok(())
}

fn ensure_radix2_extents(rows: usize, cols: usize) -> Result<(), ExecInvariantViolation> {
    ensure_non_empty("input", rows, cols)?;
    if !rows.is_power_of_two() || !cols.is_power_of_two() {
        return Err(ExecInvariantViolation::InvalidShape {
            arg: "input",
            rows,
            cols,
            reason: "rows and cols must both be powers of two",
        });
    }
    Ok(())
}
