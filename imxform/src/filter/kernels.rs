//! Trait-first kernels for frequency-domain masking filters.

use crate::fft::{forward_2d, inverse_2d};
use crate::kernel::{
    validate_step, ConfigError, ExecInvariantViolation, KernelLifecycle, Read2D, Write2D,
};
use crate::matrix::{ensure_shape, ComplexMatrix, IntMatrix};
use crate::traits::{SpectralFilter2D, SpectralMask2D};
use core::marker::PhantomData;
use num_complex::Complex;
use num_traits::{Float, FloatConst, Zero};

/// Which side of the cutoff radius a spectral filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterBandType {
    /// Keep cells within the cutoff distance of the grid center.
    Lowpass,
    /// Keep cells farther than the cutoff distance from the grid center.
    Highpass,
}

/// Constructor config for [`SpectralFilterKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFilterConfig {
    /// Pass band.
    pub band: FilterBandType,
    /// Cutoff radius in index units.
    pub cutoff: f64,
    /// Row-pass stride multiplier of the forward transform.
    pub step: usize,
}

impl SpectralFilterConfig {
    /// Lowpass config with the ordinary FFT stride.
    pub fn lowpass(cutoff: f64) -> Self {
        Self {
            band: FilterBandType::Lowpass,
            cutoff,
            step: 1,
        }
    }

    /// Highpass config with the ordinary FFT stride.
    pub fn highpass(cutoff: f64) -> Self {
        Self {
            band: FilterBandType::Highpass,
            cutoff,
            step: 1,
        }
    }
}

/// Forward 2D FFT, radial mask around `(rows / 2, cols / 2)`, inverse 2D FFT.
///
/// The mask is centered on the index grid, not on a shifted zero-frequency bin: with the
/// unshifted spectrum layout, the DC term at `(0, 0)` lies far from the center and is removed by
/// a lowpass with a small cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFilterKernel<F = f64> {
    band: FilterBandType,
    cutoff: f64,
    step: usize,
    _precision: PhantomData<F>,
}

impl<F> SpectralFilterKernel<F> {
    /// Pass band.
    pub fn band(&self) -> FilterBandType {
        self.band
    }

    /// Cutoff radius in index units.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Row-pass stride multiplier.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Whether the cell at `(i, j)` of a `rows x cols` spectrum survives the mask.
    pub fn keeps(&self, (rows, cols): (usize, usize), (i, j): (usize, usize)) -> bool {
        let di = i as f64 - (rows / 2) as f64;
        let dj = j as f64 - (cols / 2) as f64;
        let distance = Float::sqrt(di * di + dj * dj);
        match self.band {
            FilterBandType::Lowpass => distance <= self.cutoff,
            FilterBandType::Highpass => distance > self.cutoff,
        }
    }
}

impl<F> KernelLifecycle for SpectralFilterKernel<F> {
    type Config = SpectralFilterConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.cutoff.is_finite() {
            return Err(ConfigError::InvalidArgument {
                arg: "cutoff",
                reason: "cutoff must be finite",
            });
        }
        Ok(Self {
            band: config.band,
            cutoff: config.cutoff,
            step: validate_step(config.step)?,
            _precision: PhantomData,
        })
    }
}

impl<F> SpectralMask2D<F> for SpectralFilterKernel<F>
where
    F: Float,
{
    fn apply(&self, spectrum: &mut ComplexMatrix<F>) {
        let dim = spectrum.dim();
        spectrum.indexed_iter_mut().for_each(|(index, cell)| {
            if !self.keeps(dim, index) {
                *cell = Complex::zero();
            }
        });
    }
}

impl<F> SpectralFilter2D for SpectralFilterKernel<F>
where
    F: Float + FloatConst,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<i32> + ?Sized,
    {
        let filtered = self.run_alloc(input)?;
        let mut out = out.write_view_mut();
        ensure_shape("out", filtered.dim(), out.dim())?;
        out.assign(&filtered);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        let mut spectrum = forward_2d::<F>(input.read_view(), self.step)?;
        self.apply(&mut spectrum);
        inverse_2d(spectrum.view())
    }
}
