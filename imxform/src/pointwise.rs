//! Non-spectral per-cell transforms: intensity thresholding and histogramming.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read2D, Write2D};
use crate::matrix::{ensure_shape, from_row_major, IntMatrix, RealMatrix};
use alloc::vec;
use itertools::{Itertools, MinMaxResult};

/// Per-cell clamp into a closed intensity range.
pub trait Threshold2D {
    /// Clamp into a caller-provided output of the input's shape.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<i32> + ?Sized;

    /// Clamp and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized;
}

/// Relative frequency of every integer value between the input's extremes.
pub trait Histogram2D {
    /// Write the `1 x (max - min + 1)` histogram into a caller-provided output.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<f64> + ?Sized;

    /// Compute and allocate the histogram row.
    fn run_alloc<I>(&self, input: &I) -> Result<RealMatrix<f64>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized;
}

/// Constructor config for [`ThresholdKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdConfig {
    /// Lower bound, inclusive.
    pub min: i32,
    /// Upper bound, inclusive. Must be strictly greater than `min`.
    pub max: i32,
}

/// Trait-first thresholding kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdKernel {
    min: i32,
    max: i32,
}

impl ThresholdKernel {
    /// Lower bound.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> i32 {
        self.max
    }
}

impl KernelLifecycle for ThresholdKernel {
    type Config = ThresholdConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.min >= config.max {
            return Err(ConfigError::InvalidArgument {
                arg: "min",
                reason: "min must be strictly less than max",
            });
        }
        Ok(Self {
            min: config.min,
            max: config.max,
        })
    }
}

impl Threshold2D for ThresholdKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<i32> + ?Sized,
    {
        let input = input.read_view();
        let mut out = out.write_view_mut();
        ensure_shape("out", input.dim(), out.dim())?;
        out.zip_mut_with(&input, |o, &v| *o = v.clamp(self.min, self.max));
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<IntMatrix, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        Ok(input.read_view().mapv(|v| v.clamp(self.min, self.max)))
    }
}

/// Empty config for [`HistogramKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistogramConfig;

/// Trait-first histogram kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistogramKernel;

impl KernelLifecycle for HistogramKernel {
    type Config = HistogramConfig;

    fn try_new(_: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self)
    }
}

impl Histogram2D for HistogramKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
        O: Write2D<f64> + ?Sized,
    {
        let hist = self.run_alloc(input)?;
        let mut out = out.write_view_mut();
        ensure_shape("out", hist.dim(), out.dim())?;
        out.assign(&hist);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<RealMatrix<f64>, ExecInvariantViolation>
    where
        I: Read2D<i32> + ?Sized,
    {
        let input = input.read_view();
        let (lo, hi) = match input.iter().copied().minmax() {
            MinMaxResult::NoElements => {
                return Err(ExecInvariantViolation::InvalidState {
                    reason: "histogram of an empty matrix",
                })
            }
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };

        let bins = usize::try_from(i64::from(hi) - i64::from(lo) + 1).map_err(|_| {
            ExecInvariantViolation::InvalidState {
                reason: "histogram value range exceeds addressable memory",
            }
        })?;
        let mut counts = vec![0usize; bins];
        for &v in input.iter() {
            // `v - lo` lies in `0..bins` by construction of `lo` and `hi`.
            counts[(i64::from(v) - i64::from(lo)) as usize] += 1;
        }

        let size = input.len() as f64;
        from_row_major(
            (1, bins),
            counts.into_iter().map(|c| c as f64 / size).collect(),
        )
    }
}

/// Clamp every cell of `input` into `[min, max]`.
///
/// Fails with [`ConfigError::InvalidArgument`] (wrapped) when `min >= max`; the bounds are never
/// swapped.
///
/// ```
/// use imxform::pointwise::threshold;
/// use ndarray::array;
///
/// let out = threshold(&array![[11, 12], [21, 22]], 12, 21).unwrap();
/// assert_eq!(out, array![[12, 12], [21, 21]]);
/// assert!(threshold(&array![[11, 12], [21, 22]], 5, 3).is_err());
/// ```
pub fn threshold<I>(input: &I, min: i32, max: i32) -> Result<IntMatrix, ExecInvariantViolation>
where
    I: Read2D<i32> + ?Sized,
{
    ThresholdKernel::try_new(ThresholdConfig { min, max })?.run_alloc(input)
}

/// `1 x (max - min + 1)` row whose bin `v - min` holds the fraction of cells equal to `v`.
pub fn histogram<I>(input: &I) -> Result<RealMatrix<f64>, ExecInvariantViolation>
where
    I: Read2D<i32> + ?Sized,
{
    HistogramKernel::try_new(HistogramConfig)?.run_alloc(input)
}
