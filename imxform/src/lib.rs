//! Deterministic transforms over rectangular integer signals and images.
//!
//! - [`fft`]: orthonormal radix-2 FFTs in one and two dimensions.
//! - [`filter`]: lowpass and highpass masks applied between a forward and an inverse 2D FFT.
//! - [`pointwise`]: intensity thresholding and histogramming.
//! - [`format`]: plain-text matrix persistence (`std` only).
//!
//! Every transform is a kernel built from a plain config through
//! [`kernel::KernelLifecycle::try_new`], then run through a capability trait from [`traits`] (or
//! [`pointwise`]) with either `run_alloc` or `run_into`. Free functions such as [`fft::fft2d`]
//! wrap both steps.
//!
//! ```
//! use imxform::fft::{Fft2DConfig, Fft2DKernel};
//! use imxform::kernel::KernelLifecycle;
//! use imxform::traits::{ForwardFft2D, InverseFft2D};
//! use imxform::fft::{Ifft2DConfig, Ifft2DKernel};
//! use ndarray::array;
//!
//! let image = array![[11, 12], [21, 22]];
//! let forward = Fft2DKernel::<f64>::try_new(Fft2DConfig::default()).unwrap();
//! let inverse = Ifft2DKernel::<f64>::try_new(Ifft2DConfig).unwrap();
//!
//! let spectrum = forward.run_alloc(&image).unwrap();
//! assert!((spectrum.frequency[(0, 0)].re - 33.0).abs() < 1e-12);
//! assert_eq!(inverse.run_alloc(&spectrum.frequency).unwrap(), image);
//! ```

#![no_std]
#![deny(missing_docs)]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// FFT forward and inverse transforms.
pub mod fft;

/// Frequency-domain masking filters.
pub mod filter;

/// Plain-text matrix reading and writing.
#[cfg(feature = "std")]
pub mod format;

/// Shared kernel substrate: lifecycle, adapters, errors, cache.
pub mod kernel;

/// Matrix containers and the forward-transform result type.
pub mod matrix;

/// Thresholding and histogram kernels.
pub mod pointwise;

/// Capability traits implemented by the spectral kernels.
pub mod traits;

pub use matrix::{ComplexMatrix, IntMatrix, RealMatrix, Spectrum};
pub use ndarray;
pub use num_complex::Complex;
