//! Numeric primitives shared by the `imxform` transform kernels.
//!
//! The crate is `no_std`; the FFT routines work on caller-provided buffers and never allocate.

#![no_std]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
pub mod fft;

pub use error::*;
pub use num_complex::Complex;
