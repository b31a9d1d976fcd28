//! Shared trait-first kernel substrate.
//!
//! This module defines reusable interfaces for constructor validation, 2D matrix
//! adapters and the compute-then-read cache used by the transform kernels.

mod cache;
mod errors;
mod io;
mod lifecycle;

pub use cache::*;
pub use errors::*;
pub use io::*;
pub use lifecycle::*;
