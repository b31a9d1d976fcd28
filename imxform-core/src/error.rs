use core::{error, fmt};

/// Errors raised by the `imxform-core` primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument passed into a primitive was invalid.
    #[cfg(feature = "alloc")]
    InvalidArg {
        /// The invalid arg
        arg: alloc::string::String,
        /// Explaining why arg is invalid.
        reason: alloc::string::String,
    },
    /// Argument passed into a primitive was invalid.
    #[cfg(not(feature = "alloc"))]
    InvalidArg,
    /// The addressed sub-sequence does not have a power-of-two length.
    NotPowerOfTwo {
        /// Number of addressed elements.
        len: usize,
    },
    /// Scratch buffer cannot hold the addressed sub-sequence.
    ScratchTooSmall {
        /// Elements required.
        needed: usize,
        /// Elements available.
        got: usize,
    },
    /// The inclusive end offset lies outside the buffer.
    OutOfBounds {
        /// Requested inclusive end offset.
        end: usize,
        /// Buffer length.
        len: usize,
    },
}

/// Result alias for `imxform-core` primitives.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "alloc")]
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            #[cfg(not(feature = "alloc"))]
            Error::InvalidArg => write!(f, "Invalid argument."),
            Error::NotPowerOfTwo { len } => {
                write!(f, "Radix-2 FFT needs a power-of-two length, got {len}.")
            }
            Error::ScratchTooSmall { needed, got } => {
                write!(f, "Scratch buffer too small. Needed {needed}, got {got}.")
            }
            Error::OutOfBounds { end, len } => {
                write!(f, "End offset {end} is out of bounds for buffer of length {len}.")
            }
        }
    }
}

impl error::Error for Error {}
