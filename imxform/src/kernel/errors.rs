use core::fmt;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// Input extents cannot be served by the radix-2 transform.
    InvalidShape {
        /// Name of the argument.
        arg: &'static str,
        /// Rows of the rejected input.
        rows: usize,
        /// Columns of the rejected input.
        cols: usize,
        /// Human readable reason.
        reason: &'static str,
    },
    /// Cached output was read before any successful `transform()`.
    NotComputedYet,
    /// Output shape mismatched the expected runtime shape.
    ShapeMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required `(rows, cols)`.
        expected: (usize, usize),
        /// Received `(rows, cols)`.
        got: (usize, usize),
    },
    /// Adapter binding/configuration failure.
    Config(ConfigError),
    /// The FFT primitive rejected its arguments.
    Primitive(imxform_core::Error),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<imxform_core::Error> for ExecInvariantViolation {
    fn from(value: imxform_core::Error) -> Self {
        Self::Primitive(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::InvalidShape {
                arg,
                rows,
                cols,
                reason,
            } => {
                write!(f, "Invalid shape {rows}x{cols} for `{arg}`: {reason}")
            }
            ExecInvariantViolation::NotComputedYet => {
                write!(f, "Output read before transform() was run.")
            }
            ExecInvariantViolation::ShapeMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution shape mismatch on `{arg}`. Expected {}x{}, got {}x{}.",
                    expected.0, expected.1, got.0, got.1
                )
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
            ExecInvariantViolation::Primitive(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExecInvariantViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecInvariantViolation::Config(err) => Some(err),
            ExecInvariantViolation::Primitive(err) => Some(err),
            _ => None,
        }
    }
}
