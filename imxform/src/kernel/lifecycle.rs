use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

/// Validate an FFT step multiplier.
pub(crate) fn validate_step(step: usize) -> Result<usize, ConfigError> {
    if step == 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "step",
            reason: "step must be at least 1",
        });
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::{validate_step, ConfigError, KernelLifecycle};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct StrideConfig {
        step: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct StrideKernel {
        step: usize,
    }

    impl KernelLifecycle for StrideKernel {
        type Config = StrideConfig;

        fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
            Ok(Self {
                step: validate_step(config.step)?,
            })
        }
    }

    #[test]
    fn lifecycle_constructor_accepts_valid_config() {
        let kernel = StrideKernel::try_new(StrideConfig { step: 2 }).expect("valid config");
        assert_eq!(kernel.step, 2);
    }

    #[test]
    fn lifecycle_constructor_rejects_zero_step() {
        let err = StrideKernel::try_new(StrideConfig { step: 0 }).expect_err("invalid config");
        assert_eq!(
            err,
            ConfigError::InvalidArgument {
                arg: "step",
                reason: "step must be at least 1",
            }
        );
    }
}
