use super::{ConfigError, ExecInvariantViolation, KernelLifecycle};

/// Whether a [`Cached`] kernel holds a readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// No successful run yet.
    #[default]
    NotComputed,
    /// The cached output belongs to the most recent successful run.
    Computed,
}

/// A kernel paired with the output of its most recent successful run.
///
/// Reads before the first run fail with [`ExecInvariantViolation::NotComputedYet`]. A failed run
/// leaves the previous output in place. Runs take `&mut self`, so a single instance is never
/// written concurrently.
#[derive(Debug, Clone)]
pub struct Cached<K, O> {
    kernel: K,
    output: Option<O>,
}

impl<K, O> Cached<K, O> {
    /// Wrap an already validated kernel.
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            output: None,
        }
    }

    /// The wrapped kernel.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        match self.output {
            Some(_) => LifecycleState::Computed,
            None => LifecycleState::NotComputed,
        }
    }

    /// Output of the most recent successful run.
    pub fn output(&self) -> Result<&O, ExecInvariantViolation> {
        self.output
            .as_ref()
            .ok_or(ExecInvariantViolation::NotComputedYet)
    }

    /// Run `f` against the kernel and cache its output on success.
    pub fn compute<F>(&mut self, f: F) -> Result<&O, ExecInvariantViolation>
    where
        F: FnOnce(&K) -> Result<O, ExecInvariantViolation>,
    {
        let output = f(&self.kernel)?;
        Ok(self.output.insert(output))
    }

    /// Take the cached output, returning to [`LifecycleState::NotComputed`].
    pub fn take_output(&mut self) -> Option<O> {
        self.output.take()
    }
}

impl<K, O> KernelLifecycle for Cached<K, O>
where
    K: KernelLifecycle,
{
    type Config = K::Config;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        K::try_new(config).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cached, ExecInvariantViolation, LifecycleState};

    #[derive(Debug)]
    struct Doubler;

    #[test]
    fn reads_before_first_run_fail() {
        let cached: Cached<Doubler, i32> = Cached::new(Doubler);
        assert_eq!(cached.state(), LifecycleState::NotComputed);
        assert_eq!(
            cached.output().expect_err("nothing computed"),
            ExecInvariantViolation::NotComputedYet
        );
    }

    #[test]
    fn successful_run_flips_state_and_failed_run_keeps_cache() {
        let mut cached: Cached<Doubler, i32> = Cached::new(Doubler);
        let out = *cached.compute(|_| Ok(21 * 2)).expect("run succeeds");
        assert_eq!(out, 42);
        assert_eq!(cached.state(), LifecycleState::Computed);

        let err = cached
            .compute(|_| {
                Err(ExecInvariantViolation::InvalidState {
                    reason: "forced failure",
                })
            })
            .expect_err("run fails");
        assert!(matches!(err, ExecInvariantViolation::InvalidState { .. }));
        assert_eq!(cached.output().copied(), Ok(42));

        assert_eq!(cached.take_output(), Some(42));
        assert_eq!(cached.state(), LifecycleState::NotComputed);
    }
}
