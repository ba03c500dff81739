//! Context configuration.

/// What to do when every strategy declines a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Fail with [`ConversionError::NotSupported`](crate::ConversionError::NotSupported).
    #[default]
    Raise,
    /// Return the caller's default, or the target type's default value.
    Suppress,
}

/// Options for a [`ConversionContext`](crate::ConversionContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// Memoize native cast classifications per pair.
    pub cache_enabled: bool,
    /// Failure mode for requests that do not choose one.
    pub failure_mode: FailureMode,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            failure_mode: FailureMode::Raise,
        }
    }
}

impl ContextOptions {
    /// Set whether the capability cache is used.
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the default failure mode.
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ContextOptions::default();
        assert!(options.cache_enabled);
        assert_eq!(options.failure_mode, FailureMode::Raise);
    }

    #[test]
    fn chained_setters() {
        let options = ContextOptions::default()
            .with_cache_enabled(false)
            .with_failure_mode(FailureMode::Suppress);
        assert!(!options.cache_enabled);
        assert_eq!(options.failure_mode, FailureMode::Suppress);
    }
}
