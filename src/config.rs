//! Configuration management for the provider.
//!
//! This module defines the tunables of engine initialization and the
//! failure policy applied on the cipher data path.

/// Default secure memory budget in bytes (16 KiB).
pub const DEFAULT_SECURE_POOL_BYTES: usize = 16 * 1024;

/// Oldest engine release this build is known to work with.
pub const MIN_ENGINE_VERSION: &str = "0.1.0";

/// What a cipher context does when the engine reports an error on the data
/// path (`update` / `finalize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Return the error to the caller.
    #[default]
    Strict,

    /// Log the error and report success with an empty output.
    LogAndContinue,
}

/// Configuration for the provider and its engine.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Budget of the secure memory pool, in bytes.
    pub secure_pool_bytes: usize,
    /// Whether secure buffers try to lock their pages into RAM.
    pub lock_memory: bool,
    /// Failure handling on the cipher data path.
    pub failure_policy: FailurePolicy,
    /// Minimum engine version; older engines are logged, not refused.
    pub required_engine_version: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            secure_pool_bytes: DEFAULT_SECURE_POOL_BYTES,
            lock_memory: true,
            failure_policy: FailurePolicy::Strict,
            required_engine_version: MIN_ENGINE_VERSION.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Creates a new configuration.
    ///
    /// # Arguments
    ///
    /// * `secure_pool_bytes` - Secure memory budget in bytes
    /// * `lock_memory` - Lock secure buffers into RAM
    /// * `failure_policy` - Data path failure handling
    ///
    /// # Examples
    ///
    /// ```
    /// # use tesseract_provider::config::{FailurePolicy, ProviderConfig};
    /// let config = ProviderConfig::new(64 * 1024, true, FailurePolicy::Strict);
    /// ```
    pub fn new(secure_pool_bytes: usize, lock_memory: bool, failure_policy: FailurePolicy) -> Self {
        Self {
            secure_pool_bytes,
            lock_memory,
            failure_policy,
            ..Self::default()
        }
    }

    /// Strict data path errors (the default).
    pub fn strict() -> Self {
        Self::default()
    }

    /// Data path errors are only logged, callers always see success.
    ///
    /// Matches hosts written against providers that never reported
    /// transform failures.
    pub fn lenient() -> Self {
        Self {
            failure_policy: FailurePolicy::LogAndContinue,
            ..Self::default()
        }
    }

    /// Sets the minimum engine version.
    pub fn with_required_engine_version(mut self, version: impl Into<String>) -> Self {
        self.required_engine_version = version.into();
        self
    }
}
