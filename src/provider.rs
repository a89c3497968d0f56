//! The provider: feature listing and context construction.
//!
//! # Example
//!
//! ```
//! use tesseract_provider::{Context, Provider};
//!
//! let provider = Provider::default();
//! provider.init();
//!
//! match provider.create_context("sha256") {
//!     Some(Context::Hash(mut hash)) => {
//!         hash.update(b"abc");
//!         assert_eq!(hash.finalize().len(), 32);
//!     }
//!     _ => unreachable!(),
//! }
//! assert!(provider.create_context("rot13").is_none());
//! ```

use crate::config::ProviderConfig;
use crate::crypto::cipher::BlockCipherContext;
use crate::crypto::hash::DigestContext;
use crate::crypto::kdf::Pbkdf2Context;
use crate::crypto::{CipherContext, HashContext, KdfContext};
use crate::engine;
use crate::error::{ProviderError, Result};
use crate::registry::{self, Algorithm, Category, Feature};

/// Name the provider reports to hosts.
pub const PROVIDER_NAME: &str = "tesseract-provider";

/// A freshly created context of one of the three kinds.
pub enum Context {
    Hash(Box<dyn HashContext>),
    Cipher(Box<dyn CipherContext>),
    Kdf(Box<dyn KdfContext>),
}

impl Context {
    pub fn category(&self) -> Category {
        match self {
            Context::Hash(_) => Category::Hash,
            Context::Cipher(_) => Category::Cipher,
            Context::Kdf(_) => Category::Kdf,
        }
    }

    /// The feature name the context was created for.
    pub fn type_name(&self) -> &'static str {
        match self {
            Context::Hash(ctx) => ctx.type_name(),
            Context::Cipher(ctx) => ctx.type_name(),
            Context::Kdf(ctx) => ctx.type_name(),
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Context")
            .field(&self.category())
            .field(&self.type_name())
            .finish()
    }
}

/// Factory for hash, cipher and key derivation contexts.
#[derive(Debug, Clone, Default)]
pub struct Provider {
    config: ProviderConfig,
}

impl Provider {
    /// Creates a provider with the given configuration.
    ///
    /// The engine is not touched until [`Provider::init`] or the first
    /// context is created.
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// Initializes the engine. Safe to call any number of times; only the
    /// first call in the process has an effect.
    pub fn init(&self) {
        engine::initialize(&self.config);
    }

    /// Names of all supported features, in a fixed order.
    pub fn features(&self) -> Vec<&'static str> {
        registry::feature_names()
    }

    /// Creates a context for the feature `name`, or `None` if the name is
    /// not supported.
    pub fn create_context(&self, name: &str) -> Option<Context> {
        match Feature::from_name(name) {
            Some(feature) => Some(self.context_for(feature)),
            None => {
                tracing::debug!(name, "unsupported feature requested");
                None
            }
        }
    }

    /// Creates a context for a known feature.
    pub fn context_for(&self, feature: Feature) -> Context {
        if !engine::is_initialized() {
            self.init();
        }

        match feature.algorithm() {
            Algorithm::Hash(hash) => Context::Hash(Box::new(DigestContext::new(feature, hash))),
            Algorithm::Cipher {
                algorithm,
                mode,
                padding,
            } => Context::Cipher(Box::new(
                BlockCipherContext::new(feature, algorithm, mode, padding)
                    .with_policy(self.config.failure_policy),
            )),
            Algorithm::Kdf(hash) => Context::Kdf(Box::new(Pbkdf2Context::new(feature, hash))),
        }
    }

    /// Creates a hash context.
    pub fn create_hash(&self, name: &str) -> Result<Box<dyn HashContext>> {
        match self.create_context(name) {
            Some(Context::Hash(ctx)) => Ok(ctx),
            _ => Err(ProviderError::UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// Creates a cipher context. It must be set up before use.
    pub fn create_cipher(&self, name: &str) -> Result<Box<dyn CipherContext>> {
        match self.create_context(name) {
            Some(Context::Cipher(ctx)) => Ok(ctx),
            _ => Err(ProviderError::UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// Creates a key derivation context.
    pub fn create_kdf(&self, name: &str) -> Result<Box<dyn KdfContext>> {
        match self.create_context(name) {
            Some(Context::Kdf(ctx)) => Ok(ctx),
            _ => Err(ProviderError::UnsupportedAlgorithm(name.to_string())),
        }
    }
}
