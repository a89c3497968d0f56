//! Password based key derivation.
//!
//! Provides PBKDF2 over the engine digests. Derived keys are written
//! straight into secure buffers charged to the engine's secure memory pool.

use super::{ContextInfo, KdfContext};
use crate::engine::{self, digest::HashAlgorithm, pbkdf2};
use crate::error::{ProviderError, Result};
use crate::memory::SecureArray;
use crate::registry::Feature;
use crate::types::{InitializationVector, SymmetricKey};

/// PBKDF2 key derivation with HMAC over one digest.
#[derive(Debug, Clone)]
pub struct Pbkdf2Context {
    feature: Feature,
    hash: HashAlgorithm,
}

impl Pbkdf2Context {
    /// Creates a PBKDF2 context for `feature` using HMAC-`hash`.
    pub fn new(feature: Feature, hash: HashAlgorithm) -> Self {
        Self { feature, hash }
    }

    /// The digest under the HMAC.
    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    fn derive_into(
        &self,
        mut buffer: SecureArray,
        secret: &[u8],
        salt: &InitializationVector,
        iteration_count: u32,
    ) -> Result<SymmetricKey> {
        pbkdf2::derive(self.hash, secret, salt, iteration_count, &mut buffer)?;
        Ok(SymmetricKey::new(buffer))
    }

    /// Output buffer for a derived key, charged to the secure pool when the
    /// engine has one.
    fn output_buffer(key_length: usize) -> Result<SecureArray> {
        match engine::secure_pool() {
            Some(pool) => pool.allocate(key_length),
            None => Ok(SecureArray::try_zeroed(key_length)?),
        }
    }
}

impl ContextInfo for Pbkdf2Context {
    fn feature(&self) -> Feature {
        self.feature
    }
}

impl KdfContext for Pbkdf2Context {
    fn make_key(
        &self,
        secret: &[u8],
        salt: &InitializationVector,
        key_length: usize,
        iteration_count: u32,
    ) -> SymmetricKey {
        if let Err(err) = pbkdf2::check_request(self.hash, key_length, iteration_count) {
            tracing::error!(feature = self.type_name(), %err, "key derivation failed");
            return SymmetricKey::default();
        }

        let buffer = match Self::output_buffer(key_length) {
            Ok(buffer) => buffer,
            Err(ProviderError::PoolExhausted { .. }) => {
                tracing::warn!(
                    feature = self.type_name(),
                    key_length,
                    "deriving key outside the secure pool"
                );
                match SecureArray::try_zeroed(key_length) {
                    Ok(buffer) => buffer,
                    Err(err) => {
                        tracing::error!(feature = self.type_name(), %err, "key derivation failed");
                        return SymmetricKey::default();
                    }
                }
            }
            Err(err) => {
                tracing::error!(feature = self.type_name(), %err, "key derivation failed");
                return SymmetricKey::default();
            }
        };

        match self.derive_into(buffer, secret, salt, iteration_count) {
            Ok(key) => key,
            Err(err) => {
                tracing::error!(feature = self.type_name(), %err, "key derivation failed");
                SymmetricKey::default()
            }
        }
    }

    fn try_make_key(
        &self,
        secret: &[u8],
        salt: &InitializationVector,
        key_length: usize,
        iteration_count: u32,
    ) -> Result<SymmetricKey> {
        pbkdf2::check_request(self.hash, key_length, iteration_count)?;
        let buffer = Self::output_buffer(key_length)?;
        let key = self.derive_into(buffer, secret, salt, iteration_count)?;
        tracing::debug!(
            feature = self.type_name(),
            key_length,
            iteration_count,
            "key derived"
        );
        Ok(key)
    }
}
