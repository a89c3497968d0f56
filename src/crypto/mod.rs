//! Context abstractions for hashing, encryption and key derivation.
//!
//! Each capability is one trait. The provider hands out boxed trait objects,
//! so hosts can drive any algorithm of a capability without knowing which
//! concrete family implements it.

pub mod cipher;
pub mod hash;
pub mod kdf;

use crate::error::Result;
use crate::memory::SecureArray;
use crate::registry::Feature;
use crate::types::{Direction, InitializationVector, KeyLength, SymmetricKey};

/// Behavior shared by every context.
pub trait ContextInfo: Send {
    /// The feature this context was created for.
    fn feature(&self) -> Feature;

    /// The feature name, e.g. `"aes128-cbc"`.
    fn type_name(&self) -> &'static str {
        self.feature().name()
    }
}

/// Streaming message digest.
pub trait HashContext: ContextInfo {
    /// Deep copy, including the accumulated state.
    fn clone_box(&self) -> Box<dyn HashContext>;

    /// Discards everything fed so far.
    fn clear(&mut self);

    /// Feeds `data` into the running digest.
    fn update(&mut self, data: &[u8]);

    /// Returns the digest of all data fed since the last `clear`.
    ///
    /// The running state is reset afterwards.
    fn finalize(&mut self) -> SecureArray;

    /// Length of the digest in bytes.
    fn digest_len(&self) -> usize;
}

impl Clone for Box<dyn HashContext> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Keyed block cipher transform.
pub trait CipherContext: ContextInfo {
    /// Binds direction, key and IV. Must precede `update` / `finalize`.
    fn setup(
        &mut self,
        direction: Direction,
        key: &SymmetricKey,
        iv: &InitializationVector,
    ) -> Result<()>;

    /// Block size of the algorithm in bytes.
    fn block_size(&self) -> usize;

    /// Transforms the next chunk of the stream.
    fn update(&mut self, input: &[u8]) -> Result<SecureArray>;

    /// Ends the stream, emitting padding or remaining plaintext.
    fn finalize(&mut self) -> Result<SecureArray>;

    /// Key lengths accepted by `setup`.
    fn key_length(&self) -> KeyLength;
}

/// Password based key derivation.
pub trait KdfContext: ContextInfo {
    /// Derives `key_length` bytes from `secret` and `salt`.
    ///
    /// Returns an empty key if derivation fails; the failure is logged.
    fn make_key(
        &self,
        secret: &[u8],
        salt: &InitializationVector,
        key_length: usize,
        iteration_count: u32,
    ) -> SymmetricKey {
        match self.try_make_key(secret, salt, key_length, iteration_count) {
            Ok(key) => key,
            Err(err) => {
                tracing::error!(feature = self.type_name(), %err, "key derivation failed");
                SymmetricKey::default()
            }
        }
    }

    /// Same as [`KdfContext::make_key`], but reports failures.
    fn try_make_key(
        &self,
        secret: &[u8],
        salt: &InitializationVector,
        key_length: usize,
        iteration_count: u32,
    ) -> Result<SymmetricKey>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_info_object_safe() {
        let _: Option<Box<dyn ContextInfo>> = None;
    }

    #[test]
    fn test_hash_context_object_safe() {
        let _: Option<Box<dyn HashContext>> = None;
    }

    #[test]
    fn test_cipher_context_object_safe() {
        let _: Option<Box<dyn CipherContext>> = None;
    }

    #[test]
    fn test_kdf_context_object_safe() {
        let _: Option<Box<dyn KdfContext>> = None;
    }
}
