//! Block cipher contexts.
//!
//! A [`BlockCipherContext`] is created unkeyed by the registry. `setup`
//! binds direction, key and IV and opens the engine transform; `update`
//! streams data through it; `finalize` ends the stream and returns the
//! context to a state where only a new `setup` is accepted.
//!
//! ECB and CBC only ever hand whole blocks to the engine. Partial blocks are
//! carried in a one-block pending buffer between calls, so chunk boundaries
//! do not have to line up with the block size. CFB is a stream mode and
//! returns exactly as many bytes as it is given.
//!
//! With padding (the `-pkcs7` features), encryption appends PKCS#7 padding
//! in `finalize`, which then returns exactly one block. Decryption holds the
//! last whole block back until `finalize`, where the padding is checked and
//! stripped.

use super::{CipherContext, ContextInfo};
use crate::config::FailurePolicy;
use crate::engine::cipher::{self as engine, BlockTransform, CipherAlgorithm, CipherMode};
use crate::error::{ProviderError, Result};
use crate::memory::SecureArray;
use crate::registry::Feature;
use crate::types::{Direction, InitializationVector, KeyLength, SymmetricKey};
use subtle::{ConstantTimeEq, ConstantTimeLess};

/// Keyed transform and stream position of an active context.
struct Active {
    direction: Direction,
    transform: Box<dyn BlockTransform>,
    /// Bytes that did not form an emitted block yet.
    pending: SecureArray,
    pending_len: usize,
    key: SymmetricKey,
    iv: InitializationVector,
}

enum State {
    Unkeyed,
    Active(Active),
    Finished,
}

/// Block cipher context for one algorithm and mode.
pub struct BlockCipherContext {
    feature: Feature,
    algorithm: CipherAlgorithm,
    mode: CipherMode,
    padding: bool,
    policy: FailurePolicy,
    weak_key: bool,
    state: State,
}

impl BlockCipherContext {
    /// Creates an unkeyed context.
    pub fn new(
        feature: Feature,
        algorithm: CipherAlgorithm,
        mode: CipherMode,
        padding: bool,
    ) -> Self {
        Self {
            feature,
            algorithm,
            mode,
            padding,
            policy: FailurePolicy::default(),
            weak_key: false,
            state: State::Unkeyed,
        }
    }

    /// Sets how transform failures on the data path are reported.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Whether `finalize` pads (encryption) or unpads (decryption).
    pub fn padding(&self) -> bool {
        self.padding
    }

    /// Direction bound by `setup`, if the context is active.
    pub fn direction(&self) -> Option<Direction> {
        match &self.state {
            State::Active(active) => Some(active.direction),
            _ => None,
        }
    }

    /// Whether the key bound by the last `setup` is a known weak key.
    pub fn is_weak_key(&self) -> bool {
        self.weak_key
    }

    /// Whether `setup` has been called and `finalize` has not.
    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// The key and IV bound by `setup`, while the context is active.
    pub fn bound_material(&self) -> Option<(&SymmetricKey, &InitializationVector)> {
        match &self.state {
            State::Active(active) => Some((&active.key, &active.iv)),
            _ => None,
        }
    }

    fn active(&mut self) -> Result<&mut Active> {
        match &mut self.state {
            State::Active(active) => Ok(active),
            State::Unkeyed => Err(ProviderError::NotKeyed),
            State::Finished => Err(ProviderError::Finished),
        }
    }

    /// Applies the failure policy to a data path result.
    fn check(&self, label: &'static str, result: Result<SecureArray>) -> Result<SecureArray> {
        match result {
            Ok(output) => Ok(output),
            Err(err) => match self.policy {
                FailurePolicy::Strict => Err(err),
                FailurePolicy::LogAndContinue => {
                    tracing::error!(feature = self.type_name(), label, %err, "cipher transform failed");
                    Ok(SecureArray::empty())
                }
            },
        }
    }

    fn transform_chunk(&mut self, input: &[u8]) -> Result<SecureArray> {
        let mode = self.mode;
        let padding = self.padding;
        let block_size = self.algorithm.block_size();
        let active = self.active()?;

        if mode.is_stream() {
            let mut output = SecureArray::from(input);
            active.transform.apply(&mut output);
            return Ok(output);
        }

        let total = active.pending_len + input.len();
        let remainder = total % block_size;
        let hold = if active.direction == Direction::Decode && padding && remainder == 0 {
            // The last whole block may be all padding.
            total.min(block_size)
        } else {
            remainder
        };
        let out_len = total - hold;

        let mut output = SecureArray::zeroed(out_len);
        let from_pending = active.pending_len.min(out_len);
        output[..from_pending].copy_from_slice(&active.pending[..from_pending]);
        let from_input = out_len - from_pending;
        output[from_pending..].copy_from_slice(&input[..from_input]);

        let kept = active.pending_len - from_pending;
        active.pending.copy_within(from_pending..active.pending_len, 0);
        let rest = &input[from_input..];
        active.pending[kept..kept + rest.len()].copy_from_slice(rest);
        active.pending_len = kept + rest.len();

        active.transform.apply(&mut output);
        Ok(output)
    }

    fn finish(&mut self) -> Result<SecureArray> {
        let state = std::mem::replace(&mut self.state, State::Finished);
        let mut active = match state {
            State::Active(active) => active,
            State::Unkeyed => {
                self.state = State::Unkeyed;
                return Err(ProviderError::NotKeyed);
            }
            State::Finished => return Err(ProviderError::Finished),
        };

        let block_size = self.algorithm.block_size();
        if self.mode.is_stream() {
            return Ok(SecureArray::empty());
        }

        if !self.padding {
            if active.pending_len != 0 {
                return Err(ProviderError::IncompleteBlock {
                    pending: active.pending_len,
                    block_size,
                });
            }
            return Ok(SecureArray::empty());
        }

        match active.direction {
            Direction::Encode => {
                let pad = block_size - active.pending_len;
                let mut block = SecureArray::zeroed(block_size);
                block[..active.pending_len].copy_from_slice(&active.pending[..active.pending_len]);
                // block_size is at most 16, the pad byte always fits
                block[active.pending_len..].fill(pad as u8);
                active.transform.apply(&mut block);
                Ok(block)
            }
            Direction::Decode => {
                if active.pending_len != block_size {
                    return Err(if active.pending_len == 0 {
                        ProviderError::InvalidPadding
                    } else {
                        ProviderError::IncompleteBlock {
                            pending: active.pending_len,
                            block_size,
                        }
                    });
                }
                let mut block = SecureArray::from(&active.pending[..]);
                active.transform.apply(&mut block);
                let content_len = strip_pkcs7(&block)?;
                block.truncate(content_len);
                Ok(block)
            }
        }
    }
}

/// Validates PKCS#7 padding on a decrypted final block and returns the
/// length of the content in front of it.
fn strip_pkcs7(block: &[u8]) -> Result<usize> {
    let block_size = block.len();
    let pad = block[block_size - 1];

    let mut valid = !pad.ct_eq(&0) & (pad.ct_lt(&(block_size as u8)) | pad.ct_eq(&(block_size as u8)));
    for (i, byte) in block.iter().enumerate() {
        let in_padding = (block_size - i) as u8;
        let covered = in_padding.ct_lt(&pad) | in_padding.ct_eq(&pad);
        valid &= !covered | byte.ct_eq(&pad);
    }

    if bool::from(valid) {
        Ok(block_size - pad as usize)
    } else {
        Err(ProviderError::InvalidPadding)
    }
}

impl ContextInfo for BlockCipherContext {
    fn feature(&self) -> Feature {
        self.feature
    }
}

impl CipherContext for BlockCipherContext {
    fn setup(
        &mut self,
        direction: Direction,
        key: &SymmetricKey,
        iv: &InitializationVector,
    ) -> Result<()> {
        if self.is_active() {
            return Err(ProviderError::AlreadyKeyed);
        }

        let contract = self.algorithm.key_length();
        if !contract.accepts(key.len()) {
            tracing::warn!(
                feature = self.type_name(),
                length = key.len(),
                "key length rejected"
            );
            return Err(ProviderError::InvalidKeyLength {
                algorithm: self.algorithm.name(),
                length: key.len(),
                expected: contract,
            });
        }

        self.weak_key = engine::is_weak_key(self.algorithm, key);
        if self.weak_key {
            // Weak keys are accepted; the flag is all the caller gets.
            tracing::warn!(feature = self.type_name(), "weak key");
        }

        let transform = engine::open(self.algorithm, self.mode, direction, key, iv)
            .inspect_err(|err| {
                tracing::warn!(feature = self.type_name(), %err, "cipher setup failed");
            })?;

        let block_size = self.algorithm.block_size();
        self.state = State::Active(Active {
            direction,
            transform,
            pending: SecureArray::zeroed(block_size),
            pending_len: 0,
            key: key.clone(),
            iv: iv.clone(),
        });
        tracing::debug!(feature = self.type_name(), ?direction, "cipher context set up");
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    fn update(&mut self, input: &[u8]) -> Result<SecureArray> {
        let result = self.transform_chunk(input);
        if matches!(result, Err(ProviderError::NotKeyed | ProviderError::Finished)) {
            return result;
        }
        self.check("update", result)
    }

    fn finalize(&mut self) -> Result<SecureArray> {
        let result = self.finish();
        if matches!(result, Err(ProviderError::NotKeyed | ProviderError::Finished)) {
            return result;
        }
        self.check("finalize", result)
    }

    fn key_length(&self) -> KeyLength {
        self.algorithm.key_length()
    }
}
