//! Digest contexts.

use super::{ContextInfo, HashContext};
use crate::engine::digest::{DigestEngine, HashAlgorithm};
use crate::memory::SecureArray;
use crate::registry::Feature;

/// Streaming digest backed by one engine hash.
pub struct DigestContext {
    feature: Feature,
    algorithm: HashAlgorithm,
    engine: Box<dyn DigestEngine>,
}

impl DigestContext {
    /// Opens a digest context for `feature` computing `algorithm`.
    pub fn new(feature: Feature, algorithm: HashAlgorithm) -> Self {
        Self {
            feature,
            algorithm,
            engine: algorithm.open(),
        }
    }

    /// The digest algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl Clone for DigestContext {
    fn clone(&self) -> Self {
        Self {
            feature: self.feature,
            algorithm: self.algorithm,
            engine: self.engine.box_clone(),
        }
    }
}

impl ContextInfo for DigestContext {
    fn feature(&self) -> Feature {
        self.feature
    }
}

impl HashContext for DigestContext {
    fn clone_box(&self) -> Box<dyn HashContext> {
        Box::new(self.clone())
    }

    fn clear(&mut self) {
        self.engine.reset();
    }

    fn update(&mut self, data: &[u8]) {
        self.engine.write(data);
    }

    fn finalize(&mut self) -> SecureArray {
        self.engine.read()
    }

    fn digest_len(&self) -> usize {
        self.algorithm.digest_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha1() -> DigestContext {
        DigestContext::new(Feature::Sha1, HashAlgorithm::Sha1)
    }

    #[test]
    fn test_empty_sha1() {
        let mut ctx = sha1();
        assert_eq!(
            hex::encode(&ctx.finalize()[..]),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_split_updates_match_single_update() {
        let message = b"The quick brown fox jumps over the lazy dog";

        let mut whole = sha1();
        whole.update(message);
        let expected = whole.finalize();

        for split in 0..=message.len() {
            let mut ctx = sha1();
            ctx.update(&message[..split]);
            ctx.update(&message[split..]);
            assert_eq!(ctx.finalize(), expected, "split at {}", split);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = sha1();
        original.update(b"shared prefix ");

        let mut copy = original.clone_box();
        copy.update(b"copy");
        original.update(b"original");

        let original_digest = original.finalize();
        let copy_digest = copy.finalize();

        let mut expected = sha1();
        expected.update(b"shared prefix original");
        assert_eq!(original_digest, expected.finalize());
        assert_ne!(copy_digest, original_digest);
    }

    #[test]
    fn test_clear_discards_state() {
        let mut ctx = sha1();
        ctx.update(b"discard me");
        ctx.clear();
        ctx.update(b"abc");

        let mut fresh = sha1();
        fresh.update(b"abc");
        assert_eq!(ctx.finalize(), fresh.finalize());
    }

    #[test]
    fn test_reuse_after_finalize() {
        let mut ctx = sha1();
        ctx.update(b"first");
        let _ = ctx.finalize();
        ctx.clear();
        let empty = ctx.finalize();
        assert_eq!(hex::encode(&empty[..]), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_type_name() {
        let ctx = DigestContext::new(Feature::Sha256, HashAlgorithm::Sha256);
        assert_eq!(ctx.type_name(), "sha256");
        assert_eq!(ctx.digest_len(), 32);
    }
}
