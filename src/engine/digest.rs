//! Message digest algorithms.

use crate::memory::SecureArray;
use digest::{Digest, FixedOutputReset};

/// Digest algorithms known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Md4,
    Md5,
    Ripemd160,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Md4 => "md4",
            Self::Md5 => "md5",
            Self::Ripemd160 => "ripemd160",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Md4 | Self::Md5 => 16,
            Self::Sha1 | Self::Ripemd160 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Opens a fresh running digest.
    pub(crate) fn open(&self) -> Box<dyn DigestEngine> {
        match self {
            Self::Sha1 => Box::new(sha1::Sha1::new()),
            Self::Md4 => Box::new(md4::Md4::new()),
            Self::Md5 => Box::new(md5::Md5::new()),
            Self::Ripemd160 => Box::new(ripemd::Ripemd160::new()),
            Self::Sha256 => Box::new(sha2::Sha256::new()),
            Self::Sha384 => Box::new(sha2::Sha384::new()),
            Self::Sha512 => Box::new(sha2::Sha512::new()),
        }
    }
}

/// A running digest.
pub(crate) trait DigestEngine: Send + Sync {
    fn write(&mut self, data: &[u8]);

    fn reset(&mut self);

    /// Produces the digest of everything written and resets the state.
    fn read(&mut self) -> SecureArray;

    fn box_clone(&self) -> Box<dyn DigestEngine>;
}

impl<D> DigestEngine for D
where
    D: Digest + FixedOutputReset + Clone + Send + Sync + 'static,
{
    fn write(&mut self, data: &[u8]) {
        Digest::update(self, data);
    }

    fn reset(&mut self) {
        Digest::reset(self);
    }

    fn read(&mut self) -> SecureArray {
        let output = Digest::finalize_reset(self);
        SecureArray::from(&output[..])
    }

    fn box_clone(&self) -> Box<dyn DigestEngine> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [HashAlgorithm; 7] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Md4,
        HashAlgorithm::Md5,
        HashAlgorithm::Ripemd160,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    #[test]
    fn test_digest_lengths_match_engine() {
        for alg in ALL {
            let mut engine = alg.open();
            engine.write(b"abc");
            assert_eq!(engine.read().len(), alg.digest_len(), "{}", alg.name());
        }
    }

    #[test]
    fn test_read_resets() {
        let mut engine = HashAlgorithm::Sha256.open();
        let empty = engine.read();
        engine.write(b"data");
        let _ = engine.read();
        assert_eq!(engine.read(), empty);
    }

    #[test]
    fn test_box_clone_is_independent() {
        let mut engine = HashAlgorithm::Md5.open();
        engine.write(b"prefix");
        let mut copy = engine.box_clone();
        copy.write(b"-more");
        assert_ne!(engine.read(), copy.read());
    }
}
