//! Block ciphers and the modes they run in.
//!
//! A transform is opened for one direction with its key and IV already
//! bound, and then only ever sees whole blocks (ECB, CBC) or arbitrary byte
//! runs (CFB). Buffering and padding live in the cipher context above.

use crate::error::{ProviderError, Result};
use crate::types::{Direction, KeyLength};
use cipher::generic_array::GenericArray;
use cipher::{
    BlockCipher, BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, InnerIvInit,
    KeyInit,
};

/// Block ciphers known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgorithm {
    Aes128,
    Aes192,
    Aes256,
    Blowfish,
    TripleDes,
    Des,
}

impl CipherAlgorithm {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aes128 => "aes128",
            Self::Aes192 => "aes192",
            Self::Aes256 => "aes256",
            Self::Blowfish => "blowfish",
            Self::TripleDes => "tripledes",
            Self::Des => "des",
        }
    }

    /// Block size in bytes. Independent of the mode.
    pub fn block_size(&self) -> usize {
        match self {
            Self::Aes128 | Self::Aes192 | Self::Aes256 => 16,
            Self::Blowfish | Self::TripleDes | Self::Des => 8,
        }
    }

    /// Key lengths the algorithm accepts.
    pub fn key_length(&self) -> KeyLength {
        match self {
            Self::Des => KeyLength::fixed(8),
            Self::Aes128 => KeyLength::fixed(16),
            Self::Aes192 | Self::TripleDes => KeyLength::fixed(24),
            Self::Aes256 => KeyLength::fixed(32),
            Self::Blowfish => KeyLength::new(4, 56, 1),
        }
    }
}

/// Cipher modes of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    Ecb,
    Cbc,
    Cfb,
}

impl CipherMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ecb => "ecb",
            Self::Cbc => "cbc",
            Self::Cfb => "cfb",
        }
    }

    /// Stream modes accept input of any length.
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Cfb)
    }

    /// Whether the mode consumes an IV.
    pub fn uses_iv(&self) -> bool {
        !matches!(self, Self::Ecb)
    }
}

/// A keyed cipher transform for one direction.
pub(crate) trait BlockTransform: Send {
    /// Transforms `buf` in place. For block modes `buf` holds whole blocks.
    fn apply(&mut self, buf: &mut [u8]);
}

struct Ecb<C> {
    cipher: C,
    direction: Direction,
}

impl<C> BlockTransform for Ecb<C>
where
    C: BlockCipher + BlockEncrypt + BlockDecrypt + Send,
{
    fn apply(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(C::block_size()) {
            let block = GenericArray::from_mut_slice(chunk);
            match self.direction {
                Direction::Encode => self.cipher.encrypt_block(block),
                Direction::Decode => self.cipher.decrypt_block(block),
            }
        }
    }
}

struct CbcEncrypt<C: BlockCipher + BlockEncryptMut>(cbc::Encryptor<C>);

impl<C> BlockTransform for CbcEncrypt<C>
where
    C: BlockCipher + BlockEncryptMut + Send,
{
    fn apply(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(C::block_size()) {
            self.0.encrypt_block_mut(GenericArray::from_mut_slice(chunk));
        }
    }
}

struct CbcDecrypt<C: BlockCipher + BlockDecryptMut>(cbc::Decryptor<C>);

impl<C> BlockTransform for CbcDecrypt<C>
where
    C: BlockCipher + BlockDecryptMut + Send,
{
    fn apply(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_exact_mut(C::block_size()) {
            self.0.decrypt_block_mut(GenericArray::from_mut_slice(chunk));
        }
    }
}

struct CfbEncrypt<C: BlockCipher + BlockEncryptMut>(cfb_mode::BufEncryptor<C>);

impl<C> BlockTransform for CfbEncrypt<C>
where
    C: BlockCipher + BlockEncryptMut + Send,
{
    fn apply(&mut self, buf: &mut [u8]) {
        self.0.encrypt(buf);
    }
}

struct CfbDecrypt<C: BlockCipher + BlockEncryptMut>(cfb_mode::BufDecryptor<C>);

impl<C> BlockTransform for CfbDecrypt<C>
where
    C: BlockCipher + BlockEncryptMut + Send,
{
    fn apply(&mut self, buf: &mut [u8]) {
        self.0.decrypt(buf);
    }
}

/// Opens a transform for `algorithm` in `mode`.
///
/// The key must already satisfy the algorithm's contract. The IV is ignored
/// by ECB and must be exactly one block for the other modes.
pub(crate) fn open(
    algorithm: CipherAlgorithm,
    mode: CipherMode,
    direction: Direction,
    key: &[u8],
    iv: &[u8],
) -> Result<Box<dyn BlockTransform>> {
    if mode.uses_iv() && iv.len() != algorithm.block_size() {
        return Err(ProviderError::InvalidIvLength {
            expected: algorithm.block_size(),
            actual: iv.len(),
        });
    }

    match algorithm {
        CipherAlgorithm::Aes128 => open_with::<aes::Aes128>(mode, direction, key, iv),
        CipherAlgorithm::Aes192 => open_with::<aes::Aes192>(mode, direction, key, iv),
        CipherAlgorithm::Aes256 => open_with::<aes::Aes256>(mode, direction, key, iv),
        CipherAlgorithm::Blowfish => open_with::<blowfish::Blowfish>(mode, direction, key, iv),
        CipherAlgorithm::TripleDes => open_with::<des::TdesEde3>(mode, direction, key, iv),
        CipherAlgorithm::Des => open_with::<des::Des>(mode, direction, key, iv),
    }
}

fn open_with<C>(
    mode: CipherMode,
    direction: Direction,
    key: &[u8],
    iv: &[u8],
) -> Result<Box<dyn BlockTransform>>
where
    C: BlockCipher + BlockEncrypt + BlockDecrypt + KeyInit + Send + 'static,
{
    let cipher = C::new_from_slice(key)?;
    let iv_error = |_| ProviderError::setup("setiv", "engine rejected the IV");

    let transform: Box<dyn BlockTransform> = match (mode, direction) {
        (CipherMode::Ecb, _) => Box::new(Ecb { cipher, direction }),
        (CipherMode::Cbc, Direction::Encode) => Box::new(CbcEncrypt(
            cbc::Encryptor::<C>::inner_iv_slice_init(cipher, iv).map_err(iv_error)?,
        )),
        (CipherMode::Cbc, Direction::Decode) => Box::new(CbcDecrypt(
            cbc::Decryptor::<C>::inner_iv_slice_init(cipher, iv).map_err(iv_error)?,
        )),
        (CipherMode::Cfb, Direction::Encode) => Box::new(CfbEncrypt(
            cfb_mode::BufEncryptor::<C>::inner_iv_slice_init(cipher, iv).map_err(iv_error)?,
        )),
        (CipherMode::Cfb, Direction::Decode) => Box::new(CfbDecrypt(
            cfb_mode::BufDecryptor::<C>::inner_iv_slice_init(cipher, iv).map_err(iv_error)?,
        )),
    };
    Ok(transform)
}

/// DES weak and semi-weak keys, parity bits cleared.
const DES_WEAK_KEYS: [[u8; 8]; 16] = [
    // weak
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0xfe, 0xfe, 0xfe, 0xfe, 0xfe, 0xfe, 0xfe, 0xfe],
    [0xe0, 0xe0, 0xe0, 0xe0, 0xf0, 0xf0, 0xf0, 0xf0],
    [0x1e, 0x1e, 0x1e, 0x1e, 0x0e, 0x0e, 0x0e, 0x0e],
    // semi-weak
    [0x00, 0xfe, 0x00, 0xfe, 0x00, 0xfe, 0x00, 0xfe],
    [0xfe, 0x00, 0xfe, 0x00, 0xfe, 0x00, 0xfe, 0x00],
    [0x1e, 0xe0, 0x1e, 0xe0, 0x0e, 0xf0, 0x0e, 0xf0],
    [0xe0, 0x1e, 0xe0, 0x1e, 0xf0, 0x0e, 0xf0, 0x0e],
    [0x00, 0xe0, 0x00, 0xe0, 0x00, 0xf0, 0x00, 0xf0],
    [0xe0, 0x00, 0xe0, 0x00, 0xf0, 0x00, 0xf0, 0x00],
    [0x1e, 0xfe, 0x1e, 0xfe, 0x0e, 0xfe, 0x0e, 0xfe],
    [0xfe, 0x1e, 0xfe, 0x1e, 0xfe, 0x0e, 0xfe, 0x0e],
    [0x00, 0x1e, 0x00, 0x1e, 0x00, 0x0e, 0x00, 0x0e],
    [0x1e, 0x00, 0x1e, 0x00, 0x0e, 0x00, 0x0e, 0x00],
    [0xe0, 0xfe, 0xe0, 0xfe, 0xf0, 0xfe, 0xf0, 0xfe],
    [0xfe, 0xe0, 0xfe, 0xe0, 0xfe, 0xf0, 0xfe, 0xf0],
];

fn is_weak_des_key(key: &[u8]) -> bool {
    DES_WEAK_KEYS.iter().any(|weak| {
        key.len() == 8 && key.iter().zip(weak).all(|(k, w)| k & 0xfe == *w)
    })
}

/// Returns true if `key` is a known weak key for `algorithm`.
///
/// Weak keys are valid keys; the caller decides whether to care.
pub fn is_weak_key(algorithm: CipherAlgorithm, key: &[u8]) -> bool {
    match algorithm {
        CipherAlgorithm::Des => is_weak_des_key(key),
        CipherAlgorithm::TripleDes => key.chunks(8).any(is_weak_des_key),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_sizes() {
        assert_eq!(CipherAlgorithm::Aes128.block_size(), 16);
        assert_eq!(CipherAlgorithm::Aes256.block_size(), 16);
        assert_eq!(CipherAlgorithm::Des.block_size(), 8);
        assert_eq!(CipherAlgorithm::TripleDes.block_size(), 8);
        assert_eq!(CipherAlgorithm::Blowfish.block_size(), 8);
    }

    #[test]
    fn test_ecb_is_deterministic_per_block() {
        let mut enc = open(
            CipherAlgorithm::Aes128,
            CipherMode::Ecb,
            Direction::Encode,
            &[7u8; 16],
            &[],
        )
        .unwrap();
        let mut buf = [0x42u8; 32];
        enc.apply(&mut buf);
        assert_eq!(buf[..16], buf[16..]);
    }

    #[test]
    fn test_cbc_chains_blocks() {
        let mut enc = open(
            CipherAlgorithm::Aes128,
            CipherMode::Cbc,
            Direction::Encode,
            &[7u8; 16],
            &[0u8; 16],
        )
        .unwrap();
        let mut buf = [0x42u8; 32];
        enc.apply(&mut buf);
        assert_ne!(buf[..16], buf[16..]);
    }

    #[test]
    fn test_cfb_handles_partial_blocks() {
        let key = [3u8; 8];
        let iv = [9u8; 8];
        let plaintext = b"odd length cfb input";

        let mut enc = open(CipherAlgorithm::Des, CipherMode::Cfb, Direction::Encode, &key, &iv).unwrap();
        let mut whole = plaintext.to_vec();
        enc.apply(&mut whole);

        // Same stream in uneven pieces.
        let mut enc = open(CipherAlgorithm::Des, CipherMode::Cfb, Direction::Encode, &key, &iv).unwrap();
        let mut pieces = plaintext.to_vec();
        let (a, b) = pieces.split_at_mut(5);
        enc.apply(a);
        enc.apply(b);
        assert_eq!(whole, pieces);

        let mut dec = open(CipherAlgorithm::Des, CipherMode::Cfb, Direction::Decode, &key, &iv).unwrap();
        dec.apply(&mut whole);
        assert_eq!(&whole[..], &plaintext[..]);
    }

    #[test]
    fn test_iv_length_checked() {
        let result = open(
            CipherAlgorithm::Aes256,
            CipherMode::Cbc,
            Direction::Encode,
            &[0u8; 32],
            &[0u8; 8],
        );
        assert!(matches!(
            result,
            Err(ProviderError::InvalidIvLength { expected: 16, actual: 8 })
        ));
    }

    #[test]
    fn test_ecb_ignores_iv() {
        assert!(open(CipherAlgorithm::Des, CipherMode::Ecb, Direction::Decode, &[1u8; 8], &[1, 2, 3]).is_ok());
    }

    #[test]
    fn test_blowfish_variable_key() {
        for len in [4, 16, 56] {
            assert!(open(CipherAlgorithm::Blowfish, CipherMode::Ecb, Direction::Encode, &vec![5u8; len], &[]).is_ok());
        }
        assert!(open(CipherAlgorithm::Blowfish, CipherMode::Ecb, Direction::Encode, &[5u8; 57], &[]).is_err());
    }

    #[test]
    fn test_weak_keys() {
        assert!(is_weak_key(CipherAlgorithm::Des, &[0x01; 8]));
        assert!(is_weak_key(CipherAlgorithm::Des, &[0xfe; 8]));
        assert!(is_weak_key(
            CipherAlgorithm::Des,
            &[0x01, 0xfe, 0x01, 0xfe, 0x01, 0xfe, 0x01, 0xfe]
        ));
        assert!(!is_weak_key(CipherAlgorithm::Des, b"abcdefgh"));

        let mut tdes = [0x13u8; 24];
        assert!(!is_weak_key(CipherAlgorithm::TripleDes, &tdes));
        tdes[8..16].copy_from_slice(&[0x1f, 0x1f, 0x1f, 0x1f, 0x0e, 0x0e, 0x0e, 0x0e]);
        assert!(is_weak_key(CipherAlgorithm::TripleDes, &tdes));

        assert!(!is_weak_key(CipherAlgorithm::Aes128, &[0u8; 16]));
    }
}
