//! PBKDF2 with HMAC over any engine digest.

use super::digest::HashAlgorithm;
use crate::error::{ProviderError, Result};
use hmac::Hmac;

/// Longest key PBKDF2 can produce over `hash`: (2^32 - 1) blocks.
pub(crate) fn max_key_length(hash: HashAlgorithm) -> u64 {
    u64::from(u32::MAX) * hash.digest_len() as u64
}

/// Rejects derivation parameters before any output buffer is allocated.
///
/// Zero iterations, a zero key length and keys longer than
/// [`max_key_length`] are derivation failures.
pub(crate) fn check_request(hash: HashAlgorithm, key_length: usize, iterations: u32) -> Result<()> {
    if iterations == 0 {
        return Err(ProviderError::Derivation(
            "iteration count must be at least 1".to_string(),
        ));
    }
    if key_length == 0 {
        return Err(ProviderError::Derivation(
            "requested key length is zero".to_string(),
        ));
    }
    if key_length as u64 > max_key_length(hash) {
        return Err(ProviderError::Derivation(format!(
            "requested key length {} exceeds the PBKDF2 limit",
            key_length
        )));
    }
    Ok(())
}

/// Fills `out` with PBKDF2-HMAC-`hash`(secret, salt, iterations).
pub(crate) fn derive(
    hash: HashAlgorithm,
    secret: &[u8],
    salt: &[u8],
    iterations: u32,
    out: &mut [u8],
) -> Result<()> {
    check_request(hash, out.len(), iterations)?;

    let result = match hash {
        HashAlgorithm::Sha1 => {
            pbkdf2::pbkdf2::<Hmac<sha1::Sha1>>(secret, salt, iterations, out)
        }
        HashAlgorithm::Md4 => pbkdf2::pbkdf2::<Hmac<md4::Md4>>(secret, salt, iterations, out),
        HashAlgorithm::Md5 => pbkdf2::pbkdf2::<Hmac<md5::Md5>>(secret, salt, iterations, out),
        HashAlgorithm::Ripemd160 => {
            pbkdf2::pbkdf2::<Hmac<ripemd::Ripemd160>>(secret, salt, iterations, out)
        }
        HashAlgorithm::Sha256 => {
            pbkdf2::pbkdf2::<Hmac<sha2::Sha256>>(secret, salt, iterations, out)
        }
        HashAlgorithm::Sha384 => {
            pbkdf2::pbkdf2::<Hmac<sha2::Sha384>>(secret, salt, iterations, out)
        }
        HashAlgorithm::Sha512 => {
            pbkdf2::pbkdf2::<Hmac<sha2::Sha512>>(secret, salt, iterations, out)
        }
    };

    result.map_err(|e| ProviderError::Derivation(e.to_string()))
}
