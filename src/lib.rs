//! Tesseract Provider - capability based cryptography provider
//!
//! This library exposes message digests, block ciphers and password based
//! key derivation behind a small set of context traits. Hosts pick an
//! algorithm by its feature name at runtime and drive the returned context
//! through a streaming protocol.
//!
//! # Features
//!
//! - **Digests**: sha1, md4, md5, ripemd160, sha256, sha384, sha512
//! - **Block ciphers**: AES-128/192/256, Blowfish, DES and Triple-DES in
//!   ECB, CBC and CFB modes, with optional PKCS#7 padding
//! - **Key derivation**: PBKDF2-HMAC-SHA1
//! - **Memory safety**: key material lives in zeroized, page-locked buffers
//!   charged to a bounded secure pool
//!
//! # Example
//!
//! ```
//! use tesseract_provider::{Direction, InitializationVector, Provider, SymmetricKey};
//!
//! let provider = Provider::default();
//! provider.init();
//!
//! let kdf = provider.create_kdf("pbkdf2(sha1)").unwrap();
//! let salt = InitializationVector::from(&b"NaCl"[..]);
//! let key = kdf.make_key(b"password", &salt, 16, 1000);
//!
//! let iv = InitializationVector::from(&[0u8; 16]);
//! let mut cipher = provider.create_cipher("aes128-cbc-pkcs7").unwrap();
//! cipher.setup(Direction::Encode, &key, &iv).unwrap();
//! let mut ciphertext = cipher.update(b"attack at dawn").unwrap().to_vec();
//! ciphertext.extend_from_slice(&cipher.finalize().unwrap());
//! assert_eq!(ciphertext.len(), 16);
//! ```

pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod memory;
pub mod provider;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use config::{FailurePolicy, ProviderConfig, DEFAULT_SECURE_POOL_BYTES};
pub use crypto::{CipherContext, HashContext, KdfContext};
pub use error::{ProviderError, Result};
pub use memory::pool::SecurePool;
pub use memory::SecureArray;
pub use provider::{Context, Provider, PROVIDER_NAME};
pub use registry::{Category, Feature};
pub use types::{Direction, InitializationVector, KeyLength, SymmetricKey};
