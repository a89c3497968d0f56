//! The closed set of features the provider supports.
//!
//! Every feature is a [`Feature`] variant with one [`AlgorithmDescriptor`]
//! in a static table. The feature name is only compared as a string once,
//! when a host asks for a context by name; after that everything dispatches
//! on the enum.
//!
//! Feature names follow `<hash>`, `<cipher><keybits>-<mode>[-pkcs7]` or
//! `pbkdf2(<hash>)`.

use crate::engine::cipher::{CipherAlgorithm, CipherMode};
use crate::engine::digest::HashAlgorithm;
use std::fmt;

/// Kind of context a feature produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Hash,
    Cipher,
    Kdf,
}

/// Engine parameters of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// A message digest.
    Hash(HashAlgorithm),
    /// A block cipher in a mode, optionally with PKCS#7 padding.
    Cipher {
        algorithm: CipherAlgorithm,
        mode: CipherMode,
        padding: bool,
    },
    /// PBKDF2 over the given digest.
    Kdf(HashAlgorithm),
}

/// Immutable description of one feature.
#[derive(Debug)]
pub struct AlgorithmDescriptor {
    pub feature: Feature,
    pub name: &'static str,
    pub algorithm: Algorithm,
}

impl AlgorithmDescriptor {
    pub fn category(&self) -> Category {
        match self.algorithm {
            Algorithm::Hash(_) => Category::Hash,
            Algorithm::Cipher { .. } => Category::Cipher,
            Algorithm::Kdf(_) => Category::Kdf,
        }
    }

    /// Whether the feature pads its final block.
    pub fn padding(&self) -> bool {
        matches!(self.algorithm, Algorithm::Cipher { padding: true, .. })
    }
}

const fn cipher(algorithm: CipherAlgorithm, mode: CipherMode) -> Algorithm {
    Algorithm::Cipher {
        algorithm,
        mode,
        padding: false,
    }
}

const fn padded(algorithm: CipherAlgorithm, mode: CipherMode) -> Algorithm {
    Algorithm::Cipher {
        algorithm,
        mode,
        padding: true,
    }
}

macro_rules! features {
    ($($variant:ident => $name:literal, $algorithm:expr;)*) => {
        /// A supported feature.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Feature {
            $($variant,)*
        }

        /// Descriptor table, indexed by `Feature as usize`.
        static DESCRIPTORS: &[AlgorithmDescriptor] = &[
            $(AlgorithmDescriptor {
                feature: Feature::$variant,
                name: $name,
                algorithm: $algorithm,
            },)*
        ];
    };
}

use CipherAlgorithm::{Aes128, Aes192, Aes256, Blowfish, Des, TripleDes};
use CipherMode::{Cbc, Cfb, Ecb};

features! {
    Sha1 => "sha1", Algorithm::Hash(HashAlgorithm::Sha1);
    Md4 => "md4", Algorithm::Hash(HashAlgorithm::Md4);
    Md5 => "md5", Algorithm::Hash(HashAlgorithm::Md5);
    Ripemd160 => "ripemd160", Algorithm::Hash(HashAlgorithm::Ripemd160);
    Sha256 => "sha256", Algorithm::Hash(HashAlgorithm::Sha256);
    Sha384 => "sha384", Algorithm::Hash(HashAlgorithm::Sha384);
    Sha512 => "sha512", Algorithm::Hash(HashAlgorithm::Sha512);
    Aes128Ecb => "aes128-ecb", cipher(Aes128, Ecb);
    Aes128Cfb => "aes128-cfb", cipher(Aes128, Cfb);
    Aes128Cbc => "aes128-cbc", cipher(Aes128, Cbc);
    Aes192Ecb => "aes192-ecb", cipher(Aes192, Ecb);
    Aes192Cfb => "aes192-cfb", cipher(Aes192, Cfb);
    Aes192Cbc => "aes192-cbc", cipher(Aes192, Cbc);
    Aes256Ecb => "aes256-ecb", cipher(Aes256, Ecb);
    Aes256Cfb => "aes256-cfb", cipher(Aes256, Cfb);
    Aes256Cbc => "aes256-cbc", cipher(Aes256, Cbc);
    BlowfishEcb => "blowfish-ecb", cipher(Blowfish, Ecb);
    TripleDesEcb => "tripledes-ecb", cipher(TripleDes, Ecb);
    DesEcb => "des-ecb", cipher(Des, Ecb);
    DesCbc => "des-cbc", cipher(Des, Cbc);
    DesCfb => "des-cfb", cipher(Des, Cfb);
    Pbkdf2Sha1 => "pbkdf2(sha1)", Algorithm::Kdf(HashAlgorithm::Sha1);
    Aes128CbcPkcs7 => "aes128-cbc-pkcs7", padded(Aes128, Cbc);
    Aes192CbcPkcs7 => "aes192-cbc-pkcs7", padded(Aes192, Cbc);
    Aes256CbcPkcs7 => "aes256-cbc-pkcs7", padded(Aes256, Cbc);
    BlowfishCbc => "blowfish-cbc", cipher(Blowfish, Cbc);
    BlowfishCbcPkcs7 => "blowfish-cbc-pkcs7", padded(Blowfish, Cbc);
    BlowfishCfb => "blowfish-cfb", cipher(Blowfish, Cfb);
    TripleDesCbc => "tripledes-cbc", cipher(TripleDes, Cbc);
    DesEcbPkcs7 => "des-ecb-pkcs7", padded(Des, Ecb);
    DesCbcPkcs7 => "des-cbc-pkcs7", padded(Des, Cbc);
}

impl Feature {
    /// Looks a feature up by name.
    pub fn from_name(name: &str) -> Option<Feature> {
        DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map(|descriptor| descriptor.feature)
    }

    /// All features, in the order the provider advertises them.
    pub fn all() -> impl Iterator<Item = Feature> {
        DESCRIPTORS.iter().map(|descriptor| descriptor.feature)
    }

    pub fn descriptor(self) -> &'static AlgorithmDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn category(self) -> Category {
        self.descriptor().category()
    }

    pub fn algorithm(self) -> Algorithm {
        self.descriptor().algorithm
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Feature {
    type Err = crate::error::ProviderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Feature::from_name(name)
            .ok_or_else(|| crate::error::ProviderError::UnsupportedAlgorithm(name.to_string()))
    }
}

/// Names of all supported features, in advertised order.
pub fn feature_names() -> Vec<&'static str> {
    DESCRIPTORS.iter().map(|descriptor| descriptor.name).collect()
}
