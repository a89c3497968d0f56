//! Value types shared by the contexts.

use crate::memory::SecureArray;
use std::fmt;
use std::ops::Deref;

/// Direction of a cipher transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Encrypt.
    Encode,
    /// Decrypt.
    Decode,
}

/// Key length contract of a cipher: any length in `min..=max` that is a
/// multiple of `multiple`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLength {
    min: usize,
    max: usize,
    multiple: usize,
}

impl KeyLength {
    /// Creates a ranged contract.
    pub const fn new(min: usize, max: usize, multiple: usize) -> Self {
        Self { min, max, multiple }
    }

    /// Creates a contract that accepts exactly one length.
    pub const fn fixed(len: usize) -> Self {
        Self::new(len, len, 1)
    }

    /// Smallest accepted length in bytes.
    pub fn minimum(&self) -> usize {
        self.min
    }

    /// Largest accepted length in bytes.
    pub fn maximum(&self) -> usize {
        self.max
    }

    /// Accepted lengths are multiples of this value.
    pub fn multiple(&self) -> usize {
        self.multiple
    }

    /// Returns true if `len` satisfies the contract.
    pub fn accepts(&self, len: usize) -> bool {
        len >= self.min && len <= self.max && self.multiple != 0 && len % self.multiple == 0
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..={} step {}", self.min, self.max, self.multiple)
        }
    }
}

macro_rules! secure_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Default, PartialEq, Eq)]
        pub struct $name(SecureArray);

        impl $name {
            /// Wraps an existing secure buffer.
            pub fn new(bytes: SecureArray) -> Self {
                Self(bytes)
            }

            /// Returns the underlying secure buffer.
            pub fn into_inner(self) -> SecureArray {
                self.0
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                Self(SecureArray::from(bytes))
            }
        }

        impl<const N: usize> From<&[u8; N]> for $name {
            fn from(bytes: &[u8; N]) -> Self {
                Self(SecureArray::from(&bytes[..]))
            }
        }

        impl Deref for $name {
            type Target = [u8];

            fn deref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({} bytes)"), self.0.len())
            }
        }
    };
}

secure_newtype!(
    /// Key material for a cipher, or the output of a KDF.
    SymmetricKey
);

secure_newtype!(
    /// Initialization vector for CBC and CFB. Also used as the KDF salt.
    InitializationVector
);
