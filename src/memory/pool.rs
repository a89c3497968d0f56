//! Budgeted pool for secure memory.
//!
//! The pool does not own memory itself. It meters how many bytes of
//! [`SecureArray`](super::SecureArray) storage may be charged against it, so
//! the total amount of locked memory the provider asks the OS for stays
//! under an explicit, configurable budget.
//!
//! # Example
//!
//! ```
//! use tesseract_provider::memory::pool::SecurePool;
//!
//! let pool = SecurePool::new(1024);
//! let buffer = pool.allocate(256).unwrap();
//! assert_eq!(pool.bytes_in_use(), 256);
//!
//! // Returned to the budget on drop
//! drop(buffer);
//! assert_eq!(pool.bytes_in_use(), 0);
//! ```

use super::{MemLockError, SecureArray};
use crate::error::{ProviderError, Result};
use std::sync::{Arc, Mutex};

/// Shared accounting state.
#[derive(Debug)]
struct PoolInner {
    /// Total budget in bytes.
    capacity: usize,

    /// Bytes currently charged.
    in_use: usize,

    /// Number of successful reservations.
    allocation_count: usize,

    /// Number of refused reservations.
    exhausted_count: usize,
}

/// Secure memory pool with a fixed byte budget.
#[derive(Debug, Clone)]
pub struct SecurePool {
    inner: Arc<Mutex<PoolInner>>,
}

/// A reservation against a [`SecurePool`].
///
/// Dropping the lease returns its bytes to the pool.
#[derive(Debug)]
pub struct PoolLease {
    pool: Arc<Mutex<PoolInner>>,
    size: usize,
}

impl SecurePool {
    /// Creates a pool that may hand out up to `capacity` bytes at once.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolInner {
                capacity,
                in_use: 0,
                allocation_count: 0,
                exhausted_count: 0,
            })),
        }
    }

    /// Reserves `size` bytes of the budget.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::PoolExhausted`] if fewer than `size` bytes
    /// remain.
    pub fn reserve(&self, size: usize) -> Result<PoolLease> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| MemLockError::SystemError("Pool mutex poisoned".to_string()))?;

        let available = inner.capacity.saturating_sub(inner.in_use);
        if size > available {
            inner.exhausted_count += 1;
            tracing::warn!(
                requested = size,
                available,
                capacity = inner.capacity,
                "secure memory pool exhausted"
            );
            return Err(ProviderError::PoolExhausted {
                requested: size,
                available,
            });
        }

        inner.in_use += size;
        inner.allocation_count += 1;

        Ok(PoolLease {
            pool: Arc::clone(&self.inner),
            size,
        })
    }

    /// Reserves `size` bytes and returns a zeroed secure buffer charged to
    /// the reservation.
    pub fn allocate(&self, size: usize) -> Result<SecureArray> {
        let lease = self.reserve(size)?;
        Ok(SecureArray::leased(size, lease))
    }

    /// Total budget in bytes.
    pub fn capacity(&self) -> usize {
        self.inner.lock().map(|inner| inner.capacity).unwrap_or(0)
    }

    /// Bytes currently reserved.
    pub fn bytes_in_use(&self) -> usize {
        self.inner.lock().map(|inner| inner.in_use).unwrap_or(0)
    }

    /// Bytes still available.
    pub fn available(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.capacity.saturating_sub(inner.in_use))
            .unwrap_or(0)
    }

    /// Returns the number of successful reservations made from this pool.
    pub fn allocation_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.allocation_count)
            .unwrap_or(0)
    }

    /// Returns how many reservations were refused for lack of budget.
    pub fn exhausted_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.exhausted_count)
            .unwrap_or(0)
    }
}

impl PoolLease {
    /// Size of the reservation in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for PoolLease {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.pool.lock() {
            inner.in_use = inner.in_use.saturating_sub(self.size);
        }
    }
}
