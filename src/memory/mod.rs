//! Secure memory for key material and cipher buffers.
//!
//! [`SecureArray`] is the byte container every context hands out. Its heap
//! region is zero-initialized, locked into RAM when the platform allows it,
//! and wiped before it is released:
//! - Linux/macOS: `mlock(2)` / `munlock(2)`
//! - Windows: `VirtualLock()` / `VirtualUnlock()`
//!
//! Locking is best effort. A buffer that could not be locked still works and
//! still zeroizes on drop; [`SecureArray::is_locked`] reports what happened.
//! The [`pool`] module meters how much locked memory the provider may use.

pub mod pool;

use pool::PoolLease;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

#[cfg(unix)]
use libc::{mlock, munlock};

#[cfg(windows)]
use winapi::um::memoryapi::{VirtualLock, VirtualUnlock};

static PAGE_LOCKING: AtomicBool = AtomicBool::new(true);

/// Enables or disables page locking for buffers created after this call.
pub fn set_page_locking(enabled: bool) {
    PAGE_LOCKING.store(enabled, Ordering::Relaxed);
}

/// Returns whether new buffers try to lock their pages.
pub fn page_locking() -> bool {
    PAGE_LOCKING.load(Ordering::Relaxed)
}

/// Errors that can occur during memory locking operations.
#[derive(Debug)]
pub enum MemLockError {
    /// The system does not allow locking this memory (permissions, limits, etc.)
    PermissionDenied,
    /// Insufficient resources to lock memory (hit ulimit)
    ResourceLimitExceeded,
    /// Other system error
    SystemError(String),
}

impl fmt::Display for MemLockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "Permission denied to lock memory"),
            Self::ResourceLimitExceeded => write!(f, "Memory lock resource limit exceeded"),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
        }
    }
}

impl std::error::Error for MemLockError {}

/// Locks `len` bytes starting at `ptr` into RAM.
fn lock_region(ptr: *const u8, len: usize) -> Result<(), MemLockError> {
    #[cfg(unix)]
    {
        // SAFETY: the caller passes a live allocation it owns
        let result = unsafe { mlock(ptr as *const libc::c_void, len) };

        if result != 0 {
            let errno = std::io::Error::last_os_error();
            return Err(match errno.raw_os_error() {
                Some(libc::EPERM) | Some(libc::EACCES) => MemLockError::PermissionDenied,
                Some(libc::ENOMEM) | Some(libc::EAGAIN) => MemLockError::ResourceLimitExceeded,
                _ => MemLockError::SystemError(errno.to_string()),
            });
        }
    }

    #[cfg(windows)]
    {
        // SAFETY: the caller passes a live allocation it owns
        let result = unsafe { VirtualLock(ptr as *mut winapi::ctypes::c_void, len) };

        if result == 0 {
            let error = std::io::Error::last_os_error();
            return Err(MemLockError::SystemError(error.to_string()));
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = (ptr, len);
        return Err(MemLockError::SystemError(
            "memory locking is not supported on this platform".to_string(),
        ));
    }

    Ok(())
}

/// Unlocks a region previously passed to [`lock_region`].
fn unlock_region(ptr: *const u8, len: usize) {
    #[cfg(unix)]
    {
        // SAFETY: the region was locked by us and is still allocated
        unsafe {
            munlock(ptr as *const libc::c_void, len);
        }
    }

    #[cfg(windows)]
    {
        // SAFETY: the region was locked by us and is still allocated
        unsafe {
            VirtualUnlock(ptr as *mut winapi::ctypes::c_void, len);
        }
    }

    #[cfg(not(any(unix, windows)))]
    let _ = (ptr, len);
}

/// Fixed-size byte buffer for sensitive data.
///
/// The length is set at construction and the backing allocation never
/// moves, so the locked region stays valid for the buffer's lifetime. It
/// can only shrink through [`SecureArray::truncate`], which wipes the tail.
pub struct SecureArray {
    data: Vec<u8>,
    locked: bool,
    lease: Option<PoolLease>,
}

impl SecureArray {
    /// Creates a zero-filled buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self::with_lease(len, None)
    }

    /// Creates a zero-filled buffer of `len` bytes, reporting an allocation
    /// failure instead of aborting.
    pub fn try_zeroed(len: usize) -> Result<Self, MemLockError> {
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| MemLockError::SystemError(e.to_string()))?;
        data.resize(len, 0);
        let mut array = Self {
            data,
            locked: false,
            lease: None,
        };
        array.lock();
        Ok(array)
    }

    /// Creates a zero-filled buffer whose size is accounted to a pool lease.
    ///
    /// The lease is returned to its pool when the buffer is dropped.
    pub fn leased(len: usize, lease: PoolLease) -> Self {
        Self::with_lease(len, Some(lease))
    }

    fn with_lease(len: usize, lease: Option<PoolLease>) -> Self {
        let mut array = Self {
            data: vec![0u8; len],
            locked: false,
            lease,
        };
        array.lock();
        array
    }

    /// Creates an empty buffer.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            locked: false,
            lease: None,
        }
    }

    fn lock(&mut self) {
        if self.data.is_empty() || !page_locking() {
            return;
        }
        match lock_region(self.data.as_ptr(), self.data.len()) {
            Ok(()) => self.locked = true,
            Err(err) => {
                tracing::trace!(len = self.data.len(), %err, "secure buffer left unlocked");
            }
        }
    }

    /// Returns whether locking the backing pages succeeded at construction.
    ///
    /// The flag is advisory. Page locks do not nest, so dropping another
    /// buffer that shares a page with this one unlocks that page while this
    /// flag stays `true`. Zeroization on drop does not depend on it.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns whether the buffer is charged to a secure pool.
    pub fn is_pooled(&self) -> bool {
        self.lease.is_some()
    }

    /// Shortens the buffer to `len` bytes, wiping the removed tail.
    pub fn truncate(&mut self, len: usize) {
        if len < self.data.len() {
            self.data[len..].zeroize();
            // Vec::truncate never reallocates, the locked region stays put.
            self.data.truncate(len);
        }
    }

    /// Copies the contents into an ordinary `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }
}

impl Default for SecureArray {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&[u8]> for SecureArray {
    fn from(bytes: &[u8]) -> Self {
        let mut array = Self::zeroed(bytes.len());
        array.copy_from_slice(bytes);
        array
    }
}

impl Clone for SecureArray {
    fn clone(&self) -> Self {
        Self::from(&self.data[..])
    }
}

impl Deref for SecureArray {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for SecureArray {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl PartialEq for SecureArray {
    fn eq(&self, other: &Self) -> bool {
        self.data.ct_eq(&other.data).into()
    }
}

impl Eq for SecureArray {}

impl fmt::Debug for SecureArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureArray")
            .field("len", &self.data.len())
            .field("locked", &self.locked)
            .finish()
    }
}

impl Drop for SecureArray {
    fn drop(&mut self) {
        // Wipe while the pages are still locked, then release them. The
        // capacity is what was locked, truncate may have shortened len.
        let capacity = self.data.capacity();
        self.data.zeroize();
        if self.locked {
            unlock_region(self.data.as_ptr(), capacity);
            self.locked = false;
        }
    }
}
