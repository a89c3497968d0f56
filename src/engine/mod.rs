//! The cryptographic engine behind the contexts.
//!
//! The engine is a thin layer over the RustCrypto crates. It owns the only
//! process-wide state of the provider: the "initialized" flag and the secure
//! memory pool that key derivation charges its output against.
//!
//! Initialization is idempotent and must happen before contexts are shared
//! across threads. Nothing has to be torn down before process exit.

pub mod cipher;
pub mod digest;
pub mod pbkdf2;

use crate::config::ProviderConfig;
use crate::memory::{self, pool::SecurePool};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Version of this provider build.
///
/// The RustCrypto backends are linked statically and expose no runtime
/// version, so the initialization check compares the provider release
/// against [`ProviderConfig::required_engine_version`]. It catches hosts
/// that were configured for a newer provider than the one they loaded.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static SECURE_POOL: OnceLock<SecurePool> = OnceLock::new();

/// Initializes the engine.
///
/// Only the first call has an effect; it checks the engine version against
/// the configuration, applies the memory locking setting and installs the
/// secure memory pool. Returns `true` for the call that performed the
/// initialization.
pub fn initialize(config: &ProviderConfig) -> bool {
    if INITIALIZED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        tracing::debug!("engine already initialized");
        return false;
    }

    if !version_satisfies(ENGINE_VERSION, &config.required_engine_version) {
        tracing::warn!(
            have = ENGINE_VERSION,
            need = %config.required_engine_version,
            "engine is older than required, continuing anyway"
        );
    }

    memory::set_page_locking(config.lock_memory);
    if SECURE_POOL
        .set(SecurePool::new(config.secure_pool_bytes))
        .is_err()
    {
        tracing::debug!("secure memory pool already installed");
    }

    tracing::info!(
        version = ENGINE_VERSION,
        secure_pool_bytes = config.secure_pool_bytes,
        lock_memory = config.lock_memory,
        "engine initialized"
    );
    true
}

/// Returns whether [`initialize`] has run.
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

/// The process-wide secure memory pool, once the engine is initialized.
pub fn secure_pool() -> Option<&'static SecurePool> {
    SECURE_POOL.get()
}

/// Compares dotted numeric versions. Missing components count as zero.
///
/// An unparseable version never satisfies the requirement.
fn version_satisfies(have: &str, need: &str) -> bool {
    fn parse(version: &str) -> Option<Vec<u64>> {
        version
            .split('.')
            .map(|part| part.trim().parse::<u64>().ok())
            .collect()
    }

    let (Some(have), Some(need)) = (parse(have), parse(need)) else {
        return false;
    };

    let len = have.len().max(need.len());
    let component = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
    for i in 0..len {
        let (h, n) = (component(&have, i), component(&need, i));
        if h != n {
            return h > n;
        }
    }
    true
}
