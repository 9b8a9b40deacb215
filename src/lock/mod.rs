//! Platform abstraction over the OS page-locking primitives.
//!
//! The backend is chosen at compile time, so it is fixed for the lifetime of
//! the process. Failures are reported per call.
//!
//! # Nesting
//! Locks are not reference-counted. Locking the same pages twice and unlocking
//! them once leaves them unlocked, exactly as `munlock`/`VirtualUnlock` do.

use crate::{error::LockError, region::MemoryRegion};

#[cfg(target_family = "unix")]
mod unix;
#[cfg(target_family = "unix")]
use unix as platform;

#[cfg(target_family = "windows")]
mod windows;
#[cfg(target_family = "windows")]
use windows as platform;

#[cfg(not(any(target_family = "unix", target_family = "windows")))]
mod unsupported;
#[cfg(not(any(target_family = "unix", target_family = "windows")))]
use unsupported as platform;

/// The locking backend compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `mlock(2)` / `munlock(2)`.
    Posix,
    /// `VirtualLock` / `VirtualUnlock`.
    Windows,
    /// No backend; locking calls fail with [`LockError::UnsupportedPlatform`].
    Unsupported,
}

impl Platform {
    /// Returns the backend selected for the current target.
    pub const fn current() -> Self {
        #[cfg(target_family = "unix")]
        {
            Self::Posix
        }
        #[cfg(target_family = "windows")]
        {
            Self::Windows
        }
        #[cfg(not(any(target_family = "unix", target_family = "windows")))]
        {
            Self::Unsupported
        }
    }

    #[inline]
    pub const fn supports_locking(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Asks the OS to keep the pages spanned by `region` resident in RAM.
///
/// On a platform with a backend, an empty region is accepted and no OS call
/// is made.
///
/// # Errors
/// [`LockError::OsFailure`] carries the raw OS code when the call is refused,
/// most commonly because the process exceeded its locked-memory limit.
/// [`LockError::UnsupportedPlatform`] on every call without a backend.
pub fn lock(region: &MemoryRegion<'_>) -> Result<(), LockError> {
    if !Platform::current().supports_locking() {
        return Err(LockError::UnsupportedPlatform);
    }
    if region.is_empty() {
        return Ok(());
    }

    log::trace!("locking {} bytes at {:p}", region.len(), region.as_ptr());
    platform::lock(region).map_err(|err| {
        log::debug!("lock of {} bytes at {:p} refused: {err}", region.len(), region.as_ptr());
        err
    })
}

/// Releases the OS lock on the pages spanned by `region`.
///
/// Empty regions and errors are handled as in [`lock`].
pub fn unlock(region: &MemoryRegion<'_>) -> Result<(), LockError> {
    if !Platform::current().supports_locking() {
        return Err(LockError::UnsupportedPlatform);
    }
    if region.is_empty() {
        return Ok(());
    }

    log::trace!("unlocking {} bytes at {:p}", region.len(), region.as_ptr());
    platform::unlock(region).map_err(|err| {
        log::debug!("unlock of {} bytes at {:p} refused: {err}", region.len(), region.as_ptr());
        err
    })
}

/// Retrieves the system's page size.
///
/// Locks act on whole pages: every page touched by a region is pinned.
/// Only available on platforms with a locking backend.
#[cfg(any(target_family = "unix", target_family = "windows"))]
pub fn page_size() -> usize {
    use std::sync::OnceLock;

    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(platform::page_size)
}

/// Current soft limit on locked memory for this process, in bytes.
///
/// Returns `None` when the limit is unlimited or cannot be queried on this
/// platform. This is informational only; the limit is never raised here.
pub fn locked_memory_limit() -> Option<u64> {
    platform::locked_memory_limit()
}

pub(crate) fn is_resource_limit_code(code: i32) -> bool {
    platform::is_resource_limit_code(code)
}
