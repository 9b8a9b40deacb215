use std::io;

use crate::{
    error::{LockError, LockOp},
    region::MemoryRegion,
};

/// Locks a memory region, preventing it from being paged out to swap.
///
/// Wraps the `mlock` system call.
///
/// # Arguments
///
/// * `region` - The non-empty memory region to lock.
///
/// # Returns
///
/// * A result indicating success, or the `errno` of the failed call.
pub(super) fn lock(region: &MemoryRegion<'_>) -> Result<(), LockError> {
    match unsafe { libc::mlock(region.as_ptr() as *const libc::c_void, region.len()) } {
        0 => Ok(()),
        _ => Err(os_failure(LockOp::Lock)),
    }
}

/// Unlocks a memory region, allowing it to be paged out to swap.
///
/// Wraps the `munlock` system call.
///
/// # Arguments
///
/// * `region` - The non-empty memory region to unlock.
///
/// # Returns
///
/// * A result indicating success, or the `errno` of the failed call.
pub(super) fn unlock(region: &MemoryRegion<'_>) -> Result<(), LockError> {
    match unsafe { libc::munlock(region.as_ptr() as *const libc::c_void, region.len()) } {
        0 => Ok(()),
        _ => Err(os_failure(LockOp::Unlock)),
    }
}

/// Retrieves the system's page size.
///
/// Wraps the `sysconf` system call on Unix-like systems
/// and `vm_page_size` on macOS.
///
/// # Returns
///
/// * The size of a memory page in bytes.
#[inline]
pub(super) fn page_size() -> usize {
    #[cfg(target_os = "macos")]
    unsafe {
        libc::vm_page_size as usize
    }
    #[cfg(not(target_os = "macos"))]
    unsafe {
        libc::sysconf(libc::_SC_PAGESIZE) as usize
    }
}

/// Reads the `RLIMIT_MEMLOCK` soft limit.
///
/// Wraps the `getrlimit` system call.
///
/// # Returns
///
/// * The soft limit in bytes, or `None` if it is unlimited or the call failed.
pub(super) fn locked_memory_limit() -> Option<u64> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };

    match unsafe { libc::getrlimit(libc::RLIMIT_MEMLOCK, &mut limit) } {
        0 if limit.rlim_cur != libc::RLIM_INFINITY => Some(limit.rlim_cur as u64),
        _ => None,
    }
}

#[inline]
pub(super) fn is_resource_limit_code(code: i32) -> bool {
    code == libc::ENOMEM || code == libc::EAGAIN
}

// errno is thread-local; read it before anything else can overwrite it.
#[inline]
fn os_failure(op: LockOp) -> LockError {
    let code = io::Error::last_os_error().raw_os_error().unwrap_or(0);
    LockError::OsFailure { op, code }
}
