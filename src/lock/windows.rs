use core::mem::MaybeUninit;

use windows_sys::Win32::{
    Foundation::{GetLastError, ERROR_NOT_ENOUGH_QUOTA, ERROR_WORKING_SET_QUOTA},
    System::{
        Memory::{VirtualLock, VirtualUnlock},
        SystemInformation as win_info,
    },
};

use crate::{
    error::{LockError, LockOp},
    region::MemoryRegion,
};

/// Locks a memory region into the process's working set.
///
/// Wraps the `VirtualLock` system call.
///
/// # Arguments
///
/// * `region` - The non-empty memory region to lock.
///
/// # Returns
///
/// * A result indicating success, or the `GetLastError` code of the failed call.
pub(super) fn lock(region: &MemoryRegion<'_>) -> Result<(), LockError> {
    match unsafe { VirtualLock(region.as_ptr() as _, region.len()) } {
        0 => Err(os_failure(LockOp::Lock)),
        _ => Ok(()),
    }
}

/// Unlocks a memory region, allowing it to be paged out.
///
/// Wraps the `VirtualUnlock` system call.
///
/// # Arguments
///
/// * `region` - The non-empty memory region to unlock.
///
/// # Returns
///
/// * A result indicating success, or the `GetLastError` code of the failed call.
pub(super) fn unlock(region: &MemoryRegion<'_>) -> Result<(), LockError> {
    match unsafe { VirtualUnlock(region.as_ptr() as _, region.len()) } {
        0 => Err(os_failure(LockOp::Unlock)),
        _ => Ok(()),
    }
}

/// Retrieves the system's page size.
///
/// Wraps the `GetSystemInfo` system call.
///
/// # Returns
///
/// * The size of a memory page in bytes.
#[inline]
pub(super) fn page_size() -> usize {
    let sys_info = {
        let mut sys_info = MaybeUninit::<win_info::SYSTEM_INFO>::uninit();
        unsafe {
            win_info::GetSystemInfo(sys_info.as_mut_ptr());
            sys_info.assume_init()
        }
    };

    sys_info.dwPageSize as usize
}

// The ceiling is the process working set, which is not a plain byte limit.
#[inline]
pub(super) fn locked_memory_limit() -> Option<u64> {
    None
}

#[inline]
pub(super) fn is_resource_limit_code(code: i32) -> bool {
    let code = code as u32;
    code == ERROR_WORKING_SET_QUOTA || code == ERROR_NOT_ENOUGH_QUOTA
}

// Must run right after the failed call, before another API call resets the
// thread's last-error value.
#[inline]
fn os_failure(op: LockOp) -> LockError {
    let code = unsafe { GetLastError() } as i32;
    LockError::OsFailure { op, code }
}
