use crate::{error::LockError, region::MemoryRegion};

pub(super) fn lock(_region: &MemoryRegion<'_>) -> Result<(), LockError> {
    Err(LockError::UnsupportedPlatform)
}

pub(super) fn unlock(_region: &MemoryRegion<'_>) -> Result<(), LockError> {
    Err(LockError::UnsupportedPlatform)
}

#[inline]
pub(super) fn locked_memory_limit() -> Option<u64> {
    None
}

#[inline]
pub(super) fn is_resource_limit_code(_code: i32) -> bool {
    false
}
