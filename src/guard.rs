use core::mem::ManuallyDrop;

use crate::{erase, error::LockError, lock, region::MemoryRegion};

/// A locked region that is erased and unlocked when released or dropped.
///
/// The guard keeps the buffer mutably borrowed, so it cannot be moved or
/// resized while its pages are pinned.
///
/// Guards are not reference-counted. If two guards cover the same pages, the
/// first one released unlocks those pages for both.
#[derive(Debug)]
pub struct LockedRegion<'a> {
    region: MemoryRegion<'a>,
}

impl<'a> LockedRegion<'a> {
    /// Locks `region` and wraps it in a guard.
    ///
    /// # Errors
    /// Returns the [`LockError`] reported by the OS; the region is left
    /// untouched in that case.
    pub fn new(region: MemoryRegion<'a>) -> Result<Self, LockError> {
        lock::lock(&region)?;
        Ok(Self { region })
    }

    #[inline]
    pub fn region(&self) -> &MemoryRegion<'a> {
        &self.region
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.region.as_bytes()
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.region.as_bytes_mut()
    }

    /// Erases the contents, then unlocks the pages.
    ///
    /// Unlike dropping the guard, this reports an unlock failure.
    pub fn release(self) -> Result<(), LockError> {
        let mut this = ManuallyDrop::new(self);
        this.erase_and_unlock()
    }

    fn erase_and_unlock(&mut self) -> Result<(), LockError> {
        erase::secure_zero(self.region.reborrow());
        lock::unlock(&self.region)
    }
}

impl Drop for LockedRegion<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.erase_and_unlock() {
            log::warn!(
                "failed to unlock {} bytes at {:p} on drop: {err}",
                self.region.len(),
                self.region.as_ptr()
            );
        }
    }
}

// Tests
#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_locked_region_release() {
        let mut data = *b"1234567890";

        let Ok(mut guard) = LockedRegion::new(MemoryRegion::from_slice(&mut data)) else {
            return;
        };
        assert_eq!(guard.as_bytes(), b"1234567890");
        guard.as_bytes_mut()[0] = b'X';
        assert_eq!(guard.region().len(), 10);

        guard.release().expect("Failed to release locked region");
        assert_eq!(data, [0u8; 10]);
    }

    #[test]
    #[serial]
    fn test_locked_region_drop_erases() {
        let mut data = vec![0xEEu8; 256];
        let Ok(guard) = LockedRegion::new(MemoryRegion::from_slice(&mut data)) else {
            return;
        };

        drop(guard);
        assert!(erase::is_zeroed(&data));
    }

    #[test]
    fn test_locked_region_empty() {
        let mut data: [u8; 0] = [];
        let guard = match LockedRegion::new(MemoryRegion::from_slice(&mut data)) {
            Ok(guard) => guard,
            Err(err) => {
                assert_eq!(err, LockError::UnsupportedPlatform);
                return;
            }
        };

        guard.release().expect("Empty region unlocks trivially");
    }

    #[test]
    #[cfg(not(any(target_family = "unix", target_family = "windows")))]
    fn test_locked_region_unsupported_platform() {
        let mut data = [1u8; 4];
        let err = LockedRegion::new(MemoryRegion::from_slice(&mut data))
            .expect_err("Locking must fail without a backend");
        assert_eq!(err, LockError::UnsupportedPlatform);
        assert_eq!(data, [1u8; 4]);
    }
}
