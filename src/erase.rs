use core::{
    ptr,
    sync::atomic::{self, Ordering},
};

use zeroize::Zeroize;

use crate::region::MemoryRegion;

/// Overwrites every byte of `region` with zero.
///
/// The stores go through [`Zeroize`], which issues them as volatile writes
/// followed by a compiler fence, so they are never removed as dead stores even
/// when the buffer is not read afterwards. A hardware fence then orders the
/// erase before anything the caller does next (e.g. unlocking the pages).
///
/// An empty region is a no-op.
pub fn secure_zero(mut region: MemoryRegion<'_>) {
    if region.is_empty() {
        return;
    }

    region.as_bytes_mut().zeroize();
    atomic::fence(Ordering::SeqCst);
}

/// Returns `true` if every byte of `bytes` is zero.
///
/// Bytes are read with volatile loads so the check observes memory rather
/// than whatever the optimizer believes the contents to be.
pub fn is_zeroed(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|byte| unsafe { ptr::read_volatile(byte) } == 0)
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn erase(bytes: &mut [u8]) {
        secure_zero(MemoryRegion::from_slice(bytes));
    }

    #[test]
    fn test_secure_zero_lengths() {
        for len in [0usize, 1, 10, 1 << 20] {
            let mut data = vec![0xA5u8; len];
            erase(&mut data);
            assert!(is_zeroed(&data), "buffer of {len} bytes not zeroed");
        }
    }

    #[test]
    fn test_secure_zero_is_idempotent() {
        let mut data = vec![0u8; 64];
        erase(&mut data);
        erase(&mut data);
        assert!(is_zeroed(&data));
    }

    #[test]
    fn test_secure_zero_stays_in_bounds() {
        let mut data = [0xFFu8; 8];
        erase(&mut data[2..6]);
        assert_eq!(data, [0xFF, 0xFF, 0, 0, 0, 0, 0xFF, 0xFF]);
    }

    #[test]
    fn test_secure_zero_null_empty_region() {
        let region = unsafe { MemoryRegion::from_raw_parts(ptr::null_mut(), 0) };
        secure_zero(region);
    }

    #[test]
    fn test_is_zeroed() {
        assert!(is_zeroed(&[]));
        assert!(is_zeroed(&[0, 0, 0]));
        assert!(!is_zeroed(&[0, 1, 0]));
    }
}
