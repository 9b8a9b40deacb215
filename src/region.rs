use core::{fmt, marker::PhantomData, ptr::NonNull};

/// A non-owning `(base address, length in bytes)` descriptor over a
/// contiguous range of caller-owned memory.
///
/// The lifetime ties the descriptor to the borrow it was derived from, so it
/// cannot outlive the buffer nor coexist with a move or resize of it.
pub struct MemoryRegion<'a> {
    base: NonNull<u8>,
    len: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> MemoryRegion<'a> {
    /// Creates a descriptor spanning the whole byte slice.
    #[inline]
    pub fn from_slice(bytes: &'a mut [u8]) -> Self {
        let len = bytes.len();
        // A slice pointer is never null, even when empty.
        let base = unsafe { NonNull::new_unchecked(bytes.as_mut_ptr()) };
        Self {
            base,
            len,
            _marker: PhantomData,
        }
    }

    /// Creates a descriptor from a raw base address and a byte length.
    ///
    /// A null `base` is accepted only together with a zero `len`.
    ///
    /// # Panics
    /// Panics if `base` is null while `len` is non-zero, if `len` exceeds
    /// `isize::MAX`, or if `base + len` wraps the address space. Continuing
    /// with such a descriptor would risk an out-of-bounds write.
    ///
    /// # Safety
    /// For the whole lifetime `'a`, `[base, base + len)` must be valid for
    /// reads and writes and must not be accessed through any other pointer.
    pub unsafe fn from_raw_parts(base: *mut u8, len: usize) -> Self {
        assert!(
            len <= isize::MAX as usize,
            "memory region length {len} exceeds the addressable range"
        );
        assert!(
            (base as usize).checked_add(len).is_some(),
            "memory region at {base:p} with length {len} wraps the address space"
        );

        let base = match NonNull::new(base) {
            Some(base) => base,
            None if len == 0 => NonNull::dangling(),
            None => panic!("memory region has a null base address and length {len}"),
        };

        Self {
            base,
            len,
            _marker: PhantomData,
        }
    }

    /// Base address of the region.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    /// Base address as a pointer-sized integer.
    #[inline]
    pub fn base_address(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// Length of the region in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shortens the borrow, e.g. to hand the region to a consuming call while
    /// keeping this descriptor.
    #[inline]
    pub fn reborrow(&mut self) -> MemoryRegion<'_> {
        MemoryRegion {
            base: self.base,
            len: self.len,
            _marker: PhantomData,
        }
    }

    /// Reborrows the region as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.base.as_ptr(), self.len) }
    }

    /// Reborrows the region as a mutable byte slice.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.base.as_ptr(), self.len) }
    }
}

impl fmt::Debug for MemoryRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the contents.
        f.debug_struct("MemoryRegion")
            .field("base", &self.base)
            .field("len", &self.len)
            .finish()
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice() {
        let mut data = [1u8, 2, 3, 4];
        let expected = data.as_mut_ptr() as usize;

        let region = MemoryRegion::from_slice(&mut data);
        assert_eq!(region.base_address(), expected);
        assert_eq!(region.len(), 4);
        assert!(!region.is_empty());
        assert_eq!(region.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_empty_slice() {
        let mut data: [u8; 0] = [];
        let region = MemoryRegion::from_slice(&mut data);
        assert!(region.is_empty());
        assert!(!region.as_ptr().is_null());
    }

    #[test]
    fn test_null_base_with_zero_length() {
        let region = unsafe { MemoryRegion::from_raw_parts(core::ptr::null_mut(), 0) };
        assert!(region.is_empty());
        assert!(region.as_bytes().is_empty());
    }

    #[test]
    #[should_panic(expected = "null base address")]
    fn test_null_base_with_length_panics() {
        let _ = unsafe { MemoryRegion::from_raw_parts(core::ptr::null_mut(), 16) };
    }

    #[test]
    #[should_panic(expected = "exceeds the addressable range")]
    fn test_oversized_length_panics() {
        let mut byte = 0u8;
        let _ = unsafe { MemoryRegion::from_raw_parts(&mut byte, usize::MAX) };
    }

    #[test]
    fn test_debug_hides_contents() {
        let mut data = *b"secret";
        let region = MemoryRegion::from_slice(&mut data);
        let printed = format!("{region:?}");
        assert!(printed.contains("len: 6"));
        assert!(!printed.contains("secret"));
    }
}
