//! # secure_erase
//!
//! Erases sensitive memory in a way the optimizer cannot elide and pins it in
//! RAM so it is never written to swap.
//!
//! The buffer-level entry points accept any [`BufferView`]: byte slices,
//! `Vec<u8>`, byte arrays and [`TypedArray`]s of fixed-width numbers. A
//! typical sequence is lock, use, erase, unlock:
//!
//! ```
//! let mut secret = *b"1234567890";
//!
//! let locked = secure_erase::lock(&mut secret).is_ok();
//! // ... use the secret ...
//! secure_erase::secure_zero(&mut secret).unwrap();
//! if locked {
//!     secure_erase::unlock(&mut secret).unwrap();
//! }
//! assert_eq!(secret, [0u8; 10]);
//! ```
//!
//! Locking consumes the process-wide locked-memory budget, which is usually
//! small (often 64 KiB to 8 MiB on POSIX systems). Treat a [`LockError`] as an
//! expected outcome, not a bug. Locks do not nest: see [`lock`](mod@lock).

mod buffer;
pub mod erase;
mod error;
mod guard;
pub mod lock;
mod region;

pub use buffer::{resolve, resolve_lockable, BufferView, Element, TypedArray};
pub use erase::is_zeroed;
pub use error::{AdapterError, Error, LockError, LockOp};
pub use guard::LockedRegion;
#[cfg(any(target_family = "unix", target_family = "windows"))]
pub use lock::page_size;
pub use lock::{locked_memory_limit, Platform};
pub use region::MemoryRegion;

/// Overwrites the whole buffer with zeros.
///
/// The writes are guaranteed to happen even if the buffer is never read
/// again. An empty buffer is a no-op.
///
/// # Errors
/// [`AdapterError::Unsupported`] if the buffer is not contiguous; nothing is
/// written in that case.
pub fn secure_zero<'a>(buffer: impl Into<BufferView<'a>>) -> Result<(), AdapterError> {
    let region = buffer::resolve(buffer.into())?;
    erase::secure_zero(region);
    Ok(())
}

/// Locks the pages backing the buffer so they are not swapped out.
///
/// # Errors
/// - [`AdapterError::EmptyRegion`] for a zero-length buffer.
/// - [`AdapterError::Unsupported`] if the buffer is not contiguous.
/// - [`LockError`] if the OS refuses the lock or the platform has no backend.
pub fn lock<'a>(buffer: impl Into<BufferView<'a>>) -> Result<(), Error> {
    let region = buffer::resolve_lockable(buffer.into())?;
    lock::lock(&region)?;
    Ok(())
}

/// Unlocks the pages backing the buffer.
///
/// # Errors
/// Same as [`lock()`].
pub fn unlock<'a>(buffer: impl Into<BufferView<'a>>) -> Result<(), Error> {
    let region = buffer::resolve_lockable(buffer.into())?;
    lock::unlock(&region)?;
    Ok(())
}

/// Locks the buffer and returns a guard that erases and unlocks it when
/// released or dropped.
///
/// # Errors
/// Same as [`lock()`].
pub fn lock_guard<'a>(buffer: impl Into<BufferView<'a>>) -> Result<LockedRegion<'a>, Error> {
    let region = buffer::resolve_lockable(buffer.into())?;
    Ok(LockedRegion::new(region)?)
}

// Tests
#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_secure_zero_variants() {
        let mut bytes = vec![0x11u8; 16];
        secure_zero(&mut bytes).expect("Failed to erase bytes");
        assert!(is_zeroed(&bytes));

        let mut words = [0x1111_1111u32; 4];
        secure_zero(BufferView::typed(&mut words[..])).expect("Failed to erase words");
        assert_eq!(words, [0; 4]);
    }

    #[test]
    fn test_secure_zero_rejects_strided_array() {
        let mut values = [5u16; 4];
        let array = unsafe { TypedArray::from_raw_parts(values.as_mut_ptr().cast(), 2, 2, 4) };

        let err = secure_zero(array).expect_err("Strided array must be rejected");
        assert!(matches!(err, AdapterError::Unsupported { .. }));
        assert_eq!(values, [5; 4]);
    }

    #[test]
    fn test_lock_rejects_empty_buffer() {
        let mut empty: Vec<u8> = Vec::new();
        assert_eq!(
            lock(&mut empty),
            Err(Error::Adapter(AdapterError::EmptyRegion))
        );
        assert_eq!(
            unlock(&mut empty),
            Err(Error::Adapter(AdapterError::EmptyRegion))
        );
        assert!(lock_guard(&mut empty).is_err());
        secure_zero(&mut empty).expect("Erasing an empty buffer is a no-op");
    }

    #[test]
    #[serial]
    fn test_lock_guard_erases_on_release() {
        let mut secret = *b"hunter2";
        let guard = match lock_guard(&mut secret) {
            Ok(guard) => guard,
            Err(err) => {
                assert!(matches!(err, Error::Lock(_)));
                return;
            }
        };

        guard.release().expect("Failed to release guard");
        assert_eq!(secret, [0u8; 7]);
    }
}
