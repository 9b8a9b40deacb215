use core::fmt;
use std::io;

use thiserror::Error;

/// The OS call that produced a [`LockError::OsFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOp {
    Lock,
    Unlock,
}

impl fmt::Display for LockOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock => f.write_str("lock"),
            Self::Unlock => f.write_str("unlock"),
        }
    }
}

/// Errors surfaced by the memory locking backends.
///
/// Every variant is an expected, recoverable outcome: the locked-memory
/// budget is a scarce process-wide resource and callers must plan for its
/// exhaustion.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// The OS refused to lock or unlock the region. `code` is the raw
    /// `errno` (POSIX) or `GetLastError` value (Windows).
    #[error("memory {op} failed with OS error code {code}")]
    OsFailure { op: LockOp, code: i32 },

    /// No locking backend exists for the current platform.
    #[error("memory locking is not supported on this platform")]
    UnsupportedPlatform,
}

impl LockError {
    /// Raw OS error code, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::OsFailure { code, .. } => Some(*code),
            Self::UnsupportedPlatform => None,
        }
    }

    /// The OS error as an [`io::Error`], useful for its message.
    pub fn as_io_error(&self) -> Option<io::Error> {
        self.code().map(io::Error::from_raw_os_error)
    }

    /// Whether the OS code reports an exhausted locked-memory budget.
    ///
    /// The typical default ceiling is small (a few MiB on most POSIX
    /// systems, the minimum working set on Windows).
    pub fn is_resource_limit(&self) -> bool {
        match self.code() {
            Some(code) => crate::lock::is_resource_limit_code(code),
            None => false,
        }
    }
}

/// Errors produced while resolving a buffer into a [`MemoryRegion`].
///
/// [`MemoryRegion`]: crate::MemoryRegion
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterError {
    /// The buffer does not describe a single contiguous address range.
    #[error("unsupported buffer: {reason}")]
    Unsupported { reason: &'static str },

    /// A zero-length buffer was passed to a locking operation.
    #[error("cannot lock an empty memory region")]
    EmptyRegion,
}

/// Any error returned by the buffer-level API.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_failure_accessors() {
        let err = LockError::OsFailure {
            op: LockOp::Lock,
            code: 12,
        };
        assert_eq!(err.code(), Some(12));
        assert_eq!(err.as_io_error().and_then(|e| e.raw_os_error()), Some(12));
        assert_eq!(err.to_string(), "memory lock failed with OS error code 12");
    }

    #[test]
    fn test_unsupported_platform_has_no_code() {
        let err = LockError::UnsupportedPlatform;
        assert_eq!(err.code(), None);
        assert!(err.as_io_error().is_none());
        assert!(!err.is_resource_limit());
    }

    #[test]
    fn test_error_conversions() {
        let err: Error = AdapterError::EmptyRegion.into();
        assert_eq!(err, Error::Adapter(AdapterError::EmptyRegion));
        assert_eq!(err.to_string(), "cannot lock an empty memory region");

        let err: Error = LockError::UnsupportedPlatform.into();
        assert!(matches!(err, Error::Lock(LockError::UnsupportedPlatform)));
    }
}
