//! Resolution of the supported buffer representations into a
//! [`MemoryRegion`].
//!
//! Resolution never copies: the region points into the caller's allocation
//! and keeps it mutably borrowed.

use core::{fmt, marker::PhantomData, mem};

use crate::{error::AdapterError, region::MemoryRegion};

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width numeric element type.
///
/// Any bit pattern, including all zeros, is a valid value of these types.
pub trait Element: sealed::Sealed + Copy {
    /// Width of one element in bytes.
    const WIDTH: usize = mem::size_of::<Self>();
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Element for $ty {}
        )*
    };
}

impl_element!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

/// A mutable array of fixed-width numeric elements.
///
/// Built from a slice it is always contiguous. Built from raw parts it may
/// describe a foreign strided view, which resolution rejects.
pub struct TypedArray<'a> {
    base: *mut u8,
    len: usize,
    width: usize,
    stride: isize,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> TypedArray<'a> {
    /// Wraps a typed slice. The element width comes from `T`.
    pub fn new<T: Element>(elements: &'a mut [T]) -> Self {
        Self {
            base: elements.as_mut_ptr().cast::<u8>(),
            len: elements.len(),
            width: T::WIDTH,
            stride: T::WIDTH as isize,
            _marker: PhantomData,
        }
    }

    /// Describes an externally owned array by its first element, element
    /// count, element width and byte distance between consecutive elements.
    ///
    /// # Safety
    /// For the lifetime `'a`, every element described must be valid for reads
    /// and writes, must be a numeric type for which all-zero bytes are a valid
    /// value, and must not be accessed through any other pointer.
    pub unsafe fn from_raw_parts(base: *mut u8, len: usize, width: usize, stride: isize) -> Self {
        Self {
            base,
            len,
            width,
            stride,
            _marker: PhantomData,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn element_width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    /// Whether the elements occupy one gap-free ascending address range.
    pub fn is_contiguous(&self) -> bool {
        self.len <= 1 || (self.width as isize) == self.stride
    }

    /// Total size in bytes, `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        self.len.checked_mul(self.width)
    }
}

impl fmt::Debug for TypedArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedArray")
            .field("base", &self.base)
            .field("len", &self.len)
            .field("width", &self.width)
            .field("stride", &self.stride)
            .finish()
    }
}

/// The buffer representations the library operates on.
#[derive(Debug)]
pub enum BufferView<'a> {
    /// A contiguous sequence of bytes.
    RawBytes(&'a mut [u8]),
    /// A sequence of fixed-width numeric elements.
    TypedArray(TypedArray<'a>),
}

impl<'a> BufferView<'a> {
    /// Wraps a typed slice as a [`BufferView::TypedArray`].
    #[inline]
    pub fn typed<T: Element>(elements: &'a mut [T]) -> Self {
        Self::TypedArray(TypedArray::new(elements))
    }
}

impl<'a> From<&'a mut [u8]> for BufferView<'a> {
    fn from(bytes: &'a mut [u8]) -> Self {
        Self::RawBytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a mut [u8; N]> for BufferView<'a> {
    fn from(bytes: &'a mut [u8; N]) -> Self {
        Self::RawBytes(bytes.as_mut_slice())
    }
}

impl<'a> From<&'a mut Vec<u8>> for BufferView<'a> {
    fn from(bytes: &'a mut Vec<u8>) -> Self {
        Self::RawBytes(bytes.as_mut_slice())
    }
}

impl<'a> From<TypedArray<'a>> for BufferView<'a> {
    fn from(array: TypedArray<'a>) -> Self {
        Self::TypedArray(array)
    }
}

/// Resolves a buffer into the region it occupies. Empty buffers resolve to
/// an empty region.
///
/// # Errors
/// [`AdapterError::Unsupported`] if the buffer is not a single contiguous
/// address range or its byte size cannot be represented.
pub fn resolve(view: BufferView<'_>) -> Result<MemoryRegion<'_>, AdapterError> {
    match view {
        BufferView::RawBytes(bytes) => Ok(MemoryRegion::from_slice(bytes)),
        BufferView::TypedArray(array) => resolve_typed(array),
    }
}

/// Like [`resolve`], but rejects empty buffers since they cannot be locked.
///
/// # Errors
/// [`AdapterError::EmptyRegion`] for a zero-length buffer, otherwise as
/// [`resolve`].
pub fn resolve_lockable(view: BufferView<'_>) -> Result<MemoryRegion<'_>, AdapterError> {
    let region = resolve(view)?;
    if region.is_empty() {
        return Err(AdapterError::EmptyRegion);
    }
    Ok(region)
}

fn resolve_typed(array: TypedArray<'_>) -> Result<MemoryRegion<'_>, AdapterError> {
    if array.width == 0 {
        return Err(AdapterError::Unsupported {
            reason: "element width is zero",
        });
    }
    if !array.is_contiguous() {
        return Err(AdapterError::Unsupported {
            reason: "array elements are not contiguous",
        });
    }

    let byte_len = array
        .byte_len()
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or(AdapterError::Unsupported {
            reason: "array byte length overflows the address space",
        })?;

    if array.base.is_null() && byte_len > 0 {
        return Err(AdapterError::Unsupported {
            reason: "array has a null base address",
        });
    }

    // SAFETY: the array's constructor guarantees exclusive access to
    // `byte_len` bytes at `base` for its lifetime.
    Ok(unsafe { MemoryRegion::from_raw_parts(array.base, byte_len) })
}
