//! Borrowed tensor handles passed to kernels at run time
//!
//! A kernel never owns tensor memory. It receives a read-only source view and
//! a destination view for the duration of one `run` call.

use super::info::TensorInfo;
use crate::error::{Error, Result};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Read-only tensor: descriptor plus the bytes it describes
#[derive(Clone, Copy, Debug)]
pub struct TensorRef<'a> {
    info: &'a TensorInfo,
    data: &'a [u8],
}

impl<'a> TensorRef<'a> {
    /// Bind `data` to `info`; `data` must cover `info.total_size()` bytes
    pub fn new(info: &'a TensorInfo, data: &'a [u8]) -> Result<Self> {
        check_len(info, data.len())?;
        Ok(Self { info, data })
    }

    /// Bind storage already sized from its own descriptor
    pub(super) fn from_storage(info: &'a TensorInfo, data: &'a [u8]) -> Self {
        debug_assert!(data.len() >= info.total_size());
        Self { info, data }
    }

    /// The descriptor
    #[inline]
    pub fn info(&self) -> &'a TensorInfo {
        self.info
    }

    /// The backing bytes
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Base address of the backing bytes
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }
}

/// Writable destination tensor for kernel runs
///
/// Holds the exclusive borrow of the buffer. Kernels write through the raw
/// base pointer, so the handle is `Send` but not `Sync`: only
/// [`CpuScheduler`](crate::runtime::cpu::CpuScheduler), which splits the
/// window into disjoint parts itself, shares one across threads.
#[derive(Debug)]
pub struct TensorMut<'a> {
    info: &'a TensorInfo,
    ptr: NonNull<u8>,
    len: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

// SAFETY: the handle stands for a `&mut [u8]`, which is `Send`.
unsafe impl Send for TensorMut<'_> {}

impl<'a> TensorMut<'a> {
    /// Bind `data` to `info`; `data` must cover `info.total_size()` bytes
    pub fn new(info: &'a TensorInfo, data: &'a mut [u8]) -> Result<Self> {
        check_len(info, data.len())?;
        Ok(Self::from_storage(info, data))
    }

    /// Bind storage already sized from its own descriptor
    pub(super) fn from_storage(info: &'a TensorInfo, data: &'a mut [u8]) -> Self {
        debug_assert!(data.len() >= info.total_size());
        Self {
            info,
            len: data.len(),
            ptr: NonNull::from(data).cast(),
            _marker: PhantomData,
        }
    }

    /// The descriptor
    #[inline]
    pub fn info(&self) -> &'a TensorInfo {
        self.info
    }

    /// Length of the backing buffer in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the backing buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base address of the backing bytes
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Shorter-lived handle to the same memory, for handing to one kernel
    /// run while keeping this one
    pub fn reborrow(&mut self) -> TensorMut<'_> {
        TensorMut {
            info: self.info,
            ptr: self.ptr,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

/// Source and destination of one kernel run
///
/// A pack cannot be shared between threads, so concurrent runs over one
/// destination have to go through the scheduler:
///
/// ```compile_fail
/// use windowr::tensor::TensorPack;
/// fn shared<T: Sync>(_: &T) {}
/// fn check(pack: &TensorPack<'_>) {
///     shared(pack);
/// }
/// ```
#[derive(Debug)]
pub struct TensorPack<'a> {
    /// Tensor read by the kernel
    pub src: TensorRef<'a>,
    /// Tensor written by the kernel
    pub dst: TensorMut<'a>,
}

impl<'a> TensorPack<'a> {
    /// Pair a source with a destination
    pub fn new(src: TensorRef<'a>, dst: TensorMut<'a>) -> Self {
        Self { src, dst }
    }
}

fn check_len(info: &TensorInfo, got: usize) -> Result<()> {
    let required = info.total_size();
    if got < required {
        return Err(Error::BufferTooSmall { required, got });
    }
    Ok(())
}
