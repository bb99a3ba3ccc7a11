//! Storage: a descriptor paired with host memory it owns
//!
//! Allocation policy is the caller's business; `Tensor` is the simplest
//! possible owner, a zero-initialized `Vec<u8>` sized from the descriptor.

use super::info::{TensorInfo, ValidRegion};
use super::view::{TensorMut, TensorRef};
use crate::error::{Error, Result};

/// Host tensor owning `info.total_size()` bytes
#[derive(Clone, Debug)]
pub struct Tensor {
    info: TensorInfo,
    data: Vec<u8>,
}

impl Tensor {
    /// Allocate zeroed memory for `info`
    pub fn zeros(info: TensorInfo) -> Self {
        let data = vec![0u8; info.total_size()];
        Self { info, data }
    }

    /// Allocate memory for `info` with every byte set to `value`
    pub fn filled(info: TensorInfo, value: u8) -> Self {
        let data = vec![value; info.total_size()];
        Self { info, data }
    }

    /// Take ownership of raw bytes; `data` must cover the descriptor exactly
    pub fn from_bytes(info: TensorInfo, data: Vec<u8>) -> Result<Self> {
        if data.len() != info.total_size() {
            return Err(Error::invalid_argument(
                "data",
                format!("expected {} bytes, got {}", info.total_size(), data.len()),
            ));
        }
        Ok(Self { info, data })
    }

    /// Copy typed elements in memory order
    pub fn from_slice<T: bytemuck::Pod>(info: TensorInfo, values: &[T]) -> Result<Self> {
        Self::from_bytes(info, bytemuck::cast_slice(values).to_vec())
    }

    /// The descriptor
    #[inline]
    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    /// Apply a valid region produced by a kernel's `configure`
    pub fn set_valid_region(&mut self, region: ValidRegion) {
        self.info.set_valid_region(region);
    }

    /// The backing bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The backing bytes, mutably
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read-only view for a kernel run
    pub fn view(&self) -> TensorRef<'_> {
        TensorRef::from_storage(&self.info, &self.data)
    }

    /// Writable view for a kernel run
    pub fn view_mut(&mut self) -> TensorMut<'_> {
        TensorMut::from_storage(&self.info, &mut self.data)
    }
}
