//! Tensor descriptors and buffer handles
//!
//! `TensorInfo` is the metadata a kernel validates and iterates over;
//! `TensorRef` / `TensorMut` bind it to memory for one kernel run.

mod coordinates;
mod info;
mod shape;
mod storage;
mod strides;
mod view;

pub use coordinates::Coordinates;
pub use info::{PaddingSize, TensorInfo, ValidRegion};
pub use shape::{DIM_W, DIM_X, DIM_Y, DIM_Z, MAX_DIMS, Shape};
pub use storage::Tensor;
pub use strides::Strides;
pub use view::{TensorMut, TensorPack, TensorRef};
