//! Layer-level operations built from one or more kernels

mod concatenate;

pub use concatenate::ConcatenateLayer;
