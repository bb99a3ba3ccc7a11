//! ARM64 block operations

pub(crate) mod neon;
