//! SIMD level selection for CPU kernels
//!
//! Kernels work on 16-byte blocks, the native vector width of both SSE2 and
//! NEON. Both instruction sets are part of their architecture's baseline, so
//! the level is fixed per target and never detected at run time.
//!
//! # Module Structure
//!
//! ```text
//! simd/
//! ├── mod.rs              # This file: level selection
//! └── lanes/              # 16-byte block capability
//!     ├── mod.rs          # ByteLanes trait, scalar lanes, row loops
//!     ├── sse2.rs         # x86-64 implementation
//!     └── aarch64/
//!         └── neon.rs     # ARM64 implementation
//! ```
//!
//! # Architecture Support
//!
//! | Architecture | Instruction Set | Vector Width | Status    |
//! |--------------|-----------------|--------------|-----------|
//! | x86-64       | SSE2            | 128 bits     | Supported |
//! | ARM64        | NEON            | 128 bits     | Supported |
//! | Any          | Scalar          | N/A          | Fallback  |

pub mod lanes;

/// SIMD instruction set used by the CPU kernels
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimdLevel {
    /// SSE2 on x86-64 (128-bit vectors)
    Sse2,
    /// NEON on AArch64 (128-bit vectors)
    Neon,
    /// Scalar fallback (no SIMD)
    Scalar,
}

impl SimdLevel {
    /// Returns the name of this SIMD level as a string
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sse2 => "SSE2",
            Self::Neon => "NEON",
            Self::Scalar => "Scalar",
        }
    }
}

impl std::fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The SIMD level of the compilation target
#[inline]
pub const fn detect_simd() -> SimdLevel {
    if cfg!(target_arch = "x86_64") {
        SimdLevel::Sse2
    } else if cfg!(target_arch = "aarch64") {
        SimdLevel::Neon
    } else {
        SimdLevel::Scalar
    }
}
