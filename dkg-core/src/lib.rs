// Public crate surface is organized by layer: `domain`, `foundation`.
pub mod domain;
pub mod foundation;
pub use foundation::{DkgError, ErrorCode, Hash32, Index, Result};
