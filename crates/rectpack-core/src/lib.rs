//! Core library for packing rectangles into the smallest bounding rectangle.
//!
//! - Heuristics: sort by area, perimeter, bigger side, width, height or a pathological
//!   aspect-ratio multiplier; `FIND_BEST` tries them all and keeps the tightest result
//! - Placement: growing guillotine tree (arena-backed) or growing skyline
//! - Data model is serde-serializable; JSON exporters are provided for atlas tooling.
//!
//! Quick example:
//! ```
//! use rectpack_core::{PackingHints, PackingRectangle, pack};
//! # fn main() -> rectpack_core::Result<()> {
//! let rects = vec![
//!     PackingRectangle::new(0, 64, 32),
//!     PackingRectangle::new(1, 32, 32),
//!     PackingRectangle::new(2, 8, 120),
//! ];
//! let out = pack(&rects, PackingHints::FIND_BEST, 1)?;
//! println!("{}x{} via {:?}", out.width, out.height, out.hint);
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod hints;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use hints::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `rectpack_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder, Placement};
    pub use crate::hints::{PackingHint, PackingHints};
    pub use crate::model::{PackStats, PackingRectangle, PackingResult, Rect};
    pub use crate::{RectPackError, pack, pack_sizes, pack_with_config};
}
