use crate::config::Placement;
use crate::model::Rect;

pub mod guillotine;
pub mod skyline;

/// Direction in which a bin grows when nothing fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grow {
    /// Add a free strip on the right.
    Width,
    /// Add a free strip at the bottom.
    Height,
}

/// A growable bin that places rectangles without overlap.
///
/// `insert` returns `None` when the rectangle does not fit the current bin. After
/// `grow(Grow::Width, w)` (or `grow(Grow::Height, h)`) a `w`x`h` rectangle that fits
/// the bin's other dimension is guaranteed to fit. Growing never moves placed rectangles.
pub trait Packer {
    fn size(&self) -> (u32, u32);
    fn insert(&mut self, w: u32, h: u32) -> Option<Rect>;
    fn grow(&mut self, direction: Grow, amount: u32);
}

/// Creates an empty bin of `width`x`height` for the given placement structure.
pub fn new_packer(placement: Placement, width: u32, height: u32) -> Box<dyn Packer> {
    match placement {
        Placement::Guillotine => Box::new(guillotine::GuillotinePacker::new(width, height)),
        Placement::Skyline => Box::new(skyline::SkylinePacker::new(width, height)),
    }
}
