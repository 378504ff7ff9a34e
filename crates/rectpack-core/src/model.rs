use serde::{Deserialize, Serialize};

use crate::hints::PackingHint;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// True if the areas overlap. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_x2 = self.x as u64 + self.w as u64;
        let a_y2 = self.y as u64 + self.h as u64;
        let b_x2 = other.x as u64 + other.w as u64;
        let b_y2 = other.y as u64 + other.h as u64;
        (self.x as u64) < b_x2
            && (other.x as u64) < a_x2
            && (self.y as u64) < b_y2
            && (other.y as u64) < a_y2
    }
}

/// A rectangle to pack. `id` is chosen by the caller and carried through untouched so
/// results can be mapped back to whatever the rectangle stands for (a glyph, a sprite).
/// `x,y` are written by the packer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackingRectangle {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
}

impl PackingRectangle {
    pub fn new(id: usize, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn perimeter(&self) -> u64 {
        PackingHint::Perimeter.sort_key(self.width, self.height)
    }

    pub fn bigger_side(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn pathological_multiplier(&self) -> u64 {
        PackingHint::PathologicalMultiplier.sort_key(self.width, self.height)
    }

    /// Placed rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Outcome of one packing call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackingResult {
    /// Input rectangles in input order, with positions assigned.
    pub rectangles: Vec<PackingRectangle>,
    /// Bounding width.
    pub width: u32,
    /// Bounding height.
    pub height: u32,
    /// Heuristic of the winning trial. `None` for an empty input.
    pub hint: Option<PackingHint>,
}

impl PackingResult {
    pub(crate) fn empty() -> Self {
        Self {
            rectangles: Vec::new(),
            width: 0,
            height: 0,
            hint: None,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn perimeter(&self) -> u64 {
        2 * (self.width as u64 + self.height as u64)
    }

    /// Looks a rectangle up by its caller-assigned id.
    pub fn get(&self, id: usize) -> Option<&PackingRectangle> {
        self.rectangles.iter().find(|r| r.id == id)
    }

    /// Computes packing statistics for this result.
    pub fn stats(&self) -> PackStats {
        let bound_area = self.area();
        let used_area: u64 = self.rectangles.iter().map(PackingRectangle::area).sum();
        let occupancy = if bound_area > 0 {
            used_area as f64 / bound_area as f64
        } else {
            0.0
        };
        PackStats {
            num_rects: self.rectangles.len(),
            width: self.width,
            height: self.height,
            bound_area,
            used_area,
            occupancy,
        }
    }
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Number of packed rectangles.
    pub num_rects: usize,
    pub width: u32,
    pub height: u32,
    /// `width * height`.
    pub bound_area: u64,
    /// Sum of the rectangle areas (padding excluded).
    pub used_area: u64,
    /// Occupancy ratio: used_area / bound_area (0.0 to 1.0).
    /// Higher is better (less wasted space).
    pub occupancy: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Rects: {}, Bounds: {}x{}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_rects,
            self.width,
            self.height,
            self.occupancy * 100.0,
            self.bound_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.bound_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.bound_area > 0 {
            (self.wasted_area() as f64 / self.bound_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
