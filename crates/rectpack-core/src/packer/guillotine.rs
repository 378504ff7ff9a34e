use super::{Grow, Packer};
use crate::model::Rect;

/// Handle of a node in the region arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Free,
    Occupied,
    /// Guillotine cut: `first` and `second` tile the parent exactly.
    Split { first: RegionId, second: RegionId },
}

#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub rect: Rect,
    pub kind: RegionKind,
}

/// Growing guillotine packer backed by an arena of region nodes.
///
/// The leaves of the tree rooted at `root` always tile the bin exactly. Free leaves are
/// also kept in `free`, in creation order, which is what placement scans.
pub struct GuillotinePacker {
    regions: Vec<Region>,
    root: RegionId,
    free: Vec<RegionId>,
    width: u32,
    height: u32,
}

impl GuillotinePacker {
    pub fn new(width: u32, height: u32) -> Self {
        let mut packer = Self {
            regions: Vec::new(),
            root: RegionId(0),
            free: Vec::new(),
            width,
            height,
        };
        packer.root = packer.push_free(Rect::new(0, 0, width, height));
        packer
    }

    #[cfg(test)]
    fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    #[cfg(test)]
    fn root(&self) -> RegionId {
        self.root
    }

    /// Leaves of the tree in depth-first order.
    #[cfg(test)]
    fn leaves(&self) -> Vec<Region> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let region = self.regions[id.0];
            match region.kind {
                RegionKind::Split { first, second } => {
                    stack.push(second);
                    stack.push(first);
                }
                _ => out.push(region),
            }
        }
        out
    }

    #[cfg(test)]
    fn free_regions(&self) -> impl Iterator<Item = Rect> + '_ {
        self.free.iter().map(|id| self.regions[id.0].rect)
    }

    fn push(&mut self, rect: Rect, kind: RegionKind) -> RegionId {
        let id = RegionId(self.regions.len());
        self.regions.push(Region { rect, kind });
        id
    }

    fn push_free(&mut self, rect: Rect) -> RegionId {
        let id = self.push(rect, RegionKind::Free);
        self.free.push(id);
        id
    }

    /// Free-list position of the leaf with the smallest leftover area that fits `w`x`h`.
    fn choose(&self, w: u32, h: u32) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (pos, id) in self.free.iter().enumerate() {
            let fr = self.regions[id.0].rect;
            if fr.w < w || fr.h < h {
                continue;
            }
            let leftover = fr.area() - (w as u64 * h as u64);
            if best.is_none_or(|(_, b)| leftover < b) {
                best = Some((pos, leftover));
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// Places `w`x`h` at the top-left of the free leaf `leaf` and cuts the remainder.
    fn split(&mut self, leaf: RegionId, w: u32, h: u32) -> Rect {
        let fr = self.regions[leaf.0].rect;
        let placed = Rect::new(fr.x, fr.y, w, h);
        let w_right = fr.w - w;
        let h_bottom = fr.h - h;

        // Shorter leftover axis: the smaller leftover keeps the full span.
        let split_horizontal = h_bottom < w_right;
        let (inner_rect, near, far) = if split_horizontal {
            (
                Rect::new(fr.x, fr.y, fr.w, h),
                Rect::new(fr.x + w, fr.y, w_right, h),
                Rect::new(fr.x, fr.y + h, fr.w, h_bottom),
            )
        } else {
            (
                Rect::new(fr.x, fr.y, w, fr.h),
                Rect::new(fr.x, fr.y + h, w, h_bottom),
                Rect::new(fr.x + w, fr.y, w_right, fr.h),
            )
        };

        // `near` shares the cut with the placed rect inside `inner`; `far` is the rest.
        let inner_kind = if near.area() > 0 {
            let occupied = self.push(placed, RegionKind::Occupied);
            let near_id = self.push_free(near);
            RegionKind::Split {
                first: occupied,
                second: near_id,
            }
        } else {
            RegionKind::Occupied
        };

        if far.area() > 0 {
            let inner = if near.area() > 0 {
                self.push(inner_rect, inner_kind)
            } else {
                self.push(placed, RegionKind::Occupied)
            };
            let far_id = self.push_free(far);
            self.regions[leaf.0].kind = RegionKind::Split {
                first: inner,
                second: far_id,
            };
        } else {
            self.regions[leaf.0].kind = inner_kind;
        }
        placed
    }
}

impl Packer for GuillotinePacker {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn insert(&mut self, w: u32, h: u32) -> Option<Rect> {
        let pos = self.choose(w, h)?;
        let leaf = self.free.remove(pos);
        Some(self.split(leaf, w, h))
    }

    fn grow(&mut self, direction: Grow, amount: u32) {
        if amount == 0 {
            return;
        }
        let old_root = self.root;
        let strip = match direction {
            Grow::Width => {
                let strip = Rect::new(self.width, 0, amount, self.height);
                self.width += amount;
                strip
            }
            Grow::Height => {
                let strip = Rect::new(0, self.height, self.width, amount);
                self.height += amount;
                strip
            }
        };
        let strip_id = self.push_free(strip);
        self.root = self.push(
            Rect::new(0, 0, self.width, self.height),
            RegionKind::Split {
                first: old_root,
                second: strip_id,
            },
        );
    }
}
