use super::{Grow, Packer};
use crate::model::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SkylineNode {
    x: u32,
    y: u32,
    w: u32,
}

impl SkylineNode {
    /// Exclusive right edge.
    #[inline]
    fn end(&self) -> u32 {
        self.x + self.w
    }
}

/// Growing bottom-left skyline packer.
///
/// Segments cover `[0, width)` left to right without gaps; `y` is the first free row
/// above each segment.
pub struct SkylinePacker {
    width: u32,
    height: u32,
    skylines: Vec<SkylineNode>,
}

impl SkylinePacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            skylines: vec![SkylineNode { x: 0, y: 0, w: width }],
        }
    }

    fn can_put(&self, mut i: usize, w: u32, h: u32) -> Option<Rect> {
        let x = self.skylines[i].x;
        if x as u64 + w as u64 > self.width as u64 {
            return None;
        }
        let mut rect = Rect::new(x, 0, w, h);
        let mut width_left = w;
        loop {
            rect.y = rect.y.max(self.skylines[i].y);
            if rect.y as u64 + h as u64 > self.height as u64 {
                return None;
            }
            if self.skylines[i].w >= width_left {
                return Some(rect);
            }
            width_left -= self.skylines[i].w;
            i += 1;
            if i >= self.skylines.len() {
                return None;
            }
        }
    }

    fn find_bottom_left(&self, w: u32, h: u32) -> Option<(usize, Rect)> {
        let mut best: Option<(usize, Rect)> = None;
        let mut best_bottom = u64::MAX;
        let mut best_width = u32::MAX;
        for i in 0..self.skylines.len() {
            if let Some(r) = self.can_put(i, w, h) {
                let bottom = r.y as u64 + r.h as u64;
                if bottom < best_bottom
                    || (bottom == best_bottom && self.skylines[i].w < best_width)
                {
                    best_bottom = bottom;
                    best_width = self.skylines[i].w;
                    best = Some((i, r));
                }
            }
        }
        best
    }

    fn split(&mut self, index: usize, rect: &Rect) {
        let node = SkylineNode {
            x: rect.x,
            y: rect.y + rect.h,
            w: rect.w,
        };
        self.skylines.insert(index, node);

        let i = index + 1;
        while i < self.skylines.len() {
            if self.skylines[i].x < node.end() {
                let shrink = node.end() - self.skylines[i].x;
                if self.skylines[i].w <= shrink {
                    self.skylines.remove(i);
                } else {
                    self.skylines[i].x += shrink;
                    self.skylines[i].w -= shrink;
                    break;
                }
            } else {
                break;
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skylines.len() {
            if self.skylines[i - 1].y == self.skylines[i].y {
                let w = self.skylines[i].w;
                self.skylines[i - 1].w += w;
                self.skylines.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl Packer for SkylinePacker {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn insert(&mut self, w: u32, h: u32) -> Option<Rect> {
        let (i, place) = self.find_bottom_left(w, h)?;
        self.split(i, &place);
        self.merge();
        Some(place)
    }

    fn grow(&mut self, direction: Grow, amount: u32) {
        match direction {
            Grow::Width => {
                self.skylines.push(SkylineNode {
                    x: self.width,
                    y: 0,
                    w: amount,
                });
                self.width += amount;
                self.merge();
            }
            Grow::Height => self.height += amount,
        }
    }
}
