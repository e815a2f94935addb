//! Axis-Aligned Bounding Boxes
//!
//! Every entity carries a `Rect` recomputed whenever its position changes.
//! Overlap queries between these boxes drive the whole collision protocol.

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Axis-aligned rectangle (bottom-left corner + size) in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X of the bottom-left corner
    pub x: f32,
    /// Y of the bottom-left corner
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Bottom-left corner.
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Top-right corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    /// Check whether two rectangles overlap.
    ///
    /// Touching edges do not count as overlap, matching the behavior the
    /// movement protocol depends on (standing exactly on a cell boundary is
    /// not a collision with the neighboring cell).
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Check whether a point lies inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }

    /// The integer cells touched by the four corners, deduplicated.
    ///
    /// A box no larger than a tile touches at most 4 distinct cells, so a
    /// fixed-size array with manual dedup avoids a set allocation in the
    /// hot movement path.
    pub fn corner_cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let corners = [
            (self.x as i32, self.y as i32),
            ((self.x + self.w) as i32, self.y as i32),
            (self.x as i32, (self.y + self.h) as i32),
            ((self.x + self.w) as i32, (self.y + self.h) as i32),
        ];
        let mut cells: [(i32, i32); 4] = [(0, 0); 4];
        let mut count = 0;
        for corner in corners {
            if !cells[..count].contains(&corner) {
                cells[count] = corner;
                count += 1;
            }
        }
        cells.into_iter().take(count)
    }
}
