use std::fmt::{Display, Formatter};

use crate::entities::Orientation;

/// A confirmed placement of an item inside a container:
/// the minimum corner `(x, y, z)` and the extents `(w, h, d)` of the chosen orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub item_id: u64,
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub w: usize,
    pub h: usize,
    pub d: usize,
}

impl Placement {
    pub fn new(item_id: u64, (x, y, z): (usize, usize, usize), o: Orientation) -> Self {
        Placement {
            item_id,
            x,
            y,
            z,
            w: o.w,
            h: o.h,
            d: o.d,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.w, self.h, self.d)
    }

    pub fn volume(&self) -> usize {
        self.w * self.h * self.d
    }

    /// Two placements overlap if their half-open ranges intersect on all three axes.
    pub fn overlaps(&self, other: &Placement) -> bool {
        fn intersect(a: usize, a_len: usize, b: usize, b_len: usize) -> bool {
            a < b + b_len && b < a + a_len
        }
        intersect(self.x, self.w, other.x, other.w)
            && intersect(self.y, self.h, other.y, other.h)
            && intersect(self.z, self.d, other.z, other.d)
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} @ ({}, {}, {}) [{}x{}x{}]",
            self.item_id, self.x, self.y, self.z, self.w, self.h, self.d
        )
    }
}
