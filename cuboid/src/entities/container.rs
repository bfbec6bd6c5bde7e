use anyhow::{Result, ensure};

use crate::entities::Orientation;

/// Maximum number of unit cells in a container, every cell is backed by one byte of the occupancy grid.
pub const MAX_CONTAINER_CELLS: usize = 1 << 28;

/// The rectangular container in which [`Item`](crate::entities::Item)s are placed.
/// Its interior is modelled as `width x height x depth` unit cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Container {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl Container {
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self> {
        ensure!(
            width > 0 && height > 0 && depth > 0,
            "container dimensions must be positive, got {width}x{height}x{depth}"
        );
        let cells = width.checked_mul(height).and_then(|wh| wh.checked_mul(depth));
        ensure!(
            cells.is_some_and(|c| c <= MAX_CONTAINER_CELLS),
            "container {width}x{height}x{depth} exceeds the maximum of {MAX_CONTAINER_CELLS} cells"
        );
        Ok(Container {
            width,
            height,
            depth,
        })
    }

    pub fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Returns `true` if a box of extents `o` with its minimum corner at `(x, y, z)` lies inside the container.
    pub fn contains(&self, (x, y, z): (usize, usize, usize), o: Orientation) -> bool {
        let within = |start: usize, extent: usize, limit: usize| {
            start.checked_add(extent).is_some_and(|end| end <= limit)
        };
        within(x, o.w, self.width) && within(y, o.h, self.height) && within(z, o.d, self.depth)
    }

    /// The smallest of the three dimensions
    pub fn min_dim(&self) -> usize {
        self.width.min(self.height).min(self.depth)
    }
}
