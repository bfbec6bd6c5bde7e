use ndarray::{Array3, s};

use crate::entities::{Container, Orientation, Placement};

/// Boolean occupancy model of a single [`Container`], together with a log of all confirmed [`Placement`]s.
///
/// A cell is occupied if and only if it lies within one of the logged placements.
/// A grid is meant to be built fresh for every evaluation and discarded afterwards.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    pub container: Container,
    cells: Array3<bool>,
    placements: Vec<Placement>,
}

impl OccupancyGrid {
    pub fn new(container: Container) -> Self {
        let cells = Array3::from_elem(
            (container.width, container.height, container.depth),
            false,
        );
        Self {
            container,
            cells,
            placements: vec![],
        }
    }

    /// Checks whether a box with extents `o` can be placed with its minimum corner at `(x, y, z)`:
    /// it must lie within the container and all cells it covers must be free.
    /// Only the cells of the box are visited.
    pub fn fits(&self, x: usize, y: usize, z: usize, o: Orientation) -> bool {
        if !self.container.contains((x, y, z), o) {
            return false;
        }
        !self
            .cells
            .slice(s![x..x + o.w, y..y + o.h, z..z + o.d])
            .iter()
            .any(|&occupied| occupied)
    }

    /// Marks the cells of the box occupied and logs the placement.
    /// The caller must have confirmed [`OccupancyGrid::fits`] for the same box beforehand.
    pub fn place(&mut self, item_id: u64, x: usize, y: usize, z: usize, o: Orientation) -> Placement {
        debug_assert!(self.fits(x, y, z, o), "box {o} does not fit at ({x}, {y}, {z})");

        self.cells
            .slice_mut(s![x..x + o.w, y..y + o.h, z..z + o.d])
            .fill(true);
        let placement = Placement::new(item_id, (x, y, z), o);
        self.placements.push(placement);
        placement
    }

    /// Percentage of the container volume that is occupied, in `[0, 100]`.
    /// Recomputed from the cells on every call.
    pub fn utilization(&self) -> f64 {
        self.occupied_cells() as f64 / self.container.volume() as f64 * 100.0
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|&&occupied| occupied).count()
    }

    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.cells.get((x, y, z)).copied().unwrap_or(false)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Consumes the grid, returning the log of placements in the order they were made.
    pub fn into_placements(self) -> Vec<Placement> {
        self.placements
    }
}
