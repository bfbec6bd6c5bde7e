use crate::entities::Placement;

/// Outcome of placing an arrangement of items in a container.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Percentage of the container volume occupied by `placements`, in `[0, 100]`
    pub utilization: f64,
    /// Confirmed placements, in the order they were made
    pub placements: Vec<Placement>,
    /// Whether every item of the arrangement was placed
    pub fully_placed: bool,
}

impl Solution {
    /// A solution in which nothing was placed.
    pub fn empty() -> Self {
        Solution {
            utilization: 0.0,
            placements: vec![],
            fully_placed: false,
        }
    }

    pub fn placed_volume(&self) -> usize {
        self.placements.iter().map(|p| p.volume()).sum()
    }
}
