use std::fmt::{Display, Formatter};

use anyhow::{Result, bail, ensure};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Extents of an axis-aligned box along the x (`w`), y (`h`) and z (`d`) axes.
/// Used both for the dimensions of an [`Item`] and for one of its orientations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation {
    pub w: usize,
    pub h: usize,
    pub d: usize,
}

impl Orientation {
    pub fn new(w: usize, h: usize, d: usize) -> Self {
        Self { w, h, d }
    }

    pub fn volume(&self) -> usize {
        self.w * self.h * self.d
    }

    /// Volume of the box, `None` if it does not fit in a `usize`.
    pub fn checked_volume(&self) -> Option<usize> {
        self.w.checked_mul(self.h)?.checked_mul(self.d)
    }

    /// All six axis permutations of these extents, duplicates included.
    pub fn permutations(&self) -> [Orientation; 6] {
        let Orientation { w, h, d } = *self;
        [
            Orientation::new(w, h, d),
            Orientation::new(w, d, h),
            Orientation::new(h, w, d),
            Orientation::new(h, d, w),
            Orientation::new(d, w, h),
            Orientation::new(d, h, w),
        ]
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.w, self.h, self.d)
    }
}

/// Item to be placed in the container.
/// Immutable after construction, shared by reference among all arrangements of an optimization run.
#[derive(Clone, Debug)]
pub struct Item {
    /// Identifier as defined in the input
    pub id: u64,
    /// Dimensions as defined in the input
    pub dims: Orientation,
    /// Distinct orientations in which the item can be placed (1, 3 or 6 of them)
    pub orientations: Vec<Orientation>,
    pub volume: usize,
}

impl Item {
    pub fn new(id: u64, dims: Orientation) -> Result<Item> {
        ensure!(
            dims.w > 0 && dims.h > 0 && dims.d > 0,
            "item {id} has a non-positive dimension: {dims}"
        );
        let Some(volume) = dims.checked_volume() else {
            bail!("volume of item {id} ({dims}) is too large");
        };
        let orientations = dims.permutations().into_iter().unique().collect_vec();

        Ok(Item {
            id,
            dims,
            orientations,
            volume,
        })
    }
}
