use anyhow::{Result, ensure};
use itertools::Itertools;

use crate::entities::{Container, Item};

/// Static representation of a packing problem: a single container and the items to place in it.
#[derive(Clone, Debug)]
pub struct Instance {
    pub container: Container,
    pub items: Vec<Item>,
}

impl Instance {
    pub fn new(container: Container, items: Vec<Item>) -> Result<Self> {
        ensure!(!items.is_empty(), "instance should contain at least one item");
        ensure!(
            items.iter().map(|item| item.id).all_unique(),
            "all items should have unique IDs. IDs: {:?}",
            items.iter().map(|item| item.id).collect_vec()
        );
        Ok(Instance { container, items })
    }

    /// Sum of all item volumes, saturating at `usize::MAX`.
    pub fn total_item_volume(&self) -> usize {
        self.items
            .iter()
            .fold(0, |acc: usize, item| acc.saturating_add(item.volume))
    }

    /// Returns `false` when the items cannot possibly fit together, based on volume alone.
    pub fn volume_feasible(&self) -> bool {
        self.total_item_volume() <= self.container.volume()
    }
}
