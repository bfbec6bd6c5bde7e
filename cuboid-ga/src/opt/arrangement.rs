use std::fmt::{Display, Formatter};

use cuboid::entities::{Item, Orientation};
use itertools::Itertools;

/// An item together with the orientation in which it will be offered to the container.
#[derive(Clone, Copy, Debug)]
pub struct Gene<'a> {
    pub item: &'a Item,
    pub orientation: Orientation,
}

impl<'a> Gene<'a> {
    pub fn new(item: &'a Item, orientation: Orientation) -> Self {
        debug_assert!(item.orientations.contains(&orientation));
        Gene { item, orientation }
    }
}

/// Ordered sequence of [`Gene`]s: the order in which items are offered to the placement heuristic.
/// This is the individual of the genetic algorithm.
///
/// Every arrangement owns its sequence, cloning it never shares storage with the original.
#[derive(Clone, Debug, Default)]
pub struct Arrangement<'a> {
    pub genes: Vec<Gene<'a>>,
}

impl<'a> Arrangement<'a> {
    pub fn new(genes: Vec<Gene<'a>>) -> Self {
        Arrangement { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn total_item_volume(&self) -> usize {
        self.genes
            .iter()
            .fold(0, |acc: usize, g| acc.saturating_add(g.item.volume))
    }

    pub fn item_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.genes.iter().map(|g| g.item.id)
    }
}

impl Display for Arrangement<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.genes
                .iter()
                .map(|g| format!("{}:{}", g.item.id, g.orientation))
                .join(", ")
        )
    }
}
