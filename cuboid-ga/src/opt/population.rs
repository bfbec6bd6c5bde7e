use anyhow::Result;
use cuboid::entities::{Instance, Item, Orientation};
use itertools::Itertools;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::SliceRandom;
use std::cmp::Reverse;

use crate::config::InitWeights;
use crate::opt::arrangement::{Arrangement, Gene};

/// Strategy used to order the items of an individual in the initial population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStrategy {
    /// Uniformly random permutation
    Random,
    /// Descending volume
    VolumeDesc,
    /// Descending volume with `n / 3` random pairwise swaps
    PerturbedVolumeDesc,
}

const STRATEGIES: [InitStrategy; 3] = [
    InitStrategy::Random,
    InitStrategy::VolumeDesc,
    InitStrategy::PerturbedVolumeDesc,
];

/// Builds the starting population of the genetic algorithm.
pub struct PopulationInitializer<'a> {
    /// Items sorted by descending volume, ties in input order
    volume_sorted: Vec<&'a Item>,
    items: Vec<&'a Item>,
    strategy_distr: WeightedIndex<f64>,
}

impl<'a> PopulationInitializer<'a> {
    pub fn new(instance: &'a Instance, weights: InitWeights) -> Result<Self> {
        let items = instance.items.iter().collect_vec();
        let volume_sorted = items
            .iter()
            .copied()
            .sorted_by_key(|item| Reverse(item.volume))
            .collect_vec();
        let strategy_distr = WeightedIndex::new([
            weights.random,
            weights.volume_desc,
            weights.perturbed_volume_desc,
        ])?;

        Ok(Self {
            volume_sorted,
            items,
            strategy_distr,
        })
    }

    /// Creates `size` independent arrangements, each with a randomly chosen ordering strategy.
    pub fn initialize(&self, size: usize, rng: &mut impl Rng) -> Vec<Arrangement<'a>> {
        (0..size)
            .map(|_| {
                let strategy = STRATEGIES[self.strategy_distr.sample(rng)];
                self.create(strategy, rng)
            })
            .collect()
    }

    /// Orders the items according to `strategy` and assigns every item a uniformly random orientation.
    pub fn create(&self, strategy: InitStrategy, rng: &mut impl Rng) -> Arrangement<'a> {
        let order = match strategy {
            InitStrategy::Random => {
                let mut order = self.items.clone();
                order.shuffle(rng);
                order
            }
            InitStrategy::VolumeDesc => self.volume_sorted.clone(),
            InitStrategy::PerturbedVolumeDesc => {
                let mut order = self.volume_sorted.clone();
                let n = order.len();
                for _ in 0..n / 3 {
                    let pair = rand::seq::index::sample(rng, n, 2);
                    order.swap(pair.index(0), pair.index(1));
                }
                order
            }
        };

        let genes = order
            .into_iter()
            .map(|item| Gene::new(item, random_orientation(item, rng)))
            .collect();

        Arrangement::new(genes)
    }
}

/// Uniformly random orientation out of the item's own set
pub fn random_orientation(item: &Item, rng: &mut impl Rng) -> Orientation {
    item.orientations[rng.random_range(0..item.orientations.len())]
}
