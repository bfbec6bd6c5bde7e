use std::collections::HashSet;

use cuboid::entities::Solution;
use rand::Rng;

use crate::config::MutationConfig;
use crate::opt::arrangement::{Arrangement, Gene};
use crate::opt::population::random_orientation;

/// An arrangement together with the result of its evaluation
#[derive(Clone, Debug)]
pub struct Individual<'a> {
    pub arrangement: Arrangement<'a>,
    pub evaluation: Solution,
}

impl Individual<'_> {
    pub fn utilization(&self) -> f64 {
        self.evaluation.utilization
    }
}

/// Samples `tournament_size` distinct individuals and returns the one with the highest utilization.
/// Ties go to the individual sampled first. Tournaments larger than the population are clamped to it.
///
/// # Panics
/// If `population` is empty, [`GAConfig::validate`](crate::config::GAConfig::validate) rules this out for the optimizer.
pub fn tournament_select<'p, 'a>(
    population: &'p [Individual<'a>],
    tournament_size: usize,
    rng: &mut impl Rng,
) -> &'p Individual<'a> {
    debug_assert!(!population.is_empty());
    let amount = tournament_size.clamp(1, population.len());
    let contestants = rand::seq::index::sample(rng, population.len(), amount);

    let mut winner = &population[contestants.index(0)];
    for i in contestants.iter().skip(1) {
        if population[i].utilization() > winner.utilization() {
            winner = &population[i];
        }
    }
    winner
}

/// Order-based crossover.
///
/// A random segment `[start, end)` of `parent1` is kept verbatim (orientations included).
/// The other items follow the relative order and orientations of `parent2`: the first `start` of them
/// before the segment, the rest after it.
pub fn order_crossover<'a>(
    parent1: &Arrangement<'a>,
    parent2: &Arrangement<'a>,
    rng: &mut impl Rng,
) -> Arrangement<'a> {
    let n = parent1.len();
    if n == 0 {
        return parent1.clone();
    }
    let start = rng.random_range(0..n);
    let end = rng.random_range(start + 1..=n);
    let segment = &parent1.genes[start..end];

    let segment_ids = segment.iter().map(|g| g.item.id).collect::<HashSet<u64>>();
    let remaining = parent2
        .genes
        .iter()
        .filter(|g| !segment_ids.contains(&g.item.id))
        .copied()
        .collect::<Vec<Gene>>();
    let split = start.min(remaining.len());

    let mut genes = Vec::with_capacity(n);
    genes.extend_from_slice(&remaining[..split]);
    genes.extend_from_slice(segment);
    genes.extend_from_slice(&remaining[split..]);

    debug_assert!(genes.len() == n);

    Arrangement::new(genes)
}

/// Applies the swap, orientation and segment reversal mutations, each independently with its own probability.
pub fn mutate(arrangement: &mut Arrangement, config: &MutationConfig, rng: &mut impl Rng) {
    let n = arrangement.len();

    if rng.random_bool(config.swap_rate) && n >= 2 {
        let pair = rand::seq::index::sample(rng, n, 2);
        arrangement.genes.swap(pair.index(0), pair.index(1));
    }

    if rng.random_bool(config.orientation_rate) && n >= 1 {
        let gene = &mut arrangement.genes[rng.random_range(0..n)];
        gene.orientation = random_orientation(gene.item, rng);
    }

    if rng.random_bool(config.reversal_rate) && n > 3 {
        let start = rng.random_range(0..=n - 3);
        let end = rng.random_range(start + 2..=usize::min(n, start + 5));
        arrangement.genes[start..end].reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuboid::entities::{Item, Orientation, Placement};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use rand::seq::SliceRandom;

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(i as u64, Orientation::new(1 + i % 3, 2, 1 + i % 2)).unwrap())
            .collect()
    }

    fn arrangement<'a>(items: &'a [Item], rng: &mut impl Rng) -> Arrangement<'a> {
        let mut genes = items
            .iter()
            .map(|i| Gene::new(i, random_orientation(i, rng)))
            .collect_vec();
        genes.shuffle(rng);
        Arrangement::new(genes)
    }

    fn individual<'a>(arrangement: Arrangement<'a>, utilization: f64) -> Individual<'a> {
        Individual {
            arrangement,
            evaluation: Solution {
                utilization,
                placements: vec![Placement::new(0, (0, 0, 0), Orientation::new(1, 1, 1))],
                fully_placed: false,
            },
        }
    }

    #[test]
    fn crossover_preserves_items() {
        let items = items(12);
        let mut rng = SmallRng::seed_from_u64(0);

        for _ in 0..200 {
            let p1 = arrangement(&items, &mut rng);
            let p2 = arrangement(&items, &mut rng);
            let child = order_crossover(&p1, &p2, &mut rng);

            assert_eq!(child.len(), p1.len());
            assert_eq!(child.item_ids().sorted().collect_vec(), (0..12).collect_vec());
        }
    }

    #[test]
    fn crossover_keeps_a_segment_of_parent1_and_the_order_of_parent2() {
        let items = items(8);
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..100 {
            let p1 = arrangement(&items, &mut rng);
            let p2 = arrangement(&items, &mut rng);
            let child = order_crossover(&p1, &p2, &mut rng);

            // the genes taken from parent2 keep their relative order and orientation
            let from_p1 = |g: &Gene| {
                p1.genes
                    .iter()
                    .position(|pg| pg.item.id == g.item.id)
                    .zip(child.genes.iter().position(|cg| cg.item.id == g.item.id))
                    .is_some_and(|(i, j)| i == j && p1.genes[i].orientation == g.orientation)
            };
            let from_p2 = child
                .genes
                .iter()
                .filter(|g| !from_p1(g))
                .map(|g| g.item.id)
                .collect_vec();
            let p2_order = p2
                .genes
                .iter()
                .map(|g| g.item.id)
                .filter(|id| from_p2.contains(id))
                .collect_vec();
            assert_eq!(from_p2, p2_order);

            for g in child.genes.iter().filter(|g| !from_p1(g)) {
                let in_p2 = p2.genes.iter().find(|pg| pg.item.id == g.item.id).unwrap();
                assert_eq!(in_p2.orientation, g.orientation);
            }
        }
    }

    #[test]
    fn crossover_of_single_gene() {
        let items = items(1);
        let mut rng = SmallRng::seed_from_u64(2);
        let p1 = arrangement(&items, &mut rng);
        let p2 = arrangement(&items, &mut rng);

        let child = order_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.item_ids().collect_vec(), vec![0]);
        assert_eq!(child.genes[0].orientation, p1.genes[0].orientation);
    }

    #[test]
    fn mutation_preserves_items() {
        let items = items(10);
        let mut rng = SmallRng::seed_from_u64(3);
        let config = MutationConfig {
            swap_rate: 1.0,
            orientation_rate: 1.0,
            reversal_rate: 1.0,
        };

        let mut arr = arrangement(&items, &mut rng);
        for _ in 0..200 {
            mutate(&mut arr, &config, &mut rng);
            assert_eq!(arr.len(), 10);
            assert_eq!(arr.item_ids().sorted().collect_vec(), (0..10).collect_vec());
            assert!(arr.genes.iter().all(|g| g.item.orientations.contains(&g.orientation)));
        }
    }

    #[test]
    fn mutation_of_short_arrangements() {
        let config = MutationConfig {
            swap_rate: 1.0,
            orientation_rate: 1.0,
            reversal_rate: 1.0,
        };
        let mut rng = SmallRng::seed_from_u64(4);
        for n in 0..4 {
            let items = items(n);
            let mut arr = arrangement(&items, &mut rng);
            mutate(&mut arr, &config, &mut rng);
            assert_eq!(arr.len(), n);
        }
    }

    #[test]
    fn disabled_mutation_changes_nothing() {
        let items = items(6);
        let mut rng = SmallRng::seed_from_u64(5);
        let config = MutationConfig {
            swap_rate: 0.0,
            orientation_rate: 0.0,
            reversal_rate: 0.0,
        };
        let original = arrangement(&items, &mut rng);
        let mut arr = original.clone();
        mutate(&mut arr, &config, &mut rng);
        assert_eq!(arr.to_string(), original.to_string());
    }

    #[test]
    fn mutating_a_copy_leaves_the_original_intact() {
        let items = items(6);
        let mut rng = SmallRng::seed_from_u64(6);
        let config = MutationConfig {
            swap_rate: 1.0,
            orientation_rate: 1.0,
            reversal_rate: 1.0,
        };
        let original = arrangement(&items, &mut rng);
        let snapshot = original.to_string();

        let mut copy = original.clone();
        for _ in 0..10 {
            mutate(&mut copy, &config, &mut rng);
        }
        assert_eq!(original.to_string(), snapshot);
    }

    #[test]
    fn tournament_picks_best_of_full_population() {
        let items = items(3);
        let mut rng = SmallRng::seed_from_u64(7);
        let population = [10.0, 70.0, 40.0]
            .into_iter()
            .map(|u| individual(arrangement(&items, &mut rng), u))
            .collect_vec();

        // a tournament as large as the population always contains the best individual
        for _ in 0..20 {
            let winner = tournament_select(&population, 3, &mut rng);
            assert_eq!(winner.utilization(), 70.0);
        }
        // oversized tournaments are clamped
        let winner = tournament_select(&population, 10, &mut rng);
        assert_eq!(winner.utilization(), 70.0);
    }

    #[test]
    #[should_panic]
    fn tournament_on_empty_population_panics() {
        let empty: Vec<Individual> = vec![];
        tournament_select(&empty, 3, &mut SmallRng::seed_from_u64(9));
    }

    #[test]
    fn single_contestant_tournament() {
        let items = items(2);
        let mut rng = SmallRng::seed_from_u64(10);
        let population = vec![individual(arrangement(&items, &mut rng), 12.0)];
        assert_eq!(tournament_select(&population, 1, &mut rng).utilization(), 12.0);
        assert_eq!(tournament_select(&population, 5, &mut rng).utilization(), 12.0);
    }

    #[test]
    fn tournament_never_picks_the_worst() {
        let items = items(3);
        let mut rng = SmallRng::seed_from_u64(8);
        let population = [5.0, 15.0, 25.0, 35.0, 45.0]
            .into_iter()
            .map(|u| individual(arrangement(&items, &mut rng), u))
            .collect_vec();

        for _ in 0..100 {
            // sampling without replacement: the winner beats at least two others
            let winner = tournament_select(&population, 3, &mut rng);
            assert!(winner.utilization() >= 25.0);
        }
    }
}
