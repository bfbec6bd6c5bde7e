use std::cmp::Reverse;
use std::time::{Duration, Instant};

use anyhow::Result;
use cuboid::entities::{Instance, Solution};
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use rand::Rng;
use rand::prelude::SmallRng;
use rayon::prelude::*;
use thousands::Separable;

use crate::config::GAConfig;
use crate::opt::arrangement::Arrangement;
use crate::opt::evaluator::evaluate;
use crate::opt::operators::{Individual, mutate, order_crossover, tournament_select};
use crate::opt::population::PopulationInitializer;

/// Genetic algorithm optimizer for packing a single container.
pub struct GAOptimizer {
    pub instance: Instance,
    pub config: GAConfig,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    pub rng: SmallRng,
}

/// Reason the search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Best utilization exceeded the completion threshold
    Complete,
    /// Best utilization did not improve enough for too many consecutive generations
    Stagnation,
    /// All generations were executed
    GenerationBudget,
    /// The wall clock budget was exhausted
    TimeLimit,
}

/// Best solution found during a run of the [`GAOptimizer`], together with some statistics of the run.
#[derive(Debug, Clone)]
pub struct GASolution {
    pub solution: Solution,
    /// Generation (zero-based) in which the solution was first found
    pub generation_found: usize,
    /// Number of generations that were evaluated
    pub n_generations: usize,
    pub n_evaluations: usize,
    pub termination: Termination,
    /// Best utilization at the end of every generation
    pub history: Vec<f64>,
}

/// Counts consecutive generations in which the best utilization stayed within `threshold` of a baseline.
/// The baseline starts at zero and moves to the best utilization whenever it escapes the threshold.
#[derive(Debug, Clone, Copy)]
pub struct StagnationTracker {
    threshold: f64,
    baseline: f64,
    count: usize,
}

impl StagnationTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            baseline: 0.0,
            count: 0,
        }
    }

    /// Registers the best utilization at the end of a generation, returns the number of consecutive stagnating generations.
    pub fn update(&mut self, best: f64) -> usize {
        if (best - self.baseline).abs() < self.threshold {
            self.count += 1;
        } else {
            self.count = 0;
            self.baseline = best;
        }
        self.count
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl GAOptimizer {
    pub fn new(instance: Instance, config: GAConfig, rng: SmallRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            instance,
            config,
            rng,
        })
    }

    pub fn solve(&mut self) -> Result<GASolution> {
        let start = Instant::now();
        let config = self.config;
        let deadline = config
            .time_limit_ms
            .map(|ms| start + Duration::from_millis(ms));
        let container = self.instance.container;
        let initializer = PopulationInitializer::new(&self.instance, config.init_weights)?;
        let rng = &mut self.rng;

        if !self.instance.volume_feasible() {
            warn!(
                "[GA] total item volume ({}) exceeds the container volume ({}), no arrangement can be placed",
                self.instance.total_item_volume().separate_with_commas(),
                container.volume().separate_with_commas()
            );
        }

        info!(
            "[GA] packing {} items in a {}x{}x{} container (population: {}, generations: {})",
            self.instance.items.len(),
            container.width,
            container.height,
            container.depth,
            config.population_size,
            config.generations
        );

        let mut population = initializer.initialize(config.population_size, rng);

        let mut best = Solution::empty();
        let mut generation_found = 0;
        let mut history = vec![];
        let mut n_evaluations = 0;
        let mut stagnation = StagnationTracker::new(config.stagnation_threshold);
        let mut termination = Termination::GenerationBudget;

        for generation in 0..config.generations {
            let mut scored = population
                .into_par_iter()
                .map(|arrangement| {
                    let evaluation = evaluate(container, &arrangement);
                    Individual {
                        arrangement,
                        evaluation,
                    }
                })
                .collect::<Vec<_>>();
            n_evaluations += scored.len();

            if update_best(&mut best, &scored) {
                generation_found = generation;
                info!(
                    "[GA] gen {generation}: new best utilization: {:.2}% ({} placements)",
                    best.utilization,
                    best.placements.len()
                );
            }
            scored.sort_by_key(|individual| Reverse(OrderedFloat(individual.utilization())));
            history.push(best.utilization);

            debug!(
                "[GA] gen {generation}: best {:.3}%, generation best {:.3}%, stagnation {}",
                best.utilization,
                scored[0].utilization(),
                stagnation.count()
            );
            if generation % 5 == 0 {
                info!(
                    "[GA] gen {generation}: best {:.2}%, elapsed {:.3}ms",
                    best.utilization,
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }

            if best.utilization > config.completion_threshold {
                termination = Termination::Complete;
                break;
            }

            if stagnation.update(best.utilization) >= config.stagnation_limit {
                termination = Termination::Stagnation;
                break;
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                termination = Termination::TimeLimit;
                break;
            }

            if generation + 1 == config.generations {
                break;
            }

            population = reproduce(&scored, &config, stagnation.count(), rng);
        }

        let ga_solution = GASolution {
            solution: best,
            generation_found,
            n_generations: history.len(),
            n_evaluations,
            termination,
            history,
        };

        info!(
            "[GA] optimization finished in {:.3}ms after {} generations ({} evaluations, {:?})",
            start.elapsed().as_secs_f64() * 1000.0,
            ga_solution.n_generations,
            ga_solution.n_evaluations.separate_with_commas(),
            ga_solution.termination
        );
        info!(
            "[GA] solution contains {}/{} items with a utilization of {:.3}% (found in gen {})",
            ga_solution.solution.placements.len(),
            self.instance.items.len(),
            ga_solution.solution.utilization,
            ga_solution.generation_found
        );

        Ok(ga_solution)
    }
}

/// Replaces `best` with the evaluation of the first individual, in population order, that strictly exceeds it.
/// Individuals tying with the best so far never replace it. Returns whether `best` changed.
pub fn update_best(best: &mut Solution, population: &[Individual]) -> bool {
    let mut improved = false;
    for individual in population {
        if individual.utilization() > best.utilization {
            *best = individual.evaluation.clone();
            improved = true;
        }
    }
    improved
}

/// Builds the next generation from a population sorted by descending utilization.
///
/// The elites are carried over unchanged, the rest are children of two tournament-selected parents.
/// Every child is an owned arrangement, mutating it never affects its parents.
pub fn reproduce<'a>(
    sorted: &[Individual<'a>],
    config: &GAConfig,
    stagnation: usize,
    rng: &mut impl Rng,
) -> Vec<Arrangement<'a>> {
    let n_elites = config.n_elites().min(sorted.len());
    let mutation_rate = config.mutation_rate(stagnation);

    let mut next = sorted[..n_elites]
        .iter()
        .map(|individual| individual.arrangement.clone())
        .collect::<Vec<_>>();

    while next.len() < config.population_size {
        let parent1 = &tournament_select(sorted, config.tournament_size, rng).arrangement;
        let parent2 = &tournament_select(sorted, config.tournament_size, rng).arrangement;

        let mut child = match rng.random_bool(config.crossover_rate) {
            true => order_crossover(parent1, parent2, rng),
            false => match rng.random_bool(0.5) {
                true => parent1.clone(),
                false => parent2.clone(),
            },
        };
        if rng.random_bool(mutation_rate) {
            mutate(&mut child, &config.mutation, rng);
        }
        next.push(child);
    }
    next
}
