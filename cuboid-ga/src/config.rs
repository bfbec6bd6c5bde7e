use anyhow::{Result, ensure};
use cuboid::io::ext_repr::ExtJobConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the genetic algorithm optimizer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GAConfig {
    /// Seed for the PRNG. If undefined, the algorithm will run in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
    /// Number of arrangements in every generation
    pub population_size: usize,
    /// Maximum number of generations
    pub generations: usize,
    /// Fraction of the population carried over unchanged to the next generation (at least one individual)
    pub elite_fraction: f64,
    /// Number of individuals competing in a tournament selection
    pub tournament_size: usize,
    /// Probability of producing a child by crossover instead of copying a parent
    pub crossover_rate: f64,
    /// Probability of mutating a child while the search is not stagnating
    pub base_mutation_rate: f64,
    /// Increase of the mutation probability per stagnating generation
    pub stagnation_mutation_step: f64,
    /// Minimum improvement (in percentage points) of the best utilization for a generation not to count as stagnating
    pub stagnation_threshold: f64,
    /// Number of consecutive stagnating generations after which the search stops
    pub stagnation_limit: usize,
    /// Utilization (in percent) above which a solution is considered complete and the search stops
    pub completion_threshold: f64,
    /// Optional wall clock budget for the entire search, checked between generations
    pub time_limit_ms: Option<u64>,
    pub init_weights: InitWeights,
    pub mutation: MutationConfig,
}

/// Relative weights of the strategies used to order the items of the initial population
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct InitWeights {
    /// Uniformly random order
    pub random: f64,
    /// Descending volume
    pub volume_desc: f64,
    /// Descending volume, perturbed by a number of random swaps
    pub perturbed_volume_desc: f64,
}

/// Probabilities of the independent mutation operators
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MutationConfig {
    /// Exchange two genes
    pub swap_rate: f64,
    /// Reorient one gene
    pub orientation_rate: f64,
    /// Reverse a short segment of genes
    pub reversal_rate: f64,
}

impl Default for GAConfig {
    fn default() -> Self {
        Self {
            prng_seed: Some(0),
            population_size: 30,
            generations: 50,
            elite_fraction: 0.1,
            tournament_size: 3,
            crossover_rate: 0.7,
            base_mutation_rate: 0.2,
            stagnation_mutation_step: 0.05,
            stagnation_threshold: 0.1,
            stagnation_limit: 10,
            completion_threshold: 99.9,
            time_limit_ms: None,
            init_weights: InitWeights::default(),
            mutation: MutationConfig::default(),
        }
    }
}

impl Default for InitWeights {
    fn default() -> Self {
        Self {
            random: 0.3,
            volume_desc: 0.4,
            perturbed_volume_desc: 0.3,
        }
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            swap_rate: 0.3,
            orientation_rate: 0.3,
            reversal_rate: 0.2,
        }
    }
}

impl GAConfig {
    /// Applies the run parameters of a job, fields the job leaves undefined keep their current value.
    pub fn with_job_overrides(mut self, job_config: &ExtJobConfig) -> Self {
        if let Some(population_size) = job_config.population_size {
            self.population_size = population_size;
        }
        if let Some(generations) = job_config.generations {
            self.generations = generations;
        }
        self
    }

    /// Number of individuals carried over unchanged into the next generation.
    pub fn n_elites(&self) -> usize {
        let n = (self.population_size as f64 * self.elite_fraction) as usize;
        n.clamp(1, self.population_size.max(1))
    }

    /// Probability of mutating a child after `stagnation` stagnating generations, capped at 1.
    pub fn mutation_rate(&self, stagnation: usize) -> f64 {
        (self.base_mutation_rate + stagnation as f64 * self.stagnation_mutation_step).clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.population_size > 0, "population size should be positive");
        ensure!(self.generations > 0, "number of generations should be positive");
        ensure!(self.tournament_size > 0, "tournament size should be positive");
        ensure!(
            (0.0..=1.0).contains(&self.elite_fraction),
            "elite fraction should be in [0, 1], got {}",
            self.elite_fraction
        );
        for (name, p) in [
            ("crossover rate", self.crossover_rate),
            ("base mutation rate", self.base_mutation_rate),
            ("swap rate", self.mutation.swap_rate),
            ("orientation rate", self.mutation.orientation_rate),
            ("reversal rate", self.mutation.reversal_rate),
        ] {
            ensure!((0.0..=1.0).contains(&p), "{name} should be in [0, 1], got {p}");
        }
        ensure!(
            self.stagnation_mutation_step >= 0.0,
            "stagnation mutation step should be non-negative"
        );
        Ok(())
    }
}
