use std::sync::LazyLock;
use std::time::Instant;

use anyhow::Result;
use cuboid::io::ext_repr::{ExtJob, ExtResult};
use rand::prelude::SmallRng;

use crate::config::GAConfig;
use crate::opt::ga_optimizer::GAOptimizer;

pub mod config;
pub mod io;
pub mod opt;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Imports `ext_job`, searches a packing and exports the best one found.
/// Run parameters defined in the job take precedence over those in `config`.
pub fn optimize(ext_job: &ExtJob, config: GAConfig, rng: SmallRng) -> Result<ExtResult> {
    let config = config.with_job_overrides(&ext_job.config);
    let instance = cuboid::io::import::import(ext_job)?;
    let ga_solution = GAOptimizer::new(instance, config, rng)?.solve()?;
    Ok(cuboid::io::export::export(&ga_solution.solution))
}
