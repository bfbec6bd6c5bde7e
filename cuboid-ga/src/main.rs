use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use cuboid::io::ext_repr::ExtResult;
use cuboid_ga::config::GAConfig;
use cuboid_ga::io;
use cuboid_ga::io::cli::Cli;
use cuboid_ga::io::output::GAOutput;
use cuboid_ga::opt::ga_optimizer::GAOptimizer;
use log::{error, info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let mut config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            GAConfig::default()
        }
        Some(config_file) => io::read_config(&config_file)?,
    };
    if let Some(seed) = args.seed {
        config.prng_seed = Some(seed);
    }

    let input_file_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid input file: {:?}", args.input_file))?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {:?}",
                args.solution_folder
            )
        })?;
    }
    let solution_path = args
        .solution_folder
        .join(format!("sol_{input_file_stem}.json"));

    let ext_job = match io::read_job(args.input_file.as_path()) {
        Ok(ext_job) => ext_job,
        Err(e) => {
            write_error(&e, &solution_path);
            return Err(e);
        }
    };

    let config = config.with_job_overrides(&ext_job.config);
    info!("[MAIN] Successfully parsed GAConfig: {config:?}");

    let instance = match cuboid::io::import::import(&ext_job) {
        Ok(instance) => instance,
        Err(e) => {
            write_error(&e, &solution_path);
            return Err(e);
        }
    };

    let rng = match config.prng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let ga_solution = GAOptimizer::new(instance, config, rng)?.solve()?;

    let output = GAOutput {
        job: ext_job,
        result: cuboid::io::export::export(&ga_solution.solution),
        config,
    };
    io::write_json(&output, Path::new(&solution_path))?;

    Ok(())
}

fn write_error(e: &anyhow::Error, path: &Path) {
    error!("[MAIN] {e:#}");
    if let Err(write_err) = io::write_json(&ExtResult::error(format!("{e:#}")), path) {
        error!("[MAIN] could not write error result: {write_err:#}");
    }
}

