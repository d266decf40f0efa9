//! Command line driver for the Barnes-Hut N-body simulator.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use clap::Parser;

use barnes_hut_sim::config::{Evaluator, InitialConditions, RunConfig};
use barnes_hut_sim::{CsvTraceSink, Simulation};

/// N-body gravity simulation driven by the all-pairs or Barnes-Hut evaluator.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file; CLI flags below override it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Number of bodies to simulate (ignored for twin-galaxy, which is sized by --n-per-galaxy).
    #[arg(short = 'n', long, value_name = "COUNT")]
    bodies: Option<usize>,

    /// Number of steps to advance.
    #[arg(long, value_name = "COUNT")]
    steps: Option<u64>,

    /// Integration timestep.
    #[arg(long, value_name = "DT")]
    dt: Option<f64>,

    /// Gravitational constant.
    #[arg(short = 'g', long, value_name = "VALUE")]
    gravity: Option<f64>,

    /// Barnes-Hut multipole acceptance parameter.
    #[arg(long, value_name = "THETA")]
    theta: Option<f64>,

    /// Force evaluator to use.
    #[arg(short, long, value_enum, value_name = "EVALUATOR")]
    evaluator: Option<EvaluatorArg>,

    /// Initial-conditions shape.
    #[arg(long, value_enum, value_name = "SHAPE")]
    shape: Option<ShapeArg>,

    /// Random seed for body generation.
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Path to write the trace file; omit to discard the trace.
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum EvaluatorArg {
    Naive,
    BarnesHut,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ShapeArg {
    Uniform,
    TwinGalaxy,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("loading configuration from {path}");
            RunConfig::load_or_default(path)
        }
        None => RunConfig::default(),
    };

    apply_overrides(&mut config, &args);
    config.validate()?;

    tracing::info!(
        bodies = config.body_count,
        steps = config.steps,
        evaluator = ?config.evaluator,
        "starting simulation"
    );

    let bodies = generate_bodies(&config);

    let mut sim = Simulation::new(bodies, config.gravitational_constant, config.dt)?;

    if let Some(path) = &config.output_path {
        let file = File::create(path)?;
        sim = sim.with_trace_sink(Box::new(CsvTraceSink::new(BufWriter::new(file))));
    }

    let bh_config = config.bh_config();

    for step in 0..config.steps {
        match config.evaluator {
            Evaluator::Naive => sim.step_naive()?,
            Evaluator::BarnesHut => sim.step_barnes_hut(&bh_config)?,
        }

        if step % 1000 == 0 {
            tracing::debug!(step, "advanced simulation");
        }
    }

    tracing::info!(steps_completed = sim.step_count(), "simulation finished");
    Ok(())
}

fn apply_overrides(config: &mut RunConfig, args: &Args) {
    if let Some(n) = args.bodies {
        config.body_count = n;
    }
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if let Some(g) = args.gravity {
        config.gravitational_constant = g;
    }
    if let Some(theta) = args.theta {
        config.θ = theta;
    }
    if let Some(evaluator) = args.evaluator {
        config.evaluator = match evaluator {
            EvaluatorArg::Naive => Evaluator::Naive,
            EvaluatorArg::BarnesHut => Evaluator::BarnesHut,
        };
    }
    if let Some(shape) = args.shape {
        config.initial_conditions = match shape {
            ShapeArg::Uniform => InitialConditions::Uniform {
                mass_min: 1.,
                mass_max: 10.,
                position_range: 50.,
                velocity_range: 1.,
            },
            ShapeArg::TwinGalaxy => InitialConditions::TwinGalaxy {
                n_per_galaxy: config.body_count / 2,
                center_offset: 20.,
                mass_min: 0.1,
                mass_max: 0.5,
                position_spread: 30.,
                central_mass: 1000.,
            },
        };
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(output) = &args.output {
        config.output_path = Some(output.clone());
    }
}

fn generate_bodies(config: &RunConfig) -> Vec<barnes_hut_sim::Body> {
    use barnes_hut_sim::init::{twin_galaxies, uniform_random};

    match config.initial_conditions {
        InitialConditions::Uniform {
            mass_min,
            mass_max,
            position_range,
            velocity_range,
        } => uniform_random(
            config.body_count,
            mass_min,
            mass_max,
            position_range,
            velocity_range,
            config.seed,
        ),
        InitialConditions::TwinGalaxy {
            n_per_galaxy,
            center_offset,
            mass_min,
            mass_max,
            position_spread,
            central_mass,
        } => twin_galaxies(
            n_per_galaxy,
            center_offset,
            mass_min,
            mass_max,
            position_spread,
            central_mass,
            config.seed,
        ),
    }
}
