use std::{ fs, path::PathBuf, time::Instant };
use anyhow::Context;
use clap::Parser;
use log::{ info, LevelFilter };
use serde::{ Deserialize, Serialize };
use simple_logger::SimpleLogger;
use tbchain::{
    lattice::LatticeParameters,
    timedep::{ GridPolicy, Simulator, TimeGrid },
    utils::total_probability,
};

// time a localized particle spreading over a homogeneous chain for a series of
// worker counts

/// Benchmark configuration, read from YAML.
///
/// ```yaml
/// sites: 100
/// onsite: 0.5
/// hopping: 1.0
/// t_start: 0.0
/// t_end: 25.0
/// samples: 200
/// workers: [1, 2, 4, 8]
/// strict_grid: true
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
struct Config {
    sites: usize,
    onsite: f64,
    hopping: f64,
    t_start: f64,
    t_end: f64,
    samples: usize,
    workers: Vec<usize>,
    strict_grid: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites: 100,
            onsite: 0.5,
            hopping: 1.0,
            t_start: 0.0,
            t_end: 25.0,
            samples: 200,
            workers: (1..=12).collect(),
            strict_grid: true,
        }
    }
}

impl Config {
    fn load(path: Option<&PathBuf>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let file = fs::File::open(path)
                    .with_context(|| format!("opening {}", path.display()))?;
                serde_yaml::from_reader(file)
                    .with_context(|| format!("parsing {}", path.display()))
            },
            None => Ok(Self::default()),
        }
    }
}

/// Tight-binding chain RK4 benchmark
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML configuration file; built-in defaults are used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of lattice sites
    #[arg(long)]
    sites: Option<usize>,

    /// Number of time samples
    #[arg(long)]
    samples: Option<usize>,

    /// Comma-separated worker counts to benchmark
    #[arg(long, value_delimiter = ',')]
    workers: Option<Vec<usize>>,

    /// Write a YAML report of timings and the final density here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Debug, Serialize)]
struct Timing {
    workers: usize,
    seconds: f64,
    total_probability: f64,
}

#[derive(Debug, Serialize)]
struct Report {
    config: Config,
    dt: f64,
    timings: Vec<Timing>,
    final_density: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    SimpleLogger::new().with_level(args.log_level).init()?;

    let mut config = Config::load(args.config.as_ref())?;
    if let Some(sites) = args.sites { config.sites = sites; }
    if let Some(samples) = args.samples { config.samples = samples; }
    if let Some(workers) = args.workers { config.workers = workers; }
    info!("{config:?}");

    let lattice
        = LatticeParameters::uniform(config.sites, config.onsite, config.hopping)?;
    let grid
        = if config.strict_grid {
            TimeGrid::linspace(config.t_start, config.t_end, config.samples)?
        } else {
            let times: ndarray::Array1<f64>
                = ndarray::Array1::linspace(
                    config.t_start, config.t_end, config.samples);
            TimeGrid::new(&times, GridPolicy::Lenient)?
        };

    let mut timings: Vec<Timing> = Vec::with_capacity(config.workers.len());
    let mut final_density: Vec<f64> = Vec::new();
    for &workers in config.workers.iter() {
        println!("running with {} worker(s)...", workers);
        let start = Instant::now();
        let sim = Simulator::new(lattice.clone(), workers)?;
        let evo = sim.evolve(&grid)?;
        let seconds = start.elapsed().as_secs_f64();
        let norm = total_probability(&evo.final_state);
        println!("elapsed: {:.4} s; total probability: {:.6}", seconds, norm);
        timings.push(Timing { workers, seconds, total_probability: norm });
        final_density = evo.snapshot(evo.len() - 1).to_vec();
    }

    if let Some(path) = args.output {
        let report = Report { config, dt: grid.dt(), timings, final_density };
        let file = fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_yaml::to_writer(file, &report)?;
        info!("wrote report to {}", path.display());
    }
    Ok(())
}
