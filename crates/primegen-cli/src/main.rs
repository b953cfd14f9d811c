//! primegen binary.
//!
//! # Usage
//!
//! ```bash
//! # Random integer, two 4096-bit probable primes and their product
//! primegen
//!
//! # Smaller, reproducible run with a self-check
//! primegen --bits 512 --seed 7 --verify
//!
//! # Miller-Rabin test vectors from a directory of known primes/composites
//! primegen vectors --input-dir test/ --output tests.json
//!
//! # Test vectors from generated inputs
//! primegen --bits 256 vectors --synthesize 20 --output tests.json
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use primegen_core::{
    DEFAULT_BIT_SIZE, DEFAULT_ROUNDS, Environment, GeneratorConfig, PrimeGenerator, Sample,
    SeededEnv, SystemEnv, TestVectors, VectorInputs,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Large probable prime generator
#[derive(Parser, Debug)]
#[command(name = "primegen")]
#[command(about = "Print a random integer, two probable primes and their product")]
#[command(version)]
struct Args {
    /// Bit size of every generated value
    #[arg(long, global = true, default_value_t = DEFAULT_BIT_SIZE)]
    bits: u64,

    /// Miller-Rabin rounds per candidate
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_ROUNDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    rounds: u32,

    /// Seed for a reproducible run (not for keys)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Give up after this many candidates per prime
    #[arg(long, global = true)]
    max_attempts: Option<u64>,

    /// Re-check sizes, primality and the product before printing
    #[arg(long)]
    verify: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify known primes and composites into Miller-Rabin test vectors
    Vectors {
        /// Directory holding first-primes.json, large-primes.json,
        /// first-composites.json and large-composites.json
        #[arg(long, required_unless_present = "synthesize", conflicts_with = "synthesize")]
        input_dir: Option<PathBuf>,

        /// Generate this many entries per list instead of reading files
        #[arg(long)]
        synthesize: Option<usize>,

        /// Where to write the JSON vectors
        #[arg(short, long, default_value = "tests.json")]
        output: PathBuf,
    },
}

impl Args {
    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            bit_size: self.bits,
            rounds: self.rounds,
            max_attempts: self.max_attempts,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries the report, logs go to stderr
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let result = match args.seed {
        Some(seed) => {
            tracing::warn!("Using seeded RNG ({}) - output is reproducible, not secret", seed);
            run(&args, SeededEnv::with_seed(seed))
        },
        None => run(&args, SystemEnv::new()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(io::stderr(), "error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run<E: Environment>(args: &Args, env: E) -> Result<(), Box<dyn std::error::Error>> {
    let generator = PrimeGenerator::new(env, args.generator_config());

    match &args.command {
        None => {
            tracing::info!("Generating {}-bit sample", args.bits);
            let sample = Sample::draw(&generator)?;

            if args.verify {
                sample.verify(generator.env(), args.rounds)?;
                tracing::info!("Sample verified");
            }

            let mut out = io::stdout().lock();
            for line in sample.lines() {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
        },

        Some(Command::Vectors { input_dir, synthesize, output }) => {
            let inputs = match (input_dir, synthesize) {
                (Some(dir), _) => VectorInputs::load_dir(dir)?,
                (None, Some(count)) => VectorInputs::synthesize(&generator, *count, args.bits)?,
                (None, None) => return Err("either --input-dir or --synthesize is required".into()),
            };

            let vectors = TestVectors::build(generator.env(), &inputs, args.rounds)?;
            vectors.write_to(output)?;
            tracing::info!("Wrote test vectors to {}", output.display());
        },
    }

    Ok(())
}
