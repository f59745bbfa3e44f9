//! CLI entry point for the maze generator.
//!
//! Usage:
//!   mazegen generate <config.txt> [options]
//!   mazegen verify <maze.txt>
//!
//! Options for `generate`:
//!   --seed <n>            Override the SEED key of the config file
//!   --algorithm <name>    dfs, prim or kruskal
//!   --no-pattern          Do not place the decorative 42 pattern
//!   --output <path>       Override OUTPUT_FILE
//!   --step-every <n>      Stride for traced step events (default: 1)
//!   --trace               Log step events at trace level
//!
//! Logging goes through env_logger; RUST_LOG wins over --verbose.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{info, trace};
use serde::Serialize;

use mazegen::{
    Algorithm, Coord, ExportDocument, ExportSections, MazeConfig, MazeGenerator, MazeStep,
    StepObserver,
};

#[derive(Parser)]
#[command(name = "mazegen")]
#[command(about = "Generate, solve and verify seeded grid mazes")]
#[command(version)]
struct Cli {
    /// Log at debug level when RUST_LOG is not set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a maze from a config file and write the export file
    Generate {
        /// Path to the KEY=VALUE config file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Random seed (overrides SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Carving algorithm (overrides ALGORITHM)
        #[arg(long)]
        algorithm: Option<Algorithm>,

        /// Skip the decorative pattern
        #[arg(long)]
        no_pattern: bool,

        /// Export file path (overrides OUTPUT_FILE)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Dispatch every n-th carve/backtrack/loop event
        #[arg(long, default_value = "1")]
        step_every: usize,

        /// Log generation steps at trace level
        #[arg(long)]
        trace: bool,
    },
    /// Check that an export file is well formed and its path is valid
    Verify {
        /// Path to an export file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Summary printed after a successful generation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOutput {
    width: usize,
    height: usize,
    entry: Coord,
    exit: Coord,
    perfect: bool,
    seed: Option<u64>,
    algorithm: Algorithm,
    pattern_used: bool,
    closed_cells: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    loops_added: Option<usize>,
    warnings: Vec<String>,
    path_length: usize,
    output_file: PathBuf,
}

/// Verdict printed by `verify`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path_length: Option<usize>,
}

struct GenerateArgs {
    config: PathBuf,
    seed: Option<u64>,
    algorithm: Option<Algorithm>,
    no_pattern: bool,
    output: Option<PathBuf>,
    step_every: usize,
    trace: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Generate {
            config,
            seed,
            algorithm,
            no_pattern,
            output,
            step_every,
            trace,
        } => {
            let args = GenerateArgs {
                config,
                seed,
                algorithm,
                no_pattern,
                output,
                step_every,
                trace,
            };
            match run_generate(args) {
                Ok(output) => {
                    print_json(&output);
                    std::process::exit(0);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Verify { file } => {
            let output = run_verify(&file);
            print_json(&output);

            // Exit with appropriate code
            if output.valid {
                std::process::exit(0);
            } else {
                std::process::exit(1);
            }
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<GenerateOutput, Box<dyn Error>> {
    let mut config = MazeConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if args.no_pattern {
        config.include_pattern = false;
    }
    if let Some(output) = args.output {
        config.output_file = output;
    }

    let mut generator = MazeGenerator::new(config.generator_config())?;

    let mut log_step = |step: &MazeStep| trace!("{}", step);
    let observer: Option<StepObserver<'_>> = if args.trace {
        Some(&mut log_step)
    } else {
        None
    };
    let maze = generator.generate_observed(observer, args.step_every)?;
    let path = generator.solve(&maze)?;

    let sections = ExportSections::with_path(&maze, &path);
    fs::write(&config.output_file, sections.to_string())?;
    info!(
        "wrote {}x{} maze to {}",
        maze.width(),
        maze.height(),
        config.output_file.display()
    );

    Ok(GenerateOutput {
        width: maze.width(),
        height: maze.height(),
        entry: maze.entry(),
        exit: maze.exit(),
        perfect: config.perfect,
        seed: config.seed,
        algorithm: config.algorithm,
        pattern_used: generator.used_pattern(),
        closed_cells: maze.closed().len(),
        loops_added: generator.last_loops().map(|r| r.opened),
        warnings: generator.last_warnings().to_vec(),
        path_length: path.len(),
        output_file: config.output_file,
    })
}

fn run_verify(file: &Path) -> VerifyOutput {
    let invalid = |reason: String| VerifyOutput {
        valid: false,
        reason: Some(reason),
        width: None,
        height: None,
        path_length: None,
    };

    let text = match fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => return invalid(format!("cannot read {}: {}", file.display(), e)),
    };
    let document = match ExportDocument::parse(&text) {
        Ok(d) => d,
        Err(e) => return invalid(e.to_string()),
    };

    let verdict = document.verify();
    VerifyOutput {
        valid: verdict.is_ok(),
        reason: verdict.err().map(|e| e.to_string()),
        width: Some(document.grid.width()),
        height: Some(document.grid.height()),
        path_length: Some(document.path.len()),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: cannot encode output: {}", e);
            std::process::exit(1);
        }
    }
}
