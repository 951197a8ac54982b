//! assocmem CLI - Hopfield associative memory simulator
//!
//! ## Commands
//!
//! - `assocmem recall <IMAGE> [P] [M0]` - recall an image from a corrupted copy
//! - `assocmem scan-m0` - sweep the initial overlap on one random network
//! - `assocmem scan-p` - sweep the number of stored patterns

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;

use crate::cli::commands::*;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "assocmem")]
#[command(about = "Classical Hopfield associative memory simulator", long_about = None)]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Disable colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an image and recall it from a corrupted copy
    Recall {
        /// Target image (any format the image crate reads; pixel 255 is +1)
        image: PathBuf,

        /// Number of stored patterns, the target included [default: 1]
        patterns: Option<usize>,

        /// Initial overlap of the corrupted state, in [-1, 1] [default: 1.0]
        #[arg(allow_negative_numbers = true)]
        m0: Option<f64>,

        /// Convergence tolerance on the overlap [default: 1e-4]
        #[arg(long)]
        delta_m: Option<f64>,

        /// Maximum number of synchronous updates
        #[arg(long)]
        max_steps: Option<usize>,

        /// Random seed for interference patterns and corruption
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write one PNG per step; defaults to <stem>_P_<p>_M0_<m0>/
        #[arg(long, num_args = 0..=1)]
        frames: Option<Option<PathBuf>>,

        /// Frame size as WIDTHxHEIGHT
        #[arg(long)]
        frame_size: Option<String>,

        /// Write the overlap series as CSV
        #[arg(long)]
        overlaps: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Sweep the initial overlap on one memorized random network
    ScanM0 {
        /// Number of units
        #[arg(short, long, default_value = "1000")]
        neurons: usize,

        /// Number of stored patterns [default: 100]
        #[arg(short, long)]
        patterns: Option<usize>,

        /// First m0
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        from: f64,

        /// End of the m0 range, excluded
        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        to: f64,

        /// m0 increment
        #[arg(long, default_value = "0.1")]
        step: f64,

        /// Convergence tolerance on the overlap [default: 1e-3]
        #[arg(long)]
        delta_m: Option<f64>,

        /// Maximum number of synchronous updates per recall
        #[arg(long)]
        max_steps: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write all series as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sweep the number of stored patterns, one fresh network per value
    ScanP {
        /// Number of units
        #[arg(short, long, default_value = "1000")]
        neurons: usize,

        /// Initial overlap of every recall [default: 1.0]
        #[arg(long, allow_negative_numbers = true)]
        m0: Option<f64>,

        /// First pattern count
        #[arg(long, default_value = "100")]
        from: usize,

        /// End of the pattern count range, excluded
        #[arg(long, default_value = "300")]
        to: usize,

        /// Pattern count increment
        #[arg(long, default_value = "30")]
        step: usize,

        /// Convergence tolerance on the overlap [default: 1e-5]
        #[arg(long)]
        delta_m: Option<f64>,

        /// Maximum number of synchronous updates per recall
        #[arg(long)]
        max_steps: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write all series as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --debug
    let default_filter = if cli.debug {
        "assocmem=debug,assocmem_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Disable colors if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = Config::load(cli.config).and_then(|config| match cli.command {
        Commands::Recall {
            image,
            patterns,
            m0,
            delta_m,
            max_steps,
            seed,
            frames,
            frame_size,
            overlaps,
            format,
        } => run_recall(
            &RecallArgs {
                image,
                patterns,
                m0,
                delta_m,
                max_steps,
                seed,
                frames,
                frame_size,
                overlaps,
                format,
            },
            &config,
        ),
        Commands::ScanM0 {
            neurons,
            patterns,
            from,
            to,
            step,
            delta_m,
            max_steps,
            seed,
            output,
        } => run_scan_m0(
            &ScanM0Args {
                neurons,
                patterns,
                from,
                to,
                step,
                delta_m,
                max_steps,
                seed,
                output,
            },
            &config,
        ),
        Commands::ScanP {
            neurons,
            m0,
            from,
            to,
            step,
            delta_m,
            max_steps,
            seed,
            output,
        } => run_scan_p(
            &ScanPArgs {
                neurons,
                m0,
                from,
                to,
                step,
                delta_m,
                max_steps,
                seed,
                output,
            },
            &config,
        ),
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{}", cli::format::format_error(&format!("{:#}", e)));
        if cli.debug {
            eprintln!("\n{:#?}", e);
        } else {
            eprintln!("\n{}", "Run with --debug for more details".dimmed());
        }
        std::process::exit(1);
    }

    Ok(())
}
