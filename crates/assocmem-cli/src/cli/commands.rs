//! Command implementations

use crate::cli::format::*;
use crate::config::Config;
use anyhow::{Context, Result};
use assocmem_core::hopfield::{exceeds_capacity, theoretical_capacity};
use assocmem_core::render::{output_stem, overlap_chart, overlap_csv, write_frames};
use assocmem_core::scan::{self, series_csv, OverlapSeries};
use assocmem_core::{AssociativeMemory, MemoryConfig, PatternEncoder, RecallConfig};
use colored::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Tolerance used by `recall` when nothing else sets one
pub const RECALL_DELTA_M: f64 = 1e-4;
/// Tolerance used by `scan-m0` when nothing else sets one
pub const SCAN_M0_DELTA_M: f64 = 1e-3;
/// Tolerance used by `scan-p` when nothing else sets one
pub const SCAN_P_DELTA_M: f64 = 1e-5;
/// Stored patterns in `scan-m0` when neither flag nor file sets them
pub const SCAN_M0_PATTERNS: usize = 100;
/// Initial overlap in `scan-p` when neither flag nor file sets it
pub const SCAN_P_M0: f64 = 1.0;

pub struct RecallArgs {
    pub image: PathBuf,
    pub patterns: Option<usize>,
    pub m0: Option<f64>,
    pub delta_m: Option<f64>,
    pub max_steps: Option<usize>,
    pub seed: Option<u64>,
    pub frames: Option<Option<PathBuf>>,
    pub frame_size: Option<String>,
    pub overlaps: Option<PathBuf>,
    pub format: String,
}

pub struct ScanM0Args {
    pub neurons: usize,
    pub patterns: Option<usize>,
    pub from: f64,
    pub to: f64,
    pub step: f64,
    pub delta_m: Option<f64>,
    pub max_steps: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

pub struct ScanPArgs {
    pub neurons: usize,
    pub m0: Option<f64>,
    pub from: usize,
    pub to: usize,
    pub step: usize,
    pub delta_m: Option<f64>,
    pub max_steps: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

/// Encode an image, memorize it with `p - 1` interference patterns and
/// recall it from overlap `m0`
pub fn run_recall(args: &RecallArgs, config: &Config) -> Result<()> {
    let patterns = config.patterns(args.patterns, MemoryConfig::default().patterns);
    let m0 = config.m0(args.m0, RecallConfig::default().m0);
    let recall = config.recall(m0, args.delta_m, args.max_steps, RECALL_DELTA_M)?;
    let render = config.render(args.frame_size.as_deref())?;
    let seed = config.seed(args.seed);
    let json = match args.format.as_str() {
        "text" => false,
        "json" => true,
        other => anyhow::bail!("Unsupported output format: {} (expected text or json)", other),
    };

    let encoded = PatternEncoder::default()
        .open(&args.image)
        .context("Failed to load target image")?;

    if !json && exceeds_capacity(patterns, encoded.len()) {
        println!(
            "{}",
            format_warning(&format!(
                "{} patterns exceed the critical capacity (~{}) of {} units; recall may plateau below m = 1",
                patterns,
                theoretical_capacity(encoded.len()),
                encoded.len()
            ))
        );
    }

    let start = Instant::now();
    let mut memory = AssociativeMemory::new(encoded.pattern.clone(), seed)?;
    memory.memorize(patterns)?;
    let trajectory = memory.recall(&recall)?.clone();
    let elapsed = start.elapsed();

    let frames_dir = args.frames.as_ref().map(|dir| {
        dir.clone()
            .unwrap_or_else(|| PathBuf::from(output_stem(&args.image, patterns, m0)))
    });
    if let Some(dir) = &frames_dir {
        let written = write_frames(&trajectory, encoded.shape, dir, &render)
            .with_context(|| format!("Failed to write frames to {}", dir.display()))?;
        if !json {
            println!(
                "{}",
                format_success(&format!(
                    "Wrote {} frames to {}",
                    written.len(),
                    dir.display()
                ))
            );
        }
    }

    if let Some(path) = &args.overlaps {
        write_file(path, &overlap_csv(&trajectory)?)?;
        if !json {
            println!(
                "{}",
                format_success(&format!("Wrote overlaps to {}", path.display()))
            );
        }
    }

    if json {
        let frames_dir = frames_dir.as_ref().map(|d| d.to_string_lossy().into_owned());
        let report = RecallReport {
            width: encoded.width(),
            height: encoded.height(),
            trajectory_overlaps: trajectory.overlaps(),
            termination: trajectory.termination(),
            parameters: trajectory.parameters(),
            frames_dir: frames_dir.as_deref(),
        };
        println!("{}", format_recall_json(&report)?);
        return Ok(());
    }

    println!("{}", format_recall_summary(&encoded, &trajectory));
    println!("{}", "Overlap".bold());
    print!(
        "{}",
        overlap_chart(&trajectory.overlaps(), CHART_WIDTH, CHART_HEIGHT)
    );
    println!(
        "\n{}",
        format_info(&format!("Finished in {:.2?}", elapsed))
    );
    Ok(())
}

/// Sweep `m0` over one memorized random network
pub fn run_scan_m0(args: &ScanM0Args, config: &Config) -> Result<()> {
    let patterns = config.patterns(args.patterns, SCAN_M0_PATTERNS);
    let m0s = scan::float_range(args.from, args.to, args.step)?;
    // m0 itself is replaced per point; the first value just validates the rest
    let recall = config.recall(
        m0s.first().copied().unwrap_or(1.0),
        args.delta_m,
        args.max_steps,
        SCAN_M0_DELTA_M,
    )?;
    let seed = config.seed(args.seed);

    println!(
        "{}",
        format_info(&format!(
            "Scanning {} values of m0 with N = {}, P = {}",
            m0s.len(),
            args.neurons,
            patterns
        ))
    );

    let start = Instant::now();
    let series = scan::initial_overlap(args.neurons, patterns, seed, &m0s, &recall)?;
    report_scan("m0", &series, args.output.as_deref())?;
    println!(
        "{}",
        format_info(&format!("Finished in {:.2?}", start.elapsed()))
    );
    Ok(())
}

/// Sweep the number of stored patterns with one fresh network per value
pub fn run_scan_p(args: &ScanPArgs, config: &Config) -> Result<()> {
    if args.step == 0 {
        anyhow::bail!("Pattern count step must be >= 1");
    }
    let counts: Vec<usize> = (args.from..args.to).step_by(args.step).collect();
    let m0 = config.m0(args.m0, SCAN_P_M0);
    let recall = config.recall(m0, args.delta_m, args.max_steps, SCAN_P_DELTA_M)?;
    let seed = config.seed(args.seed);

    println!(
        "{}",
        format_info(&format!(
            "Scanning {} pattern counts with N = {}, m0 = {}",
            counts.len(),
            args.neurons,
            m0
        ))
    );

    let start = Instant::now();
    let series = scan::pattern_count(args.neurons, &counts, seed, &recall)?;
    report_scan("p", &series, args.output.as_deref())?;
    println!(
        "{}",
        format_info(&format!("Finished in {:.2?}", start.elapsed()))
    );
    Ok(())
}

fn report_scan<T: Display>(
    label: &str,
    series: &[OverlapSeries<T>],
    output: Option<&Path>,
) -> Result<()> {
    for s in series {
        println!("{}", format_series_line(label, s));
    }

    if let Some(path) = output {
        write_file(path, &series_csv(series)?)?;
        println!(
            "{}",
            format_success(&format!("Wrote {} series to {}", series.len(), path.display()))
        );
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
