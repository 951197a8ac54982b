//! Turning recall trajectories into images, CSV and terminal charts

use crate::config::RenderConfig;
use crate::pattern::{BipolarVector, PatternShape};
use crate::trajectory::RecallTrajectory;
use crate::{AssocMemError, Result};
use image::imageops::{self, FilterType};
use image::GrayImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Luma level for `+1` units
pub const ACTIVE_LEVEL: u8 = 255;
/// Luma level for `-1` units
pub const INACTIVE_LEVEL: u8 = 0;

/// Lower edge of the overlap chart
pub const CHART_Y_MIN: f64 = -1.0;
/// Upper edge of the overlap chart, slightly above 1 so a perfect recall is
/// not drawn on the border
pub const CHART_Y_MAX: f64 = 1.01;

/// Reshape a state into a grayscale image, `+1` white and `-1` black
///
/// # Errors
///
/// `DimensionMismatch` if the state does not have `shape.len()` units.
pub fn state_to_luma(state: &BipolarVector, shape: PatternShape) -> Result<GrayImage> {
    if state.len() != shape.len() {
        return Err(AssocMemError::DimensionMismatch {
            expected: shape.len(),
            actual: state.len(),
        });
    }

    let pixels: Vec<u8> = state
        .iter()
        .map(|v| if v > 0 { ACTIVE_LEVEL } else { INACTIVE_LEVEL })
        .collect();

    GrayImage::from_raw(shape.width as u32, shape.height as u32, pixels).ok_or(
        AssocMemError::DimensionMismatch {
            expected: shape.len(),
            actual: state.len(),
        },
    )
}

/// Scale `image` to fit inside `out_width x out_height` keeping its aspect
/// ratio, then centre it on a black canvas of exactly that size
///
/// Scaled sizes are truncated, never rounded up. Nearest-neighbour sampling
/// keeps every pixel at 0 or 255.
pub fn letterbox(image: &GrayImage, out_width: u32, out_height: u32) -> GrayImage {
    let mut canvas = GrayImage::new(out_width, out_height);
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || out_width == 0 || out_height == 0 {
        return canvas;
    }

    let scale = f64::min(
        out_width as f64 / width as f64,
        out_height as f64 / height as f64,
    );
    let scaled_width = ((width as f64 * scale).floor() as u32).clamp(1, out_width);
    let scaled_height = ((height as f64 * scale).floor() as u32).clamp(1, out_height);

    let resized = imageops::resize(image, scaled_width, scaled_height, FilterType::Nearest);
    let x = (out_width - scaled_width) / 2;
    let y = (out_height - scaled_height) / 2;
    imageops::replace(&mut canvas, &resized, i64::from(x), i64::from(y));
    canvas
}

/// Render every step of `trajectory` as `frame_NNNN.png` inside `dir`
///
/// The directory is created if missing. Frames are encoded in parallel and
/// returned in step order.
pub fn write_frames(
    trajectory: &RecallTrajectory,
    shape: PatternShape,
    dir: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let paths = trajectory
        .steps()
        .par_iter()
        .enumerate()
        .map(|(step, recorded)| -> Result<PathBuf> {
            let frame = letterbox(
                &state_to_luma(&recorded.state, shape)?,
                config.frame_width,
                config.frame_height,
            );
            let path = dir.join(format!("frame_{:04}.png", step));
            frame
                .save(&path)
                .map_err(|e| AssocMemError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(frames = paths.len(), dir = %dir.display(), "wrote recall frames");
    Ok(paths)
}

/// `step,overlap` CSV, one row per recorded state
pub fn overlap_csv(trajectory: &RecallTrajectory) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["step", "overlap"])
        .map_err(std::io::Error::from)?;
    for (step, recorded) in trajectory.steps().iter().enumerate() {
        wtr.write_record([step.to_string(), recorded.overlap.to_string()])
            .map_err(std::io::Error::from)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| AssocMemError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// ASCII plot of overlap against step
///
/// The y axis spans [`CHART_Y_MIN`, `CHART_Y_MAX`]. Series longer than
/// `width` are subsampled evenly, always keeping the first and last step.
pub fn overlap_chart(overlaps: &[f64], width: usize, height: usize) -> String {
    if overlaps.is_empty() || width == 0 || height < 2 {
        return String::new();
    }

    let columns = overlaps.len().min(width);
    let span = CHART_Y_MAX - CHART_Y_MIN;
    let mut grid = vec![vec![' '; columns]; height];

    for col in 0..columns {
        let idx = if columns == 1 {
            0
        } else {
            col * (overlaps.len() - 1) / (columns - 1)
        };
        let m = overlaps[idx].clamp(CHART_Y_MIN, CHART_Y_MAX);
        let row = (((CHART_Y_MAX - m) / span * (height - 1) as f64).round() as usize)
            .min(height - 1);
        grid[row][col] = '*';
    }

    let mut out = String::new();
    for (r, line) in grid.iter().enumerate() {
        let label = if r == 0 || r == height - 1 {
            let y = CHART_Y_MAX - span * r as f64 / (height - 1) as f64;
            format!("{:>6.2}", y)
        } else {
            " ".repeat(6)
        };
        out.push_str(&label);
        out.push_str(" |");
        out.extend(line.iter());
        out.push('\n');
    }
    out.push_str(&format!("{} +{}\n", " ".repeat(6), "-".repeat(columns)));
    out.push_str(&format!(
        "{}  step 0..{}\n",
        " ".repeat(6),
        overlaps.len() - 1
    ));
    out
}

/// Output name `<stem>_P_<p>_M0_<m0>` for a run on `image_path`
///
/// `m0` is printed with at least one decimal, so `1.0` stays `1.0`.
pub fn output_stem(image_path: impl AsRef<Path>, patterns: usize, m0: f64) -> String {
    let stem = image_path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pattern".to_string());
    format!("{}_P_{}_M0_{:?}", stem, patterns, m0)
}
