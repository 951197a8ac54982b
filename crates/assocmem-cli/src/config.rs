//! Configuration loading and command-line overrides

use anyhow::{Context, Result};
use assocmem_core::config::DEFAULT_SEED;
use assocmem_core::{RecallConfig, RenderConfig};
use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// File layer
// ---------------------------------------------------------------------------

/// Contents of a `--config` TOML file
///
/// Every key is optional: a missing key leaves the decision to the flag or
/// the command's own default, never to a library default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub memory: MemorySection,
    pub recall: RecallSection,
    pub render: RenderSection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemorySection {
    pub patterns: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecallSection {
    pub m0: Option<f64>,
    pub delta_m: Option<f64>,
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Settings read from the config file, if any
///
/// Precedence for every value is: command-line flag, then the config file,
/// then the command's own default. Values are validated only once resolved,
/// so a file key a command never reads cannot fail that command.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: FileConfig,
}

impl Config {
    /// Load from `path`, or fall back to an empty file layer
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let file = Self::parse(&content)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");

        Ok(Self { file })
    }

    pub fn parse(content: &str) -> Result<FileConfig> {
        Ok(toml::from_str(content)?)
    }

    pub fn seed(&self, flag: Option<u64>) -> u64 {
        flag.or(self.file.memory.seed).unwrap_or(DEFAULT_SEED)
    }

    pub fn patterns(&self, flag: Option<usize>, default: usize) -> usize {
        flag.or(self.file.memory.patterns).unwrap_or(default)
    }

    pub fn m0(&self, flag: Option<f64>, default: f64) -> f64 {
        flag.or(self.file.recall.m0).unwrap_or(default)
    }

    /// Recall settings for one command
    pub fn recall(
        &self,
        m0: f64,
        delta_m: Option<f64>,
        max_steps: Option<usize>,
        default_delta_m: f64,
    ) -> Result<RecallConfig> {
        let file = self.file.recall;
        let config = RecallConfig::new(m0)
            .with_delta_m(delta_m.or(file.delta_m).unwrap_or(default_delta_m))
            .with_max_steps(
                max_steps
                    .or(file.max_steps)
                    .unwrap_or(RecallConfig::default().max_steps),
            );
        config.validate()?;
        Ok(config)
    }

    /// Render settings, with an optional `WIDTHxHEIGHT` override
    pub fn render(&self, frame_size: Option<&str>) -> Result<RenderConfig> {
        let defaults = RenderConfig::default();
        let mut render = RenderConfig {
            frame_width: self.file.render.frame_width.unwrap_or(defaults.frame_width),
            frame_height: self
                .file
                .render
                .frame_height
                .unwrap_or(defaults.frame_height),
        };
        if let Some(size) = frame_size {
            let (width, height) = parse_frame_size(size)?;
            render.frame_width = width;
            render.frame_height = height;
        }
        render.validate()?;
        Ok(render)
    }
}

/// Parse `1920x1080`
pub fn parse_frame_size(s: &str) -> Result<(u32, u32)> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("Frame size must look like WIDTHxHEIGHT, got '{}'", s))?;
    let width = width
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid frame width in '{}'", s))?;
    let height = height
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid frame height in '{}'", s))?;
    Ok((width, height))
}
