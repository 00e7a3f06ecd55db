//! Export configuration
//!
//! Settings can come from a TOML file (`--config`), with CLI flags applied on
//! top. Every key is optional:
//!
//! ```toml
//! format = "kac-1.0"          # or "kac-1.0-draft"
//! texture_policy = "strict"   # or "tolerant"
//! max_texture_side = 256
//! resize_filter = "triangle"
//! texture_filtering = true
//! ```

use anyhow::{Context, Result};
use image::imageops::FilterType;
use kac_common::{FormatVersion, MAX_TEXTURE_SIDE_LENGTH, MIN_TEXTURE_SIDE_LENGTH};
use serde::Deserialize;
use std::path::Path;

/// What to do with a texture that is not a square power of two in range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexturePolicy {
    /// Reject with `InvalidTextureGeometry`
    #[default]
    Strict,
    /// Resample to the nearest valid square
    Tolerant,
}

/// Resampling filter for mip levels and tolerant-mode resizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Options for a single conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// On-disk layout to write
    pub format: FormatVersion,
    pub texture_policy: TexturePolicy,
    /// Largest accepted texture side length (clamped to 2-256)
    pub max_texture_side: u32,
    pub resize_filter: ResizeFilter,
    /// Value of `has_texture_filtering` for every material.
    /// OBJ/MTL has no way to express it.
    pub texture_filtering: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: FormatVersion::default(),
            texture_policy: TexturePolicy::default(),
            max_texture_side: MAX_TEXTURE_SIDE_LENGTH,
            resize_filter: ResizeFilter::default(),
            texture_filtering: true,
        }
    }
}

impl ExportConfig {
    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ExportConfig = toml::from_str(text).context("Invalid export config")?;
        Ok(config.normalized())
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_toml(&text).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    /// Override the maximum texture side length (clamped to 2-256)
    pub fn with_max_texture_side(mut self, side: u32) -> Self {
        self.max_texture_side = side;
        self.normalized()
    }

    /// Clamp values into their supported ranges
    pub fn normalized(mut self) -> Self {
        let clamped = self
            .max_texture_side
            .clamp(MIN_TEXTURE_SIDE_LENGTH, MAX_TEXTURE_SIDE_LENGTH);
        if clamped != self.max_texture_side {
            tracing::warn!(
                "Maximum texture side {} clamped to {}",
                self.max_texture_side,
                clamped
            );
        }
        self.max_texture_side = clamped;
        self
    }

    /// Largest valid (power-of-two) side length not above `max_texture_side`
    pub fn max_side_length(&self) -> u32 {
        let side = self
            .max_texture_side
            .clamp(MIN_TEXTURE_SIDE_LENGTH, MAX_TEXTURE_SIDE_LENGTH);
        // Round down to a power of two
        1u32 << (u32::BITS - 1 - side.leading_zeros())
    }
}
