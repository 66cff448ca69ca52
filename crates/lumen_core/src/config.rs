//! Render settings.
//!
//! Settings are plain data. They can be built in code or read from a JSON
//! document; missing fields fall back to the defaults.

use std::path::Path;

use lumen_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading or checking render settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything the render driver needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Maximum number of bounces per path
    pub max_depth: u32,
    /// Primary rays averaged per pixel
    pub samples_per_pixel: u32,
    /// Exponent applied to the normalized, clamped color
    pub gamma: f32,
    /// Color returned by rays that leave the scene, in [0, 255]
    pub background: [f32; 3],
    /// Worker threads (0 = one per logical core)
    pub threads: usize,
    /// Base seed for the per-bucket random generators
    pub seed: u64,
    /// Edge length of a square bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            max_depth: 10,
            samples_per_pixel: 16,
            gamma: 0.45,
            background: [0.0, 0.0, 0.0],
            threads: 0,
            seed: 0,
            bucket_size: 32,
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file and validate them.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the renderer cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("width/height", "image must be at least 1x1"));
        }
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel", "must be at least 1"));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(invalid("gamma", "must be a positive number"));
        }
        if self.background.iter().any(|c| !c.is_finite()) {
            return Err(invalid("background", "channels must be finite"));
        }
        if self.bucket_size == 0 {
            return Err(invalid("bucket_size", "must be at least 1"));
        }
        Ok(())
    }

    /// Background color as a vector.
    pub fn background_color(&self) -> Vec3 {
        Vec3::from_array(self.background)
    }

    /// Image width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
