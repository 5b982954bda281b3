//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

use crate::transform::luma::{
    LumaParameters, DEFAULT_LUMA_THRESHOLD, LUMA_COEF_B, LUMA_COEF_G, LUMA_COEF_R,
};

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of worker threads (0 = one per available CPU)
    pub parallel_workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 0,
        }
    }
}

/// Saved parameters for the custom luminance transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LumaConfig {
    /// Luminance at which pixels start to fade (0-255)
    pub threshold: u8,

    /// Red weight (0.0-1.0)
    pub coef_r: f32,

    /// Green weight (0.0-1.0)
    pub coef_g: f32,

    /// Blue weight (0.0-1.0)
    pub coef_b: f32,
}

impl Default for LumaConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LUMA_THRESHOLD,
            coef_r: LUMA_COEF_R,
            coef_g: LUMA_COEF_G,
            coef_b: LUMA_COEF_B,
        }
    }
}

impl LumaConfig {
    /// Transform parameters described by this section.
    pub fn parameters(&self) -> LumaParameters {
        LumaParameters {
            coef_r: self.coef_r,
            coef_g: self.coef_g,
            coef_b: self.coef_b,
            threshold: self.threshold,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
