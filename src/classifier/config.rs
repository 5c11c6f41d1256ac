use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Classification thresholds and signal delays.
///
/// Loaded (or defaulted) once at startup and never mutated afterwards;
/// the classifier holds it behind an `Arc` for the life of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    /// Widths at or below this are Mobile (px)
    pub mobile_max_width: u32,

    /// Widths above mobile but at or below this are Tablet (px)
    pub tablet_max_width: u32,

    /// Pixel ratios above this get the high-density tag
    pub high_density_ratio: f64,

    /// Quiet period a burst of resize signals must clear before one refresh runs
    pub resize_debounce_ms: u64,

    /// Settle delay after an orientation-change signal before measuring
    pub orientation_settle_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: 768,
            tablet_max_width: 1024,
            high_density_ratio: 1.5,
            resize_debounce_ms: 250,
            orientation_settle_ms: 100,
        }
    }
}

impl ClassifierConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read classifier config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid classifier config in {}", path.display()))?;

        if config.mobile_max_width >= config.tablet_max_width {
            bail!(
                "mobile breakpoint {}px must sit below tablet breakpoint {}px",
                config.mobile_max_width,
                config.tablet_max_width
            );
        }

        Ok(config)
    }
}
