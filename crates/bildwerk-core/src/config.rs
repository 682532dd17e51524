// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BildwerkError, Result};
use crate::types::{Adjustments, FilterKind};

/// Settings a shell applies around each `process` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Preview bounding box width; larger inputs are downscaled to fit.
    pub max_width: u32,
    /// Preview bounding box height.
    pub max_height: u32,
    /// Downscale inputs to the bounding box before filtering.
    pub resize_preview: bool,
    /// Partition convolution across rows with rayon.
    pub parallel: bool,
    /// Filter applied when the caller does not name one.
    pub filter: FilterKind,
    /// Tone adjustments applied when the caller does not override them.
    pub adjustments: Adjustments,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_height: 600,
            resize_preview: true,
            parallel: true,
            filter: FilterKind::None,
            adjustments: Adjustments::default(),
        }
    }
}

impl ProcessingConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values no shell could act on.
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(BildwerkError::Config(format!(
                "preview bounds must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if !self.adjustments.is_finite() {
            return Err(BildwerkError::Config(
                "adjustments must be finite numbers".into(),
            ));
        }
        Ok(())
    }
}
