// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildwerk: filter selection and tone adjustment parameters.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::BildwerkError;

/// The closed set of filters a caller can select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Identity; the raster passes through untouched.
    #[default]
    None,
    /// 3x3 box blur.
    Blur,
    /// Synonym for `Blur` (same kernel).
    Smooth,
    /// 3x3 unity-sum sharpening kernel.
    Sharpen,
    /// Per-channel `255 - v`.
    Invert,
    /// Unweighted RGB mean replicated into all channels.
    Grayscale,
}

impl FilterKind {
    /// Every variant, in the order a shell would list them.
    pub const ALL: [FilterKind; 6] = [
        Self::None,
        Self::Blur,
        Self::Smooth,
        Self::Sharpen,
        Self::Invert,
        Self::Grayscale,
    ];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Blur => "blur",
            Self::Smooth => "smooth",
            Self::Sharpen => "sharpen",
            Self::Invert => "invert",
            Self::Grayscale => "grayscale",
        }
    }

    /// Exact lookup of a canonical name. Anything else, including other
    /// casings, falls back to `None` (identity).
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::None)
    }

    /// Whether this filter is implemented as a kernel convolution.
    pub fn is_convolution(&self) -> bool {
        matches!(self, Self::Blur | Self::Smooth | Self::Sharpen)
    }
}

impl FromStr for FilterKind {
    type Err = BildwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BildwerkError::UnknownFilter(s.to_string()))
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Brightness, contrast, and intensity applied after the selected filter.
///
/// The core computes with whatever values it is given; the advisory slider
/// domains below are only enforced by [`Adjustments::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Multiplicative scale applied last.
    pub intensity: f32,
    /// Additive offset applied first.
    pub brightness: f32,
    /// Scale around the mid-gray pivot.
    pub contrast: f32,
}

impl Adjustments {
    pub const INTENSITY_RANGE: RangeInclusive<f32> = 0.0..=2.0;
    pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = -100.0..=100.0;
    pub const CONTRAST_RANGE: RangeInclusive<f32> = 0.0..=2.0;

    pub fn new(intensity: f32, brightness: f32, contrast: f32) -> Self {
        Self {
            intensity,
            brightness,
            contrast,
        }
    }

    /// True for the default parameters, which leave every sample unchanged.
    pub fn is_identity(&self) -> bool {
        self.intensity == 1.0 && self.brightness == 0.0 && self.contrast == 1.0
    }

    /// Clamp each parameter into its slider domain.
    pub fn clamped(&self) -> Self {
        let clamp = |v: f32, range: &RangeInclusive<f32>| v.clamp(*range.start(), *range.end());
        Self {
            intensity: clamp(self.intensity, &Self::INTENSITY_RANGE),
            brightness: clamp(self.brightness, &Self::BRIGHTNESS_RANGE),
            contrast: clamp(self.contrast, &Self::CONTRAST_RANGE),
        }
    }

    /// All three parameters are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.intensity.is_finite() && self.brightness.is_finite() && self.contrast.is_finite()
    }
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            brightness: 0.0,
            contrast: 1.0,
        }
    }
}
