// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing pipeline — the filter selector followed by the tone stage,
// plus a chaining wrapper for shells that keep the original around.

use bildwerk_core::error::Result;
use bildwerk_core::{Adjustments, FilterKind, ProcessingConfig};
use image::{DynamicImage, RgbImage};
use tracing::{info, instrument};

use crate::codec;
use crate::convolution::{ConvolveMode, Kernel, convolve_with_mode};
use crate::filters::apply_with_mode;
use crate::raster::Raster;
use crate::tone::adjust;

/// Apply the filter called `filter_name`, then brightness, contrast, and
/// intensity.
///
/// Unrecognised filter names are treated as `none`. Parameters are never
/// rejected; out-of-range values are computed through and clamped per sample.
pub fn process(
    raster: &Raster,
    filter_name: &str,
    intensity: f32,
    brightness: f32,
    contrast: f32,
) -> Raster {
    let kind = FilterKind::from_name(filter_name);
    let adjustments = Adjustments::new(intensity, brightness, contrast);
    process_with(raster, kind, &adjustments, ConvolveMode::default())
}

/// Typed form of [`process`].
#[instrument(skip(raster, adjustments), fields(width = raster.width(), height = raster.height()))]
pub fn process_with(
    raster: &Raster,
    kind: FilterKind,
    adjustments: &Adjustments,
    mode: ConvolveMode,
) -> Raster {
    let filtered = apply_with_mode(raster, kind, mode);
    info!(
        intensity = adjustments.intensity,
        brightness = adjustments.brightness,
        contrast = adjustments.contrast,
        "Applying tone adjustments"
    );
    adjust(&filtered, adjustments)
}

/// Chainable processing over one raster, keeping the original for `reset`.
///
/// Every step consumes `self` and returns a new `FilterPipeline`.
///
/// ```ignore
/// let png = FilterPipeline::from_rgb(&image)
///     .filter(FilterKind::Sharpen)
///     .adjust(&Adjustments::new(1.2, 10.0, 1.1))
///     .to_png_bytes()?;
/// ```
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    original: Raster,
    current: Raster,
    mode: ConvolveMode,
}

impl FilterPipeline {
    // -- Construction ---------------------------------------------------------

    pub fn from_raster(raster: Raster) -> Self {
        Self {
            current: raster.clone(),
            original: raster,
            mode: ConvolveMode::default(),
        }
    }

    pub fn from_rgb(image: &RgbImage) -> Self {
        Self::from_raster(Raster::from_rgb_image(image))
    }

    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::from_rgb(&image.to_rgb8())
    }

    /// Decode encoded bytes and downscale to the configured preview box.
    pub fn decode(data: &[u8], config: &ProcessingConfig) -> Result<Self> {
        let rgb = codec::decode_rgb(data)?;
        let image = DynamicImage::ImageRgb8(rgb);
        let image = if config.resize_preview {
            codec::fit_within(image, config.max_width, config.max_height)
        } else {
            image
        };
        Ok(Self::from_dynamic(&image).with_mode(ConvolveMode::from_flag(config.parallel)))
    }

    pub fn with_mode(mut self, mode: ConvolveMode) -> Self {
        self.mode = mode;
        self
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.current.width()
    }

    pub fn height(&self) -> u32 {
        self.current.height()
    }

    /// The raster the pipeline started from.
    pub fn original(&self) -> &Raster {
        &self.original
    }

    /// The current working raster.
    pub fn raster(&self) -> &Raster {
        &self.current
    }

    pub fn into_raster(self) -> Raster {
        self.current
    }

    // -- Steps (consume self, return new Self) --------------------------------

    pub fn filter(self, kind: FilterKind) -> Self {
        let current = apply_with_mode(&self.current, kind, self.mode);
        Self { current, ..self }
    }

    /// Lenient by-name variant of [`FilterPipeline::filter`].
    pub fn filter_named(self, name: &str) -> Self {
        self.filter(FilterKind::from_name(name))
    }

    /// Convolve with caller-supplied flattened weights.
    pub fn convolve_with(self, weights: &[f32]) -> Result<Self> {
        let kernel = Kernel::new(weights.to_vec())?;
        let current = convolve_with_mode(&self.current, &kernel, self.mode);
        Ok(Self { current, ..self })
    }

    pub fn adjust(self, adjustments: &Adjustments) -> Self {
        let current = adjust(&self.current, adjustments);
        Self { current, ..self }
    }

    /// Filter then adjust, as [`process_with`] does.
    pub fn process(self, kind: FilterKind, adjustments: &Adjustments) -> Self {
        let current = process_with(&self.current, kind, adjustments, self.mode);
        Self { current, ..self }
    }

    /// Drop every applied step and return to the original raster.
    pub fn reset(self) -> Self {
        Self {
            current: self.original.clone(),
            ..self
        }
    }

    // -- Output ---------------------------------------------------------------

    pub fn to_rgb_image(&self) -> RgbImage {
        self.current.to_rgb_image()
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        codec::encode_png(&self.current)
    }
}
