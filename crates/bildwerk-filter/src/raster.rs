// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory RGB raster with floating-point samples.
//
// Samples are kept as `f32` between stages so that unquantized intermediate
// values (grayscale means, contrast midpoints) are carried into the next
// stage. Fractional results are snapped to a 1/65536 grid: every value in
// [0, 255] on that grid fits in 24 mantissa bits, so `255 - v` is exact and
// pointwise maps such as invert stay involutive. Quantization to `u8`
// happens only at the codec boundary and rounds to nearest. The Streamlit
// app truncates through `np.uint8`, so a fractional sample can export one
// level higher here than it does there.

use bildwerk_core::error::{BildwerkError, Result};
use image::{Rgb, RgbImage};

/// Number of channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Upper bound of a channel value.
pub const MAX_CHANNEL: f32 = 255.0;

/// Fractional steps per channel level.
pub const SAMPLE_GRID: f64 = 65536.0;

/// Round a sample to the nearest multiple of `1 / SAMPLE_GRID`.
#[inline]
pub fn snap(v: f64) -> f32 {
    ((v * SAMPLE_GRID).round() / SAMPLE_GRID) as f32
}

/// Clamp a sample into `[0, 255]` on the sample grid. NaN collapses to 0.
#[inline]
pub fn clamp_channel(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        snap(f64::from(v.clamp(0.0, MAX_CHANNEL)))
    }
}

/// Clamp and round a sample to the nearest representable `u8`.
#[inline]
pub fn quantize(v: f32) -> u8 {
    clamp_channel(v).round() as u8
}

/// A `width` x `height` grid of RGB pixels, stored row-major and interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Raster {
    // -- Construction ---------------------------------------------------------

    /// A black raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; sample_count(width, height)],
        }
    }

    /// Wrap interleaved RGB samples. The length must be `width * height * 3`.
    ///
    /// Samples are snapped to the sample grid but not clamped.
    pub fn from_raw(width: u32, height: u32, mut data: Vec<f32>) -> Result<Self> {
        let expected = sample_count(width, height);
        if data.len() != expected {
            return Err(BildwerkError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        for v in &mut data {
            *v = snap(f64::from(*v));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [f32; 3]) -> Self {
        let mut data = Vec::with_capacity(sample_count(width, height));
        for y in 0..height {
            for x in 0..width {
                data.extend(f(x, y).map(|v| snap(f64::from(v))));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// A raster where every pixel has the same value.
    pub fn filled(width: u32, height: u32, pixel: [f32; 3]) -> Self {
        Self::from_fn(width, height, |_, _| pixel)
    }

    /// Lossless conversion from an 8-bit RGB image.
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.as_raw().iter().map(|&v| f32::from(v)).collect(),
        }
    }

    /// Quantize every sample (clamp, round) into an 8-bit RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = self.index(x as usize, y as usize);
            Rgb([
                quantize(self.data[i]),
                quantize(self.data[i + 1]),
                quantize(self.data[i + 2]),
            ])
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bounds-checked pixel read.
    pub fn get(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x as usize, y as usize);
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Bounds-checked pixel write. Returns `false` when out of range.
    pub fn set(&mut self, x: u32, y: u32, pixel: [f32; 3]) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.index(x as usize, y as usize);
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
        true
    }

    /// Interleaved samples, row-major.
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.data
    }

    /// Iterate pixels as `[r, g, b]` slices in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(CHANNELS)
    }

    // -- Pointwise maps (fresh output) ----------------------------------------

    /// Apply `f` to every sample independently.
    pub fn map_samples(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Apply `f` to every pixel.
    pub fn map_pixels(&self, f: impl Fn([f32; 3]) -> [f32; 3]) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(CHANNELS) {
            data.extend_from_slice(&f([px[0], px[1], px[2]]));
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Internal constructor for buffers already sized from a source raster.
    pub(crate) fn from_samples(width: u32, height: u32, data: Vec<f32>) -> Self {
        debug_assert_eq!(
            data.len(),
            sample_count(width, height),
            "output shape diverged from input"
        );
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CHANNELS
    }
}

fn sample_count(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
