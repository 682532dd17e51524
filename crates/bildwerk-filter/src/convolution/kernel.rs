// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Square convolution kernels.

use bildwerk_core::error::{BildwerkError, Result};

/// An odd-sided square matrix of signed weights, stored row-major.
///
/// The side is always odd so that a centre cell exists; construction through
/// [`Kernel::new`] rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from flattened weights, inferring the side.
    ///
    /// Fails with `InvalidKernel` when the length is zero, not a perfect
    /// square, or a square of an even side.
    pub fn new(weights: Vec<f32>) -> Result<Self> {
        let side = validate_len(weights.len())?;
        Ok(Self { side, weights })
    }

    /// Centre weight 1, everything else 0.
    pub fn identity(side: usize) -> Result<Self> {
        let len = side
            .checked_mul(side)
            .ok_or_else(|| BildwerkError::InvalidKernel {
                len: usize::MAX,
                reason: format!("side {side} overflows the weight count"),
            })?;
        validate_len(len)?;
        let mut weights = vec![0.0; len];
        weights[len / 2] = 1.0;
        Ok(Self { side, weights })
    }

    /// 3x3 box blur, every weight 1/9.
    pub fn box_blur() -> Self {
        Self {
            side: 3,
            weights: vec![1.0 / 9.0; 9],
        }
    }

    /// 3x3 unity-sum sharpening kernel.
    pub fn sharpen() -> Self {
        Self {
            side: 3,
            weights: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// `side / 2`, the offset from a corner cell to the centre.
    pub fn half_side(&self) -> usize {
        self.side / 2
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at column `cx`, row `cy`.
    #[inline]
    pub fn weight(&self, cx: usize, cy: usize) -> f32 {
        self.weights[cy * self.side + cx]
    }

    /// Sum of all weights (1.0 for brightness-preserving kernels).
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Returns the side for a valid flattened length.
fn validate_len(len: usize) -> Result<usize> {
    let invalid = |reason: &str| BildwerkError::InvalidKernel {
        len,
        reason: reason.to_string(),
    };

    if len == 0 {
        return Err(invalid("kernel is empty"));
    }
    let side = len.isqrt();
    if side * side != len {
        return Err(invalid("length is not a perfect square"));
    }
    if side % 2 == 0 {
        return Err(invalid("side must be odd"));
    }
    Ok(side)
}
