// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Convolution module — square kernels and the spatial convolution engine.

pub mod engine;
pub mod kernel;

pub use engine::{ConvolveMode, convolve, convolve_parallel, convolve_weights, convolve_with_mode};
pub use kernel::Kernel;
