// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The immutable parameters of a single render.

use std::convert::TryFrom;

use crate::errors::{RenderError, Result};

/// Default output width, in pixels.
pub const DEFAULT_WIDTH: usize = 3072;
/// Default output height, in pixels.
pub const DEFAULT_HEIGHT: usize = 1920;
/// Default iteration cap for the escape-time kernel.
pub const DEFAULT_ITERATIONS: u32 = 2047;
/// Upper bound on the number of workers, whatever the hardware says.
pub const MAX_WORKERS: usize = 8;

/// The number of workers to use when the caller doesn't say: one per
/// logical CPU, capped at `MAX_WORKERS`.
pub fn default_workers() -> usize {
    num_cpus::get().min(MAX_WORKERS).max(1)
}

/// Checks that a `width x height` image can exist: both sides
/// positive, each side representable as a `u32` for the encoder, and
/// the cell count representable as a `usize`.
pub fn check_dimensions(width: usize, height: usize) -> Result<()> {
    let fits = width > 0
        && height > 0
        && u32::try_from(width).is_ok()
        && u32::try_from(height).is_ok()
        && width.checked_mul(height).is_some();
    if fits {
        Ok(())
    } else {
        Err(RenderError::InvalidDimensions(width, height))
    }
}

/// Everything the evaluator and the scheduler need to know about a
/// run.  Once built it is only ever read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration cap; points that haven't escaped by then are in the set.
    pub max_iterations: u32,
    /// Requested number of concurrent shards.
    pub workers: usize,
}

impl RenderConfig {
    /// Validates and builds a configuration.  Fails before anything
    /// is allocated or spawned.  The worker count must lie in
    /// `1..=MAX_WORKERS`.
    pub fn new(width: usize, height: usize, max_iterations: u32, workers: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        if max_iterations == 0 {
            return Err(RenderError::NoIterations);
        }
        if workers == 0 {
            return Err(RenderError::NoWorkers);
        }
        if workers > MAX_WORKERS {
            return Err(RenderError::TooManyWorkers(workers, MAX_WORKERS));
        }
        Ok(RenderConfig {
            width,
            height,
            max_iterations,
            workers,
        })
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations: DEFAULT_ITERATIONS,
            workers: default_workers(),
        }
    }
}
