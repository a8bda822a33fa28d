// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel, and the trait through which the scheduler
//! sees it.
//!
//! Each pixel is mapped to a point `c` on the complex plane, and
//! `z <- z^2 + c` is iterated from zero until `|z|` reaches 2 or the
//! iteration cap runs out.  The number of iterations taken is the
//! pixel's value.  No pixel depends on any other, which is what lets
//! the scheduler hand out the image in arbitrary pieces.

use num::Complex;

use crate::errors::{RenderError, Result};
use crate::planes::{Pixel, PlaneMapper};

/// The brightest value an intensity can take.
pub const MAX_INTENSITY: u8 = 255;

/// A pure per-pixel function.  It is shared by reference between all
/// the shard threads, so it must be `Sync` and must not carry any
/// mutable state of its own.
pub trait Evaluator: Sync {
    /// What gets written into the canvas for each pixel.
    type Output: Send;

    /// Computes the value of one pixel.
    fn evaluate(&self, pixel: Pixel) -> Self::Output;
}

impl<F, T> Evaluator for F
where
    F: Fn(Pixel) -> T + Sync,
    T: Send,
{
    type Output = T;

    fn evaluate(&self, pixel: Pixel) -> T {
        self(pixel)
    }
}

/// The Mandelbrot escape-time function over a fixed plane.
#[derive(Debug, Clone)]
pub struct EscapeTime {
    plane: PlaneMapper,
    max_iterations: u32,
}

impl EscapeTime {
    /// Requires the plane to map pixels through and the iteration cap.
    pub fn new(plane: PlaneMapper, max_iterations: u32) -> Result<Self> {
        if max_iterations == 0 {
            return Err(RenderError::NoIterations);
        }
        Ok(EscapeTime {
            plane,
            max_iterations,
        })
    }

    /// The iteration cap.  Points in the set evaluate to exactly this.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The plane this evaluator maps pixels through.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }
}

/// Iterates a single point.  Returns the cap if the orbit never
/// leaves the radius-2 disc.
#[inline]
pub fn iterate(c: Complex<f64>, max_iterations: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut n = 0;
    while n < max_iterations && z.norm_sqr() < 4.0 {
        z = z * z + c;
        n += 1;
    }
    n
}

impl Evaluator for EscapeTime {
    type Output = u32;

    fn evaluate(&self, pixel: Pixel) -> u32 {
        iterate(self.plane.pixel_to_point(pixel), self.max_iterations)
    }
}

/// Linear rescale of an iteration count into `0..=MAX_INTENSITY`.
#[inline]
pub fn intensity(iterations: u32, max_iterations: u32) -> u8 {
    let n = u64::from(iterations.min(max_iterations));
    (n * u64::from(MAX_INTENSITY) / u64::from(max_iterations)) as u8
}

/// Wraps an `EscapeTime` so that it produces grey levels instead of
/// raw iteration counts.
#[derive(Debug, Clone)]
pub struct Grayscale(pub EscapeTime);

impl Evaluator for Grayscale {
    type Output = u8;

    fn evaluate(&self, pixel: Pixel) -> u8 {
        intensity(self.0.evaluate(pixel), self.0.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(width: usize, height: usize, cap: u32) -> EscapeTime {
        EscapeTime::new(PlaneMapper::new(width, height).unwrap(), cap).unwrap()
    }

    #[test]
    fn rejects_zero_cap() {
        assert!(EscapeTime::new(PlaneMapper::new(4, 4).unwrap(), 0).is_err());
    }

    #[test]
    fn origin_never_escapes() {
        let e = evaluator(4, 4, 100);
        assert_eq!(e.evaluate(Pixel(2, 2)), 100);
    }

    #[test]
    fn center_of_a_production_sized_image_is_in_the_set() {
        let e = evaluator(3072, 1920, 2047);
        assert_eq!(e.evaluate(Pixel(1536, 960)), 2047);
    }

    #[test]
    fn far_points_escape_at_once() {
        assert_eq!(iterate(Complex::new(1000.0, 1000.0), 2047), 1);
        // The corner of a square image is (-2, 2i), well outside the set.
        let e = evaluator(4, 4, 2047);
        assert!(e.evaluate(Pixel(0, 0)) <= 2);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let e = evaluator(64, 48, 500);
        for &p in &[Pixel(0, 0), Pixel(17, 31), Pixel(40, 24), Pixel(63, 47)] {
            assert_eq!(e.evaluate(p), e.evaluate(p));
        }
    }

    #[test]
    fn counts_never_exceed_the_cap() {
        let e = evaluator(16, 16, 30);
        for y in 0..16 {
            for x in 0..16 {
                assert!(e.evaluate(Pixel(x, y)) <= 30);
            }
        }
    }

    #[test]
    fn intensity_is_a_linear_rescale() {
        assert_eq!(intensity(0, 2047), 0);
        assert_eq!(intensity(2047, 2047), 255);
        assert_eq!(intensity(1, 2), 127);
        assert_eq!(intensity(1000, 2047), (1000 * 255 / 2047) as u8);
    }

    #[test]
    fn grayscale_maps_the_set_to_white() {
        let g = Grayscale(evaluator(4, 4, 64));
        assert_eq!(g.evaluate(Pixel(2, 2)), MAX_INTENSITY);
        assert!(g.evaluate(Pixel(0, 0)) < 10);
    }

    #[test]
    fn closures_are_evaluators() {
        let stub = |p: Pixel| p.0 + p.1;
        assert_eq!(stub.evaluate(Pixel(3, 4)), 7);
    }
}
