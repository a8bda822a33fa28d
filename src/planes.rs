// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which relates a rectangle on the
//! integral plane (the image, origin at the top left) to the classic
//! view of the Mandelbrot set on the complex plane.
use num::Complex;

use crate::config::check_dimensions;
use crate::errors::Result;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel.  x grows to the right, y grows down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels to points on the complex plane.  The shorter side of
/// the image always spans four units, [-2, 2], and the longer side is
/// widened to keep the aspect ratio, so the view stays centered on
/// the origin whatever the shape of the image.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The right-lower corner of the integral plane.
    pub integral_plane: IntegralPlane,
    // The complex point under pixel (0, 0).
    origin: Complex<f64>,
    // min(width, height), as a float.
    scale: f64,
}

impl PlaneMapper {
    /// Constructor.  Fails on an empty plane.  The imaginary axis
    /// starts at `2 * height / min(width, height)`; for images no
    /// taller than they are wide that is `2`, and pixel row `y` maps
    /// to `2 - 4y / min(width, height)`.
    pub fn new(width: usize, height: usize) -> Result<PlaneMapper> {
        check_dimensions(width, height)?;
        let scale = width.min(height) as f64;
        let origin = Complex::new(
            -2.0 * (width as f64) / scale,
            2.0 * (height as f64) / scale,
        );
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            origin,
            scale,
        })
    }

    /// Image width.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Image height.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Always false for a mapper built through `new`.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Row-major offset of a pixel into a buffer of `len()` cells.
    pub fn offset(&self, pixel: Pixel) -> Option<usize> {
        if pixel.0 < self.integral_plane.0 && pixel.1 < self.integral_plane.1 {
            Some(pixel.1 * self.integral_plane.0 + pixel.0)
        } else {
            None
        }
    }

    /// Given a pixel on the integral plane, return the complex number
    /// that it stands for.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            self.origin.re + 4.0 * (pixel.0 as f64) / self.scale,
            self.origin.im - 4.0 * (pixel.1 as f64) / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_empty_plane() {
        assert!(PlaneMapper::new(0, 4).is_err());
        assert!(PlaneMapper::new(4, 0).is_err());
        assert!(PlaneMapper::new(1 << 33, 4).is_err());
    }

    #[test]
    fn square_plane_spans_four_units() {
        let pm = PlaneMapper::new(4, 4).unwrap();
        assert_eq!(pm.pixel_to_point(Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(Pixel(4, 4)), Complex::new(2.0, -2.0));
    }

    #[test]
    fn wide_plane_widens_the_real_axis() {
        let pm = PlaneMapper::new(8, 4).unwrap();
        assert_eq!(pm.pixel_to_point(Pixel(0, 0)), Complex::new(-4.0, 2.0));
        assert_eq!(pm.pixel_to_point(Pixel(4, 2)), Complex::new(0.0, 0.0));
    }

    #[test]
    fn tall_plane_stays_centered() {
        let pm = PlaneMapper::new(4, 8).unwrap();
        assert_eq!(pm.pixel_to_point(Pixel(0, 0)), Complex::new(-2.0, 4.0));
        assert_eq!(pm.pixel_to_point(Pixel(2, 4)), Complex::new(0.0, 0.0));
    }

    #[test]
    fn offsets_are_row_major() {
        let pm = PlaneMapper::new(5, 3).unwrap();
        assert_eq!(pm.len(), 15);
        assert!(!pm.is_empty());
        assert_eq!(pm.offset(Pixel(0, 0)), Some(0));
        assert_eq!(pm.offset(Pixel(4, 0)), Some(4));
        assert_eq!(pm.offset(Pixel(0, 1)), Some(5));
        assert_eq!(pm.offset(Pixel(4, 2)), Some(14));
        assert_eq!(pm.offset(Pixel(5, 0)), None);
        assert_eq!(pm.offset(Pixel(0, 3)), None);
    }
}
