// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The output buffer.
//!
//! A `Canvas` is one contiguous, row-major allocation.  Before any
//! worker starts, `split` carves it into `ShardView`s: each view holds
//! the mutable row segments under one shard and nothing else, so the
//! borrow checker, not a lock, is what keeps workers off each other's
//! pixels.

use std::mem;

use crate::config::check_dimensions;
use crate::errors::{RenderError, Result};
use crate::planes::Pixel;
use crate::shards::{Shard, ShardLayout};

/// A `width x height` grid of cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas<T> {
    width: usize,
    height: usize,
    pixels: Vec<T>,
}

impl<T: Clone> Canvas<T> {
    /// A canvas with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Result<Canvas<T>> {
        check_dimensions(width, height)?;
        Ok(Canvas {
            width,
            height,
            pixels: vec![fill; width * height],
        })
    }
}

impl<T> Canvas<T> {
    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell under a pixel, if it is on the canvas.
    pub fn get(&self, pixel: Pixel) -> Option<&T> {
        if pixel.0 < self.width && pixel.1 < self.height {
            self.pixels.get(pixel.1 * self.width + pixel.0)
        } else {
            None
        }
    }

    /// The whole buffer, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.pixels
    }

    /// Gives up the buffer, row-major.
    pub fn into_raw(self) -> Vec<T> {
        self.pixels
    }

    /// Hands out one view per shard of `layout`, in the layout's
    /// row-major shard order.  The views borrow the canvas mutably
    /// and disjointly; the canvas can be read again once they are all
    /// dropped.
    pub fn split(&mut self, layout: &ShardLayout) -> Result<Vec<ShardView<'_, T>>> {
        if layout.width() != self.width || layout.height() != self.height {
            return Err(RenderError::CanvasMismatch {
                canvas_width: self.width,
                canvas_height: self.height,
                width: layout.width(),
                height: layout.height(),
            });
        }

        let columns = layout.columns();
        let mut views: Vec<ShardView<T>> = layout
            .shards()
            .into_iter()
            .map(|shard| ShardView {
                shard,
                lines: Vec::with_capacity(shard.height()),
            })
            .collect();

        let width = self.width;
        let mut rest: &mut [T] = &mut self.pixels;
        for (r, rows) in layout.rows().iter().enumerate() {
            let (band, tail) = mem::take(&mut rest).split_at_mut(rows.len() * width);
            rest = tail;
            for line in band.chunks_mut(width) {
                let mut line: &mut [T] = line;
                for (c, span) in columns.iter().enumerate() {
                    let (segment, tail) = mem::take(&mut line).split_at_mut(span.len());
                    line = tail;
                    views[r * columns.len() + c].lines.push(segment);
                }
            }
        }
        Ok(views)
    }
}

/// Exclusive write access to the cells under one shard.
#[derive(Debug)]
pub struct ShardView<'a, T> {
    shard: Shard,
    lines: Vec<&'a mut [T]>,
}

impl<'a, T> ShardView<'a, T> {
    /// The shard this view covers.
    pub fn shard(&self) -> Shard {
        self.shard
    }

    /// Writes one cell.  `pixel` is in image coordinates.  Writing
    /// outside the shard is a bug in the caller and panics.
    pub fn set_pixel(&mut self, pixel: Pixel, value: T) {
        assert!(
            self.shard.contains(pixel),
            "pixel {:?} is outside shard {:?}",
            pixel,
            self.shard
        );
        self.lines[pixel.1 - self.shard.top][pixel.0 - self.shard.left] = value;
    }
}
