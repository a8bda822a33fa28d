// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cutting the image into rectangles, one per worker.
//!
//! The worker count is factored into a near-square grid of columns
//! and rows, and the image is divided along that grid.  The divisions
//! are integral, so whatever doesn't divide evenly is given to the
//! last column and the last row.  Every pixel of the image lands in
//! exactly one shard; the canvas relies on that to hand out mutable
//! regions without locks.

use std::cmp::Ordering;
use std::ops::Range;

use itertools::iproduct;

use crate::config::check_dimensions;
use crate::errors::{RenderError, Result};
use crate::planes::Pixel;

/// The number of shard columns and rows.  `columns * rows` is always
/// exactly the worker count it was made from, and `columns >= rows`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShardGrid {
    /// Shards across.
    pub columns: usize,
    /// Shards down.
    pub rows: usize,
}

impl ShardGrid {
    /// Factors `workers` into two integers, starting at its square
    /// root and walking outward until the product is exact.  A prime
    /// count can only come out as `workers x 1`.
    pub fn for_workers(workers: usize) -> Result<ShardGrid> {
        if workers == 0 {
            return Err(RenderError::NoWorkers);
        }
        let mut a = isqrt(workers);
        let mut b = workers / a;
        loop {
            match (a * b).cmp(&workers) {
                Ordering::Less => a += 1,
                Ordering::Greater => b -= 1,
                Ordering::Equal => break,
            }
        }
        Ok(ShardGrid {
            columns: a.max(b),
            rows: a.min(b),
        })
    }

    /// Number of shards in the grid.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// A grid always holds at least one shard.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn isqrt(n: usize) -> usize {
    let mut a = (n as f64).sqrt() as usize;
    while a * a > n {
        a -= 1;
    }
    while (a + 1) * (a + 1) <= n {
        a += 1;
    }
    a.max(1)
}

/// A half-open rectangle of pixels, `[left, right) x [top, bottom)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Shard {
    /// First column.
    pub left: usize,
    /// First row.
    pub top: usize,
    /// One past the last column.
    pub right: usize,
    /// One past the last row.
    pub bottom: usize,
}

impl Shard {
    /// Builds a shard from its column and row spans.
    pub fn new(columns: &Range<usize>, rows: &Range<usize>) -> Shard {
        Shard {
            left: columns.start,
            top: rows.start,
            right: columns.end,
            bottom: rows.end,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// Number of pixels covered.
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// True if the shard covers nothing.  Happens when the image is
    /// narrower (or shorter) than the grid.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a pixel falls inside this shard.
    pub fn contains(&self, pixel: Pixel) -> bool {
        pixel.0 >= self.left && pixel.0 < self.right && pixel.1 >= self.top && pixel.1 < self.bottom
    }

    /// Every pixel in the shard, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(self.top..self.bottom, self.left..self.right).map(|(y, x)| Pixel(x, y))
    }
}

/// Splits `0..len` into `parts` consecutive spans of `len / parts`,
/// the last one running to `len`.
fn spans(len: usize, parts: usize) -> Vec<Range<usize>> {
    let size = len / parts;
    (0..parts)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == parts { len } else { start + size };
            start..end
        })
        .collect()
}

/// The grid laid over a concrete image.
#[derive(Clone, Debug, PartialEq)]
pub struct ShardLayout {
    width: usize,
    height: usize,
    grid: ShardGrid,
    columns: Vec<Range<usize>>,
    rows: Vec<Range<usize>>,
}

impl ShardLayout {
    /// Lays `grid` over a `width x height` image.
    pub fn new(width: usize, height: usize, grid: ShardGrid) -> Result<ShardLayout> {
        check_dimensions(width, height)?;
        if grid.is_empty() {
            return Err(RenderError::NoWorkers);
        }
        Ok(ShardLayout {
            width,
            height,
            grid,
            columns: spans(width, grid.columns),
            rows: spans(height, grid.rows),
        })
    }

    /// Image width covered by the layout.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height covered by the layout.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The grid this layout was built from.
    pub fn grid(&self) -> ShardGrid {
        self.grid
    }

    /// Column spans, left to right.
    pub fn columns(&self) -> &[Range<usize>] {
        &self.columns
    }

    /// Row spans, top to bottom.
    pub fn rows(&self) -> &[Range<usize>] {
        &self.rows
    }

    /// Size of an ordinary (not last) shard: `(width / columns,
    /// height / rows)`.
    pub fn shard_size(&self) -> (usize, usize) {
        (self.width / self.grid.columns, self.height / self.grid.rows)
    }

    /// All shards, row-major: the shard in grid row `r`, column `c`
    /// is at index `r * columns + c`.
    pub fn shards(&self) -> Vec<Shard> {
        iproduct!(self.rows.iter(), self.columns.iter())
            .map(|(rows, columns)| Shard::new(columns, rows))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(workers: usize) -> (usize, usize) {
        let g = ShardGrid::for_workers(workers).unwrap();
        (g.columns, g.rows)
    }

    fn layout(width: usize, height: usize, workers: usize) -> ShardLayout {
        ShardLayout::new(width, height, ShardGrid::for_workers(workers).unwrap()).unwrap()
    }

    #[test]
    fn zero_workers_is_an_error() {
        assert!(ShardGrid::for_workers(0).is_err());
    }

    #[test]
    fn small_worker_counts_factor_as_expected() {
        assert_eq!(grid(1), (1, 1));
        assert_eq!(grid(2), (2, 1));
        assert_eq!(grid(3), (3, 1));
        assert_eq!(grid(4), (2, 2));
        assert_eq!(grid(6), (3, 2));
        assert_eq!(grid(7), (7, 1));
        assert_eq!(grid(8), (4, 2));
        assert_eq!(grid(10), (5, 2));
        assert_eq!(grid(12), (4, 3));
        assert_eq!(grid(16), (4, 4));
    }

    #[test]
    fn factorization_is_always_exact_and_wide() {
        for k in 1..=1000 {
            let g = ShardGrid::for_workers(k).unwrap();
            assert_eq!(g.columns * g.rows, k, "k = {}", k);
            assert!(g.columns >= g.rows, "k = {}", k);
        }
    }

    #[test]
    fn isqrt_is_exact() {
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
    }

    #[test]
    fn spans_give_the_remainder_to_the_last() {
        assert_eq!(spans(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(spans(4, 2), vec![0..2, 2..4]);
        assert_eq!(spans(2, 3), vec![0..0, 0..0, 0..2]);
    }

    #[test]
    fn four_by_four_with_four_workers() {
        let l = layout(4, 4, 4);
        assert_eq!(l.grid(), ShardGrid { columns: 2, rows: 2 });
        assert_eq!(l.shard_size(), (2, 2));
        let shards = l.shards();
        assert_eq!(shards.len(), 4);
        for s in &shards {
            assert_eq!((s.width(), s.height()), (2, 2));
        }
    }

    #[test]
    fn prime_worker_count_absorbs_the_remainder() {
        let l = layout(10, 4, 3);
        assert_eq!(l.grid(), ShardGrid { columns: 3, rows: 1 });
        let shards = l.shards();
        let widths: Vec<usize> = shards.iter().map(Shard::width).collect();
        assert_eq!(widths, vec![3, 3, 4]);
        assert!(shards.iter().all(|s| s.height() == 4));
        assert_eq!(shards.iter().map(Shard::len).sum::<usize>(), 40);
        assert_eq!(shards[2].right, 10);
    }

    fn coverage(width: usize, height: usize, workers: usize) -> Vec<u32> {
        let mut counts = vec![0u32; width * height];
        for shard in layout(width, height, workers).shards() {
            for Pixel(x, y) in shard.pixels() {
                assert!(x < width && y < height);
                counts[y * width + x] += 1;
            }
        }
        counts
    }

    #[test]
    fn shards_cover_every_pixel_exactly_once() {
        for &(w, h) in &[(1, 1), (4, 4), (10, 4), (7, 13), (33, 17), (3, 2), (64, 48)] {
            for k in 1..=24 {
                let counts = coverage(w, h, k);
                assert!(
                    counts.iter().all(|&c| c == 1),
                    "{}x{} with {} workers",
                    w,
                    h,
                    k
                );
            }
        }
    }

    #[test]
    fn contains_matches_pixels() {
        let s = Shard::new(&(3..6), &(1..4));
        assert!(s.contains(Pixel(3, 1)));
        assert!(s.contains(Pixel(5, 3)));
        assert!(!s.contains(Pixel(6, 3)));
        assert!(!s.contains(Pixel(5, 4)));
        assert!(!s.contains(Pixel(2, 1)));
        assert_eq!(s.pixels().count(), s.len());
        assert!(s.pixels().all(|p| s.contains(p)));
    }

    #[test]
    fn narrow_images_leave_empty_shards() {
        let l = layout(2, 2, 8);
        let shards = l.shards();
        assert_eq!(shards.len(), 8);
        // Only the last column is wider than zero.
        let filled: Vec<&Shard> = shards.iter().filter(|s| !s.is_empty()).collect();
        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|s| s.left == 0 && s.right == 2));
    }
}
