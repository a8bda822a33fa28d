// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong on the way from a configuration to an
//! image on disk.  The renderer proper cannot fail once it has been
//! handed a valid configuration; what remains are bad inputs, a
//! panicking worker (which is a bug), and the encoder's I/O.

use failure::Fail;

/// Errors raised by configuration, rendering, and encoding.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// Width or height of zero, a side too long for the encoder, or
    /// more cells than can be addressed.
    #[fail(display = "invalid image dimensions {}x{}", _0, _1)]
    InvalidDimensions(usize, usize),

    /// A worker count of zero.
    #[fail(display = "worker count must be at least 1")]
    NoWorkers,

    /// More workers than the configured cap.
    #[fail(display = "worker count {} is above the cap of {}", _0, _1)]
    TooManyWorkers(usize, usize),

    /// An iteration cap of zero.
    #[fail(display = "iteration cap must be at least 1")]
    NoIterations,

    /// The canvas handed to the scheduler is not the size the shard
    /// layout was computed for.
    #[fail(
        display = "canvas is {}x{} but the shards cover {}x{}",
        canvas_width, canvas_height, width, height
    )]
    CanvasMismatch {
        /// Canvas width.
        canvas_width: usize,
        /// Canvas height.
        canvas_height: usize,
        /// Width covered by the shard layout.
        width: usize,
        /// Height covered by the shard layout.
        height: usize,
    },

    /// One of the shard threads panicked before the join.
    #[fail(display = "a shard worker panicked")]
    WorkerPanicked,

    /// Could not open or write the output file.
    #[fail(display = "could not write output: {}", _0)]
    Io(#[cause] std::io::Error),

    /// The encoder rejected the buffer.
    #[fail(display = "could not encode image: {}", _0)]
    Image(#[cause] image::ImageError),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Image(err)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, RenderError>;
