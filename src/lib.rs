#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sharded Mandelbrot renderer
//!
//! Every pixel of a Mandelbrot image can be computed without knowing
//! anything about its neighbours: map the pixel to a point `c` on the
//! complex plane, iterate `z <- z^2 + c` from zero, and count how long
//! it takes `z` to leave the disc of radius two.  That count, rescaled
//! to a grey level, is the pixel.
//!
//! That independence is what this crate exploits.  The worker count
//! is factored into a near-square grid, the image is cut along that
//! grid into rectangular shards, and one thread per shard fills in its
//! own rectangle of a single shared buffer.  The shards never overlap
//! and always cover the whole image, so each thread is handed
//! exclusive `&mut` access to its own cells up front and no locking is
//! needed; the only synchronization is waiting for every thread to
//! finish before the buffer is handed to the encoder.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod canvas;
pub mod config;
pub mod errors;
pub mod escape;
pub mod output;
pub mod planes;
pub mod scheduler;
pub mod shards;

pub use canvas::{Canvas, ShardView};
pub use config::RenderConfig;
pub use errors::{RenderError, Result};
pub use escape::{EscapeTime, Evaluator, Grayscale};
pub use output::{write_image, write_text};
pub use planes::{Pixel, PlaneMapper};
pub use scheduler::{render_mandelbrot, Scheduler};
pub use shards::{Shard, ShardGrid, ShardLayout};
