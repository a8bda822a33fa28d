// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fork-join rendering: one scoped thread per shard, each running the
//! evaluator over its own rectangle and writing straight into its own
//! view of the canvas.  The crossbeam scope is the barrier; nothing
//! can look at the canvas until every shard thread has been joined.

use std::time::Instant;

use log::{debug, info};

use crate::canvas::Canvas;
use crate::config::RenderConfig;
use crate::errors::{RenderError, Result};
use crate::escape::{EscapeTime, Evaluator, Grayscale};
use crate::planes::PlaneMapper;
use crate::shards::{Shard, ShardGrid, ShardLayout};

/// Owns the shard layout for one image size and worker count.
#[derive(Clone, Debug)]
pub struct Scheduler {
    layout: ShardLayout,
}

impl Scheduler {
    /// Factors the worker count and lays the grid over the image.
    /// Bad dimensions or a zero worker count fail here, before any
    /// thread exists.
    pub fn new(width: usize, height: usize, workers: usize) -> Result<Scheduler> {
        let grid = ShardGrid::for_workers(workers)?;
        let layout = ShardLayout::new(width, height, grid)?;
        Ok(Scheduler { layout })
    }

    /// The layout the scheduler will render with.
    pub fn layout(&self) -> &ShardLayout {
        &self.layout
    }

    /// Every shard, in the layout's order.
    pub fn shards(&self) -> Vec<Shard> {
        self.layout.shards()
    }

    /// Evaluates every pixel of `canvas` and writes the result in
    /// place.  Returns only once every shard thread has finished.
    pub fn render<E>(&self, evaluator: &E, canvas: &mut Canvas<E::Output>) -> Result<()>
    where
        E: Evaluator,
    {
        let grid = self.layout.grid();
        let (shard_width, shard_height) = self.layout.shard_size();
        info!(
            "Parallel grid {} x {} of {} x {} shards",
            grid.columns, grid.rows, shard_width, shard_height
        );

        let views = canvas.split(&self.layout)?;
        let start = Instant::now();
        crossbeam::scope(|spawner| {
            for mut view in views.into_iter().filter(|v| !v.shard().is_empty()) {
                spawner.spawn(move |_| {
                    let shard = view.shard();
                    debug!("Shard {:?} started", shard);
                    for pixel in shard.pixels() {
                        view.set_pixel(pixel, evaluator.evaluate(pixel));
                    }
                    debug!("Shard {:?} done", shard);
                });
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)?;
        info!("Done in {:?}", start.elapsed());
        Ok(())
    }
}

/// Renders the grayscale Mandelbrot described by `config`.
pub fn render_mandelbrot(config: &RenderConfig) -> Result<Canvas<u8>> {
    let config = RenderConfig::new(
        config.width,
        config.height,
        config.max_iterations,
        config.workers,
    )?;
    info!("Threads: {}", config.workers);
    let plane = PlaneMapper::new(config.width, config.height)?;
    let evaluator = Grayscale(EscapeTime::new(plane, config.max_iterations)?);
    let scheduler = Scheduler::new(config.width, config.height, config.workers)?;
    let mut canvas = Canvas::new(config.width, config.height, 0u8)?;
    scheduler.render(&evaluator, &mut canvas)?;
    Ok(canvas)
}
