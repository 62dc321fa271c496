//! Renderer-independent driver for real-time trajectory playback.
//!
//! The window binary owns drawing and input; this module decides how much of
//! each recorded path is visible on a given frame and when to stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::Vector2;

use crate::core::window::playback_extent;
use crate::core::{ANGLE_COUNT, Result, SimulationError, TrajectorySet};

pub const CANVAS_WIDTH: f32 = 1280.0;
pub const CANVAS_HEIGHT: f32 = 520.0;
pub const STEPS_PER_FRAME: usize = 25;
pub const MAX_FRAMES_PER_SECOND: f64 = 60.0;

/// Shared stop signal; clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Maps world metres onto canvas pixels, origin bottom-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasScale {
    pub world_max_x: f64,
    pub world_max_y: f64,
    pub width: f32,
    pub height: f32,
}

impl CanvasScale {
    pub fn for_selection(
        set: &TrajectorySet,
        indices: &[usize],
        width: f32,
        height: f32,
    ) -> Result<Self> {
        let mut raw_max_x = f64::NEG_INFINITY;
        let mut raw_max_y = f64::NEG_INFINITY;
        for &index in indices {
            let trajectory = set.trajectory(index)?;
            if let Some(last) = trajectory.final_position() {
                raw_max_x = raw_max_x.max(last.x);
            }
            raw_max_y = raw_max_y.max(trajectory.max_height());
        }
        let (world_max_x, world_max_y) = playback_extent(raw_max_x, raw_max_y);
        Ok(Self {
            world_max_x,
            world_max_y,
            width,
            height,
        })
    }

    pub fn to_canvas(&self, position: &Vector2<f64>) -> (f32, f32) {
        let x = position.x / self.world_max_x * self.width as f64;
        let y = position.y / self.world_max_y * self.height as f64;
        (x as f32, self.height - y as f32)
    }
}

/// Walks `[0, total)` in fixed batches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchCursor {
    batch: usize,
    shown: usize,
    total: usize,
}

impl BatchCursor {
    pub fn new(total: usize, batch: usize) -> Self {
        Self {
            batch: batch.max(1),
            shown: 0,
            total,
        }
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn is_finished(&self) -> bool {
        self.shown >= self.total
    }

    pub fn advance(&mut self) -> usize {
        self.shown = (self.shown + self.batch).min(self.total);
        self.shown
    }

    pub fn restart(&mut self) {
        self.shown = 0;
    }
}

pub struct Playback {
    set: Arc<TrajectorySet>,
    indices: Vec<usize>,
    scale: CanvasScale,
    cursor: BatchCursor,
    token: CancellationToken,
    passes: usize,
}

impl Playback {
    /// An empty selection plays every angle. Repeated indices are dropped.
    pub fn new(
        set: Arc<TrajectorySet>,
        indices: &[usize],
        token: CancellationToken,
    ) -> Result<Self> {
        let mut selected: Vec<usize> = Vec::with_capacity(ANGLE_COUNT);
        for &index in indices {
            if index >= ANGLE_COUNT {
                return Err(SimulationError::UnknownAngle {
                    index,
                    count: ANGLE_COUNT,
                });
            }
            if !selected.contains(&index) {
                selected.push(index);
            }
        }
        if selected.is_empty() {
            selected.extend(0..ANGLE_COUNT);
        }

        let scale = CanvasScale::for_selection(&set, &selected, CANVAS_WIDTH, CANVAS_HEIGHT)?;
        let cursor = BatchCursor::new(set.step_count(), STEPS_PER_FRAME);
        Ok(Self {
            set,
            indices: selected,
            scale,
            cursor,
            token,
            passes: 0,
        })
    }

    pub fn set(&self) -> &TrajectorySet {
        &self.set
    }

    pub fn shared_set(&self) -> &Arc<TrajectorySet> {
        &self.set
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn scale(&self) -> CanvasScale {
        self.scale
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Steps to show this frame, or `None` once stopped. Loops until cancelled.
    pub fn next_frame(&mut self) -> Option<usize> {
        if self.token.is_cancelled() {
            return None;
        }
        if self.cursor.is_finished() {
            self.cursor.restart();
            self.passes += 1;
            log::debug!("playback pass {} finished, restarting", self.passes);
        }
        Some(self.cursor.advance())
    }
}
