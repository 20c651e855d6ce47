//! Frame driver core: per-frame delta timing and the cooperative stop flag.
//!
//! The browser build feeds [`FrameLoop::frame`] from `requestAnimationFrame`
//! and reschedules only while it returns `true`.

use std::cell::Cell;
use std::rc::Rc;

use crate::scene::Scene;
use crate::surface::Surface;

/// Turns callback timestamps into frame deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    elapsed: f64,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self {
            last: None,
            elapsed: 0.0,
            max_dt,
        }
    }

    /// Delta since the previous tick, clamped to `[0, max_dt]`. The first
    /// tick has no predecessor and yields 0. A negative or NaN `max_dt`
    /// freezes time rather than panicking.
    pub fn tick(&mut self, timestamp: f64) -> f64 {
        let dt = match self.last {
            Some(prev) => (timestamp - prev).max(0.0).min(self.max_dt.max(0.0)),
            None => 0.0,
        };
        self.last = Some(timestamp);
        self.elapsed += dt;
        dt
    }

    /// Sum of all deltas handed out so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Shared running flag. Clearing it is permanent.
#[derive(Debug, Clone)]
pub struct RunFlag(Rc<Cell<bool>>);

impl RunFlag {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.get()
    }

    pub fn stop(&self) {
        self.0.set(false);
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FrameLoop {
    scene: Box<dyn Scene>,
    clock: FrameClock,
    run: RunFlag,
    frames: u64,
}

impl FrameLoop {
    pub fn new(scene: Box<dyn Scene>, max_dt: f64) -> Self {
        Self {
            scene,
            clock: FrameClock::new(max_dt),
            run: RunFlag::new(),
            frames: 0,
        }
    }

    /// Handle for stopping this loop from outside the frame callback.
    pub fn run_flag(&self) -> RunFlag {
        self.run.clone()
    }

    /// Frames actually drawn.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Run one frame at `timestamp`. Returns whether another frame should be
    /// scheduled; once stopped, nothing is updated or drawn.
    pub fn frame(&mut self, timestamp: f64, surface: &mut dyn Surface) -> bool {
        if !self.run.is_running() {
            return false;
        }
        let dt = self.clock.tick(timestamp);
        self.scene.update(dt);
        surface.clear();
        self.scene.render(surface);
        self.frames += 1;
        true
    }
}
