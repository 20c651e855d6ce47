//! Mounting an animation onto a host container and tearing it down again.
//!
//! [`start_with`] never fails: a missing container yields an inert handle,
//! a missing or unusable canvas yields a handle that only hides the
//! container. Problems are logged, not returned.

use crate::config::{AnimConfig, Mode};
use crate::driver::{FrameLoop, RunFlag};
use crate::error::AnimError;
use crate::scene::{self, rng_from_seed};

/// The element hosting the animation: a caption and (usually) a canvas.
pub trait Container {
    type Canvas: CanvasTarget;

    /// Add the visibility marker.
    fn show(&self);
    /// Remove the visibility marker.
    fn hide(&self);
    /// Write the caption, creating the caption node if there is none.
    fn set_caption(&self, text: &str);
    fn canvas(&self) -> Option<Self::Canvas>;
}

/// A canvas that can run a [`FrameLoop`] once per display refresh.
pub trait CanvasTarget {
    fn set_size(&self, width: u32, height: u32);
    /// Start calling `frames` every refresh until it asks to stop.
    fn launch(self, frames: FrameLoop) -> Result<(), AnimError>;
}

/// Returned by [`start_with`]; `finish` stops the animation for good.
pub struct AnimationHandle<C: Container> {
    container: Option<C>,
    run: Option<RunFlag>,
}

impl<C: Container> AnimationHandle<C> {
    fn inert() -> Self {
        Self {
            container: None,
            run: None,
        }
    }

    /// Stop the frame loop (if any) and hide the container (if any).
    /// Calling it again is harmless.
    pub fn finish(&self) {
        if let Some(run) = &self.run {
            run.stop();
        }
        if let Some(container) = &self.container {
            container.hide();
        }
        log::debug!("animation finished");
    }

    /// Whether a frame loop was started and has not been finished.
    pub fn is_animating(&self) -> bool {
        self.run.as_ref().is_some_and(RunFlag::is_running)
    }
}

pub fn start_with<C: Container>(container: Option<C>, mode: Mode, config: &AnimConfig) -> AnimationHandle<C> {
    let config = &config.clone().validated();
    let Some(container) = container else {
        log::warn!("animation container not found; nothing to show");
        return AnimationHandle::inert();
    };

    container.show();
    container.set_caption(config.label(mode));

    let Some(canvas) = container.canvas() else {
        log::warn!("animation container has no canvas; showing caption only");
        return AnimationHandle {
            container: Some(container),
            run: None,
        };
    };

    canvas.set_size(config.canvas_width, config.canvas_height);
    let scene = scene::build(
        mode,
        f64::from(config.canvas_width),
        f64::from(config.canvas_height),
        config,
        rng_from_seed(config.seed),
    );
    let frames = FrameLoop::new(scene, config.max_frame_dt_ms);
    let run = frames.run_flag();
    if let Err(err) = canvas.launch(frames) {
        log::warn!("animation not started: {err}");
        return AnimationHandle {
            container: Some(container),
            run: None,
        };
    }

    log::info!("started {mode} animation");
    AnimationHandle {
        container: Some(container),
        run: Some(run),
    }
}
