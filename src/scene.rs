//! The per-mode animator interface driven by the frame loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AnimConfig, Mode};
use crate::morph::MorphScene;
use crate::packing::PackingScene;
use crate::surface::Surface;

/// One animation mode. `update` advances state by `dt` milliseconds;
/// `render` draws the current state without mutating it.
pub trait Scene {
    fn update(&mut self, dt: f64);
    fn render(&self, surface: &mut dyn Surface);
}

/// Uniform sample in `[lo, hi)`. Unlike `random_range` this tolerates an
/// empty or inverted range, which degenerate canvas sizes can produce.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + rng.random::<f64>() * (hi - lo)
}

/// RNG for one run: fixed when `seed` is given, OS-seeded otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Construct the animator for `mode` on a `width` x `height` canvas.
pub fn build(mode: Mode, width: f64, height: f64, config: &AnimConfig, rng: StdRng) -> Box<dyn Scene> {
    match mode {
        Mode::Packing => Box::new(PackingScene::new(width, height, config, rng)),
        Mode::Morph => Box::new(MorphScene::new(width, height, rng)),
    }
}
