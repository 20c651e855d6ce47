//! Busy-indicator canvas animations for long-running backend operations.
//!
//! Two modes share one frame driver: `opt` reshuffles seven pieces into a
//! compact block, `pdf` packs scattered pieces and morphs them into a page
//! icon. The engine is plain Rust and runs headless; the browser binding is
//! only compiled for wasm32.

pub mod config;
pub mod controller;
pub mod driver;
pub mod easing;
pub mod error;
pub mod morph;
pub mod packing;
pub mod scene;
pub mod surface;

pub use config::{AnimConfig, Mode};
pub use controller::{start_with, AnimationHandle, CanvasTarget, Container};
pub use error::AnimError;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub use wasm::{start, start_with_config, OptimizerAnim};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::{AnimConfig, Mode};
    use crate::controller::{start_with, AnimationHandle};

    mod dom;
    mod render;

    use dom::DomContainer;

    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
        // The host page may already have installed a logger.
        console_log::init_with_level(log::Level::Info).ok();
    }

    /// Handle returned to JavaScript by [`start`].
    #[wasm_bindgen]
    pub struct OptimizerAnim {
        handle: AnimationHandle<DomContainer>,
    }

    #[wasm_bindgen]
    impl OptimizerAnim {
        /// Stop the animation permanently and hide the container.
        pub fn finish(&self) {
            self.handle.finish();
        }

        #[wasm_bindgen(getter)]
        pub fn animating(&self) -> bool {
            self.handle.is_animating()
        }
    }

    /// Show the animation for `mode` (`"opt"` or `"pdf"`) inside `target`, a
    /// CSS selector or an element. Never throws.
    #[wasm_bindgen]
    pub fn start(target: JsValue, mode: &str) -> OptimizerAnim {
        launch(&target, mode, &AnimConfig::default())
    }

    /// Like [`start`], with options given as a JSON object string.
    #[wasm_bindgen(js_name = startWithConfig)]
    pub fn start_with_config(target: JsValue, mode: &str, config: &str) -> OptimizerAnim {
        let config = AnimConfig::from_json(config).unwrap_or_else(|err| {
            log::warn!("{err}; using default options");
            AnimConfig::default()
        });
        launch(&target, mode, &config)
    }

    fn launch(target: &JsValue, mode: &str, config: &AnimConfig) -> OptimizerAnim {
        let mode = mode.parse::<Mode>().unwrap_or_else(|err| {
            log::warn!("{err}; falling back to `pdf`");
            Mode::Morph
        });
        OptimizerAnim {
            handle: start_with(DomContainer::resolve(target, config), mode, config),
        }
    }
}
