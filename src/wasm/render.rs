use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::controller::CanvasTarget;
use crate::driver::FrameLoop;
use crate::error::AnimError;
use crate::surface::{Rect, Rgba, Surface};

/// Readable text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn check(result: Result<(), JsValue>, op: &str) {
    if let Err(err) = result {
        log::trace!("canvas {op} failed: {}", describe(&err));
    }
}

/// [`Surface`] over a canvas 2D context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, AnimError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|err| AnimError::Context(describe(&err)))?
            .ok_or_else(|| AnimError::Context("2d context not supported".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AnimError::Context("unexpected context type".to_owned()))?;
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        check(self.ctx.translate(x, y), "translate");
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        check(self.ctx.scale(sx, sy), "scale");
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64) {
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, font: &str, color: Rgba) {
        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&color.to_string());
        check(self.ctx.fill_text(text, x, y), "fill_text");
    }
}

/// Run `frames` from `requestAnimationFrame` until it reports stopped.
pub fn spawn(mut frames: FrameLoop, mut surface: CanvasSurface) -> Result<(), JsValue> {
    let window = window().ok_or("no window")?;

    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let win = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        if !frames.frame(timestamp, &mut surface) {
            // Dropping the closure breaks the `f` <-> closure cycle.
            let _ = f.borrow_mut().take();
            return;
        }

        // schedule next
        let scheduled = match f.borrow().as_ref() {
            Some(cb) => win.request_animation_frame(cb.as_ref().unchecked_ref()).map(drop),
            None => Ok(()),
        };
        if let Err(err) = scheduled {
            log::warn!("animation stopped, cannot schedule frame: {}", describe(&err));
            let _ = f.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>));

    let scheduled = match g.borrow().as_ref() {
        Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref()).map(drop),
        None => Err(JsValue::from_str("frame callback missing")),
    };
    if scheduled.is_err() {
        let _ = g.borrow_mut().take();
    }
    scheduled
}

impl CanvasTarget for HtmlCanvasElement {
    fn set_size(&self, width: u32, height: u32) {
        self.set_width(width);
        self.set_height(height);
    }

    fn launch(self, frames: FrameLoop) -> Result<(), AnimError> {
        let surface = CanvasSurface::new(&self)?;
        spawn(frames, surface).map_err(|err| AnimError::Schedule(describe(&err)))
    }
}
