use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Document, Element, HtmlCanvasElement};

use super::render::describe;
use crate::config::AnimConfig;
use crate::controller::Container;

/// The host element: a caption node plus the canvas the animation draws on.
pub struct DomContainer {
    element: Element,
    document: Document,
    visible_class: String,
    label_class: String,
}

impl DomContainer {
    /// Look up `target`, either a CSS selector string or an element.
    pub fn resolve(target: &JsValue, config: &AnimConfig) -> Option<Self> {
        let document = window()?.document()?;
        let element = match target.as_string() {
            Some(selector) => document.query_selector(&selector).ok().flatten()?,
            None => target.dyn_ref::<Element>()?.clone(),
        };
        Some(Self {
            element,
            document,
            visible_class: config.visible_class.clone(),
            label_class: config.label_class.clone(),
        })
    }

    fn create_caption(&self, text: &str) -> Result<(), JsValue> {
        let label = self.document.create_element("div")?;
        label.set_class_name(&self.label_class);
        label.set_text_content(Some(text));
        self.element.append_child(&label)?;
        Ok(())
    }
}

impl Container for DomContainer {
    type Canvas = HtmlCanvasElement;

    fn show(&self) {
        if let Err(err) = self.element.class_list().add_1(&self.visible_class) {
            log::debug!("cannot show container: {}", describe(&err));
        }
    }

    fn hide(&self) {
        if let Err(err) = self.element.class_list().remove_1(&self.visible_class) {
            log::debug!("cannot hide container: {}", describe(&err));
        }
    }

    fn set_caption(&self, text: &str) {
        let selector = format!(".{}", self.label_class);
        if let Ok(Some(label)) = self.element.query_selector(&selector) {
            label.set_text_content(Some(text));
        } else if let Err(err) = self.create_caption(text) {
            log::debug!("cannot add caption: {}", describe(&err));
        }
    }

    fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.element
            .query_selector("canvas")
            .ok()
            .flatten()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }
}
