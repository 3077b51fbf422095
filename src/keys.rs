use scene_core::KeyHandlers;
use web_sys as web;

const KEY_EVENTS: [&str; 3] = ["keypress", "keydown", "keyup"];

/// The interactor's own key handlers, bound on the document body.
pub struct DocumentKeys {
    body: web::HtmlElement,
    handlers: [js_sys::Function; 3],
}

impl DocumentKeys {
    pub fn new(document: &web::Document, interactor: &crate::engine::VtkInteractor) -> anyhow::Result<Self> {
        let body = document.body().ok_or_else(|| anyhow::anyhow!("no document body"))?;
        Ok(Self {
            body,
            handlers: [
                interactor.handle_key_press(),
                interactor.handle_key_down(),
                interactor.handle_key_up(),
            ],
        })
    }
}

impl KeyHandlers for DocumentKeys {
    fn attach(&self) {
        for (event, handler) in KEY_EVENTS.iter().zip(&self.handlers) {
            _ = self.body.add_event_listener_with_callback(event, handler);
        }
    }

    fn detach(&self) {
        for (event, handler) in KEY_EVENTS.iter().zip(&self.handlers) {
            _ = self.body.remove_event_listener_with_callback(event, handler);
        }
    }
}
