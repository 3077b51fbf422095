//! DOM side of the color-bar panel.

use crate::dom::{self, EventListener};
use crate::engine::WidgetHooks;
use crate::style;
use scene_core::{LegendSurface, PanelStyle, Result, SceneError, LEGEND_PLACEHOLDER};
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use web_sys as web;

pub struct DomPanel {
    root: web::HtmlElement,
    placeholder: web::HtmlElement,
    click: RefCell<Option<EventListener>>,
}

pub struct DomLegends {
    document: web::Document,
    container: web::HtmlElement,
    hooks: WidgetHooks,
}

impl DomLegends {
    pub fn new(document: web::Document, container: web::HtmlElement, hooks: WidgetHooks) -> Self {
        Self {
            document,
            container,
            hooks,
        }
    }

    fn element(&self, tag: &str) -> Result<web::HtmlElement> {
        dom::create_element(&self.document, tag).map_err(|e| SceneError::Engine(e.to_string()))
    }
}

impl LegendSurface for DomLegends {
    type Panel = DomPanel;
    type Legend = web::HtmlCanvasElement;
    type Mapper = JsValue;

    fn create_panel(&self, panel_style: &PanelStyle) -> Result<DomPanel> {
        let root = self.element("div")?;
        dom::set_style(
            &root,
            &style::legend_panel_css(panel_style.expanded_width_px, panel_style.max_height_px),
        );
        let placeholder = self.element("span")?;
        dom::set_style(&placeholder, style::LEGEND_PLACEHOLDER_CSS);
        placeholder.set_text_content(Some(LEGEND_PLACEHOLDER));
        root.append_child(&placeholder)
            .and_then(|_| self.container.append_child(&root))
            .map_err(|e| SceneError::Engine(format!("legend panel: {:?}", e)))?;
        Ok(DomPanel {
            root,
            placeholder,
            click: RefCell::new(None),
        })
    }

    fn remove_panel(&self, panel: &DomPanel) {
        let click = panel.click.borrow_mut().take();
        drop(click);
        panel.root.remove();
    }

    fn create_legend(&self, panel: &DomPanel, mapper: &JsValue) -> Result<web::HtmlCanvasElement> {
        self.hooks
            .build_legend(&panel.root, mapper)
            .map_err(|e| SceneError::Factory(format!("color bar: {:?}", e)))
    }

    fn attach_legend(&self, panel: &DomPanel, legend: &web::HtmlCanvasElement) {
        _ = panel.root.append_child(legend);
    }

    fn detach_legend(&self, panel: &DomPanel, legend: &web::HtmlCanvasElement) {
        let root: &web::Node = panel.root.as_ref();
        if legend
            .parent_node()
            .map_or(false, |parent| parent.is_same_node(Some(root)))
        {
            _ = root.remove_child(legend);
        }
    }

    fn show_placeholder(&self, panel: &DomPanel) {
        dom::set_style_property(&panel.placeholder, "display", style::display(true));
    }

    fn hide_placeholder(&self, panel: &DomPanel) {
        dom::set_style_property(&panel.placeholder, "display", style::display(false));
    }

    fn set_size(&self, panel: &DomPanel, width_px: u32, height_px: Option<u32>) {
        dom::set_style_property(&panel.root, "width", &style::px(width_px));
        dom::set_style_property(&panel.root, "height", &style::height_value(height_px));
    }

    fn on_click(&self, panel: &DomPanel, handler: Box<dyn Fn()>) {
        let target: &web::EventTarget = panel.root.as_ref();
        let listener = EventListener::new(target, "click", move |_| handler());
        panel.click.replace(Some(listener));
    }
}
