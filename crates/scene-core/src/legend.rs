//! Collapsible legend panel: one legend per color mapper.

use crate::constants::{LEGEND_COLLAPSED_WIDTH_PX, LEGEND_EXPANDED_WIDTH_PX, LEGEND_MAX_HEIGHT_PX};
use crate::engine::LegendSurface;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    /// Full width, every legend attached, automatic height.
    Expanded,
    /// Square placeholder, legends detached.
    Collapsed,
}

impl PanelState {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            PanelState::Expanded => PanelState::Collapsed,
            PanelState::Collapsed => PanelState::Expanded,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelStyle {
    pub expanded_width_px: u32,
    pub collapsed_width_px: u32,
    pub max_height_px: u32,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            expanded_width_px: LEGEND_EXPANDED_WIDTH_PX,
            collapsed_width_px: LEGEND_COLLAPSED_WIDTH_PX,
            max_height_px: LEGEND_MAX_HEIGHT_PX,
        }
    }
}

struct BuiltPanel<S: LegendSurface> {
    panel: S::Panel,
    legends: Vec<S::Legend>,
    state: Cell<PanelState>,
}

pub struct LegendPanel<S: LegendSurface> {
    surface: S,
    style: PanelStyle,
    current: RefCell<Option<BuiltPanel<S>>>,
}

impl<S: LegendSurface + 'static> LegendPanel<S> {
    pub fn new(surface: S, style: PanelStyle) -> Self {
        Self {
            surface,
            style,
            current: RefCell::new(None),
        }
    }

    /// Rebuild for a new mapper list. The rebuilt panel always starts
    /// collapsed; an empty list leaves no panel at all.
    pub fn set_mappers(self: &Rc<Self>, mappers: &[S::Mapper]) -> Result<()> {
        self.teardown();
        if mappers.is_empty() {
            return Ok(());
        }
        let panel = self.surface.create_panel(&self.style)?;
        let mut legends = Vec::with_capacity(mappers.len());
        for mapper in mappers {
            match self.surface.create_legend(&panel, mapper) {
                Ok(legend) => {
                    self.surface.attach_legend(&panel, &legend);
                    legends.push(legend);
                }
                Err(e) => {
                    self.surface.remove_panel(&panel);
                    return Err(e);
                }
            }
        }
        self.surface.set_size(&panel, self.style.expanded_width_px, None);

        let weak = Rc::downgrade(self);
        self.surface.on_click(
            &panel,
            Box::new(move || {
                if let Some(legend) = weak.upgrade() {
                    legend.toggle();
                }
            }),
        );
        log::debug!("[legend] built panel with {} legends", legends.len());
        self.current.replace(Some(BuiltPanel {
            panel,
            legends,
            state: Cell::new(PanelState::Expanded),
        }));
        // Same path as a user click, so a fresh panel comes up collapsed.
        self.toggle();
        Ok(())
    }

    /// Flip between expanded and collapsed. `None` when there is no panel.
    pub fn toggle(&self) -> Option<PanelState> {
        let current = self.current.borrow();
        let built = current.as_ref()?;
        let next = built.state.get().toggled();
        match next {
            PanelState::Expanded => {
                self.surface.set_size(&built.panel, self.style.expanded_width_px, None);
                self.surface.hide_placeholder(&built.panel);
                for legend in &built.legends {
                    self.surface.attach_legend(&built.panel, legend);
                }
            }
            PanelState::Collapsed => {
                let side = self.style.collapsed_width_px;
                self.surface.set_size(&built.panel, side, Some(side));
                for legend in &built.legends {
                    self.surface.detach_legend(&built.panel, legend);
                }
                self.surface.show_placeholder(&built.panel);
            }
        }
        built.state.set(next);
        Some(next)
    }

    /// Remove the panel from the DOM. No-op when none is built.
    pub fn teardown(&self) {
        let previous = self.current.borrow_mut().take();
        if let Some(built) = previous {
            self.surface.remove_panel(&built.panel);
        }
    }

    pub fn state(&self) -> Option<PanelState> {
        self.current.borrow().as_ref().map(|b| b.state.get())
    }

    pub fn legend_count(&self) -> usize {
        self.current.borrow().as_ref().map_or(0, |b| b.legends.len())
    }
}
