//! Region selection state machine.
//!
//! The handler owns the selection and the currently installed overlay; the
//! map surface is lent to it per event so no UI object has to hold either.

use std::rc::Rc;

use crate::config::MapConfig;
use crate::events::MapEvent;
use crate::geo::LatLng;
use crate::popup::render_popup;
use crate::region::RegionCode;
use crate::scores::ScoreTable;
use crate::style::{RegionStyler, StyleFn};

/// What the core needs from the map widget.
pub trait MapSurface {
    type Layer;

    fn set_view(&mut self, center: LatLng, zoom: f64);
    fn add_layer(&mut self, layer: &Self::Layer);
    fn remove_layer(&mut self, layer: &Self::Layer);
    /// Build (but do not install) a feature layer whose features are styled by `style`.
    fn create_styled_overlay(&mut self, source_url: &str, style: StyleFn) -> Self::Layer;
    fn open_popup(&mut self, at: LatLng, content: &str);
    fn close_popup(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    RegionSelected(RegionCode),
}

impl SelectionState {
    pub fn region(self) -> Option<RegionCode> {
        match self {
            SelectionState::Unselected => None,
            SelectionState::RegionSelected(code) => Some(code),
        }
    }
}

pub struct SelectionHandler<L> {
    styler: Rc<RegionStyler>,
    feature_url: String,
    popup_template: &'static str,
    hover_popup: bool,
    state: SelectionState,
    ready: bool,
    /// Latest selection received before the surface was ready.
    pending: Option<RegionCode>,
    overlay: Option<L>,
}

impl<L> SelectionHandler<L> {
    pub fn new(config: &MapConfig, scores: ScoreTable) -> Self {
        Self {
            styler: Rc::new(RegionStyler::new(
                config.styling_policy,
                config.profile,
                scores,
            )),
            feature_url: config.feature_url.clone(),
            popup_template: config.profile.popup_template,
            hover_popup: config.hover_popup,
            state: SelectionState::Unselected,
            ready: false,
            pending: None,
            overlay: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn overlay(&self) -> Option<&L> {
        self.overlay.as_ref()
    }

    pub fn dispatch<S>(&mut self, surface: &mut S, event: MapEvent)
    where
        S: MapSurface<Layer = L>,
    {
        match event {
            MapEvent::Ready => self.on_ready(surface),
            MapEvent::SelectionChanged(raw) => {
                let code = RegionCode::parse_or_world(&raw);
                if code.as_str() != raw {
                    tracing::debug!(raw = %raw, "unknown region code, showing world");
                }
                if self.ready {
                    self.select(surface, code);
                } else {
                    self.pending = Some(code);
                }
            }
            MapEvent::HoverEnter { feature, at } => {
                if self.hover_popup {
                    let content = render_popup(self.popup_template, &feature);
                    surface.open_popup(at, &content);
                }
            }
            MapEvent::HoverLeave => {
                if self.hover_popup {
                    surface.close_popup();
                }
            }
            MapEvent::SubscriptionFailed(reason) => {
                tracing::warn!(%reason, "region selection subscription failed");
            }
        }
    }

    /// Remove the installed overlay. Called when the map is torn down.
    pub fn teardown<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Layer = L>,
    {
        if let Some(layer) = self.overlay.take() {
            self.remove_overlay(surface, &layer);
        }
        self.state = SelectionState::Unselected;
        self.pending = None;
        self.ready = false;
    }

    fn on_ready<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Layer = L>,
    {
        if self.ready {
            return;
        }
        self.ready = true;

        if !self.styler.policy().depends_on_selection() {
            let style = self.styler.bind(None);
            self.install_overlay(surface, style);
        }
        if let Some(code) = self.pending.take() {
            self.select(surface, code);
        }
    }

    /// Re-selecting the current region re-runs the whole transition.
    fn select<S>(&mut self, surface: &mut S, code: RegionCode)
    where
        S: MapSurface<Layer = L>,
    {
        self.state = SelectionState::RegionSelected(code);
        let view = code.center();
        surface.set_view(view.center, view.zoom);

        if self.styler.policy().depends_on_selection() {
            let style = self.styler.bind(Some(code));
            self.install_overlay(surface, style);
        }
        tracing::debug!(region = %code, zoom = view.zoom, "region selected");
    }

    fn install_overlay<S>(&mut self, surface: &mut S, style: StyleFn)
    where
        S: MapSurface<Layer = L>,
    {
        if let Some(previous) = self.overlay.take() {
            self.remove_overlay(surface, &previous);
        }
        let layer = surface.create_styled_overlay(&self.feature_url, style);
        surface.add_layer(&layer);
        self.overlay = Some(layer);
    }

    /// A removed layer never reports hover-leave, so its popup is closed here.
    fn remove_overlay<S>(&self, surface: &mut S, layer: &L)
    where
        S: MapSurface<Layer = L>,
    {
        surface.remove_layer(layer);
        if self.hover_popup {
            surface.close_popup();
        }
    }
}
