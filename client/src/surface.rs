use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, JsValue};

use incident_map_shared::{
    Feature, LatLng, MapConfig, MapEvent, MapSurface, RegionCode, StyleFn, ViewportConstraints,
};

use crate::leaflet::{
    self, LeafletLayer, LeafletMap, LeafletPopup, bounds_array, describe_js_error, get_path,
    js_object, lat_lng_array,
};
use crate::runtime;

/// `MapSurface` backed by a Leaflet map with an esri vector basemap.
pub struct LeafletSurface {
    map: LeafletMap,
    popup: Option<LeafletPopup>,
}

impl LeafletSurface {
    /// Create the Leaflet map inside `container` and install the basemap.
    pub fn mount(
        container: &web_sys::HtmlElement,
        config: &MapConfig,
        constraints: ViewportConstraints,
    ) -> Result<Self, String> {
        let mut options = vec![
            ("minZoom", JsValue::from_f64(constraints.min_zoom)),
            ("maxZoom", JsValue::from_f64(constraints.max_zoom)),
            // Region views use fractional zooms (3.5); don't snap them away.
            ("zoomSnap", JsValue::from_f64(0.1)),
        ];
        if let Some(bounds) = constraints.max_bounds {
            options.push(("maxBounds", bounds_array(bounds).into()));
            options.push(("maxBoundsViscosity", JsValue::from_f64(1.0)));
        }

        let map = leaflet::create_map(container, &js_object(&options))
            .map_err(|e| format!("Leaflet map init failed: {}", describe_js_error(&e)))?;
        let start = RegionCode::World.center();
        map.set_view(&lat_lng_array(start.center), start.zoom.max(constraints.min_zoom));

        let basemap = leaflet::vector_tile_layer(
            &config.basemap_url,
            &js_object(&[
                ("minZoom", JsValue::from_f64(constraints.min_zoom)),
                ("maxZoom", JsValue::from_f64(constraints.max_zoom)),
            ]),
        )
        .map_err(|e| format!("Basemap init failed: {}", describe_js_error(&e)))?;
        map.add_layer(&basemap);

        Ok(Self { map, popup: None })
    }

    pub fn map(&self) -> &LeafletMap {
        &self.map
    }

    pub fn destroy(&mut self) {
        self.popup = None;
        self.map.remove();
    }
}

impl MapSurface for LeafletSurface {
    type Layer = Option<LeafletLayer>;

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.map.set_view(&lat_lng_array(center), zoom);
    }

    fn add_layer(&mut self, layer: &Self::Layer) {
        if let Some(layer) = layer {
            self.map.add_layer(layer);
        }
    }

    fn remove_layer(&mut self, layer: &Self::Layer) {
        if let Some(layer) = layer {
            layer.off("mouseover");
            layer.off("mouseout");
            self.map.remove_layer(layer);
        }
    }

    /// `None` when esri-leaflet rejects the options; the failure is logged
    /// and the map keeps running without an overlay.
    fn create_styled_overlay(&mut self, source_url: &str, style: StyleFn) -> Self::Layer {
        // Handed to JS for good: in-flight feature requests may still style
        // features after the layer is removed.
        let style_cb = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |feature: JsValue| {
            let feature: Feature = serde_wasm_bindgen::from_value(feature).unwrap_or_default();
            serde_wasm_bindgen::to_value(&style(&feature)).unwrap_or(JsValue::UNDEFINED)
        })
        .into_js_value();

        let layer = match leaflet::feature_layer(&js_object(&[
            ("url", JsValue::from_str(source_url)),
            ("style", style_cb),
        ])) {
            Ok(layer) => layer,
            Err(e) => {
                tracing::warn!(error = %describe_js_error(&e), "feature layer init failed");
                return None;
            }
        };

        let on_over = Closure::<dyn Fn(JsValue)>::new(|event: JsValue| {
            if let Some(hover) = hover_event(&event) {
                runtime::emit(hover);
            }
        })
        .into_js_value();
        let on_out = Closure::<dyn Fn(JsValue)>::new(|_event: JsValue| {
            runtime::emit(MapEvent::HoverLeave);
        })
        .into_js_value();
        let on_request_error = Closure::<dyn Fn(JsValue)>::new(|event: JsValue| {
            let message = get_path(&event, &["message"])
                .and_then(|m| m.as_string())
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::warn!(%message, "feature request failed");
        })
        .into_js_value();

        layer.on("mouseover", on_over.unchecked_ref());
        layer.on("mouseout", on_out.unchecked_ref());
        layer.on("requesterror", on_request_error.unchecked_ref());
        Some(layer)
    }

    fn open_popup(&mut self, at: LatLng, content: &str) {
        let popup = self.popup.get_or_insert_with(|| {
            leaflet::create_popup(&js_object(&[
                ("closeButton", JsValue::FALSE),
                ("autoPan", JsValue::FALSE),
            ]))
        });
        popup
            .set_lat_lng(&lat_lng_array(at))
            .set_content(content)
            .open_on(&self.map);
    }

    fn close_popup(&mut self) {
        self.map.close_popup();
    }
}

/// Pull the hovered feature and cursor position out of a Leaflet mouse event.
fn hover_event(event: &JsValue) -> Option<MapEvent> {
    let feature = get_path(event, &["layer", "feature"])?;
    let feature: Feature = serde_wasm_bindgen::from_value(feature).ok()?;
    let at: LatLng = serde_wasm_bindgen::from_value(get_path(event, &["latlng"])?).ok()?;
    Some(MapEvent::HoverEnter { feature, at })
}
