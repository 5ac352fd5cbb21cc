//! Bindings to the Leaflet, esri-leaflet and esri-leaflet-vector globals
//! loaded by `index.html`. Thin wrappers only; no state lives here.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use incident_map_shared::{GeoBounds, LatLng};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    #[derive(Debug, Clone)]
    pub type LeafletMap;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    pub fn create_map(container: &web_sys::HtmlElement, options: &Object) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &LeafletMap, center: &Array, zoom: f64) -> LeafletMap;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &LeafletMap, layer: &LeafletLayer) -> LeafletMap;

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &LeafletMap, layer: &LeafletLayer) -> LeafletMap;

    #[wasm_bindgen(method, js_name = whenReady)]
    pub fn when_ready(this: &LeafletMap, callback: &Function) -> LeafletMap;

    #[wasm_bindgen(method, js_name = closePopup)]
    pub fn close_popup(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(method)]
    pub fn remove(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = Layer)]
    #[derive(Debug, Clone)]
    pub type LeafletLayer;

    #[wasm_bindgen(method)]
    pub fn on(this: &LeafletLayer, event: &str, handler: &Function) -> LeafletLayer;

    /// Drops every listener for `event`.
    #[wasm_bindgen(method)]
    pub fn off(this: &LeafletLayer, event: &str) -> LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = Popup)]
    #[derive(Debug, Clone)]
    pub type LeafletPopup;

    #[wasm_bindgen(js_namespace = L, js_name = popup)]
    pub fn create_popup(options: &Object) -> LeafletPopup;

    #[wasm_bindgen(method, js_name = setLatLng)]
    pub fn set_lat_lng(this: &LeafletPopup, at: &Array) -> LeafletPopup;

    #[wasm_bindgen(method, js_name = setContent)]
    pub fn set_content(this: &LeafletPopup, html: &str) -> LeafletPopup;

    #[wasm_bindgen(method, js_name = openOn)]
    pub fn open_on(this: &LeafletPopup, map: &LeafletMap) -> LeafletPopup;

    #[wasm_bindgen(catch, js_namespace = ["L", "esri"], js_name = featureLayer)]
    pub fn feature_layer(options: &Object) -> Result<LeafletLayer, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["L", "esri", "Vector"], js_name = vectorTileLayer)]
    pub fn vector_tile_layer(url: &str, options: &Object) -> Result<LeafletLayer, JsValue>;
}

/// Plain JS object from key/value pairs.
pub fn js_object(entries: &[(&str, JsValue)]) -> Object {
    let object = Object::new();
    for (key, value) in entries {
        // Setting a property on a fresh plain object cannot fail.
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object
}

pub fn lat_lng_array(point: LatLng) -> Array {
    let [lat, lng] = point.to_array();
    Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng))
}

pub fn bounds_array(bounds: GeoBounds) -> Array {
    Array::of2(
        &lat_lng_array(bounds.north_east),
        &lat_lng_array(bounds.south_west),
    )
}

/// Read `event[path[0]][path[1]]...`, stopping at the first missing link.
pub fn get_path(value: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut current = value.clone();
    for key in path {
        current = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    Some(current)
}

pub fn describe_js_error(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| get_path(err, &["message"]).and_then(|m| m.as_string()))
        .unwrap_or_else(|| format!("{err:?}"))
}
