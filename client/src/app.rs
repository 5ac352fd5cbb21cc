use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

use incident_map_shared::colors::normalize_css_color;
use incident_map_shared::config::OVERRIDE_KEYS;
use incident_map_shared::{
    MapConfig, MapEvent, REGION_COLORS, RegionCode, SCORE_COLORS, StylingPolicy,
    ViewportConstraints,
};

use crate::runtime;

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

/// Config presets refined by the page's query string, e.g. `?profile=country&fit=off`.
fn read_config() -> MapConfig {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
        return MapConfig::default();
    };
    let pairs: Vec<(&str, String)> = OVERRIDE_KEYS
        .iter()
        .filter_map(|key| params.get(key).map(|value| (*key, value)))
        .collect();
    MapConfig::from_overrides(pairs.iter().map(|(key, value)| (*key, value.as_str())))
}

/// Region shown in the dropdown, kept in sync with the handler's state.
#[derive(Clone, Copy)]
pub(crate) struct SelectedRegion(pub RwSignal<RegionCode>);
#[derive(Clone, Copy)]
pub(crate) struct ActivePolicy(pub StylingPolicy);

#[component]
pub fn App() -> impl IntoView {
    let config = read_config();
    let selected = RwSignal::new(RegionCode::World);
    provide_context(SelectedRegion(selected));
    provide_context(ActivePolicy(config.styling_policy));

    let root_ref = NodeRef::<leptos::html::Div>::new();
    let map_ref = NodeRef::<leptos::html::Div>::new();
    let mounted = Rc::new(Cell::new(false));

    // Viewport constraints are resolved once here; later resizes keep them.
    Effect::new(move || {
        let Some(container) = map_ref.get() else {
            return;
        };
        if mounted.replace(true) {
            return;
        }
        let (w, h) = canvas_dimensions();
        let constraints = ViewportConstraints::resolve(config.viewport_fit, w, h, config.tile_size);
        if let Err(e) = runtime::start(&container, &config, constraints) {
            tracing::error!(error = %e, "map mount failed");
        }
    });
    on_cleanup(runtime::stop);

    view! {
        <div node_ref=root_ref style="width: 100%; height: 100%; position: relative; background: #0c0e17;">
            <div node_ref=map_ref style="position: absolute; inset: 0;" />
            <div style="position: absolute; top: 16px; right: 16px; z-index: 1000; display: flex; flex-direction: column; gap: 8px; align-items: stretch;">
                <RegionSelector />
                <Legend />
            </div>
            <FullscreenToggle target=root_ref />
        </div>
    }
}

#[component]
fn RegionSelector() -> impl IntoView {
    let SelectedRegion(selected) = expect_context();

    let on_change = move |e: leptos::ev::Event| {
        let Some(select) = e
            .target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlSelectElement>().ok())
        else {
            runtime::emit(MapEvent::SubscriptionFailed(
                "region change event without a select element".to_string(),
            ));
            return;
        };
        runtime::emit(MapEvent::SelectionChanged(select.value()));
        if let Some(code) = runtime::selection().region() {
            selected.set(code);
        }
    };

    view! {
        <select
            on:change=on_change
            style="min-width: 200px; background: #13161f; border: 1px solid #282c3e; border-radius: 4px; color: #e2e0d8; font-family: 'Inter', system-ui, sans-serif; font-size: 0.85rem; padding: 6px 8px; outline: none;"
        >
            {RegionCode::ALL
                .into_iter()
                .map(|code| {
                    view! {
                        <option value=code.as_str() selected=move || selected.get() == code>
                            {code.label()}
                        </option>
                    }
                })
                .collect::<Vec<_>>()}
        </select>
    }
}

/// One legend entry. `region` is set for rows that dim when another region is selected.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegendRow {
    pub label: String,
    pub color: String,
    pub region: Option<RegionCode>,
}

pub(crate) fn legend_rows(policy: StylingPolicy) -> Vec<LegendRow> {
    match policy {
        StylingPolicy::ScoreBased => SCORE_COLORS
            .entries()
            .iter()
            .map(|(score, color)| LegendRow {
                label: format!("Score {score}"),
                color: color.to_string(),
                region: None,
            })
            .chain(std::iter::once(LegendRow {
                label: "No score".to_string(),
                color: normalize_css_color(SCORE_COLORS.default_color()),
                region: None,
            }))
            .collect(),
        StylingPolicy::AlwaysColored | StylingPolicy::SelectionHighlight => REGION_COLORS
            .entries()
            .iter()
            .map(|(code, color)| LegendRow {
                label: code.label().to_string(),
                color: color.to_string(),
                region: Some(*code),
            })
            .collect(),
    }
}

/// Color key for the active styling policy. Under selection highlighting the
/// unselected regions are dimmed, matching the overlay.
#[component]
fn Legend() -> impl IntoView {
    let ActivePolicy(policy) = expect_context();
    let SelectedRegion(selected) = expect_context();

    view! {
        <div style="background: #13161f; border: 1px solid #282c3e; border-radius: 4px; padding: 8px 10px; font-family: 'Inter', system-ui, sans-serif; font-size: 0.75rem; color: #9a9590;">
            {legend_rows(policy)
                .into_iter()
                .map(|LegendRow { label, color, region }| {
                    let dimmed = move || {
                        policy == StylingPolicy::SelectionHighlight
                            && region.is_some_and(|code| selected.get() != code)
                    };
                    view! {
                        <div
                            style:opacity=move || if dimmed() { "0.35" } else { "1" }
                            style="display: flex; align-items: center; gap: 6px; line-height: 1.6;"
                        >
                            <span style=format!(
                                "display: inline-block; width: 10px; height: 10px; border-radius: 2px; border: 1px solid rgba(0,0,0,0.4); background: {color};"
                            ) />
                            <span>{label}</span>
                        </div>
                    }
                })
                .collect::<Vec<_>>()}
        </div>
    }
}

fn is_fullscreen() -> bool {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.fullscreen_element())
        .is_some()
}

pub(crate) fn fullscreen_label(active: bool) -> &'static str {
    if active { "Exit fullscreen" } else { "Fullscreen" }
}

/// Bottom-right toggle that takes the map and its controls fullscreen.
#[component]
fn FullscreenToggle(target: NodeRef<leptos::html::Div>) -> impl IntoView {
    let active = RwSignal::new(is_fullscreen());

    // Esc and browser UI leave fullscreen without going through the button.
    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        let cb = Closure::<dyn Fn()>::new(move || active.set(is_fullscreen()));
        if document
            .add_event_listener_with_callback("fullscreenchange", cb.as_ref().unchecked_ref())
            .is_ok()
        {
            cb.forget();
        }
    }

    let on_click = move |_: leptos::ev::MouseEvent| {
        let result = if is_fullscreen() {
            web_sys::window()
                .and_then(|window| window.document())
                .map(|document| document.exit_fullscreen())
                .ok_or_else(|| "no document".to_string())
        } else {
            target
                .get_untracked()
                .ok_or_else(|| "map container not mounted".to_string())
                .and_then(|el| {
                    el.request_fullscreen()
                        .map_err(|e| e.as_string().unwrap_or_else(|| "request rejected".to_string()))
                })
        };
        if let Err(error) = result {
            tracing::warn!(%error, "fullscreen toggle failed");
        }
    };

    view! {
        <button
            on:click=on_click
            title=move || fullscreen_label(active.get())
            style="position: absolute; right: 16px; bottom: 24px; z-index: 1000; background: #13161f; border: 1px solid #282c3e; border-radius: 4px; color: #e2e0d8; font-family: 'Inter', system-ui, sans-serif; font-size: 0.8rem; padding: 6px 10px; cursor: pointer;"
        >
            {move || fullscreen_label(active.get())}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_legend_lists_buckets_then_unscored() {
        let rows = legend_rows(StylingPolicy::ScoreBased);
        let labels: Vec<_> = rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Score 1", "Score 2", "Score 3", "Score 4", "Score 5", "No score"]
        );
        assert_eq!(rows[0].color, "#ff0000");
        assert_eq!(rows[5].color, "rgba(0,76,115,0.039)");
        assert!(rows.iter().all(|row| row.region.is_none()));
    }

    #[test]
    fn region_legend_has_one_row_per_colored_region() {
        for policy in [StylingPolicy::AlwaysColored, StylingPolicy::SelectionHighlight] {
            let rows = legend_rows(policy);
            assert_eq!(rows.len(), 6);
            assert!(rows.iter().all(|row| row.region.is_some()));
            assert!(!rows.iter().any(|row| row.region == Some(RegionCode::World)));
            let afro = rows
                .iter()
                .find(|row| row.region == Some(RegionCode::Afro))
                .unwrap();
            assert_eq!(afro.color, "green");
            assert_eq!(afro.label, RegionCode::Afro.label());
        }
    }

    #[test]
    fn fullscreen_label_tracks_state() {
        assert_eq!(fullscreen_label(false), "Fullscreen");
        assert_eq!(fullscreen_label(true), "Exit fullscreen");
    }
}
