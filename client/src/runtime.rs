use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use incident_map_shared::{
    EventQueue, MapConfig, MapEvent, ScoreTable, SelectionHandler, SelectionState,
    ViewportConstraints,
};

use crate::leaflet::LeafletLayer;
use crate::surface::LeafletSurface;

/// The live map: selection state plus the surface it drives.
struct MapRuntime {
    handler: SelectionHandler<Option<LeafletLayer>>,
    surface: LeafletSurface,
}

thread_local! {
    static RUNTIME: RefCell<Option<MapRuntime>> = const { RefCell::new(None) };
    static EVENTS: EventQueue = EventQueue::new();
}

/// Mount the map into `container`. Any previous map is torn down first.
pub fn start(
    container: &web_sys::HtmlElement,
    config: &MapConfig,
    constraints: ViewportConstraints,
) -> Result<(), String> {
    stop();

    let surface = LeafletSurface::mount(container, config, constraints)?;
    let handler = SelectionHandler::new(config, ScoreTable::reference());
    let map = surface.map().clone();
    RUNTIME.with(|slot| {
        *slot.borrow_mut() = Some(MapRuntime { handler, surface });
    });

    // whenReady fires synchronously on an already-loaded map, so the runtime
    // has to be in place before registering.
    let on_ready = Closure::<dyn Fn()>::new(|| emit(MapEvent::Ready)).into_js_value();
    map.when_ready(on_ready.unchecked_ref());
    Ok(())
}

/// Tear down the map and drop its selection state.
pub fn stop() {
    let Some(mut runtime) = RUNTIME.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    runtime.handler.teardown(&mut runtime.surface);
    runtime.surface.destroy();
}

/// Queue an event and run the queue unless a drain is already in progress.
pub fn emit(event: MapEvent) {
    EVENTS.with(|events| {
        events.push(event);
        events.drain(|event| {
            RUNTIME.with(|slot| {
                let mut slot = slot.borrow_mut();
                let Some(runtime) = slot.as_mut() else {
                    tracing::debug!(?event, "map not mounted, dropping event");
                    return;
                };
                runtime.handler.dispatch(&mut runtime.surface, event);
            });
        });
    });
}

pub fn selection() -> SelectionState {
    RUNTIME.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|runtime| runtime.handler.state())
            .unwrap_or_default()
    })
}
