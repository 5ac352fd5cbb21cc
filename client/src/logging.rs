use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;

/// Forwards `tracing` events to the browser console at the matching level.
struct ConsoleLayer;

#[derive(Default)]
struct ConsoleLine {
    message: String,
    fields: String,
}

impl Visit for ConsoleLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut line = ConsoleLine::default();
        event.record(&mut line);

        let text = JsValue::from(format!(
            "[{}] {}{}",
            meta.target(),
            line.message,
            line.fields
        ));
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&text),
            Level::WARN => web_sys::console::warn_1(&text),
            Level::INFO => web_sys::console::info_1(&text),
            _ => web_sys::console::log_1(&text),
        }
    }
}

/// Install the console subscriber. Debug builds also show debug events.
pub fn init() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // A second init (dev reload) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(level)
        .with(ConsoleLayer)
        .try_init();
}
