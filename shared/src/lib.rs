pub mod colors;
pub mod config;
pub mod events;
pub mod feature;
pub mod geo;
pub mod popup;
pub mod region;
pub mod scores;
pub mod selection;
pub mod style;
pub mod viewport_fit;

pub use colors::{REGION_COLORS, SCORE_COLORS};
pub use config::{ConfigError, MapConfig};
pub use events::{EventQueue, MapEvent};
pub use feature::{AttributeProfile, Feature, ProfileKind};
pub use geo::{GeoBounds, LatLng, WORLD_BOUNDS};
pub use region::{RegionCenter, RegionCode, center_for};
pub use scores::ScoreTable;
pub use selection::{MapSurface, SelectionHandler, SelectionState};
pub use style::{RegionStyler, StyleDescriptor, StyleFn, StylingPolicy};
pub use viewport_fit::{ViewportConstraints, ViewportFit, ViewportFitMode, compute_fit};
