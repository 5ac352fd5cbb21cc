use serde::{Deserialize, Serialize};

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const ORIGIN: LatLng = LatLng::new(0.0, 0.0);

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `[lat, lng]` pair, the tuple order Leaflet expects.
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

/// Rectangular lat/lng extent given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north_east: LatLng,
    pub south_west: LatLng,
}

/// Full world extent; used as the hard pan limit when viewport fitting is on.
pub const WORLD_BOUNDS: GeoBounds = GeoBounds {
    north_east: LatLng::new(90.0, 180.0),
    south_west: LatLng::new(-90.0, -180.0),
};

impl GeoBounds {
    #[cfg(test)]
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat <= self.north_east.lat
            && point.lat >= self.south_west.lat
            && point.lng <= self.north_east.lng
            && point.lng >= self.south_west.lng
    }

    /// Corner pairs in the `[[lat, lng], [lat, lng]]` layout Leaflet accepts for `maxBounds`.
    pub fn to_corner_arrays(self) -> [[f64; 2]; 2] {
        [self.north_east.to_array(), self.south_west.to_array()]
    }
}

#[cfg(test)]
mod tests {
    use super::{LatLng, WORLD_BOUNDS};

    #[test]
    fn world_bounds_cover_every_valid_coordinate() {
        assert!(WORLD_BOUNDS.contains(LatLng::new(90.0, 180.0)));
        assert!(WORLD_BOUNDS.contains(LatLng::new(-90.0, -180.0)));
        assert!(WORLD_BOUNDS.contains(LatLng::ORIGIN));
        assert!(!WORLD_BOUNDS.contains(LatLng::new(91.0, 0.0)));
    }

    #[test]
    fn corner_arrays_keep_north_east_first() {
        assert_eq!(
            WORLD_BOUNDS.to_corner_arrays(),
            [[90.0, 180.0], [-90.0, -180.0]]
        );
    }
}
