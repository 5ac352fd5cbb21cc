use std::fmt;
use std::str::FromStr;

use crate::geo::LatLng;

/// WHO regional office codes, plus the whole-world sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionCode {
    Searo,
    Afro,
    Amro,
    Emro,
    Euro,
    Wpro,
    World,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region code {0:?}")]
pub struct UnknownRegion(pub String);

/// Center point and zoom the map jumps to when a region is picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionCenter {
    pub center: LatLng,
    pub zoom: f64,
}

const WORLD_CENTER: RegionCenter = RegionCenter {
    center: LatLng::ORIGIN,
    zoom: 2.0,
};

impl RegionCode {
    /// Dropdown order. `World` first so it doubles as the reset entry.
    pub const ALL: [RegionCode; 7] = [
        RegionCode::World,
        RegionCode::Afro,
        RegionCode::Amro,
        RegionCode::Emro,
        RegionCode::Euro,
        RegionCode::Searo,
        RegionCode::Wpro,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegionCode::Searo => "SEARO",
            RegionCode::Afro => "AFRO",
            RegionCode::Amro => "AMRO",
            RegionCode::Emro => "EMRO",
            RegionCode::Euro => "EURO",
            RegionCode::Wpro => "WPRO",
            RegionCode::World => "WORLD",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RegionCode::Searo => "South-East Asia",
            RegionCode::Afro => "Africa",
            RegionCode::Amro => "Americas",
            RegionCode::Emro => "Eastern Mediterranean",
            RegionCode::Euro => "Europe",
            RegionCode::Wpro => "Western Pacific",
            RegionCode::World => "World",
        }
    }

    /// Hand-tuned view for the region.
    pub fn center(self) -> RegionCenter {
        let (lat, lng, zoom) = match self {
            RegionCode::Searo => (15.11989876, 101.01490782, 3.5),
            RegionCode::Afro => (2.4601811810210052, 22.851562500000004, 3.0),
            RegionCode::Amro => (53.12040528310657, -85.78125, 3.0),
            RegionCode::Emro => (27.68352808378776, 43.59375000000001, 3.0),
            RegionCode::Euro => (64.47279382008166, 50.62500000000001, 3.0),
            RegionCode::Wpro => (9.44906182688142, 124.45312500000001, 3.0),
            RegionCode::World => return WORLD_CENTER,
        };
        RegionCenter {
            center: LatLng::new(lat, lng),
            zoom,
        }
    }

    /// Parse an incoming code, coercing anything unrecognized to `World`.
    pub fn parse_or_world(code: &str) -> RegionCode {
        code.parse().unwrap_or(RegionCode::World)
    }
}

impl FromStr for RegionCode {
    type Err = UnknownRegion;

    /// Case-sensitive: `"searo"` is not a region.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the view for a raw region code. Unknown codes get the world view.
pub fn center_for(code: &str) -> RegionCenter {
    RegionCode::parse_or_world(code).center()
}
