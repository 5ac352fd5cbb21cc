use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A feature as delivered by the remote feature service. Only the attribute
/// bag is kept; geometry stays with the map surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.attribute(name)?.as_str()
    }

    /// Integer attribute. JS numbers arrive as floats, so whole floats and
    /// numeric strings are accepted too.
    pub fn int_attr(&self, name: &str) -> Option<i64> {
        match self.attribute(name)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Attribute rendered for display; `None` for missing or null values.
    pub fn display_attr(&self, name: &str) -> Option<String> {
        match self.attribute(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Which attribute names carry the category, the score, and the popup text.
///
/// The incident service and the boundary service name the same concepts
/// differently, so each gets its own profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeProfile {
    pub kind: ProfileKind,
    pub category_field: &'static str,
    pub score_field: &'static str,
    pub popup_template: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Incident features keyed by WHO region code.
    Regional,
    /// ADM0 boundary features keyed by iso3 country code.
    Country,
}

impl AttributeProfile {
    pub const REGIONAL: AttributeProfile = AttributeProfile {
        kind: ProfileKind::Regional,
        category_field: "region",
        score_field: "score",
        popup_template: "<strong>{region}</strong>",
    };

    pub const COUNTRY: AttributeProfile = AttributeProfile {
        kind: ProfileKind::Country,
        category_field: "WHO_CODE",
        score_field: "score",
        popup_template: "<strong>{ADM0_VIZ_NAME}</strong>",
    };

    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Regional => Self::REGIONAL,
            ProfileKind::Country => Self::COUNTRY,
        }
    }

    pub fn category<'a>(&self, feature: &'a Feature) -> Option<&'a str> {
        feature.str_attr(self.category_field)
    }

    pub fn score(&self, feature: &Feature) -> Option<i64> {
        feature.int_attr(self.score_field)
    }
}
