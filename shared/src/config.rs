use crate::feature::{AttributeProfile, ProfileKind};
use crate::style::{StylingPolicy, UnknownPolicy};
use crate::viewport_fit::{DEFAULT_TILE_SIZE, ViewportFitMode};

pub const BASEMAP_URL: &str = "https://tiles.arcgis.com/tiles/5T5nSi527N4F7luB/arcgis/rest/services/WHO_Polygon_Basemap_Dark_Grey/VectorTileServer";
pub const INCIDENTS_URL: &str = "https://services.arcgis.com/5T5nSi527N4F7luB/arcgis/rest/services/DASH_PUBLIC_INCIDENTS/FeatureServer/0";
pub const BOUNDARIES_URL: &str = "https://services.arcgis.com/5T5nSi527N4F7luB/ArcGIS/rest/services/Detailed_Boundary_ADM0/FeatureServer/0/";

/// Query parameters understood by [`MapConfig::from_overrides`].
pub const OVERRIDE_KEYS: &[&str] = &[
    "profile",
    "policy",
    "fit",
    "tile_size",
    "hover",
    "feature_url",
    "basemap_url",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: expected a boolean, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error(transparent)]
    InvalidPolicy(#[from] UnknownPolicy),
    #[error("unknown attribute profile {0:?}")]
    InvalidProfile(String),
    #[error("tile_size: expected a positive number, got {0:?}")]
    InvalidTileSize(String),
    #[error("unknown config key {0:?}")]
    UnknownKey(String),
}

/// Everything that varies between deployments of the map screen.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub basemap_url: String,
    pub feature_url: String,
    pub viewport_fit: ViewportFitMode,
    pub tile_size: f64,
    pub styling_policy: StylingPolicy,
    pub hover_popup: bool,
    pub profile: AttributeProfile,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::for_profile(ProfileKind::Regional)
    }
}

impl MapConfig {
    /// Preset for a profile: regional incidents with selection highlighting,
    /// or country boundaries colored by score.
    pub fn for_profile(kind: ProfileKind) -> Self {
        let (feature_url, styling_policy) = match kind {
            ProfileKind::Regional => (INCIDENTS_URL, StylingPolicy::SelectionHighlight),
            ProfileKind::Country => (BOUNDARIES_URL, StylingPolicy::ScoreBased),
        };
        Self {
            basemap_url: BASEMAP_URL.to_string(),
            feature_url: feature_url.to_string(),
            viewport_fit: ViewportFitMode::Fitted,
            tile_size: DEFAULT_TILE_SIZE,
            styling_policy,
            hover_popup: true,
            profile: AttributeProfile::for_kind(kind),
        }
    }

    /// Build from key/value overrides (typically the page's query string).
    ///
    /// `profile` selects the preset first, so other keys refine it regardless
    /// of order. Bad values are logged and the preset value is kept.
    pub fn from_overrides<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let pairs: Vec<_> = pairs.into_iter().collect();

        let mut config = Self::default();
        if let Some(&(key, value)) = pairs.iter().rev().find(|(key, _)| *key == "profile") {
            if let Err(err) = config.apply_override(key, value) {
                tracing::warn!(%err, "ignoring config override");
            }
        }

        for (key, value) in pairs.into_iter().filter(|(key, _)| *key != "profile") {
            if let Err(err) = config.apply_override(key, value) {
                tracing::warn!(%err, "ignoring config override");
            }
        }
        config
    }

    /// Apply one override. `profile` swaps in that profile's whole preset,
    /// discarding earlier overrides.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "profile" => *self = Self::for_profile(parse_profile(value)?),
            "policy" => self.styling_policy = value.parse()?,
            "fit" => {
                self.viewport_fit = if parse_bool("fit", value)? {
                    ViewportFitMode::Fitted
                } else {
                    ViewportFitMode::Fixed
                };
            }
            "tile_size" => {
                self.tile_size = value
                    .parse::<f64>()
                    .ok()
                    .filter(|size| size.is_finite() && *size > 0.0)
                    .ok_or_else(|| ConfigError::InvalidTileSize(value.to_string()))?;
            }
            "hover" => self.hover_popup = parse_bool("hover", value)?,
            "feature_url" if !value.is_empty() => self.feature_url = value.to_string(),
            "basemap_url" if !value.is_empty() => self.basemap_url = value.to_string(),
            "feature_url" | "basemap_url" => {}
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_profile(value: &str) -> Result<ProfileKind, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "regional" | "region" => Ok(ProfileKind::Regional),
        "country" | "iso3" => Ok(ProfileKind::Country),
        _ => Err(ConfigError::InvalidProfile(value.to_string())),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_regional_highlighting() {
        let config = MapConfig::default();
        assert_eq!(config.profile, AttributeProfile::REGIONAL);
        assert_eq!(config.styling_policy, StylingPolicy::SelectionHighlight);
        assert_eq!(config.viewport_fit, ViewportFitMode::Fitted);
        assert_eq!(config.feature_url, INCIDENTS_URL);
        assert_eq!(config.basemap_url, BASEMAP_URL);
        assert!(config.hover_popup);
    }

    #[test]
    fn country_preset_scores_boundaries() {
        let config = MapConfig::from_overrides([("profile", "country")]);
        assert_eq!(config.profile, AttributeProfile::COUNTRY);
        assert_eq!(config.styling_policy, StylingPolicy::ScoreBased);
        assert_eq!(config.feature_url, BOUNDARIES_URL);
    }

    #[test]
    fn profile_applies_before_other_keys_regardless_of_order() {
        let config = MapConfig::from_overrides([
            ("policy", "always-colored"),
            ("fit", "off"),
            ("profile", "country"),
        ]);
        assert_eq!(config.profile, AttributeProfile::COUNTRY);
        assert_eq!(config.styling_policy, StylingPolicy::AlwaysColored);
        assert_eq!(config.viewport_fit, ViewportFitMode::Fixed);
    }

    #[test]
    fn booleans_accept_common_spellings() {
        for (raw, expected) in [
            ("1", true),
            ("TRUE", true),
            (" yes ", true),
            ("on", true),
            ("0", false),
            ("False", false),
            ("no", false),
            ("off", false),
        ] {
            assert_eq!(parse_bool("hover", raw), Ok(expected), "{raw:?}");
        }
        assert!(matches!(
            parse_bool("hover", "maybe"),
            Err(ConfigError::InvalidBool { key: "hover", .. })
        ));
    }

    #[test]
    fn bad_values_keep_the_preset() {
        let config = MapConfig::from_overrides([
            ("policy", "rainbow"),
            ("tile_size", "-4"),
            ("hover", "sometimes"),
            ("mystery", "1"),
            ("feature_url", ""),
        ]);
        assert_eq!(config, MapConfig::default());
    }

    #[test]
    fn apply_override_reports_each_failure() {
        let mut config = MapConfig::default();
        assert!(matches!(
            config.apply_override("policy", "rainbow"),
            Err(ConfigError::InvalidPolicy(_))
        ));
        assert_eq!(
            config.apply_override("tile_size", "NaN"),
            Err(ConfigError::InvalidTileSize("NaN".into()))
        );
        assert_eq!(
            config.apply_override("zoom", "3"),
            Err(ConfigError::UnknownKey("zoom".into()))
        );
        assert_eq!(
            config.apply_override("profile", "planet"),
            Err(ConfigError::InvalidProfile("planet".into()))
        );
    }

    #[test]
    fn profile_override_switches_the_whole_preset() {
        let mut config = MapConfig::default();
        config.apply_override("profile", "country").unwrap();
        assert_eq!(config, MapConfig::for_profile(ProfileKind::Country));
        assert_eq!(config.feature_url, BOUNDARIES_URL);
        assert_eq!(config.styling_policy, StylingPolicy::ScoreBased);

        config.apply_override("profile", "regional").unwrap();
        assert_eq!(config, MapConfig::default());
    }

    #[test]
    fn urls_and_tile_size_can_be_replaced() {
        let config = MapConfig::from_overrides([
            ("feature_url", "https://example.test/FeatureServer/0"),
            ("tile_size", "256"),
            ("hover", "off"),
        ]);
        assert_eq!(config.feature_url, "https://example.test/FeatureServer/0");
        assert_eq!(config.tile_size, 256.0);
        assert!(!config.hover_popup);
    }

    #[test]
    fn every_override_key_is_recognized() {
        let mut config = MapConfig::default();
        for key in OVERRIDE_KEYS {
            assert!(
                !matches!(
                    config.apply_override(key, ""),
                    Err(ConfigError::UnknownKey(_))
                ),
                "{key}"
            );
        }
    }
}
