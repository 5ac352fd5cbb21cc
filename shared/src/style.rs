//! Per-feature styling for the overlay layer.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::Serialize;

use crate::colors::{NEUTRAL_COLOR, SCORE_COLORS, normalize_css_color, region_color};
use crate::feature::{AttributeProfile, Feature};
use crate::region::RegionCode;
use crate::scores::ScoreTable;

/// Path style handed to the map surface. Field names serialize to the
/// camelCase keys Leaflet's `PathOptions` use.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
    pub color: Cow<'static, str>,
    /// Defaults to `color` on the surface when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Cow<'static, str>>,
}

/// Grey base style every non-highlighted feature gets.
pub const NEUTRAL_STYLE: StyleDescriptor = StyleDescriptor {
    weight: 0.4,
    opacity: 0.8,
    fill_opacity: 0.55,
    color: Cow::Borrowed(NEUTRAL_COLOR),
    fill_color: None,
};

impl StyleDescriptor {
    fn with_color(mut self, color: &'static str) -> Self {
        self.color = Cow::Borrowed(color);
        self
    }

    pub fn is_neutral(&self) -> bool {
        *self == NEUTRAL_STYLE
    }
}

pub type StyleFn = Box<dyn Fn(&Feature) -> StyleDescriptor>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylingPolicy {
    /// Every feature colored by its region, selection ignored.
    AlwaysColored,
    /// Neutral everywhere except features in the selected region.
    SelectionHighlight,
    /// Colored by incident score bucket, selection ignored.
    ScoreBased,
}

impl StylingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            StylingPolicy::AlwaysColored => "always-colored",
            StylingPolicy::SelectionHighlight => "selection-highlight",
            StylingPolicy::ScoreBased => "score-based",
        }
    }

    /// Whether the overlay has to be rebuilt when the selection changes.
    pub fn depends_on_selection(self) -> bool {
        matches!(self, StylingPolicy::SelectionHighlight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown styling policy {0:?}")]
pub struct UnknownPolicy(pub String);

impl FromStr for StylingPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always-colored" => Ok(StylingPolicy::AlwaysColored),
            "selection-highlight" => Ok(StylingPolicy::SelectionHighlight),
            "score-based" => Ok(StylingPolicy::ScoreBased),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for StylingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chooses the style for each rendered feature. Stateless: the selection is
/// passed in per call, or captured by [`RegionStyler::bind`].
#[derive(Debug, Clone)]
pub struct RegionStyler {
    policy: StylingPolicy,
    profile: AttributeProfile,
    scores: ScoreTable,
}

impl RegionStyler {
    pub fn new(policy: StylingPolicy, profile: AttributeProfile, scores: ScoreTable) -> Self {
        Self {
            policy,
            profile,
            scores,
        }
    }

    pub fn policy(&self) -> StylingPolicy {
        self.policy
    }

    pub fn style_for(&self, feature: &Feature, selected_region: Option<&str>) -> StyleDescriptor {
        let category = self.profile.category(feature);
        match self.policy {
            StylingPolicy::AlwaysColored => match category.and_then(region_color) {
                Some(color) => NEUTRAL_STYLE.with_color(color),
                None => NEUTRAL_STYLE,
            },
            StylingPolicy::SelectionHighlight => {
                let highlighted = category.is_some() && category == selected_region;
                match category.filter(|_| highlighted).and_then(region_color) {
                    Some(color) => NEUTRAL_STYLE.with_color(color),
                    None => NEUTRAL_STYLE,
                }
            }
            StylingPolicy::ScoreBased => {
                let score = self
                    .profile
                    .score(feature)
                    .or_else(|| category.and_then(|code| self.scores.get(code)));
                let fill = match score {
                    Some(score) => SCORE_COLORS.lookup(&score),
                    None => SCORE_COLORS.default_color(),
                };
                StyleDescriptor {
                    weight: 0.4,
                    opacity: 0.4,
                    fill_opacity: 1.0,
                    color: Cow::Borrowed("black"),
                    fill_color: Some(Cow::Owned(normalize_css_color(fill))),
                }
            }
        }
    }

    /// Capture `selected` into a style callback for one overlay instance.
    pub fn bind(self: &Rc<Self>, selected: Option<RegionCode>) -> StyleFn {
        let styler = Rc::clone(self);
        Box::new(move |feature| styler.style_for(feature, selected.map(RegionCode::as_str)))
    }
}
