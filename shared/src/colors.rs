use crate::region::RegionCode;

/// Fallback color for features whose category has no table entry.
pub const NEUTRAL_COLOR: &str = "grey";

/// Fixed category -> CSS color lookup with a default for unknown keys.
#[derive(Debug, Clone, Copy)]
pub struct ColorTable<K: 'static> {
    entries: &'static [(K, &'static str)],
    default: &'static str,
}

impl<K: PartialEq> ColorTable<K> {
    pub const fn new(entries: &'static [(K, &'static str)], default: &'static str) -> Self {
        Self { entries, default }
    }

    pub fn get(&self, key: &K) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, color)| *color)
    }

    /// Table color for `key`, or the default.
    pub fn lookup(&self, key: &K) -> &'static str {
        self.get(key).unwrap_or(self.default)
    }

    pub fn default_color(&self) -> &'static str {
        self.default
    }

    pub fn entries(&self) -> &'static [(K, &'static str)] {
        self.entries
    }
}

pub const REGION_COLORS: ColorTable<RegionCode> = ColorTable::new(
    &[
        (RegionCode::Searo, "orange"),
        (RegionCode::Afro, "green"),
        (RegionCode::Amro, "blue"),
        (RegionCode::Emro, "red"),
        (RegionCode::Euro, "brown"),
        (RegionCode::Wpro, "yellow"),
    ],
    NEUTRAL_COLOR,
);

/// Incident score buckets: 1 is worst.
pub const SCORE_COLORS: ColorTable<i64> = ColorTable::new(
    &[
        (1, "#ff0000"),
        (2, "#ffcc00"),
        (3, "#ffcc00"),
        (4, "#009933"),
        (5, "#009933"),
    ],
    "#004c730a",
);

/// Region table color for a raw category value. `None` when the value is not
/// a colored region (unknown codes and `WORLD`).
pub fn region_color(category: &str) -> Option<&'static str> {
    let code = category.parse::<RegionCode>().ok()?;
    REGION_COLORS.get(&code)
}

/// Format RGBA as a CSS color string.
pub fn rgba_css(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({r},{g},{b},{a})")
}

/// Parse `#rrggbb` or `#rrggbbaa` into components, alpha in 0..=1.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8, f64)> {
    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some((channel(0)?, channel(2)?, channel(4)?, 1.0)),
        8 => Some((
            channel(0)?,
            channel(2)?,
            channel(4)?,
            f64::from(channel(6)?) / 255.0,
        )),
        _ => None,
    }
}

/// Rewrite 8-digit hex colors as `rgba()`; anything else is returned as-is.
///
/// SVG fill attributes in older engines ignore the alpha byte of `#rrggbbaa`.
pub fn normalize_css_color(color: &str) -> String {
    match parse_hex(color) {
        Some((r, g, b, a)) if color.len() == 9 => {
            let a = (a * 1000.0).round() / 1000.0;
            rgba_css(r, g, b, a)
        }
        _ => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_table_covers_every_office() {
        for code in RegionCode::ALL {
            let color = REGION_COLORS.lookup(&code);
            if code == RegionCode::World {
                assert_eq!(color, NEUTRAL_COLOR);
            } else {
                assert_ne!(color, NEUTRAL_COLOR, "{code}");
            }
        }
    }

    #[test]
    fn region_color_ignores_unknown_and_world() {
        assert_eq!(region_color("SEARO"), Some("orange"));
        assert_eq!(region_color("WPRO"), Some("yellow"));
        assert_eq!(region_color("WORLD"), None);
        assert_eq!(region_color("Atlantis"), None);
    }

    #[test]
    fn score_buckets_share_colors() {
        assert_eq!(SCORE_COLORS.lookup(&1), "#ff0000");
        assert_eq!(SCORE_COLORS.lookup(&2), SCORE_COLORS.lookup(&3));
        assert_eq!(SCORE_COLORS.lookup(&4), SCORE_COLORS.lookup(&5));
        assert_eq!(SCORE_COLORS.lookup(&0), "#004c730a");
        assert_eq!(SCORE_COLORS.lookup(&99), SCORE_COLORS.default_color());
    }

    #[test]
    fn parse_hex_reads_optional_alpha() {
        assert_eq!(parse_hex("#009933"), Some((0, 153, 51, 1.0)));
        let (r, g, b, a) = parse_hex("#004c730a").unwrap();
        assert_eq!((r, g, b), (0, 76, 115));
        assert!((a - 10.0 / 255.0).abs() < 1e-12);
        assert_eq!(parse_hex("grey"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn normalize_only_touches_eight_digit_hex() {
        assert_eq!(normalize_css_color("#004c730a"), "rgba(0,76,115,0.039)");
        assert_eq!(normalize_css_color("#ff0000"), "#ff0000");
        assert_eq!(normalize_css_color("orange"), "orange");
    }
}
