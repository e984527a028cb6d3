/// Default stroke/fill color for drawn features (RGBA, 0..1).
pub const DEFAULT_FEATURE_COLOR: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
/// Color every highlighted feature switches to.
pub const SELECTED_COLOR: [f32; 4] = [1.0, 0.85, 0.0, 1.0];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeatureStyle {
    pub visible: bool,
    pub color: [f32; 4],
    pub fill_opacity: f32,
    pub stroke_width: f32,
}

impl FeatureStyle {
    pub const fn new(visible: bool, color: [f32; 4], fill_opacity: f32, stroke_width: f32) -> Self {
        Self {
            visible,
            color,
            fill_opacity,
            stroke_width,
        }
    }

    pub const fn from_color(color: [f32; 4]) -> Self {
        Self::new(true, color, 0.2, 2.0)
    }

    /// The fixed highlight style.
    pub const fn selected() -> Self {
        Self::new(true, SELECTED_COLOR, 0.4, 3.0)
    }
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self::from_color(DEFAULT_FEATURE_COLOR)
    }
}

/// Parses `#rrggbb` or `#rrggbbaa` (the `#` is optional).
pub fn parse_hex_color(text: &str) -> Option<[f32; 4]> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(|v| v as f32 / 255.0);
    let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}

#[cfg(test)]
mod tests {
    use super::{FeatureStyle, SELECTED_COLOR, parse_hex_color};

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#ff0000"), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(parse_hex_color("00ff0000"), Some([0.0, 1.0, 0.0, 0.0]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn selected_style_differs_from_color_style() {
        let style = FeatureStyle::from_color([1.0, 0.0, 0.0, 1.0]);
        assert_ne!(style, FeatureStyle::selected());
        assert_eq!(FeatureStyle::selected().color, SELECTED_COLOR);
    }
}
