use crate::style::color::Rgba8;

/// Fill rule passed through to the rasterizer and exporters unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// SVG `fill-rule` keyword. Unknown values fall back to `nonzero` as browsers do.
    pub fn from_svg(s: &str) -> Self {
        match s.trim() {
            "evenodd" => Self::EvenOdd,
            _ => Self::NonZero,
        }
    }

    pub fn as_svg(self) -> &'static str {
        match self {
            Self::NonZero => "nonzero",
            Self::EvenOdd => "evenodd",
        }
    }
}

/// Paint attributes a path carries from its source document.
///
/// `stroke` and `stroke_width` are optional: when absent the animation config supplies them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathStyle {
    pub fill: Option<Rgba8>,
    pub stroke: Option<Rgba8>,
    pub stroke_width: Option<f64>,
    pub fill_rule: FillRule,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill: Some(Rgba8::BLACK),
            stroke: None,
            stroke_width: None,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl PathStyle {
    pub fn with_fill(fill: Option<Rgba8>) -> Self {
        Self {
            fill,
            ..Self::default()
        }
    }
}

/// Style after falling back to animation defaults; what renderers actually draw with.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedStyle {
    pub stroke: Rgba8,
    pub stroke_width: f64,
    pub fill: Option<Rgba8>,
    pub fill_rule: FillRule,
}

impl ResolvedStyle {
    pub fn resolve(style: &PathStyle, default_stroke: Rgba8, default_width: f64) -> Self {
        Self {
            stroke: style.stroke.unwrap_or(default_stroke),
            stroke_width: style.stroke_width.unwrap_or(default_width),
            fill: style.fill,
            fill_rule: style.fill_rule,
        }
    }
}
