use serde::{Deserialize, Serialize};

use crate::color::{RgbColor, parse_hex_color};

/// Caller-supplied formatting. `None` means "leave unchanged"; an explicit
/// `Some(false)` is applied like any other value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRequest {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    #[serde(alias = "fontSize")]
    pub font_size_pt: Option<f64>,
    pub font_family: Option<String>,
    #[serde(alias = "foregroundColor")]
    pub foreground_color_hex: Option<String>,
}

/// A text style attribute that can be declared as changed in an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleField {
    Bold,
    Italic,
    Underline,
    FontSize,
    FontFamily,
    ForegroundColor,
}

impl StyleField {
    /// Field path as understood by the service's update mask.
    pub fn path(self) -> &'static str {
        match self {
            StyleField::Bold => "bold",
            StyleField::Italic => "italic",
            StyleField::Underline => "underline",
            StyleField::FontSize => "fontSize",
            StyleField::FontFamily => "weightedFontFamily.fontFamily",
            StyleField::ForegroundColor => "foregroundColor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Unit {
    #[serde(rename = "PT")]
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFontFamily {
    pub font_family: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionalColor {
    pub color: Color,
}

/// Style payload carrying only the attributes being changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
}

/// A style payload together with the fields it declares as changed.
///
/// `fields` is never empty and lists each field once, in the order the
/// attributes were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleUpdate {
    pub style: TextStyle,
    pub fields: Vec<StyleField>,
}

impl StyleUpdate {
    /// Comma-joined field mask, e.g. `bold,weightedFontFamily.fontFamily`.
    pub fn fields_mask(&self) -> String {
        fields_mask(&self.fields)
    }
}

pub fn fields_mask(fields: &[StyleField]) -> String {
    fields
        .iter()
        .map(|field| field.path())
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the minimal style payload for `request`.
///
/// Returns `None` when nothing would change. Quirks:
/// - a font size of exactly `0` is treated as unset;
/// - an empty font family is treated as unset;
/// - an unparseable color is dropped on its own, other fields still apply.
pub fn build_style(request: &StyleRequest) -> Option<StyleUpdate> {
    let mut style = TextStyle::default();
    let mut fields = Vec::new();

    if let Some(bold) = request.bold {
        style.bold = Some(bold);
        fields.push(StyleField::Bold);
    }
    if let Some(italic) = request.italic {
        style.italic = Some(italic);
        fields.push(StyleField::Italic);
    }
    if let Some(underline) = request.underline {
        style.underline = Some(underline);
        fields.push(StyleField::Underline);
    }

    if let Some(size) = request.font_size_pt.filter(|size| *size != 0.0 && !size.is_nan()) {
        style.font_size = Some(Dimension {
            magnitude: size,
            unit: Unit::Points,
        });
        fields.push(StyleField::FontSize);
    }

    if let Some(family) = request.font_family.as_deref().filter(|f| !f.is_empty()) {
        style.weighted_font_family = Some(WeightedFontFamily {
            font_family: family.to_string(),
        });
        fields.push(StyleField::FontFamily);
    }

    if let Some(hex) = request.foreground_color_hex.as_deref() {
        match parse_hex_color(hex) {
            Some(rgb_color) => {
                style.foreground_color = Some(OptionalColor {
                    color: Color { rgb_color },
                });
                fields.push(StyleField::ForegroundColor);
            }
            None => log::warn!("ignoring invalid foreground color {hex:?}"),
        }
    }

    if fields.is_empty() {
        return None;
    }
    Some(StyleUpdate { style, fields })
}
