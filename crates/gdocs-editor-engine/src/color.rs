use serde::Serialize;

/// An RGB color with each channel normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Parse a `#RRGGBB` (or bare `RRGGBB`) hex string.
///
/// Returns `None` for anything that is not exactly six hex digits after the
/// optional leading `#`. Callers treat `None` as "skip this field", never as a
/// reason to abort the surrounding request.
pub fn parse_hex_color(hex: &str) -> Option<RgbColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| -> Option<f64> {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|byte| f64::from(byte) / 255.0)
    };

    Some(RgbColor {
        red: channel(0..2)?,
        green: channel(2..4)?,
        blue: channel(4..6)?,
    })
}
