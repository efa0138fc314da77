use serde::{Deserialize, Serialize};

/// Normalized RGBA color
///
/// Channels are 0-255, alpha is 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Parse CSS-like color text into a normalized color
///
/// Unrecognized input falls back to opaque black and logs a warning; this
/// function never fails. Use [`try_parse_color`] to detect the fallback.
///
/// # Examples
/// ```
/// use layout2scene::parser::{parse_color, Color};
///
/// assert_eq!(parse_color("#fff"), Color::WHITE);
/// assert_eq!(parse_color("not-a-color"), Color::BLACK);
/// ```
pub fn parse_color(input: &str) -> Color {
    match try_parse_color(input) {
        Some(color) => color,
        None => {
            tracing::warn!(color = input, "unrecognized color, using black");
            Color::BLACK
        }
    }
}

/// Parse CSS-like color text, returning `None` when unrecognized
///
/// Accepted forms (case-insensitive):
/// - named colors: white, black, red, green, blue, gray/grey, transparent
/// - `rgb(r, g, b)` and `rgba(r, g, b, a)`
/// - `#RGB`, `#RRGGBB`, `#RRGGBBAA`
///
/// Channels are clamped to [0, 255] and alpha to [0, 1].
pub fn try_parse_color(input: &str) -> Option<Color> {
    let text = input.trim().to_ascii_lowercase();

    if let Some(color) = named_color(&text) {
        return Some(color);
    }

    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(args) = function_args(&text, "rgba").or_else(|| function_args(&text, "rgb")) {
        return parse_rgb_args(args);
    }

    None
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "transparent" => Color::rgba(0, 0, 0, 0.0),
        _ => return None,
    };
    Some(color)
}

/// Return the text between `name(` and the closing `)`
fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    let a = match parts.get(3) {
        Some(alpha) => alpha
            .parse::<f64>()
            .ok()
            .filter(|a| !a.is_nan())?
            .clamp(0.0, 1.0),
        None => 1.0,
    };

    Some(Color::rgba(r, g, b, a))
}

fn parse_channel(text: &str) -> Option<u8> {
    let value = text.parse::<f64>().ok()?;
    if value.is_nan() {
        return None;
    }
    Some(value.clamp(0.0, 255.0).round() as u8)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            // Each digit doubles into a full byte: "f" -> 0xff
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => Some(Color::rgb(
            hex_byte(hex, 0)?,
            hex_byte(hex, 2)?,
            hex_byte(hex, 4)?,
        )),
        8 => {
            let alpha = f64::from(hex_byte(hex, 6)?) / 255.0;
            Some(Color::rgba(
                hex_byte(hex, 0)?,
                hex_byte(hex, 2)?,
                hex_byte(hex, 4)?,
                (alpha * 100.0).round() / 100.0,
            ))
        }
        _ => None,
    }
}

fn hex_byte(hex: &str, offset: usize) -> Option<u8> {
    u8::from_str_radix(&hex[offset..offset + 2], 16).ok()
}
