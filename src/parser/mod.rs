pub mod color;
pub mod style;
pub mod wildcard;

// Re-export commonly used items
pub use color::{parse_color, try_parse_color, Color};
pub use style::{clean_font_family, parse_px, parse_style, unwrap_url, Border, ParsedStyle};
pub use wildcard::{convert_wildcards, is_wildcard};
