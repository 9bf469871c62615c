//! `#rrggbb` color strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::pixel::{round_rgb, Rgb};

use crate::error::{ColorError, ColorResult};

/// Parses `#rrggbb` (leading `#` optional, any case) into channel bytes.
///
/// # Example
///
/// ```rust
/// use strata_color::hex::parse_hex;
///
/// assert_eq!(parse_hex("#FF8000").unwrap(), [255, 128, 0]);
/// assert_eq!(parse_hex("00ff00").unwrap(), [0, 255, 0]);
/// assert!(parse_hex("#fff").is_err());
/// ```
pub fn parse_hex(s: &str) -> ColorResult<[u8; 3]> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError::InvalidHex(s.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Formats an RGB triple as lowercase `#rrggbb`, clamping and rounding.
pub fn to_hex(rgb: Rgb) -> String {
    let [r, g, b] = round_rgb(rgb);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// An opaque 8-bit color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    /// Creates a color from channel bytes.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Channels as `f64` on the 0-255 scale.
    #[inline]
    pub fn to_rgb(self) -> Rgb {
        [self.0[0] as f64, self.0[1] as f64, self.0[2] as f64]
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> ColorResult<Self> {
        parse_hex(s).map(HexColor)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(s: String) -> ColorResult<Self> {
        s.parse()
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> String {
        c.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}
