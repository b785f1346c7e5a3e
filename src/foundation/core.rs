use crate::foundation::error::{CardError, CardResult};
use serde::{Deserialize, Serialize};

pub use kurbo::{Point, Rect};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Portrait feed canvas used for every output image.
    pub const FEED: Canvas = Canvas {
        width: 1080,
        height: 1350,
    };
}

/// 1-based position of an image inside one output batch.
///
/// Card `i` (0-based) is written as `FeedIndex(i + 1)`; the closing splash takes the next index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedIndex(pub u32);

impl FeedIndex {
    /// Index for the 0-based card position `pos`.
    pub fn for_position(pos: usize) -> Self {
        Self(u32::try_from(pos).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Output file name, zero-padded to two digits (`feed_01.jpg`).
    pub fn file_name(self) -> String {
        format!("feed_{:02}.jpg", self.0)
    }
}

/// Opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white, used for labels drawn over photography.
    pub const WHITE: Rgb8 = Rgb8::new(0xFF, 0xFF, 0xFF);

    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, hex digits are case-insensitive).
    pub fn from_hex(s: &str) -> CardResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err(CardError::document(format!(
                "color \"{s}\" must be #RRGGBB (case-insensitive)"
            )));
        }

        fn hex_byte(pair: &str) -> CardResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| CardError::document(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }

    /// Channels as an `[r, g, b]` array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
