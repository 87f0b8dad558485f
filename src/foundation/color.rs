use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::PromoError;

impl FromStr for Rgba8 {
    type Err = PromoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(named) = named_color(s) {
            return Ok(named);
        }
        parse_hex(s).map_err(PromoError::validation)
    }
}

impl Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        ))
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn named_color(name: &str) -> Option<Rgba8> {
    let c = match name.to_ascii_lowercase().as_str() {
        "white" => Rgba8::WHITE,
        "black" => Rgba8::BLACK,
        "red" => Rgba8::opaque(255, 0, 0),
        "green" => Rgba8::opaque(0, 128, 0),
        "blue" => Rgba8::opaque(0, 0, 255),
        "yellow" => Rgba8::opaque(255, 255, 0),
        "orange" => Rgba8::opaque(255, 165, 0),
        "gray" | "grey" => Rgba8::opaque(128, 128, 128),
        "transparent" => Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        },
        _ => return None,
    };
    Some(c)
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
    }

    match s.len() {
        6 => Ok(Rgba8 {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: 255,
        }),
        8 => Ok(Rgba8 {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: hex_byte(&s[6..8])?,
        }),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
