//! sRGB colors: parsing, formatting and linear interpolation.

use std::fmt;

/// An 8-bit sRGB triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

/// CSS names accepted in configuration alongside `#rrggbb`.
const NAMED: &[(&str, Rgb)] = &[
    ("black", Rgb::BLACK),
    ("white", Rgb::WHITE),
    ("red", Rgb::RED),
    ("orange", Rgb::ORANGE),
    ("green", Rgb::GREEN),
    ("gray", Rgb::GRAY),
    ("grey", Rgb::GRAY),
    ("lightgray", Rgb([0xd3, 0xd3, 0xd3])),
    ("blue", Rgb([0x00, 0x00, 0xff])),
    ("yellow", Rgb([0xff, 0xff, 0x00])),
    ("purple", Rgb([0x80, 0x00, 0x80])),
];

impl Rgb {
    pub const BLACK: Rgb = Rgb([0x00, 0x00, 0x00]);
    pub const WHITE: Rgb = Rgb([0xff, 0xff, 0xff]);
    pub const RED: Rgb = Rgb([0xff, 0x00, 0x00]);
    pub const ORANGE: Rgb = Rgb([0xff, 0xa5, 0x00]);
    pub const GREEN: Rgb = Rgb([0x00, 0x80, 0x00]);
    pub const GRAY: Rgb = Rgb([0x80, 0x80, 0x80]);

    /// Parse `#RRGGBB` (case-insensitive).
    pub fn parse_hex(tok: &str) -> Result<Rgb, String> {
        let s = tok.trim();
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("expected #RRGGBB, got '{}'", s))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected 6 hex digits, got '{}'", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("bad hex color '{}'", s))
        };
        Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }

    /// Parse a hex color or one of the supported CSS color names.
    pub fn parse(tok: &str) -> Result<Rgb, String> {
        let s = tok.trim();
        if s.starts_with('#') {
            return Self::parse_hex(s);
        }
        NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, rgb)| *rgb)
            .ok_or_else(|| format!("unknown color '{}'", s))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    /// Channel-wise linear interpolation in sRGB; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (f64::from(a) + t * (f64::from(b) - f64::from(a))).round() as u8;
        Rgb([
            mix(self.0[0], other.0[0]),
            mix(self.0[1], other.0[1]),
            mix(self.0[2], other.0[2]),
        ])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(Rgb::parse_hex("#FEB24C").unwrap(), Rgb([0xfe, 0xb2, 0x4c]));
        assert_eq!(Rgb::parse("Orange").unwrap(), Rgb::ORANGE);
        assert_eq!(Rgb::parse(" #d3d3d3 ").unwrap(), Rgb([0xd3, 0xd3, 0xd3]));
        assert!(Rgb::parse_hex("d3d3d3").is_err());
        assert!(Rgb::parse_hex("#12345").is_err());
        assert!(Rgb::parse_hex("#gg0000").is_err());
        assert!(Rgb::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn formats_lowercase_hex() {
        assert_eq!(Rgb([0xF0, 0x3B, 0x20]).to_hex(), "#f03b20");
        assert_eq!(Rgb::GREEN.to_string(), "#008000");
    }

    #[test]
    fn lerp_hits_endpoints_and_clamps() {
        assert_eq!(Rgb::WHITE.lerp(Rgb::RED, 0.0), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.lerp(Rgb::RED, 1.0), Rgb::RED);
        assert_eq!(Rgb::WHITE.lerp(Rgb::RED, 0.5), Rgb([0xff, 0x80, 0x80]));
        assert_eq!(Rgb::WHITE.lerp(Rgb::RED, -3.0), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.lerp(Rgb::RED, 7.0), Rgb::RED);
    }
}
