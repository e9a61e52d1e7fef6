//! Accent color handling

use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated `#rgb` or `#rrggbb` hex color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccentColor(String);

impl AccentColor {
    /// Cyan, the HUD's resting color
    pub const DEFAULT_HEX: &'static str = "#00f2ff";

    /// Named colors offered to the language model when it picks a color
    pub const PRESETS: [(&'static str, &'static str); 6] = [
        ("Red", "#ff3131"),
        ("Green", "#39ff14"),
        ("Blue", "#00f2ff"),
        ("Purple", "#bc13fe"),
        ("Gold", "#ffd700"),
        ("Emerald", "#50c878"),
    ];

    /// Parses a hex color, accepting exactly `#` followed by 3 or 6 hex digits
    ///
    /// Surrounding whitespace is ignored; case is preserved.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#')?;
        let valid_len = digits.len() == 3 || digits.len() == 6;
        if valid_len && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels, expanding the short form (`#abc` = `#aabbcc`)
    pub fn rgb(&self) -> (u8, u8, u8) {
        let digits = &self.0[1..];
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        if digits.len() == 3 {
            let expand = |i: usize| channel(&digits[i..=i].repeat(2));
            (expand(0), expand(1), expand(2))
        } else {
            (
                channel(&digits[0..2]),
                channel(&digits[2..4]),
                channel(&digits[4..6]),
            )
        }
    }

    /// Looks up a preset by name, case-insensitively
    pub fn preset(name: &str) -> Option<Self> {
        Self::PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .and_then(|(_, hex)| Self::parse(hex))
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self(Self::DEFAULT_HEX.to_string())
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccentColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("'{value}' is not a 3 or 6 digit hex color"))
    }
}

impl From<AccentColor> for String {
    fn from(color: AccentColor) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_short_and_long_forms() {
        assert_eq!(AccentColor::parse("#abc").unwrap().as_str(), "#abc");
        assert_eq!(AccentColor::parse("#A1B2C3").unwrap().as_str(), "#A1B2C3");
        assert_eq!(AccentColor::parse("  #39ff14\n").unwrap().as_str(), "#39ff14");
    }

    #[test]
    fn test_rejects_malformed() {
        for input in [
            "", "#", "39ff14", "#39ff1", "#39ff145", "#ggg", "#12345g", "green", "#39ff14 ok",
            "##39ff14",
        ] {
            assert!(AccentColor::parse(input).is_none(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_rgb_channels() {
        assert_eq!(AccentColor::default().rgb(), (0x00, 0xf2, 0xff));
        assert_eq!(AccentColor::parse("#f0a").unwrap().rgb(), (0xff, 0x00, 0xaa));
    }

    #[test]
    fn test_presets_are_valid() {
        for (name, hex) in AccentColor::PRESETS {
            assert_eq!(AccentColor::preset(name).unwrap().as_str(), hex);
        }
        assert_eq!(AccentColor::preset("gold").unwrap().as_str(), "#ffd700");
        assert!(AccentColor::preset("mauve").is_none());
    }
}
