//! Colors and the name-to-color ordinal scale.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Twelve-color qualitative palette (ColorBrewer Set3).
pub const SET3: [Rgb; 12] = [
    Rgb::new(0x8d, 0xd3, 0xc7),
    Rgb::new(0xff, 0xff, 0xb3),
    Rgb::new(0xbe, 0xba, 0xda),
    Rgb::new(0xfb, 0x80, 0x72),
    Rgb::new(0x80, 0xb1, 0xd3),
    Rgb::new(0xfd, 0xb4, 0x62),
    Rgb::new(0xb3, 0xde, 0x69),
    Rgb::new(0xfc, 0xcd, 0xe5),
    Rgb::new(0xd9, 0xd9, 0xd9),
    Rgb::new(0xbc, 0x80, 0xbd),
    Rgb::new(0xcc, 0xeb, 0xc5),
    Rgb::new(0xff, 0xed, 0x6f),
];

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, to: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb::new(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Maps names to palette colors in first-seen order.
///
/// A name keeps its color for the lifetime of the scale, even after every
/// expense carrying it is gone, so re-adding it does not shuffle colors.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    range: Vec<Rgb>,
    assigned: HashMap<String, Rgb>,
    next: usize,
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self::new(SET3.to_vec())
    }
}

impl OrdinalScale {
    /// Creates a scale over `range`; an empty range falls back to Set3.
    pub fn new(range: Vec<Rgb>) -> Self {
        let range = if range.is_empty() { SET3.to_vec() } else { range };
        Self {
            range,
            assigned: HashMap::new(),
            next: 0,
        }
    }

    /// Returns the color for `name`, assigning the next palette entry on
    /// first use.
    pub fn color(&mut self, name: &str) -> Rgb {
        if let Some(color) = self.assigned.get(name) {
            return *color;
        }
        let color = self.range[self.next % self.range.len()];
        self.next += 1;
        self.assigned.insert(name.to_string(), color);
        color
    }

    /// Color for an already assigned name, without assigning.
    pub fn peek(&self, name: &str) -> Option<Rgb> {
        self.assigned.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{OrdinalScale, Rgb, SET3};

    #[test]
    fn colors_format_as_lowercase_hex() {
        assert_eq!(SET3[0].to_string(), "#8dd3c7");
        assert_eq!(Rgb::WHITE.to_string(), "#ffffff");
        assert_eq!(Rgb::new(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let black = Rgb::new(0, 0, 0);
        assert_eq!(black.lerp(Rgb::WHITE, 0.0), black);
        assert_eq!(black.lerp(Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(black.lerp(Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(black.lerp(Rgb::WHITE, 3.0), Rgb::WHITE);
    }

    #[test]
    fn names_keep_their_first_color_and_palette_wraps() {
        let mut scale = OrdinalScale::default();
        let food = scale.color("food");
        let rent = scale.color("rent");
        assert_eq!(food, SET3[0]);
        assert_eq!(rent, SET3[1]);
        assert_eq!(scale.color("food"), food);

        for index in 0..10 {
            scale.color(&format!("extra-{index}"));
        }
        assert_eq!(scale.color("thirteenth"), SET3[0]);
    }
}
