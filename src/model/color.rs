/// 8-bit RGB color as given on a wheel slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`. Returns None for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let clean = hex.trim().trim_start_matches('#');
        if clean.len() != 6 || !clean.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            clean.get(range).and_then(|s| u8::from_str_radix(s, 16).ok())
        };
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Components scaled to 0.0-1.0.
    pub fn unit_floats(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("00FF80"), Some(Color::rgb(0, 255, 128)));
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex(""), None);
    }

    #[test]
    fn unit_floats_span_zero_to_one() {
        let (r, g, b) = Color::rgb(255, 0, 51).unit_floats();
        assert!((r - 1.0).abs() < f64::EPSILON);
        assert!(g.abs() < f64::EPSILON);
        assert!((b - 0.2).abs() < 1e-12);
    }
}
