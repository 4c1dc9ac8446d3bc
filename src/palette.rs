//! Neon palette shared by every canvas layer.

use rand::Rng;

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` with `alpha` clamped to `[0, 1]`.
    pub fn rgba(self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// The four particle colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neon {
    Cyan,
    Violet,
    Pink,
    Green,
}

impl Neon {
    pub const ALL: [Neon; 4] = [Neon::Cyan, Neon::Violet, Neon::Pink, Neon::Green];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub const fn rgb(self) -> Rgb {
        match self {
            Neon::Cyan => Rgb::new(0x00, 0xf3, 0xff),
            Neon::Violet => Rgb::new(0xbc, 0x13, 0xfe),
            Neon::Pink => Rgb::new(0xff, 0x2a, 0x6d),
            Neon::Green => Rgb::new(0x00, 0xff, 0x88),
        }
    }

    /// Feedback colour for a validated field.
    pub const fn for_validity(valid: bool) -> Self {
        if valid {
            Neon::Green
        } else {
            Neon::Pink
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn hex_matches_site_css() {
        assert_eq!(Neon::Cyan.rgb().hex(), "#00f3ff");
        assert_eq!(Neon::Violet.rgb().hex(), "#bc13fe");
        assert_eq!(Neon::Pink.rgb().hex(), "#ff2a6d");
        assert_eq!(Neon::Green.rgb().hex(), "#00ff88");
    }

    #[test]
    fn rgba_clamps_alpha() {
        assert_eq!(Neon::Cyan.rgb().rgba(1.5), "rgba(0, 243, 255, 1)");
        assert_eq!(Neon::Cyan.rgb().rgba(-0.2), "rgba(0, 243, 255, 0)");
    }

    #[test]
    fn random_covers_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let c = Neon::random(&mut rng);
            seen[Neon::ALL.iter().position(|n| *n == c).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
