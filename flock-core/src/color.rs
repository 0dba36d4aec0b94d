use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGBA display color. Carries no simulation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Draws every channel, alpha included, from `rng`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
            a: rng.gen(),
        }
    }

    /// Random color with full alpha.
    pub fn random_opaque<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            a: 255,
            ..Self::random(rng)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
