use std::ops::{Add, Mul};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color with saturating arithmetic.
///
/// Every operator clamps each channel to [0, 255] instead of wrapping.
/// Alpha is carried over from the left operand and never blended.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default)]
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xAARRGGBB`.
    #[inline]
    pub fn to_packed(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Inverse of [`Color::to_packed`].
    #[inline]
    pub fn from_packed(value: u32) -> Self {
        let [a, r, g, b] = value.to_be_bytes();
        Self { r, g, b, a }
    }
}

#[inline]
fn scale_channel(channel: u8, scalar: f32) -> u8 {
    // `as` truncates and maps NaN to 0
    (channel as f32 * scalar).clamp(0.0, 255.0) as u8
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(
            self.r.saturating_add(rhs.r),
            self.g.saturating_add(rhs.g),
            self.b.saturating_add(rhs.b),
            self.a,
        )
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, scalar: f32) -> Color {
        Color::new(
            scale_channel(self.r, scalar),
            scale_channel(self.g, scalar),
            scale_channel(self.b, scalar),
            self.a,
        )
    }
}

/// Light filtering: `(a * b) / 255` per channel.
impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        let filter = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Color::new(
            filter(self.r, rhs.r),
            filter(self.g, rhs.g),
            filter(self.b, rhs.b),
            self.a,
        )
    }
}
