/// Straight-alpha RGBA color, each channel in `[0, 1]`.
///
/// Vertices carry this value unchanged; the pipeline blends with
/// `src_alpha, one_minus_src_alpha`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0, 1.0);
    pub const ORANGE: Color = Color::new(1.0, 0.5, 0.0, 1.0);
    pub const MAGENTA: Color = Color::new(0.75, 0.0, 0.75, 1.0);
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5, 1.0);
    pub const LIGHT_GRAY: Color = Color::new(0.75, 0.75, 0.75, 1.0);
    pub const DARK_GRAY: Color = Color::new(0.25, 0.25, 0.25, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from `0xRRGGBB`. Bits above 24 are ignored.
    #[inline]
    pub fn from_hex_rgb(hex: u32) -> Self {
        Self::new(channel(hex, 16), channel(hex, 8), channel(hex, 0), 1.0)
    }

    /// Color from `0xAARRGGBB`.
    #[inline]
    pub fn from_hex_argb(hex: u32) -> Self {
        Self::new(channel(hex, 16), channel(hex, 8), channel(hex, 0), channel(hex, 24))
    }

    /// Moves each RGB channel toward 1 by `gain` (0 = unchanged, 1 = white).
    #[inline]
    pub fn lighten(self, gain: f32) -> Self {
        Self::new(
            self.r + gain * (1.0 - self.r),
            self.g + gain * (1.0 - self.g),
            self.b + gain * (1.0 - self.b),
            self.a,
        )
    }

    /// Moves each RGB channel toward 0 by `gain` (0 = unchanged, 1 = black).
    #[inline]
    pub fn darken(self, gain: f32) -> Self {
        Self::new(
            self.r - gain * self.r,
            self.g - gain * self.g,
            self.b - gain * self.b,
            self.a,
        )
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[inline]
fn channel(hex: u32, shift: u32) -> f32 {
    ((hex >> shift) & 0xFF) as f32 / 255.0
}
