//! Colour conversion helpers.

/// Linear RGBA colour with components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Convert a packed `0xRRGGBB` value into normalized RGB.
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

/// Extend an RGB triple with an alpha component.
pub fn with_alpha(rgb: [f32; 3], alpha: f32) -> Rgba {
    [rgb[0], rgb[1], rgb[2], alpha]
}
