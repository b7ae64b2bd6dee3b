use std::str::FromStr;

use anyhow::{anyhow, Result};
use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

use crate::config::ThemeConfig;

// ---------------------------------------------------------------------------
// Theme: config hex strings → egui colours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub primary: Color32,
    pub secondary: Color32,
    pub background: Color32,
    pub text: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::BLACK,
            secondary: Color32::from_rgb(0xF7, 0x93, 0x1E),
            background: Color32::WHITE,
            text: Color32::from_rgb(0x33, 0x33, 0x33),
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        Ok(Self {
            primary: parse_hex("primary", &config.primary)?,
            secondary: parse_hex("secondary", &config.secondary)?,
            background: parse_hex("background", &config.background)?,
            text: parse_hex("text", &config.text)?,
        })
    }

    /// Colour for a value on the primary → secondary scale, `t` in `0..=1`.
    pub fn scale(&self, t: f32) -> Color32 {
        let from = to_srgb(self.primary).into_linear();
        let to = to_srgb(self.secondary).into_linear();
        from_srgb(Srgb::from_linear(from.mix(to, t.clamp(0.0, 1.0))))
    }

    /// `n` slice colours, from the secondary colour towards pastel.
    pub fn shades(&self, n: usize) -> Vec<Color32> {
        generate_shades(self.secondary, n)
    }
}

fn parse_hex(name: &str, hex: &str) -> Result<Color32> {
    let rgb = Srgb::<u8>::from_str(hex)
        .map_err(|e| anyhow!("theme.{name}: '{hex}' is not a hex colour ({e})"))?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

fn to_srgb(c: Color32) -> Srgb {
    Srgb::new(c.r(), c.g(), c.b()).into_format()
}

fn from_srgb(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Palette generator
// ---------------------------------------------------------------------------

/// Generates `n` shades of `base` with increasing lightness.
pub fn generate_shades(base: Color32, n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let hsl: Hsl = to_srgb(base).into_color();
    let max_lightness = 0.85_f32.max(hsl.lightness);
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let lightness = hsl.lightness + (max_lightness - hsl.lightness) * t;
            let shade = Hsl::new(hsl.hue, hsl.saturation, lightness);
            let rgb: Srgb = shade.into_color();
            from_srgb(rgb)
        })
        .collect()
}
