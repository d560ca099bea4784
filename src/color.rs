use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Complexity gradient
// ---------------------------------------------------------------------------

/// `n` colours running from green (least complex) to red (most complex).
pub fn generate_gradient(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            let hue = 120.0 * (1.0 - t);
            let hsl = Hsl::new(hue, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: complexity rank → Color32
// ---------------------------------------------------------------------------

/// Maps 1-based complexity ranks to gradient colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    gradient: Vec<Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for ranks `1..=rank_count`.
    pub fn new(rank_count: usize) -> Self {
        ColorMap {
            gradient: generate_gradient(rank_count),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a rank; out-of-range ranks are grey.
    pub fn color_for(&self, rank: usize) -> Color32 {
        rank.checked_sub(1)
            .and_then(|i| self.gradient.get(i))
            .copied()
            .unwrap_or(self.default_color)
    }
}
