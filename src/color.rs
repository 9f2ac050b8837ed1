use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Viridis-like ramp for a 0–100 habitability score: dark purple for 0,
/// through teal, to yellow for 100.
pub fn habitability_color(habitability: u8) -> Color32 {
    let t = f32::from(habitability.min(100)) / 100.0;
    let hue = 280.0 - t * 220.0;
    let lightness = 0.25 + t * 0.35;
    hsl_to_color32(hue, 0.7, lightness)
}

// ---------------------------------------------------------------------------
// Color mapping: discovery facility → Color32
// ---------------------------------------------------------------------------

/// Maps discovery facilities to distinct colours. Records without a
/// facility get `default_color`.
#[derive(Debug, Clone)]
pub struct FacilityColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl FacilityColors {
    pub fn new(facilities: &BTreeSet<String>) -> Self {
        let palette = generate_palette(facilities.len());
        let mapping = facilities.iter().cloned().zip(palette).collect();

        FacilityColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, facility: Option<&str>) -> Color32 {
        facility
            .and_then(|f| self.mapping.get(f))
            .copied()
            .unwrap_or(self.default_color)
    }
}
