// src/catalog.rs
// Static style tables shown to clients: presets and human labels.
use crate::models::{CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StylePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub foreground_color: &'static str,
    pub background_color: &'static str,
}

pub const STYLE_PRESETS: [StylePreset; 6] = [
    StylePreset {
        id: "classic",
        name: "Classic Black",
        foreground_color: "#000000",
        background_color: "#FFFFFF",
    },
    StylePreset {
        id: "ocean",
        name: "Deep Ocean",
        foreground_color: "#0f172a",
        background_color: "#e0f2fe",
    },
    StylePreset {
        id: "midnight",
        name: "Midnight",
        foreground_color: "#f8fafc",
        background_color: "#020617",
    },
    StylePreset {
        id: "sunset",
        name: "Sunset Glow",
        foreground_color: "#7c2d12",
        background_color: "#fff7ed",
    },
    StylePreset {
        id: "forest",
        name: "Evergreen",
        foreground_color: "#064e3b",
        background_color: "#f0fdf4",
    },
    StylePreset {
        id: "royal",
        name: "Royal Purple",
        foreground_color: "#4c1d95",
        background_color: "#f5f3ff",
    },
];

pub fn find_preset(id: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|preset| preset.id == id)
}

#[derive(Debug, Clone, Serialize)]
pub struct Labeled<T> {
    pub value: T,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleCatalog {
    pub error_correction_levels: Vec<Labeled<ErrorCorrectionLevel>>,
    pub dot_styles: Vec<Labeled<DotType>>,
    pub corner_square_styles: Vec<Labeled<CornerSquareType>>,
    pub corner_dot_styles: Vec<Labeled<CornerDotType>>,
}

fn labeled<T>(value: T, label: &'static str) -> Labeled<T> {
    Labeled { value, label }
}

pub fn style_catalog() -> StyleCatalog {
    StyleCatalog {
        error_correction_levels: vec![
            labeled(ErrorCorrectionLevel::Low, "Low (7%)"),
            labeled(ErrorCorrectionLevel::Medium, "Medium (15%)"),
            labeled(ErrorCorrectionLevel::Quartile, "Quartile (25%)"),
            labeled(ErrorCorrectionLevel::High, "High (30%)"),
        ],
        dot_styles: vec![
            labeled(DotType::Square, "Square"),
            labeled(DotType::Rounded, "Rounded"),
            labeled(DotType::Dots, "Dots"),
            labeled(DotType::ExtraRounded, "Soft"),
            labeled(DotType::Classy, "Classy"),
            labeled(DotType::ClassyRounded, "Elegant"),
        ],
        corner_square_styles: vec![
            labeled(CornerSquareType::Square, "Square"),
            labeled(CornerSquareType::ExtraRounded, "Rounded"),
            labeled(CornerSquareType::Dot, "Dot"),
        ],
        corner_dot_styles: vec![
            labeled(CornerDotType::Square, "Square"),
            labeled(CornerDotType::Dot, "Dot"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_found_by_id() {
        assert_eq!(find_preset("midnight").map(|p| p.name), Some("Midnight"));
        assert!(find_preset("neon").is_none());
    }

    #[test]
    fn catalog_covers_every_shape() {
        let catalog = style_catalog();
        assert_eq!(catalog.dot_styles.len(), 6);
        assert_eq!(catalog.corner_square_styles.len(), 3);
        assert_eq!(catalog.corner_dot_styles.len(), 2);
        assert_eq!(catalog.error_correction_levels.len(), 4);
    }
}
