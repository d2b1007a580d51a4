// src/render/symbol.rs
use crate::errors::QrStudioError;
use crate::models::ErrorCorrectionLevel;
use qrcode::{Color, EcLevel, QrCode};

/// Side length of a finder pattern, in modules.
pub const FINDER_SIZE: usize = 7;

/// An encoded QR symbol as a square grid of dark/light modules.
#[derive(Debug, Clone)]
pub struct Symbol {
    count: usize,
    dark: Vec<bool>,
}

impl Symbol {
    pub fn encode(data: &str, level: ErrorCorrectionLevel) -> Result<Self, QrStudioError> {
        let ec = match level {
            ErrorCorrectionLevel::Low => EcLevel::L,
            ErrorCorrectionLevel::Medium => EcLevel::M,
            ErrorCorrectionLevel::Quartile => EcLevel::Q,
            ErrorCorrectionLevel::High => EcLevel::H,
        };

        let code = QrCode::with_error_correction_level(data.as_bytes(), ec)
            .map_err(|e| QrStudioError::Render(format!("QR encode error: {}", e)))?;

        Ok(Self {
            count: code.width(),
            dark: code
                .to_colors()
                .into_iter()
                .map(|color| color == Color::Dark)
                .collect(),
        })
    }

    /// Modules per side.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Out-of-range coordinates read as light.
    pub fn is_dark(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        row < self.count && col < self.count && self.dark[row * self.count + col]
    }

    /// True inside one of the three 7x7 position markers.
    pub fn in_finder(&self, row: usize, col: usize) -> bool {
        let far = self.count.saturating_sub(FINDER_SIZE);
        (row < FINDER_SIZE && col < FINDER_SIZE)
            || (row < FINDER_SIZE && col >= far)
            || (row >= far && col < FINDER_SIZE)
    }

    /// Top-left module of each finder, as (row, col).
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.count.saturating_sub(FINDER_SIZE);
        [(0, 0), (0, far), (far, 0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_payload_is_version_one() {
        let symbol = Symbol::encode(" ", ErrorCorrectionLevel::High).unwrap();
        assert_eq!(symbol.count(), 21);
    }

    #[test]
    fn finder_corners_are_dark() {
        let symbol = Symbol::encode("https://example.com", ErrorCorrectionLevel::Medium).unwrap();
        let last = symbol.count() as isize - 1;
        assert!(symbol.is_dark(0, 0));
        assert!(symbol.is_dark(0, last));
        assert!(symbol.is_dark(last, 0));
        assert!(!symbol.is_dark(-1, 0));
        assert!(!symbol.is_dark(0, last + 1));
    }

    #[test]
    fn finder_regions() {
        let symbol = Symbol::encode("abc", ErrorCorrectionLevel::Low).unwrap();
        let n = symbol.count();
        assert!(symbol.in_finder(6, 6));
        assert!(symbol.in_finder(0, n - 1));
        assert!(symbol.in_finder(n - 7, 0));
        assert!(!symbol.in_finder(7, 7));
        assert!(!symbol.in_finder(n - 1, n - 1));
    }

    #[test]
    fn oversized_payload_fails() {
        let data = "x".repeat(5000);
        assert!(matches!(
            Symbol::encode(&data, ErrorCorrectionLevel::High),
            Err(QrStudioError::Render(_))
        ));
    }
}
