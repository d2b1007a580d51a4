// src/render/mod.rs
// The rendering engine boundary and the in-process engine behind it.
pub mod engine;
pub mod raster;
pub mod scene;
pub mod shapes;
pub mod svg;
pub mod symbol;

use crate::errors::QrStudioError;
use crate::models::{ExportFormat, ExportedImage, RenderOptions};

pub use engine::StyledQrEngine;

/// Anything that turns render options into pictures. The pipeline only
/// pushes options in and asks for output; how the symbol is drawn is the
/// engine's business.
pub trait RenderEngine: Send + Sync {
    /// Replaces the current options. The latest call always wins.
    fn configure(&self, options: RenderOptions);

    /// Attaches the current rendering to a display surface.
    fn mount(&self, surface: &mut dyn RenderSurface) -> Result<(), QrStudioError>;

    /// Serializes the current rendering as `{name}.{extension}`.
    fn export(&self, format: ExportFormat, name: &str) -> Result<ExportedImage, QrStudioError>;
}

/// Where a mounted rendering ends up.
pub trait RenderSurface {
    fn attach(&mut self, svg_markup: String);
}

/// In-memory surface holding the latest SVG markup.
#[derive(Debug, Default)]
pub struct PreviewSurface {
    markup: Option<String>,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_markup(self) -> Option<String> {
        self.markup
    }
}

impl RenderSurface for PreviewSurface {
    fn attach(&mut self, svg_markup: String) {
        self.markup = Some(svg_markup);
    }
}
