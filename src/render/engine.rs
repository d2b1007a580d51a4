// src/render/engine.rs
use crate::errors::QrStudioError;
use crate::models::{ExportFormat, ExportedImage, RenderOptions};
use crate::render::scene::{Scene, compose};
use crate::render::symbol::Symbol;
use crate::render::{RenderEngine, RenderSurface, raster, svg};
use crate::services::image_processor::{decode_data_uri, is_svg, svg_dimensions};
use image::{DynamicImage, GenericImageView, ImageFormat as ImgFormat};
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

const MAX_DIMENSION: u32 = 4096;

/// A decoded logo. Vector logos are placed and embedded in SVG output but
/// not painted into raster output.
enum Logo {
    Raster(DynamicImage),
    Vector { width: u32, height: u32 },
}

impl Logo {
    fn size(&self) -> (u32, u32) {
        match self {
            Logo::Raster(img) => img.dimensions(),
            Logo::Vector { width, height } => (*width, *height),
        }
    }

    fn raster(&self) -> Option<&DynamicImage> {
        match self {
            Logo::Raster(img) => Some(img),
            Logo::Vector { .. } => None,
        }
    }
}

struct Prepared {
    options: RenderOptions,
    symbol: Result<Symbol, String>,
    logo: Option<Logo>,
}

/// Draws styled QR codes with the `qrcode` and `image` crates.
pub struct StyledQrEngine {
    state: Mutex<Option<Prepared>>,
    redraws: AtomicU64,
}

impl StyledQrEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            redraws: AtomicU64::new(0),
        }
    }

    /// How many option records this engine has accepted.
    #[cfg(test)]
    pub fn redraws(&self) -> u64 {
        self.redraws.load(Ordering::SeqCst)
    }

    fn load_logo(data_uri: &str) -> Option<Logo> {
        let bytes = match decode_data_uri(data_uri) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Ignoring logo: {}", e);
                return None;
            }
        };
        if is_svg(&bytes) {
            let (width, height) = svg_dimensions(&bytes).unwrap_or((1, 1));
            return Some(Logo::Vector { width, height });
        }
        match image::load_from_memory(&bytes) {
            Ok(img) => Some(Logo::Raster(img)),
            Err(e) => {
                warn!("Ignoring logo, not a decodable image: {}", e);
                None
            }
        }
    }

    fn with_scene<T, F>(&self, draw: F) -> Result<T, QrStudioError>
    where
        F: FnOnce(&Scene, Option<&Logo>) -> Result<T, QrStudioError>,
    {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let prepared = state
            .as_ref()
            .ok_or_else(|| QrStudioError::Render("Engine has not been configured".to_string()))?;

        let options = &prepared.options;
        for dimension in [options.width, options.height] {
            if dimension == 0 || dimension > MAX_DIMENSION {
                return Err(QrStudioError::Render(format!(
                    "Image dimensions must be between 1 and {} pixels, got {}x{}",
                    MAX_DIMENSION, options.width, options.height
                )));
            }
        }

        let symbol = prepared
            .symbol
            .as_ref()
            .map_err(|e| QrStudioError::Render(e.clone()))?;

        let logo = prepared.logo.as_ref();
        let scene = compose(options, symbol, logo.map(Logo::size));
        draw(&scene, logo)
    }
}

impl Default for StyledQrEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine for StyledQrEngine {
    fn configure(&self, options: RenderOptions) {
        let symbol = Symbol::encode(&options.data, options.qr_options.error_correction_level)
            .map_err(|e| e.to_string());
        if let Err(e) = &symbol {
            warn!("Current options cannot be encoded: {}", e);
        }
        let logo = options.image.as_deref().and_then(Self::load_logo);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = Some(Prepared {
            options,
            symbol,
            logo,
        });
        let redraw = self.redraws.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Engine redraw #{}", redraw);
    }

    fn mount(&self, surface: &mut dyn RenderSurface) -> Result<(), QrStudioError> {
        let markup = self.with_scene(|scene, _| Ok(svg::to_svg(scene)))?;
        surface.attach(markup);
        Ok(())
    }

    fn export(&self, format: ExportFormat, name: &str) -> Result<ExportedImage, QrStudioError> {
        let data = self.with_scene(|scene, logo| {
            let image_format = match format {
                ExportFormat::Svg => return Ok(svg::to_svg(scene).into_bytes()),
                ExportFormat::Png => ImgFormat::Png,
                ExportFormat::Webp => ImgFormat::WebP,
            };
            if matches!(logo, Some(Logo::Vector { .. })) {
                warn!("SVG logos are not rasterized, leaving the logo area empty");
            }
            let canvas = raster::rasterize(scene, logo.and_then(Logo::raster));
            raster::encode(canvas, image_format)
        })?;

        Ok(ExportedImage {
            file_name: format!("{}.{}", name, format.extension()),
            format,
            data,
        })
    }
}
