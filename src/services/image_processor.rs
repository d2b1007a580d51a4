// src/services/image_processor.rs
use crate::errors::QrStudioError;
use base64::{Engine as _, engine::general_purpose};
use image::{GenericImageView, ImageFormat as ImgFormat};

pub const SVG_MIME: &str = "image/svg+xml";

/// Prepares uploaded logo files for embedding in the configuration.
pub struct LogoProcessor {
    max_edge: u32,
}

impl LogoProcessor {
    pub fn new() -> Self {
        Self { max_edge: 1024 }
    }

    pub fn validate_image(&self, data: &[u8]) -> Result<(u32, u32), QrStudioError> {
        let img = image::load_from_memory(data)
            .map_err(|e| QrStudioError::ImageProcessing(format!("Invalid image format: {}", e)))?;

        let (width, height) = img.dimensions();

        if width > 4096 || height > 4096 {
            return Err(QrStudioError::ImageProcessing(
                "Image dimensions exceed 4096x4096".to_string(),
            ));
        }

        Ok((width, height))
    }

    /// Returns the bytes and their format, re-encoded as PNG when shrunk.
    pub fn resize_if_needed(&self, data: &[u8]) -> Result<(Vec<u8>, ImgFormat), QrStudioError> {
        let format = image::guess_format(data)
            .map_err(|e| QrStudioError::ImageProcessing(format!("Unknown image format: {}", e)))?;
        let img = image::load_from_memory(data)
            .map_err(|e| QrStudioError::ImageProcessing(format!("Failed to load image: {}", e)))?;

        let (width, height) = img.dimensions();

        if width <= self.max_edge && height <= self.max_edge {
            return Ok((data.to_vec(), format));
        }

        let resized = img.resize(
            self.max_edge,
            self.max_edge,
            image::imageops::FilterType::Lanczos3,
        );

        let mut output = Vec::new();
        resized
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)
            .map_err(|e| {
                QrStudioError::ImageProcessing(format!("Failed to encode resized image: {}", e))
            })?;

        Ok((output, ImgFormat::Png))
    }

    /// Full upload path: validate, shrink, and wrap as a data URI. SVG
    /// documents are stored untouched.
    pub fn to_logo_data_uri(&self, data: &[u8]) -> Result<String, QrStudioError> {
        if is_svg(data) {
            return Ok(to_data_uri(data, SVG_MIME));
        }
        self.validate_image(data)?;
        let (bytes, format) = self.resize_if_needed(data)?;
        Ok(to_data_uri(&bytes, format.to_mime_type()))
    }
}

impl Default for LogoProcessor {
    fn default() -> Self {
        Self::new()
    }
}

pub fn to_data_uri(data: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(data))
}

/// True for UTF-8 markup whose document element is `<svg>`.
pub fn is_svg(data: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(data) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with('<') && text.contains("<svg")
}

/// Intrinsic size of an SVG document from the root `width`/`height`, else
/// from its `viewBox`. Only unitless and `px` lengths count.
pub fn svg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let text = std::str::from_utf8(data).ok()?;
    let tag = &text[text.find("<svg")?..];
    let tag = &tag[..tag.find('>')?];

    let sized = attribute(tag, "width")
        .and_then(svg_length)
        .zip(attribute(tag, "height").and_then(svg_length));
    let (width, height) = match sized {
        Some(size) => size,
        None => {
            let view_box: Vec<f64> = attribute(tag, "viewBox")?
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(str::parse::<f64>)
                .collect::<Result<_, _>>()
                .ok()?;
            match view_box.as_slice() {
                [_, _, width, height] => (*width, *height),
                _ => return None,
            }
        }
    };

    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return None;
    }
    Some((width.round().max(1.0) as u32, height.round().max(1.0) as u32))
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    for (index, _) in tag.match_indices(name) {
        if !tag[..index].chars().next_back().is_some_and(char::is_whitespace) {
            continue;
        }
        let Some(rest) = tag[index + name.len()..].trim_start().strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let value = &rest[1..];
        if let Some(end) = value.find(quote) {
            return Some(&value[..end]);
        }
    }
    None
}

fn svg_length(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let number = raw.strip_suffix("px").unwrap_or(raw);
    number.trim().parse::<f64>().ok()
}

/// Decodes a base64 `data:` URI back into bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, QrStudioError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| QrStudioError::ImageProcessing("Not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| QrStudioError::ImageProcessing("Data URI has no payload".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(QrStudioError::ImageProcessing(
            "Only base64 data URIs are supported".to_string(),
        ));
    }

    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| QrStudioError::ImageProcessing(format!("Failed to decode data URI: {}", e)))
}
