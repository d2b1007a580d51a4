// src/render/raster.rs
use crate::errors::QrStudioError;
use crate::render::scene::Scene;
use image::{DynamicImage, ImageFormat as ImgFormat, Rgba, RgbaImage, imageops};
use log::warn;

/// Parses `#rgb`, `#rrggbb` and `#rrggbbaa`. Anything else renders black.
pub fn parse_color(raw: &str) -> Rgba<u8> {
    match try_parse_color(raw) {
        Some(color) => color,
        None => {
            warn!("Unrecognised color {:?}, rendering black", raw);
            Rgba([0, 0, 0, 255])
        }
    }
}

fn try_parse_color(raw: &str) -> Option<Rgba<u8>> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 16 + v;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}

fn blend(canvas: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    if color[3] == 255 {
        canvas.put_pixel(x, y, color);
        return;
    }
    let base = *canvas.get_pixel(x, y);
    let alpha = color[3] as u32;
    let mix = |top: u8, bottom: u8| {
        ((top as u32 * alpha + bottom as u32 * (255 - alpha)) / 255) as u8
    };
    canvas.put_pixel(
        x,
        y,
        Rgba([
            mix(color[0], base[0]),
            mix(color[1], base[1]),
            mix(color[2], base[2]),
            base[3].max(color[3]),
        ]),
    );
}

/// Paints the scene, sampling each pixel at its centre.
pub fn rasterize(scene: &Scene, logo: Option<&DynamicImage>) -> RgbaImage {
    let background = parse_color(&scene.background);
    let mut canvas = RgbaImage::from_pixel(scene.width, scene.height, background);

    for layer in &scene.layers {
        let color = parse_color(&layer.color);
        for shape in &layer.shapes {
            let (x0, y0, x1, y1) = shape.bounds();
            let px_start = x0.floor().max(0.0) as u32;
            let py_start = y0.floor().max(0.0) as u32;
            let px_end = (x1.ceil().max(0.0) as u32).min(scene.width);
            let py_end = (y1.ceil().max(0.0) as u32).min(scene.height);

            for py in py_start..py_end {
                for px in px_start..px_end {
                    if shape.contains(px as f64 + 0.5, py as f64 + 0.5) {
                        blend(&mut canvas, px, py, color);
                    }
                }
            }
        }
    }

    if let (Some(placement), Some(logo)) = (scene.logo.as_ref(), logo) {
        let box_w = placement.width.floor().max(1.0) as u32;
        let box_h = placement.height.floor().max(1.0) as u32;
        let fitted = logo.resize(box_w, box_h, imageops::FilterType::Lanczos3).to_rgba8();
        let x = placement.x.floor() as i64 + (box_w as i64 - fitted.width() as i64) / 2;
        let y = placement.y.floor() as i64 + (box_h as i64 - fitted.height() as i64) / 2;
        imageops::overlay(&mut canvas, &fitted, x, y);
    }

    canvas
}

pub fn encode(canvas: RgbaImage, format: ImgFormat) -> Result<Vec<u8>, QrStudioError> {
    let mut output = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut output), format)
        .map_err(|e| QrStudioError::Render(format!("Failed to encode image: {}", e)))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::{Layer, LogoPlacement};
    use crate::render::shapes::{RoundRect, Shape};

    fn scene_with(shapes: Vec<Shape>, color: &str) -> Scene {
        Scene {
            width: 20,
            height: 20,
            background: "#ffffff".into(),
            layers: vec![Layer {
                color: color.into(),
                shapes,
            }],
            logo: None,
        }
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#fff"), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("#1e293b"), Rgba([0x1e, 0x29, 0x3b, 255]));
        assert_eq!(parse_color("#00000080"), Rgba([0, 0, 0, 0x80]));
        assert_eq!(parse_color("teal"), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("#12345"), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn paints_shapes_over_background() {
        let scene = scene_with(vec![Shape::Solid(RoundRect::square(5.0, 5.0, 10.0))], "#ff0000");
        let canvas = rasterize(&scene, None);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(15, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn shapes_past_the_edge_are_clipped() {
        let scene = scene_with(vec![Shape::Solid(RoundRect::square(-5.0, 15.0, 30.0))], "#000");
        let canvas = rasterize(&scene, None);
        assert_eq!(*canvas.get_pixel(0, 19), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn logo_is_composited_in_its_box() {
        let mut scene = scene_with(Vec::new(), "#000");
        scene.logo = Some(LogoPlacement {
            data_uri: String::new(),
            x: 6.0,
            y: 6.0,
            width: 8.0,
            height: 8.0,
        });
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])));
        let canvas = rasterize(&scene, Some(&logo));
        let centre = canvas.get_pixel(10, 10);
        assert!(centre[2] > 200 && centre[0] < 50, "got {:?}", centre);
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn png_and_webp_have_their_signatures() {
        let canvas = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        let png = encode(canvas.clone(), ImgFormat::Png).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let webp = encode(canvas, ImgFormat::WebP).unwrap();
        assert_eq!(&webp[..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }
}
