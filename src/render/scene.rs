// src/render/scene.rs
// Turns render options plus an encoded symbol into positioned, colored shapes.
use crate::models::{CornerDotType, CornerSquareType, DotType, RenderOptions};
use crate::render::shapes::{RoundRect, Shape};
use crate::render::symbol::{FINDER_SIZE, Symbol};

#[derive(Debug, Clone)]
pub struct Layer {
    pub color: String,
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoPlacement {
    pub data_uri: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub layers: Vec<Layer>,
    pub logo: Option<LogoPlacement>,
}

/// Modules hidden behind the logo, counted per axis. Both counts are odd so
/// the area stays centred on the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenArea {
    pub cols: usize,
    pub rows: usize,
}

impl HiddenArea {
    fn covers(&self, count: usize, row: usize, col: usize) -> bool {
        let row_start = (count - self.rows) / 2;
        let col_start = (count - self.cols) / 2;
        (row_start..row_start + self.rows).contains(&row)
            && (col_start..col_start + self.cols).contains(&col)
    }
}

/// Largest centred module area matching the logo's aspect ratio that stays
/// within `max_hidden` modules and `max_axis` modules per side.
pub fn hidden_area(
    logo_width: u32,
    logo_height: u32,
    max_hidden: usize,
    max_axis: usize,
) -> Option<HiddenArea> {
    if logo_width == 0 || logo_height == 0 || max_hidden == 0 || max_axis == 0 {
        return None;
    }

    let ratio = logo_height as f64 / logo_width as f64;
    let mut cols = ((max_hidden as f64 / ratio).sqrt().floor() as usize).max(1);
    cols = cols.min(max_axis);
    if cols % 2 == 0 {
        cols -= 1;
    }

    let odd_at_least = |value: f64| 1 + 2 * (((value - 1.0) / 2.0).ceil().max(0.0) as usize);
    let mut rows = odd_at_least(cols as f64 * ratio);

    while cols * rows > max_hidden || rows > max_axis {
        if rows > 1 {
            rows -= 2;
            cols = odd_at_least(rows as f64 / ratio).min(max_axis);
            if cols % 2 == 0 {
                cols -= 1;
            }
        } else if cols > 1 {
            cols -= 2;
        } else {
            return None;
        }
    }

    Some(HiddenArea { cols, rows })
}

#[derive(Debug, Clone, Copy, Default)]
struct Neighbors {
    left: bool,
    right: bool,
    top: bool,
    bottom: bool,
}

impl Neighbors {
    fn count(&self) -> usize {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .filter(|present| **present)
            .count()
    }
}

/// Corner radii for one body module, as fractions of the module size.
fn module_radii(dot_type: DotType, n: Neighbors) -> [f64; 4] {
    match dot_type {
        DotType::Square => [0.0; 4],
        DotType::Dots => [0.5; 4],
        DotType::Rounded | DotType::ExtraRounded => {
            let corner = if dot_type == DotType::ExtraRounded { 1.0 } else { 0.5 };
            match n.count() {
                0 => [0.5; 4],
                1 if n.left => [0.0, 0.5, 0.5, 0.0],
                1 if n.right => [0.5, 0.0, 0.0, 0.5],
                1 if n.top => [0.0, 0.0, 0.5, 0.5],
                1 => [0.5, 0.5, 0.0, 0.0],
                2 if n.left && n.top => [0.0, 0.0, corner, 0.0],
                2 if n.top && n.right => [0.0, 0.0, 0.0, corner],
                2 if n.right && n.bottom => [corner, 0.0, 0.0, 0.0],
                2 if n.bottom && n.left => [0.0, corner, 0.0, 0.0],
                _ => [0.0; 4],
            }
        }
        DotType::Classy | DotType::ClassyRounded => {
            let corner = if dot_type == DotType::ClassyRounded { 1.0 } else { 0.5 };
            if n.count() == 0 {
                [0.5, 0.0, 0.5, 0.0]
            } else if !n.left && !n.top {
                [corner, 0.0, 0.0, 0.0]
            } else if !n.right && !n.bottom {
                [0.0, 0.0, corner, 0.0]
            } else {
                [0.0; 4]
            }
        }
    }
}

fn corner_square(kind: CornerSquareType, x: f64, y: f64, dot: f64) -> Shape {
    let size = dot * FINDER_SIZE as f64;
    let inner_size = size - 2.0 * dot;
    match kind {
        CornerSquareType::Square => Shape::Ring {
            outer: RoundRect::square(x, y, size),
            inner: RoundRect::square(x + dot, y + dot, inner_size),
        },
        CornerSquareType::ExtraRounded => Shape::Ring {
            outer: RoundRect::uniform(x, y, size, dot * 2.5),
            inner: RoundRect::uniform(x + dot, y + dot, inner_size, dot * 1.5),
        },
        CornerSquareType::Dot => Shape::Ring {
            outer: RoundRect::circle(x, y, size),
            inner: RoundRect::circle(x + dot, y + dot, inner_size),
        },
    }
}

fn corner_dot(kind: CornerDotType, x: f64, y: f64, dot: f64) -> Shape {
    let size = dot * 3.0;
    match kind {
        CornerDotType::Square => Shape::Solid(RoundRect::square(x, y, size)),
        CornerDotType::Dot => Shape::Solid(RoundRect::circle(x, y, size)),
    }
}

/// Lays out the whole image. `logo_size` is the decoded logo's pixel size,
/// `None` when there is no usable logo.
pub fn compose(options: &RenderOptions, symbol: &Symbol, logo_size: Option<(u32, u32)>) -> Scene {
    let count = symbol.count();
    let margin = options.margin as f64;
    let drawable = (options.width.min(options.height) as f64 - 2.0 * margin).max(0.0);
    let dot = (drawable / count as f64).floor().max(1.0);
    let x0 = ((options.width as f64 - count as f64 * dot) / 2.0).floor();
    let y0 = ((options.height as f64 - count as f64 * dot) / 2.0).floor();

    let mut logo = None;
    let mut hidden = None;
    if let (Some(data_uri), Some((logo_w, logo_h))) = (options.image.as_ref(), logo_size) {
        let cover = options.image_options.image_size
            * options.qr_options.error_correction_level.recovery_ratio();
        let max_hidden = (cover * (count * count) as f64).floor() as usize;
        let max_axis = count.saturating_sub(2 * FINDER_SIZE);

        if let Some(area) = hidden_area(logo_w, logo_h, max_hidden, max_axis) {
            let image_margin = options.image_options.margin as f64;
            let area_w = area.cols as f64 * dot;
            let area_h = area.rows as f64 * dot;
            let width = area_w - 2.0 * image_margin;
            let height = area_h - 2.0 * image_margin;
            if width > 0.0 && height > 0.0 {
                logo = Some(LogoPlacement {
                    data_uri: data_uri.clone(),
                    x: x0 + (count as f64 * dot - area_w) / 2.0 + image_margin,
                    y: y0 + (count as f64 * dot - area_h) / 2.0 + image_margin,
                    width,
                    height,
                });
                if options.image_options.hide_background_dots {
                    hidden = Some(area);
                }
            }
        }
    }

    let drawable_module = |row: isize, col: isize| {
        if !symbol.is_dark(row, col) {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        !symbol.in_finder(row, col)
            && !hidden.is_some_and(|area| area.covers(count, row, col))
    };

    let mut dots = Vec::new();
    for row in 0..count as isize {
        for col in 0..count as isize {
            if !drawable_module(row, col) {
                continue;
            }
            let neighbors = Neighbors {
                left: drawable_module(row, col - 1),
                right: drawable_module(row, col + 1),
                top: drawable_module(row - 1, col),
                bottom: drawable_module(row + 1, col),
            };
            let radii = module_radii(options.dots_options.dot_type, neighbors).map(|r| r * dot);
            dots.push(Shape::Solid(RoundRect::new(
                x0 + col as f64 * dot,
                y0 + row as f64 * dot,
                dot,
                dot,
                radii,
            )));
        }
    }

    let mut squares = Vec::new();
    let mut eyes = Vec::new();
    for (row, col) in symbol.finder_origins() {
        let x = x0 + col as f64 * dot;
        let y = y0 + row as f64 * dot;
        squares.push(corner_square(
            options.corners_square_options.square_type,
            x,
            y,
            dot,
        ));
        eyes.push(corner_dot(
            options.corners_dot_options.dot_type,
            x + 2.0 * dot,
            y + 2.0 * dot,
            dot,
        ));
    }

    Scene {
        width: options.width,
        height: options.height,
        background: options.background_options.color.clone(),
        layers: vec![
            Layer {
                color: options.dots_options.color.clone(),
                shapes: dots,
            },
            Layer {
                color: options.corners_square_options.color.clone(),
                shapes: squares,
            },
            Layer {
                color: options.corners_dot_options.color.clone(),
                shapes: eyes,
            },
        ],
        logo,
    }
}
