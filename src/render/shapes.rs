// src/render/shapes.rs
// Geometry shared by the raster and SVG back ends. Every primitive can answer
// a point-inside query and describe itself as SVG path data.

/// Axis-aligned rectangle with an independent radius per corner,
/// ordered top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub radii: [f64; 4],
}

impl RoundRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64, radii: [f64; 4]) -> Self {
        Self { x, y, w, h, radii }
    }

    pub fn square(x: f64, y: f64, size: f64) -> Self {
        Self::new(x, y, size, size, [0.0; 4])
    }

    pub fn uniform(x: f64, y: f64, size: f64, radius: f64) -> Self {
        Self::new(x, y, size, size, [radius; 4])
    }

    pub fn circle(x: f64, y: f64, size: f64) -> Self {
        Self::uniform(x, y, size, size / 2.0)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.w, self.y + self.h);
        if px < x0 || py < y0 || px > x1 || py > y1 {
            return false;
        }

        let [tl, tr, br, bl] = self.radii;
        let within = |cx: f64, cy: f64, r: f64| {
            let (dx, dy) = (px - cx, py - cy);
            dx * dx + dy * dy <= r * r
        };

        if tl > 0.0 && px < x0 + tl && py < y0 + tl && !within(x0 + tl, y0 + tl, tl) {
            return false;
        }
        if tr > 0.0 && px > x1 - tr && py < y0 + tr && !within(x1 - tr, y0 + tr, tr) {
            return false;
        }
        if br > 0.0 && px > x1 - br && py > y1 - br && !within(x1 - br, y1 - br, br) {
            return false;
        }
        if bl > 0.0 && px < x0 + bl && py > y1 - bl && !within(x0 + bl, y1 - bl, bl) {
            return false;
        }
        true
    }

    /// Closed clockwise outline.
    pub fn path(&self) -> String {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.w, self.y + self.h);
        let [tl, tr, br, bl] = self.radii;

        let mut d = format!("M{} {}", fmt(x0 + tl), fmt(y0));
        d.push_str(&format!("H{}", fmt(x1 - tr)));
        push_arc(&mut d, tr, x1, y0 + tr);
        d.push_str(&format!("V{}", fmt(y1 - br)));
        push_arc(&mut d, br, x1 - br, y1);
        d.push_str(&format!("H{}", fmt(x0 + bl)));
        push_arc(&mut d, bl, x0, y1 - bl);
        d.push_str(&format!("V{}", fmt(y0 + tl)));
        push_arc(&mut d, tl, x0 + tl, y0);
        d.push('Z');
        d
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.w, self.y + self.h)
    }
}

fn push_arc(d: &mut String, r: f64, to_x: f64, to_y: f64) {
    if r > 0.0 {
        d.push_str(&format!(
            "A{} {} 0 0 1 {} {}",
            fmt(r),
            fmt(r),
            fmt(to_x),
            fmt(to_y)
        ));
    }
}

/// Trims float noise so path data stays readable.
pub fn fmt(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Solid(RoundRect),
    /// Outer outline with the inner one cut out.
    Ring { outer: RoundRect, inner: RoundRect },
}

impl Shape {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self {
            Shape::Solid(rect) => rect.contains(px, py),
            Shape::Ring { outer, inner } => outer.contains(px, py) && !inner.contains(px, py),
        }
    }

    /// Path data; rings rely on the even-odd fill rule.
    pub fn path(&self) -> String {
        match self {
            Shape::Solid(rect) => rect.path(),
            Shape::Ring { outer, inner } => format!("{}{}", outer.path(), inner.path()),
        }
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match self {
            Shape::Solid(rect) => rect.bounds(),
            Shape::Ring { outer, .. } => outer.bounds(),
        }
    }
}
