// src/render/svg.rs
use crate::render::scene::Scene;
use crate::render::shapes::fmt;

fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Vector rendering: one path per color group, logo embedded as-is.
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = scene.width,
        h = scene.height
    ));
    out.push_str(&format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        escape_attr(&scene.background)
    ));

    for layer in &scene.layers {
        if layer.shapes.is_empty() {
            continue;
        }
        let d: String = layer.shapes.iter().map(|shape| shape.path()).collect();
        out.push_str(&format!(
            "\t<path fill=\"{}\" fill-rule=\"evenodd\" d=\"{}\"/>\n",
            escape_attr(&layer.color),
            d
        ));
    }

    if let Some(logo) = &scene.logo {
        out.push_str(&format!(
            "\t<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\"/>\n",
            escape_attr(&logo.data_uri),
            fmt(logo.x),
            fmt(logo.y),
            fmt(logo.width),
            fmt(logo.height)
        ));
    }

    out.push_str("</svg>\n");
    out
}
