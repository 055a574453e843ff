//! Rasterization of a drawing's model space.
//!
//! The model space is composed as an SVG document (the same pipeline the
//! rest of the stack uses: `svg` for composition, `usvg` for parsing,
//! `resvg`/`tiny_skia` for rasterization), tightly cropped to the content
//! bounding box plus a fixed margin, then encoded as PNG.

use std::sync::Arc;

use dxf::{Drawing, entities::Entity};
use log::{debug, info};
use resvg::{tiny_skia, usvg};
use svg::{Document, node::element::Group};

use crate::error::{Error, Result};

pub mod bounds;
pub mod entities;

pub use bounds::BoundingBox;

/// The drawing is fitted into this canvas before cropping, like a plot page.
const CANVAS_WIDTH_INCHES: f64 = 12.0;
const CANVAS_HEIGHT_INCHES: f64 = 9.0;
/// Margin kept around the content bounding box.
const MARGIN_INCHES: f64 = 0.1;
/// The SVG is composed at this pixel density; `dpi` scales from here.
const BASE_DPI: f64 = 96.0;
/// Stroke width in output pixels at the base density.
const STROKE_PIXELS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Output resolution.
    pub dpi: u32,
    /// Default font family applied to text entities, typically the resolved
    /// Japanese-capable family. `None` leaves the pipeline's default.
    pub font_family: Option<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            dpi: 300,
            font_family: None,
        }
    }
}

/// Renders the drawing's model space to PNG bytes.
pub fn render_drawing(
    drawing: &Drawing,
    settings: &RenderSettings,
    fontdb: Arc<usvg::fontdb::Database>,
) -> Result<Vec<u8>> {
    let svg_document = compose_svg(drawing);
    let svg_data = svg_document.to_string();

    let mut options = usvg::Options::default();
    options.dpi = BASE_DPI as f32;
    if let Some(family) = &settings.font_family {
        options.font_family = family.clone();
    }
    options.fontdb = fontdb;

    let tree = usvg::Tree::from_data(svg_data.as_bytes(), &options)?;

    let zoom = settings.dpi as f32 / BASE_DPI as f32;
    let size = tree.size();
    let width = (size.width() * zoom).ceil() as u32;
    let height = (size.height() * zoom).ceil() as u32;
    info!("Raster size: {width}x{height} pixels");

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(Error::PixmapAllocation { width, height })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        usvg::Transform::from_scale(zoom, zoom),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|error| Error::PngEncode(error.to_string()))
}

/// Composes the model space as an SVG document at the base pixel density.
pub fn compose_svg(drawing: &Drawing) -> Document {
    let entities: Vec<&Entity> = drawing
        .entities()
        .filter(|entity| !entity.common.is_in_paper_space)
        .collect();

    // An empty drawing still renders, as a blank canvas.
    let bounds = bounds::drawing_bounds(&entities).unwrap_or(BoundingBox {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 1.0,
        max_y: 1.0,
    });

    let width_units = bounds.width().max(f64::EPSILON);
    let height_units = bounds.height().max(f64::EPSILON);
    let scale =
        (CANVAS_WIDTH_INCHES / width_units).min(CANVAS_HEIGHT_INCHES / height_units);

    let pixels_per_unit = scale * BASE_DPI;
    let margin = MARGIN_INCHES * BASE_DPI;
    let width_pixels = width_units * pixels_per_unit + 2.0 * margin;
    let height_pixels = height_units * pixels_per_unit + 2.0 * margin;
    let stroke_width = STROKE_PIXELS / pixels_per_unit;

    // Map drawing coordinates (y up) onto the canvas (y down).
    let mut content = Group::new()
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", stroke_width)
        .set(
            "transform",
            format!(
                "translate({margin} {}) scale({pixels_per_unit} {}) translate({} {})",
                height_pixels - margin,
                -pixels_per_unit,
                -bounds.min_x,
                -bounds.min_y,
            ),
        );

    let mut skipped = 0usize;
    for entity in &entities {
        match entities::entity_node(entity, stroke_width) {
            Some(node) => content = content.add(node),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("Skipped {skipped} entities with no raster representation");
    }
    debug!(
        "Composed {} entities into a {width_pixels:.0}x{height_pixels:.0} canvas",
        entities.len() - skipped
    );

    Document::new()
        .set("width", width_pixels)
        .set("height", height_pixels)
        .set("viewBox", format!("0 0 {width_pixels} {height_pixels}"))
        .add(content)
}
