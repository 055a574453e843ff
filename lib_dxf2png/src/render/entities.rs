//! Mapping of DXF entities to SVG nodes.
//!
//! Coordinates stay in drawing units; the caller wraps everything in a
//! y-flipped group that maps drawing space onto the raster canvas. Text nodes
//! flip themselves back locally so glyphs render upright.

use std::fmt::Write;

use dxf::entities::{Entity, EntityType, MText};
use svg::node::element::{
    Circle as SvgCircle, Ellipse as SvgEllipse, Group, Line as SvgLine, Path, Text as SvgText,
};

/// Converts one entity into an SVG node, or `None` for unsupported kinds.
///
/// Stroke color and width are inherited from the enclosing group; filled
/// shapes and text override them locally.
pub fn entity_node(entity: &Entity, stroke_width: f64) -> Option<Group> {
    match &entity.specific {
        EntityType::Line(line) => Some(
            Group::new().add(
                SvgLine::new()
                    .set("x1", line.p1.x)
                    .set("y1", line.p1.y)
                    .set("x2", line.p2.x)
                    .set("y2", line.p2.y),
            ),
        ),
        EntityType::Circle(circle) => Some(
            Group::new().add(
                SvgCircle::new()
                    .set("cx", circle.center.x)
                    .set("cy", circle.center.y)
                    .set("r", circle.radius),
            ),
        ),
        EntityType::Arc(arc) => Some(Group::new().add(arc_node(
            arc.center.x,
            arc.center.y,
            arc.radius,
            arc.start_angle,
            arc.end_angle,
        ))),
        EntityType::LwPolyline(polyline) => {
            let vertices: Vec<(f64, f64, f64)> = polyline
                .vertices
                .iter()
                .map(|vertex| (vertex.x, vertex.y, vertex.bulge))
                .collect();
            polyline_path(&vertices, polyline.is_closed()).map(|path| Group::new().add(path))
        }
        EntityType::Polyline(polyline) => {
            let vertices: Vec<(f64, f64, f64)> = polyline
                .vertices()
                .map(|vertex| (vertex.location.x, vertex.location.y, vertex.bulge))
                .collect();
            polyline_path(&vertices, polyline.is_closed()).map(|path| Group::new().add(path))
        }
        EntityType::ModelPoint(point) => Some(
            fill_group().add(
                SvgCircle::new()
                    .set("cx", point.location.x)
                    .set("cy", point.location.y)
                    .set("r", stroke_width * 1.5),
            ),
        ),
        EntityType::Solid(solid) => {
            // SOLID corners are stored in 1-2-4-3 order.
            let d = format!(
                "M {} {} L {} {} L {} {} L {} {} Z",
                solid.first_corner.x,
                solid.first_corner.y,
                solid.second_corner.x,
                solid.second_corner.y,
                solid.fourth_corner.x,
                solid.fourth_corner.y,
                solid.third_corner.x,
                solid.third_corner.y,
            );
            Some(fill_group().add(Path::new().set("d", d)))
        }
        EntityType::Ellipse(ellipse) => {
            let rx = (ellipse.major_axis.x.powi(2) + ellipse.major_axis.y.powi(2)).sqrt();
            let ry = rx * ellipse.minor_axis_ratio;
            let rotation = ellipse.major_axis.y.atan2(ellipse.major_axis.x).to_degrees();
            // Arc extents are ignored; partial ellipses render closed.
            Some(
                Group::new().add(
                    SvgEllipse::new()
                        .set("cx", 0)
                        .set("cy", 0)
                        .set("rx", rx)
                        .set("ry", ry)
                        .set(
                            "transform",
                            format!(
                                "translate({} {}) rotate({rotation})",
                                ellipse.center.x, ellipse.center.y
                            ),
                        ),
                ),
            )
        }
        EntityType::Spline(spline) => {
            // Control-polygon approximation.
            let vertices: Vec<(f64, f64, f64)> = spline
                .control_points
                .iter()
                .map(|point| (point.x, point.y, 0.0))
                .collect();
            polyline_path(&vertices, false).map(|path| Group::new().add(path))
        }
        EntityType::Text(text) => Some(
            text_group().add(
                SvgText::new(text.value.clone())
                    .set("x", 0)
                    .set("y", 0)
                    .set("font-size", text.text_height)
                    .set(
                        "transform",
                        text_transform(text.location.x, text.location.y, text.rotation),
                    ),
            ),
        ),
        EntityType::MText(mtext) => Some(
            text_group().add(
                SvgText::new(mtext_plain(mtext))
                    .set("x", 0)
                    // The insertion point is the top of the first line.
                    .set("y", mtext.initial_text_height)
                    .set("font-size", mtext.initial_text_height)
                    .set(
                        "transform",
                        text_transform(
                            mtext.insertion_point.x,
                            mtext.insertion_point.y,
                            mtext.rotation_angle,
                        ),
                    ),
            ),
        ),
        _ => None,
    }
}

fn fill_group() -> Group {
    Group::new().set("fill", "black").set("stroke", "none")
}

fn text_group() -> Group {
    fill_group()
}

/// Places text at a drawing-space point inside the y-flipped content group.
/// The local flip keeps glyphs upright; DXF rotations are counterclockwise,
/// so the angle is negated for the y-down local frame.
fn text_transform(x: f64, y: f64, rotation_degrees: f64) -> String {
    if rotation_degrees == 0.0 {
        format!("translate({x} {y}) scale(1 -1)")
    } else {
        format!(
            "translate({x} {y}) scale(1 -1) rotate({})",
            -rotation_degrees
        )
    }
}

/// Flattens MTEXT content: overflow chunks precede the final chunk, paragraph
/// breaks become spaces, formatting braces are dropped.
fn mtext_plain(mtext: &MText) -> String {
    let mut value = String::new();
    for chunk in &mtext.extended_text {
        value.push_str(chunk);
    }
    value.push_str(&mtext.text);
    value.replace("\\P", " ").replace(['{', '}'], "")
}

/// A circular arc, counterclockwise from start to end angle (degrees).
fn arc_node(cx: f64, cy: f64, radius: f64, start_degrees: f64, end_degrees: f64) -> Group {
    let mut sweep_degrees = end_degrees - start_degrees;
    while sweep_degrees <= 0.0 {
        sweep_degrees += 360.0;
    }

    if sweep_degrees >= 359.999 {
        // Degenerate full-turn arc.
        return Group::new().add(
            SvgCircle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", radius),
        );
    }

    let start = start_degrees.to_radians();
    let end = (start_degrees + sweep_degrees).to_radians();
    let x1 = cx + radius * start.cos();
    let y1 = cy + radius * start.sin();
    let x2 = cx + radius * end.cos();
    let y2 = cy + radius * end.sin();
    let large_arc = if sweep_degrees > 180.0 { 1 } else { 0 };

    let d = format!("M {x1} {y1} A {radius} {radius} 0 {large_arc} 1 {x2} {y2}");
    Group::new().add(Path::new().set("d", d))
}

/// Polyline path data; bulged segments become true arc commands.
fn polyline_path(vertices: &[(f64, f64, f64)], closed: bool) -> Option<Path> {
    let first = vertices.first()?;
    if vertices.len() < 2 {
        return None;
    }

    let mut d = format!("M {} {}", first.0, first.1);
    for window in vertices.windows(2) {
        push_segment(&mut d, window[0], (window[1].0, window[1].1));
    }
    if closed {
        let last = vertices[vertices.len() - 1];
        push_segment(&mut d, last, (first.0, first.1));
        d.push_str(" Z");
    }

    Some(Path::new().set("d", d))
}

fn push_segment(d: &mut String, from: (f64, f64, f64), to: (f64, f64)) {
    let (x1, y1, bulge) = from;
    let (x2, y2) = to;
    let chord = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();

    if bulge == 0.0 || chord < f64::EPSILON {
        write!(d, " L {x2} {y2}").unwrap();
        return;
    }

    // Included angle is 4 atan(|bulge|); radius follows from the chord.
    let included = 4.0 * bulge.abs().atan();
    let radius = chord * (1.0 + bulge * bulge) / (4.0 * bulge.abs());
    let large_arc = if included > std::f64::consts::PI { 1 } else { 0 };
    let sweep = if bulge > 0.0 { 1 } else { 0 };
    write!(d, " A {radius} {radius} 0 {large_arc} {sweep} {x2} {y2}").unwrap();
}

#[cfg(test)]
mod tests {
    use dxf::{
        LwPolylineVertex, Point,
        entities::{Arc, Entity, EntityType, Insert, Line, LwPolyline, Text},
    };

    use super::*;

    fn node_markup(entity: &Entity) -> Option<String> {
        entity_node(entity, 0.1).map(|node| node.to_string())
    }

    #[test]
    fn line_becomes_a_line_element() {
        let entity = Entity::new(EntityType::Line(Line::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(10.0, 5.0, 0.0),
        )));
        let markup = node_markup(&entity).unwrap();
        assert!(markup.contains("<line"));
        assert!(markup.contains("x2=\"10\""));
    }

    #[test]
    fn arc_sweeps_counterclockwise() {
        let entity = Entity::new(EntityType::Arc(Arc::new(
            Point::new(0.0, 0.0, 0.0),
            5.0,
            0.0,
            90.0,
        )));
        let markup = node_markup(&entity).unwrap();
        assert!(markup.contains("A 5 5 0 0 1"));
    }

    #[test]
    fn full_turn_arc_degenerates_to_a_circle() {
        let entity = Entity::new(EntityType::Arc(Arc::new(
            Point::new(1.0, 2.0, 0.0),
            3.0,
            45.0,
            45.0,
        )));
        let markup = node_markup(&entity).unwrap();
        assert!(markup.contains("<circle"));
    }

    #[test]
    fn text_is_flipped_upright() {
        let mut text = Text::default();
        text.value = "テスト".to_string();
        text.location = Point::new(2.0, 3.0, 0.0);
        text.text_height = 2.5;
        let entity = Entity::new(EntityType::Text(text));
        let markup = node_markup(&entity).unwrap();
        assert!(markup.contains("scale(1 -1)"));
        assert!(markup.contains("テスト"));
    }

    #[test]
    fn bulged_polyline_segment_becomes_an_arc_command() {
        let mut polyline = LwPolyline::default();
        polyline.vertices = vec![
            LwPolylineVertex {
                x: 0.0,
                y: 0.0,
                bulge: 1.0,
                ..Default::default()
            },
            LwPolylineVertex {
                x: 2.0,
                y: 0.0,
                ..Default::default()
            },
        ];
        let entity = Entity::new(EntityType::LwPolyline(polyline));
        let markup = node_markup(&entity).unwrap();
        assert!(markup.contains(" A 1 1 0 0 1 2 0"));
    }

    #[test]
    fn unsupported_entities_are_skipped() {
        let entity = Entity::new(EntityType::Insert(Insert::default()));
        assert!(node_markup(&entity).is_none());
    }

    #[test]
    fn single_vertex_polyline_is_dropped() {
        let mut polyline = LwPolyline::default();
        polyline.vertices = vec![LwPolylineVertex::default()];
        let entity = Entity::new(EntityType::LwPolyline(polyline));
        assert!(node_markup(&entity).is_none());
    }
}
