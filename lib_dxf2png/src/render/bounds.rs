//! Content bounding boxes of drawable entities.

use dxf::entities::{Entity, EntityType};

/// Axis-aligned bounding box in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn from_point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn merge(&mut self, other: &BoundingBox) {
        self.include(other.min_x, other.min_y);
        self.include(other.max_x, other.max_y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// The union of all drawable entity boxes, or `None` for an empty drawing.
pub fn drawing_bounds(entities: &[&Entity]) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    for entity in entities {
        if let Some(entity_bounds) = entity_bounds(entity) {
            match &mut bounds {
                Some(bounds) => bounds.merge(&entity_bounds),
                None => bounds = Some(entity_bounds),
            }
        }
    }
    bounds
}

fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<BoundingBox> {
    let mut points = points.into_iter();
    let (x, y) = points.next()?;
    let mut bounds = BoundingBox::from_point(x, y);
    for (x, y) in points {
        bounds.include(x, y);
    }
    Some(bounds)
}

/// The bounding box of a single entity, or `None` for unsupported kinds.
///
/// Arcs and ellipses use the conservative full-extent box; bulged polyline
/// segments include the arc apex.
pub fn entity_bounds(entity: &Entity) -> Option<BoundingBox> {
    match &entity.specific {
        EntityType::Line(line) => {
            from_points([(line.p1.x, line.p1.y), (line.p2.x, line.p2.y)])
        }
        EntityType::Circle(circle) => Some(circle_box(
            circle.center.x,
            circle.center.y,
            circle.radius,
        )),
        EntityType::Arc(arc) => Some(circle_box(arc.center.x, arc.center.y, arc.radius)),
        EntityType::LwPolyline(polyline) => {
            let vertices: Vec<(f64, f64, f64)> = polyline
                .vertices
                .iter()
                .map(|vertex| (vertex.x, vertex.y, vertex.bulge))
                .collect();
            polyline_box(&vertices, polyline.is_closed())
        }
        EntityType::Polyline(polyline) => {
            let vertices: Vec<(f64, f64, f64)> = polyline
                .vertices()
                .map(|vertex| (vertex.location.x, vertex.location.y, vertex.bulge))
                .collect();
            polyline_box(&vertices, polyline.is_closed())
        }
        EntityType::ModelPoint(point) => {
            Some(BoundingBox::from_point(point.location.x, point.location.y))
        }
        EntityType::Solid(solid) => from_points([
            (solid.first_corner.x, solid.first_corner.y),
            (solid.second_corner.x, solid.second_corner.y),
            (solid.third_corner.x, solid.third_corner.y),
            (solid.fourth_corner.x, solid.fourth_corner.y),
        ]),
        EntityType::Ellipse(ellipse) => {
            let major = (ellipse.major_axis.x.powi(2) + ellipse.major_axis.y.powi(2)).sqrt();
            Some(circle_box(ellipse.center.x, ellipse.center.y, major))
        }
        EntityType::Spline(spline) => from_points(
            spline
                .control_points
                .iter()
                .map(|point| (point.x, point.y)),
        ),
        EntityType::Text(text) => Some(text_box(
            text.location.x,
            text.location.y,
            text.text_height,
            text.value.chars().count(),
        )),
        EntityType::MText(mtext) => {
            let characters: usize = mtext
                .extended_text
                .iter()
                .map(|chunk| chunk.chars().count())
                .sum::<usize>()
                + mtext.text.chars().count();
            Some(text_box(
                mtext.insertion_point.x,
                mtext.insertion_point.y,
                mtext.initial_text_height,
                characters,
            ))
        }
        _ => None,
    }
}

fn circle_box(center_x: f64, center_y: f64, radius: f64) -> BoundingBox {
    let mut bounds = BoundingBox::from_point(center_x - radius, center_y - radius);
    bounds.include(center_x + radius, center_y + radius);
    bounds
}

/// Approximate text extent: average glyph advance of 0.6 times the height.
fn text_box(x: f64, y: f64, height: f64, characters: usize) -> BoundingBox {
    let mut bounds = BoundingBox::from_point(x, y);
    bounds.include(x + characters as f64 * height * 0.6, y + height);
    bounds
}

fn polyline_box(vertices: &[(f64, f64, f64)], closed: bool) -> Option<BoundingBox> {
    let mut bounds = from_points(vertices.iter().map(|(x, y, _)| (*x, *y)))?;

    // A bulged segment arcs beyond the chord; include its apex.
    for index in 0..vertices.len() {
        let (x1, y1, bulge) = vertices[index];
        if bulge == 0.0 {
            continue;
        }
        let next = if index + 1 < vertices.len() {
            vertices[index + 1]
        } else if closed {
            vertices[0]
        } else {
            continue;
        };
        let (apex_x, apex_y) = bulge_apex(x1, y1, next.0, next.1, bulge);
        bounds.include(apex_x, apex_y);
    }

    Some(bounds)
}

/// The midpoint of a bulged arc segment. The bulge is the tangent of a
/// quarter of the included angle, positive for counterclockwise sweeps; the
/// apex sits one sagitta off the chord midpoint.
pub fn bulge_apex(x1: f64, y1: f64, x2: f64, y2: f64, bulge: f64) -> (f64, f64) {
    let mid_x = (x1 + x2) / 2.0;
    let mid_y = (y1 + y2) / 2.0;
    let half_chord_x = (x2 - x1) / 2.0;
    let half_chord_y = (y2 - y1) / 2.0;
    // Perpendicular of the half chord, scaled by the bulge. A
    // counterclockwise sweep bows to the right of the chord direction.
    (mid_x + half_chord_y * bulge, mid_y - half_chord_x * bulge)
}

#[cfg(test)]
mod tests {
    use dxf::{
        Point,
        entities::{Circle, Entity, EntityType, Line},
    };

    use super::*;

    #[test]
    fn line_bounds_span_both_endpoints() {
        let entity = Entity::new(EntityType::Line(Line::new(
            Point::new(1.0, 8.0, 0.0),
            Point::new(5.0, 2.0, 0.0),
        )));
        let bounds = entity_bounds(&entity).unwrap();
        assert_eq!(bounds.min_x, 1.0);
        assert_eq!(bounds.min_y, 2.0);
        assert_eq!(bounds.max_x, 5.0);
        assert_eq!(bounds.max_y, 8.0);
    }

    #[test]
    fn circle_bounds_cover_the_full_disk() {
        let entity = Entity::new(EntityType::Circle(Circle::new(
            Point::new(10.0, -10.0, 0.0),
            2.5,
        )));
        let bounds = entity_bounds(&entity).unwrap();
        assert_eq!(bounds.min_x, 7.5);
        assert_eq!(bounds.max_x, 12.5);
        assert_eq!(bounds.width(), 5.0);
        assert_eq!(bounds.height(), 5.0);
    }

    #[test]
    fn merged_bounds_grow_monotonically() {
        let mut bounds = BoundingBox::from_point(0.0, 0.0);
        bounds.merge(&BoundingBox::from_point(-3.0, 4.0));
        assert_eq!(bounds.min_x, -3.0);
        assert_eq!(bounds.max_y, 4.0);
        assert_eq!(bounds.width(), 3.0);
    }

    #[test]
    fn bulge_apex_of_a_semicircle_sits_on_the_arc() {
        // Bulge 1.0 is a counterclockwise half circle; the apex of the
        // segment (0,0)..(2,0) is (1,-1).
        let (x, y) = bulge_apex(0.0, 0.0, 2.0, 0.0, 1.0);
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y + 1.0).abs() < 1e-9);

        // A clockwise half circle bows the other way.
        let (_, y) = bulge_apex(0.0, 0.0, 2.0, 0.0, -1.0);
        assert!((y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_drawing_has_no_bounds() {
        assert_eq!(drawing_bounds(&[]), None);
    }
}
