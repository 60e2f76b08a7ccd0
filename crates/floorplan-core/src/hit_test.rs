//! Proximity hit-testing of elements in world space.

use crate::element::{Element, ElementId};
use kurbo::Point;

/// Hit radii in world units. They do not scale with zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRadii {
    /// Radius around the midpoint of the first segment of line-like elements.
    pub line: f64,
    /// Radius around the anchor of point-anchored elements.
    pub point: f64,
}

impl Default for HitRadii {
    fn default() -> Self {
        Self {
            line: 40.0,
            point: 30.0,
        }
    }
}

/// Whether `world` hits a single element. Boundaries are inclusive.
pub fn hits(element: &Element, world: Point, radii: HitRadii) -> bool {
    let Some(reference) = element.reference_point() else {
        return false;
    };
    let radius = if element.is_line_like() {
        radii.line
    } else {
        radii.point
    };
    world.distance(reference) <= radius
}

/// First element in collection order hit by `world`.
///
/// A linear scan; only the select tool calls this.
pub fn hit_test<'a, I>(world: Point, elements: I, radii: HitRadii) -> Option<ElementId>
where
    I: IntoIterator<Item = &'a Element>,
{
    elements
        .into_iter()
        .find(|element| hits(element, world, radii))
        .map(Element::id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::layer::LayerId;

    fn chair_at(p: Point) -> Element {
        Element::anchored(ElementKind::Furniture, "chair", p, 0.0, LayerId::default_layer())
    }

    #[test]
    fn test_point_radius_boundary_inclusive() {
        let chair = chair_at(Point::new(100.0, 100.0));
        let radii = HitRadii::default();
        assert!(hits(&chair, Point::new(130.0, 100.0), radii));
        assert!(!hits(&chair, Point::new(130.0001, 100.0), radii));
        assert!(!hits(&chair, Point::new(131.0, 100.0), radii));
    }

    #[test]
    fn test_line_uses_midpoint_and_larger_radius() {
        let wall = Element::path(
            ElementKind::Wall,
            "rcc",
            vec![Point::new(0.0, 0.0), Point::new(200.0, 0.0)],
            LayerId::default_layer(),
        );
        let radii = HitRadii::default();
        assert!(hits(&wall, Point::new(100.0, 40.0), radii));
        assert!(!hits(&wall, Point::new(100.0, 41.0), radii));
        // Endpoints are far from the midpoint and miss.
        assert!(!hits(&wall, Point::new(0.0, 0.0), radii));
    }

    #[test]
    fn test_first_in_collection_order_wins() {
        let a = chair_at(Point::new(0.0, 0.0));
        let b = chair_at(Point::new(10.0, 0.0));
        let elements = vec![a.clone(), b];
        assert_eq!(
            hit_test(Point::new(8.0, 0.0), &elements, HitRadii::default()),
            Some(a.id())
        );
    }

    #[test]
    fn test_miss_returns_none() {
        let elements = vec![chair_at(Point::ZERO)];
        assert_eq!(
            hit_test(Point::new(500.0, 500.0), &elements, HitRadii::default()),
            None
        );
    }

    #[test]
    fn test_empty_path_never_hits() {
        let empty = Element::path(ElementKind::Annotation, "line", vec![], LayerId::default_layer());
        assert!(!hits(&empty, Point::ZERO, HitRadii::default()));
    }
}
