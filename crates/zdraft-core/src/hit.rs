//! 拾取与命中测试

use crate::entity::{Entity, EntityId};
use crate::math::Point2;

/// 查询点到实体的距离，总是有限且非负
pub fn closest_point_on_entity(query: &Point2, entity: &Entity) -> f64 {
    entity.geometry.distance_to_point(query)
}

/// 容差内距离最近的可见实体。距离相同时取先出现的实体
pub fn find_closest<'a>(
    point: &Point2,
    entities: impl IntoIterator<Item = &'a Entity>,
    tolerance: f64,
) -> Option<EntityId> {
    let mut best: Option<(EntityId, f64)> = None;
    for entity in entities {
        if !entity.visible {
            continue;
        }
        let d = closest_point_on_entity(point, entity);
        if d > tolerance {
            continue;
        }
        // 严格小于，保证并列时保留先出现的实体
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((entity.id, d));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Geometry, Line};

    fn entity(id: u64, geometry: Geometry) -> Entity {
        let mut e = Entity::new(geometry);
        e.id = EntityId(id);
        e
    }

    #[test]
    fn test_closest_point_on_circle() {
        let c = entity(1, Geometry::Circle(Circle::new(Point2::origin(), 5.0)));
        assert!((closest_point_on_entity(&Point2::new(10.0, 0.0), &c) - 5.0).abs() < 1e-12);
        assert!((closest_point_on_entity(&Point2::new(0.0, 0.0), &c) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_earlier_entity() {
        let a = entity(1, Geometry::Line(Line::new(Point2::new(0.0, 1.0), Point2::new(10.0, 1.0))));
        let b = entity(2, Geometry::Line(Line::new(Point2::new(0.0, -1.0), Point2::new(10.0, -1.0))));
        let entities = vec![a, b];
        assert_eq!(find_closest(&Point2::new(5.0, 0.0), &entities, 2.0), Some(EntityId(1)));
        assert_eq!(find_closest(&Point2::new(5.0, 0.0), &entities, 0.5), None);
    }

    #[test]
    fn test_hidden_entities_skipped() {
        let mut a = entity(1, Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))));
        a.visible = false;
        let b = entity(2, Geometry::Line(Line::new(Point2::new(0.0, 1.0), Point2::new(10.0, 1.0))));
        let entities = vec![a, b];
        assert_eq!(find_closest(&Point2::new(5.0, 0.0), &entities, 2.0), Some(EntityId(2)));
        assert_eq!(find_closest(&Point2::new(5.0, -0.5), &entities, 1.0), None);
    }
}
