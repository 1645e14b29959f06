use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::BBox;
use crate::scene::{ObjectCollection, ObjectId};

/// An entry in the R-tree, referencing a scene object by its draw-order slot.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Position of the object in the collection.
    pub draw_index: usize,
    pub object_id: ObjectId,
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.bbox.min_x, self.bbox.min_y], [self.bbox.max_x, self.bbox.max_y])
    }
}

/// Spatial index over the visible objects of one collection revision.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    revision: u64,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            revision: 0,
        }
    }

    /// Bulk-load the visible objects of `objects`.
    pub fn build(objects: &ObjectCollection) -> Self {
        let entries = objects
            .visible()
            .map(|(draw_index, o)| SpatialEntry {
                draw_index,
                object_id: o.id,
                bbox: o.bounds,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            revision: objects.revision(),
        }
    }

    /// Rebuild only if the collection changed since the last build.
    pub fn refresh(&mut self, objects: &ObjectCollection) -> bool {
        if self.revision == objects.revision() {
            return false;
        }
        *self = Self::build(objects);
        true
    }

    /// Ids of every object intersecting `window`, in draw order.
    pub fn cull(&self, window: &BBox) -> Vec<ObjectId> {
        let envelope = AABB::from_corners([window.min_x, window.min_y], [window.max_x, window.max_y]);
        let mut hits: Vec<&SpatialEntry> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .collect();
        hits.sort_by_key(|e| e.draw_index);
        hits.into_iter().map(|e| e.object_id).collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneObject, ShapeKind};

    #[test]
    fn test_cull_returns_draw_order() {
        let mut objects = ObjectCollection::new();
        let far = objects.push(SceneObject::new(ShapeKind::Rectangle, BBox::new(200.0, 200.0, 210.0, 210.0)));
        let b = objects.push(SceneObject::new(ShapeKind::Circle, BBox::new(50.0, 50.0, 60.0, 60.0)));
        let a = objects.push(SceneObject::new(ShapeKind::Diamond, BBox::new(0.0, 0.0, 10.0, 10.0)));
        objects.push(SceneObject::new(ShapeKind::Point, BBox::new(5.0, 5.0, 5.0, 5.0)).hidden());

        let index = SpatialIndex::build(&objects);
        assert_eq!(index.len(), 3);

        let hits = index.cull(&BBox::new(-5.0, -5.0, 100.0, 100.0));
        assert_eq!(hits, vec![b, a]);
        assert!(!hits.contains(&far));
    }

    #[test]
    fn test_refresh_skips_unchanged_revision() {
        let mut objects = ObjectCollection::new();
        objects.push(SceneObject::new(ShapeKind::Line, BBox::new(0.0, 0.0, 1.0, 1.0)));

        let mut index = SpatialIndex::new();
        assert!(index.refresh(&objects));
        assert!(!index.refresh(&objects));

        objects.push(SceneObject::new(ShapeKind::Line, BBox::new(2.0, 2.0, 3.0, 3.0)));
        assert!(index.refresh(&objects));
        assert_eq!(index.len(), 2);
    }
}
