use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::BBox;

/// Unique scene object identifier.
pub type ObjectId = Uuid;

/// Kind of shape an object was drawn as. The vertex math for each kind lives
/// with the shape tools; the viewport core only looks at bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    Line,
    Rectangle,
    Circle,
    Diamond,
}

/// A drawable object as far as culling is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ShapeKind,
    pub bounds: BBox,
    pub visible: bool,
}

impl SceneObject {
    pub fn new(kind: ShapeKind, bounds: BBox) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            bounds,
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Ordered collection of scene objects.
///
/// Draw order is insertion order. Every mutation bumps `revision`, which lets
/// readers cache derived data such as the spatial index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectCollection {
    objects: Vec<SceneObject>,
    #[serde(skip)]
    revision: u64,
}

impl ObjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        self.objects.push(object);
        self.revision += 1;
        id
    }

    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| &o.id == id)?;
        self.revision += 1;
        Some(self.objects.remove(index))
    }

    /// Returns `false` if the object is unknown or already had that visibility.
    pub fn set_visible(&mut self, id: &ObjectId, visible: bool) -> bool {
        match self.objects.iter_mut().find(|o| &o.id == id) {
            Some(object) if object.visible != visible => {
                object.visible = visible;
                self.revision += 1;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, &SceneObject)> {
        self.objects.iter().enumerate().filter(|(_, o)| o.visible)
    }

    pub fn as_slice(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
