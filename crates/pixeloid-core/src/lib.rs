//! # Pixeloid Core
//!
//! Value types shared by the viewport core of the Pixeloid geometry editor:
//! the pixeloid/vertex coordinate spaces, zoom levels, rectangles, the scene
//! object collection with its R-tree, and the observable view store that
//! announces state changes to the render scheduler.

pub mod coords;
pub mod error;
pub mod geometry;
pub mod scene;
pub mod spatial;
pub mod store;
pub mod zoom;

pub use coords::{to_pixeloid, to_vertex, Offset, PixeloidCoordinate, VertexCoordinate};
pub use error::ViewportError;
pub use geometry::{BBox, PixeloidRect, VertexRect, ViewportSize};
pub use scene::{ObjectCollection, ObjectId, SceneObject, ShapeKind};
pub use spatial::SpatialIndex;
pub use store::{ObservableStore, StatePath, ViewState, ViewStore};
pub use zoom::{ZoomDirection, ZoomLevel};
