//! Insertion-ordered shape storage.
//!
//! The [`Scene`] owns its shapes. Rendering and physics both walk it in
//! insertion order, so results are deterministic from one step to the next.
//!
//! # Example
//!
//! ```
//! use flatland::{MaterialId, Scene, Shape};
//!
//! let mut scene = Scene::new();
//! let a = scene.add(Shape::triangle(MaterialId::default()));
//! let b = scene.add(Shape::circle(MaterialId::default()));
//!
//! let order: Vec<_> = scene.iter().map(|(id, _)| id).collect();
//! assert_eq!(order, vec![a, b]);
//! ```

use crate::shape::Shape;

/// Stable handle to a shape in a [`Scene`].
///
/// Ids are handed out in increasing order and never reused, so a stale id
/// simply stops resolving once its shape is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) u64);

/// An ordered collection of shapes.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    // Sorted by id because ids only grow and removal keeps order.
    shapes: Vec<(ShapeId, Shape)>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shape and returns its id.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        log::debug!("scene: added {:?} as {id:?}", shape.kind());
        self.shapes.push((id, shape));
        id
    }

    /// Removes a shape, keeping the order of the rest.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index).1)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.index_of(id).map(|i| &self.shapes[i].1)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.index_of(id).map(|i| &mut self.shapes[i].1)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    /// Mutable shapes in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ShapeId, &mut Shape)> {
        self.shapes.iter_mut().map(|(id, shape)| (*id, shape))
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.binary_search_by_key(&id, |(id, _)| *id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ShapeKind;
    use crate::material::MaterialId;

    fn scene_of(n: usize) -> (Scene, Vec<ShapeId>) {
        let mut scene = Scene::new();
        let ids = (0..n)
            .map(|_| scene.add(Shape::triangle(MaterialId::default())))
            .collect();
        (scene, ids)
    }

    #[test]
    fn iteration_follows_insertion() {
        let mut scene = Scene::new();
        let a = scene.add(Shape::triangle(MaterialId::default()));
        let b = scene.add(Shape::rectangle(MaterialId::default()));
        let c = scene.add(Shape::circle(MaterialId::default()));

        let ids: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);

        let kinds: Vec<_> = scene.iter().map(|(_, s)| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![ShapeKind::Triangle, ShapeKind::Rectangle, ShapeKind::CIRCLE]
        );
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let (mut scene, ids) = scene_of(4);
        assert!(scene.remove(ids[1]).is_some());

        let left: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(left, vec![ids[0], ids[2], ids[3]]);
        assert!(!scene.contains(ids[1]));
        assert!(scene.get(ids[3]).is_some());
    }

    #[test]
    fn ids_are_not_reused() {
        let (mut scene, ids) = scene_of(2);
        scene.remove(ids[1]);
        let fresh = scene.add(Shape::triangle(MaterialId::default()));
        assert_ne!(fresh, ids[1]);
        assert!(scene.get(ids[1]).is_none());
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let (mut scene, ids) = scene_of(3);
        scene.get_mut(ids[2]).unwrap().transform.rotate(1.0);
        assert_eq!(scene.get(ids[2]).unwrap().transform.rotation.z, 1.0);
        assert_eq!(scene.get(ids[0]).unwrap().transform.rotation.z, 0.0);
    }

    #[test]
    fn remove_missing_is_none() {
        let (mut scene, ids) = scene_of(1);
        assert!(scene.remove(ids[0]).is_some());
        assert!(scene.remove(ids[0]).is_none());
        assert!(scene.is_empty());
    }
}
