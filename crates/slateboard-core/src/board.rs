//! Board document: the shared shape set for one room.

use crate::shapes::{Shape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered shape set for one room.
///
/// Insertion order is paint order. The board only grows by appends (local
/// commits or remote creates) and shrinks by id-set removal (local or
/// remote erase); shapes are never edited in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    shapes: Vec<Shape>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape to the end (topmost in paint order).
    ///
    /// Id uniqueness is the caller's responsibility; no dedup happens here.
    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove every shape whose id is in the set.
    ///
    /// Returns the removed shapes in their former paint order, so callers
    /// can decide whether a redraw or broadcast is warranted. Unknown ids
    /// are a no-op, not an error.
    pub fn remove_by_ids(&mut self, ids: &HashSet<ShapeId>) -> Vec<Shape> {
        let mut removed = Vec::new();
        self.shapes.retain(|shape| {
            if ids.contains(shape.id()) {
                removed.push(shape.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// All shapes in paint order (back to front).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Ids of every shape hit by a world-space point.
    pub fn hits_at(&self, point: Point) -> HashSet<ShapeId> {
        self.shapes
            .iter()
            .filter(|shape| shape.hit_test(point))
            .map(|shape| shape.id().clone())
            .collect()
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.iter().any(|shape| shape.id() == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
