//! Planted trees, oldest first.

use crate::random::RandomSource;
use crate::shapes::{Point, TreeSprite};
use crate::tree::{Tree, TreeError, TreeParams};
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 10;

/// Trunk length range for trees planted by clicking.
const PLANT_LENGTH: (f32, f32) = (80.0, 150.0);
/// Depth range for trees planted by clicking, upper bound exclusive.
const PLANT_DEPTH: (f32, f32) = (3.0, 6.0);

pub struct Forest {
    trees: VecDeque<Tree>,
    capacity: usize,
    params: TreeParams,
}

impl Forest {
    pub fn new(capacity: usize, params: TreeParams) -> Self {
        let capacity = capacity.max(1);
        Self {
            trees: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
            params,
        }
    }

    /// Add a tree, evicting and returning the oldest if over capacity.
    pub fn plant(&mut self, tree: Tree) -> Option<Tree> {
        self.trees.push_back(tree);
        if self.trees.len() > self.capacity {
            let evicted = self.trees.pop_front();
            if let Some(ref t) = evicted {
                debug!(x = t.origin().x, "evicted oldest tree");
            }
            evicted
        } else {
            None
        }
    }

    /// Plant a tree of random size and depth rooted at `(x, ground)`.
    pub fn plant_at<R: RandomSource + ?Sized>(
        &mut self,
        x: f32,
        ground: f32,
        rng: &mut R,
    ) -> Result<Option<Tree>, TreeError> {
        let length = rng.range(PLANT_LENGTH.0, PLANT_LENGTH.1);
        let depth = rng.range(PLANT_DEPTH.0, PLANT_DEPTH.1) as u32;
        self.plant_sized(Point::new(x, ground), length, depth, rng)
    }

    /// Plant a tree with an explicit trunk length and depth.
    pub fn plant_sized<R: RandomSource + ?Sized>(
        &mut self,
        origin: Point,
        length: f32,
        depth: u32,
        rng: &mut R,
    ) -> Result<Option<Tree>, TreeError> {
        let tree = Tree::new(origin, length, depth, self.params, rng)?;
        debug!(x = origin.x, y = origin.y, length, depth, "planted tree");
        Ok(self.plant(tree))
    }

    /// Grow every tree by one frame, oldest first.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        for tree in self.trees.iter_mut() {
            tree.grow(rng);
        }
    }

    /// Render descriptions in paint order.
    pub fn sprites(&self) -> Vec<TreeSprite> {
        self.trees.iter().map(Tree::display).collect()
    }

    pub fn is_fully_grown(&self) -> bool {
        self.trees.iter().all(Tree::is_fully_grown)
    }

    pub fn clear(&mut self) {
        self.trees.clear();
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }
}
