//! Procedural tree grower.
//!
//! A tree starts as a zero-length trunk. Every frame `grow` extends the trunk
//! by a constant step; once it reaches its target it forks, and from then on
//! every branch that reaches its own target forks again until the maximum
//! depth is hit. Branches and fruit live in flat, append-only vectors in
//! creation order.

use crate::color::Hsb;
use crate::random::RandomSource;
use crate::shapes::{remap, Blob, Point, Segment, TreeSprite};
use std::f32::consts::FRAC_PI_2;
use thiserror::Error;

/// Branch growth runs at this fraction of the trunk's growth speed.
const BRANCH_SPEED_RATIO: f32 = 0.8;
/// Fork half-angle range, radians.
const FORK_SPREAD: (f32, f32) = (0.3, 0.5);
const CENTRAL_BRANCH_CHANCE: f32 = 0.3;
const CENTRAL_JITTER: f32 = 0.1;
const FRUIT_SIZE: (f32, f32) = (5.0, 10.0);
const FRUIT_HUE: (f32, f32) = (0.0, 40.0);
const TRUNK_HUE: (f32, f32) = (20.0, 40.0);
const LEAF_HUE: (f32, f32) = (90.0, 140.0);
const LEAF_DIAMETER: f32 = 15.0;
/// Fraction of its target a terminal branch must reach before it shows a leaf.
const LEAF_THRESHOLD: f32 = 0.9;

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("trunk length must be positive and finite, got {0}")]
    InvalidTrunkLength(f32),
    #[error("max depth must be at least 1, got {0}")]
    InvalidDepth(u32),
    #[error("invalid growth parameter: {0}")]
    InvalidParams(&'static str),
}

/// Tunables shared by every tree in a forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// Length multiplier applied at each generation.
    pub branch_factor: f32,
    /// Trunk length added per tick.
    pub growth_speed: f32,
    /// Chance that a near-terminal branch bears fruit when it forks.
    pub fruit_probability: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            branch_factor: 0.67,
            growth_speed: 0.5,
            fruit_probability: 0.3,
        }
    }
}

impl TreeParams {
    pub fn validate(&self) -> Result<(), TreeError> {
        if !(self.branch_factor > 0.0 && self.branch_factor <= 1.0) {
            return Err(TreeError::InvalidParams("branch factor must be in (0, 1]"));
        }
        if !(self.growth_speed > 0.0 && self.growth_speed.is_finite()) {
            return Err(TreeError::InvalidParams("growth speed must be positive"));
        }
        if !(0.0..=1.0).contains(&self.fruit_probability) {
            return Err(TreeError::InvalidParams("fruit probability must be in [0, 1]"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub start: Point,
    pub target_length: f32,
    pub length: f32,
    pub angle: f32,
    pub depth: u32,
    pub has_generated_children: bool,
}

impl Branch {
    pub fn tip(&self) -> Point {
        self.start.project(self.angle, self.length)
    }

    pub fn is_grown(&self) -> bool {
        self.length >= self.target_length
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    pub position: Point,
    pub size: f32,
    pub color: Hsb,
}

#[derive(Debug, Clone)]
pub struct Tree {
    origin: Point,
    initial_length: f32,
    trunk_length: f32,
    target_length: f32,
    angle: f32,
    max_depth: u32,
    params: TreeParams,
    trunk_color: Hsb,
    leaf_color: Hsb,
    trunk_complete: bool,
    branches: Vec<Branch>,
    fruits: Vec<Fruit>,
}

impl Tree {
    /// Create a tree rooted at `origin` whose trunk will grow to
    /// `trunk_length`, forking down to `max_depth` generations.
    pub fn new<R: RandomSource + ?Sized>(
        origin: Point,
        trunk_length: f32,
        max_depth: u32,
        params: TreeParams,
        rng: &mut R,
    ) -> Result<Self, TreeError> {
        if !(trunk_length > 0.0 && trunk_length.is_finite()) {
            return Err(TreeError::InvalidTrunkLength(trunk_length));
        }
        if max_depth < 1 {
            return Err(TreeError::InvalidDepth(max_depth));
        }
        params.validate()?;

        let trunk_color = Hsb::new(rng.range(TRUNK_HUE.0, TRUNK_HUE.1), 70.0, 40.0);
        let leaf_color = Hsb::new(rng.range(LEAF_HUE.0, LEAF_HUE.1), 80.0, 70.0);

        Ok(Self {
            origin,
            initial_length: trunk_length,
            trunk_length: 0.0,
            target_length: trunk_length,
            angle: FRAC_PI_2,
            max_depth,
            params,
            trunk_color,
            leaf_color,
            trunk_complete: false,
            branches: Vec::new(),
            fruits: Vec::new(),
        })
    }

    /// Advance growth by one frame.
    pub fn grow<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        if self.trunk_length < self.target_length {
            self.trunk_length =
                (self.trunk_length + self.params.growth_speed).min(self.target_length);
        } else if !self.trunk_complete {
            self.trunk_complete = true;
            let tip = self.trunk_tip();
            let length = self.trunk_length * self.params.branch_factor;
            self.fork(tip, self.angle, length, 1, rng);
        }

        let step = self.params.growth_speed * BRANCH_SPEED_RATIO;
        // Branches forked below are picked up next tick.
        let existing = self.branches.len();
        for i in 0..existing {
            let branch = &mut self.branches[i];
            if !branch.is_grown() {
                branch.length = (branch.length + step).min(branch.target_length);
                continue;
            }
            if branch.has_generated_children || branch.depth >= self.max_depth {
                continue;
            }
            branch.has_generated_children = true;

            let tip = branch.tip();
            let angle = branch.angle;
            let depth = branch.depth;
            let length = branch.target_length * self.params.branch_factor;
            self.fork(tip, angle, length, depth + 1, rng);

            if depth + 1 >= self.max_depth && rng.chance(self.params.fruit_probability) {
                self.fruits.push(Fruit {
                    position: tip,
                    size: rng.range(FRUIT_SIZE.0, FRUIT_SIZE.1),
                    color: Hsb::new(rng.range(FRUIT_HUE.0, FRUIT_HUE.1), 100.0, 100.0),
                });
            }
        }
    }

    /// Two children at `angle ± spread`, sometimes a third near `angle`.
    fn fork<R: RandomSource + ?Sized>(
        &mut self,
        start: Point,
        angle: f32,
        length: f32,
        depth: u32,
        rng: &mut R,
    ) {
        let spread = rng.range(FORK_SPREAD.0, FORK_SPREAD.1);
        self.push_branch(start, angle + spread, length, depth);
        self.push_branch(start, angle - spread, length, depth);

        if rng.chance(CENTRAL_BRANCH_CHANCE) {
            let jitter = rng.range(-CENTRAL_JITTER, CENTRAL_JITTER);
            self.push_branch(start, angle + jitter, length, depth);
        }
    }

    fn push_branch(&mut self, start: Point, angle: f32, target_length: f32, depth: u32) {
        self.branches.push(Branch {
            start,
            target_length,
            length: 0.0,
            angle,
            depth,
            has_generated_children: false,
        });
    }

    /// Render description of the current state.
    pub fn display(&self) -> TreeSprite {
        let trunk = Segment {
            from: self.origin,
            to: self.trunk_tip(),
            thickness: remap(self.initial_length, 0.0, 150.0, 1.0, 15.0),
            color: self.trunk_color,
        };

        let max = self.max_depth as f32;
        let mut branches = Vec::with_capacity(self.branches.len());
        let mut leaves = Vec::new();

        for branch in self.branches.iter().filter(|b| b.length > 0.0) {
            let depth = branch.depth as f32;
            let tip = branch.tip();
            branches.push(Segment {
                from: branch.start,
                to: tip,
                thickness: remap(depth, 1.0, max, 10.0, 1.0),
                color: self
                    .trunk_color
                    .lerp(self.leaf_color, remap(depth, 1.0, max, 0.0, 1.0)),
            });

            if branch.depth + 1 >= self.max_depth
                && branch.length >= branch.target_length * LEAF_THRESHOLD
            {
                leaves.push(Blob {
                    center: tip,
                    diameter: LEAF_DIAMETER,
                    color: self.leaf_color,
                });
            }
        }

        let fruits = self
            .fruits
            .iter()
            .map(|f| Blob {
                center: f.position,
                diameter: f.size,
                color: f.color,
            })
            .collect();

        TreeSprite {
            trunk,
            branches,
            leaves,
            fruits,
        }
    }

    pub fn trunk_tip(&self) -> Point {
        self.origin.project(self.angle, self.trunk_length)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    #[cfg(test)]
    pub fn trunk_length(&self) -> f32 {
        self.trunk_length
    }

    #[cfg(test)]
    pub fn target_length(&self) -> f32 {
        self.target_length
    }

    #[cfg(test)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[cfg(test)]
    pub fn is_trunk_complete(&self) -> bool {
        self.trunk_complete
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn fruits(&self) -> &[Fruit] {
        &self.fruits
    }

    /// True once no further tick can change the tree.
    pub fn is_fully_grown(&self) -> bool {
        self.trunk_complete
            && self.branches.iter().all(|b| {
                b.is_grown() && (b.has_generated_children || b.depth >= self.max_depth)
            })
    }
}
