//! Axis-aligned collision boxes
//!
//! The run ends when a wave's crest box overlaps the character's hitbox.
//! The hitbox is the character's visual box inset horizontally by the
//! forgiveness margins from `Tuning`, so the character's padding cannot
//! clip a wave.

use glam::Vec2;

use super::state::Plankton;
use crate::consts::{PLANKTON_HEIGHT, PLANKTON_LEFT, PLANKTON_WIDTH};
use crate::tuning::Tuning;

/// An axis-aligned box in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and an extent
    pub fn from_extent(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(left + width, top + height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap on both axes; boxes that merely touch do not collide
    pub fn overlaps(&self, other: &Box2) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Shrink horizontally by the given fractions of the width per side
    pub fn inset_horizontal(&self, left_frac: f32, right_frac: f32) -> Box2 {
        let width = self.width();
        Box2 {
            min: Vec2::new(self.min.x + width * left_frac, self.min.y),
            max: Vec2::new(self.max.x - width * right_frac, self.max.y),
        }
    }
}

/// The character's collidable box at its fixed horizontal position
pub fn plankton_hitbox(plankton: &Plankton, tuning: &Tuning) -> Box2 {
    Box2::from_extent(PLANKTON_LEFT, plankton.top, PLANKTON_WIDTH, PLANKTON_HEIGHT)
        .inset_horizontal(tuning.hitbox_inset_left, tuning.hitbox_inset_right)
}
