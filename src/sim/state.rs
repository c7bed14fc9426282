//! Game state and core simulation types
//!
//! All state needed for determinism lives here in one owned record.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Box2;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active run
    Running,
    /// Run ended by collision; state frozen until restart
    GameOver,
}

/// Vertical motion of the character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpState {
    /// Resting on the scroll line at ground level
    Grounded,
    /// Mid-jump with the current upward velocity (px per tick)
    Airborne { velocity: f32 },
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plankton {
    /// Vertical offset from the top of the playfield (px)
    pub top: f32,
    pub jump: JumpState,
}

impl Plankton {
    /// Grounded at the given ground level
    pub fn grounded(ground_level: f32) -> Self {
        Self {
            top: ground_level,
            jump: JumpState::Grounded,
        }
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        matches!(self.jump, JumpState::Airborne { .. })
    }
}

/// Wave kinds, uniformly chosen at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Weak,
    Strong,
}

impl ObstacleKind {
    /// Wave width (px)
    pub fn width(&self) -> f32 {
        match self {
            ObstacleKind::Weak => WEAK_WIDTH,
            ObstacleKind::Strong => STRONG_WIDTH,
        }
    }

    /// Wave height as a fraction of playfield height
    pub fn height_frac(&self) -> f32 {
        match self {
            ObstacleKind::Weak => WEAK_HEIGHT_FRAC,
            ObstacleKind::Strong => STRONG_HEIGHT_FRAC,
        }
    }
}

/// A scrolling wave
///
/// One record owns both visual representations: the collidable crest above
/// the scroll line and the cosmetic decoration mirrored below it. The
/// decoration's segment heights are derived from `segments` at
/// `DECORATION_SCALE`, so crest and decoration share identity and lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Crest width (px)
    pub width: f32,
    /// Crest height (px), fixed at spawn from the playfield height
    pub height: f32,
    /// Distance travelled from the playfield's right edge (px)
    pub offset: f32,
    /// Jagged crest silhouette: one height per vertical segment (px)
    pub segments: Vec<f32>,
}

impl Obstacle {
    /// Left edge in playfield coordinates
    #[inline]
    pub fn left(&self, playfield_width: f32) -> f32 {
        playfield_width - self.offset - self.width
    }

    /// Top edge of the crest, seated on the center line
    #[inline]
    pub fn top(&self, center_line: f32) -> f32 {
        center_line - self.height
    }

    /// Top edge of the decoration, hanging below the scroll line
    #[inline]
    pub fn decoration_top(center_line: f32) -> f32 {
        center_line + LINE_THICKNESS / 2.0
    }

    /// Collidable bounding box of the crest
    pub fn rect(&self, metrics: &Metrics) -> Box2 {
        Box2::from_extent(
            self.left(metrics.width),
            self.top(metrics.center_line),
            self.width,
            self.height,
        )
    }
}

/// Playfield-derived layout, recomputed on resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Playfield width (px)
    pub width: f32,
    /// Playfield height (px)
    pub height: f32,
    /// Horizontal midline the waves scroll along
    pub center_line: f32,
    /// Vertical resting offset of the character
    pub ground_level: f32,
}

impl Metrics {
    pub fn new(width: f32, height: f32) -> Self {
        let center_line = height * 0.5;
        Self {
            width,
            height,
            center_line,
            ground_level: center_line - PLANKTON_HEIGHT,
        }
    }
}

/// Countdown to the next wave spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    /// Ticks until the next spawn; 0 means spawn on the next tick
    pub ticks_left: u32,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (spawn delays, wave kinds, segment heights)
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Waves cleared without collision
    pub score: u32,
    /// Scroll speed as a fraction of playfield width per tick; only ever grows
    pub speed_base: f32,
    /// Landings since the last speed-up
    pub jump_counter: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub metrics: Metrics,
    pub plankton: Plankton,
    /// Live waves, oldest first
    pub obstacles: Vec<Obstacle>,
    pub spawner: SpawnTimer,
    pub tuning: Tuning,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a running session; the first wave spawns on the first tick
    pub fn new(seed: u64, metrics: Metrics, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            score: 0,
            speed_base: BASE_SPEED,
            jump_counter: 0,
            time_ticks: 0,
            metrics,
            plankton: Plankton::grounded(metrics.ground_level),
            obstacles: Vec::new(),
            spawner: SpawnTimer { ticks_left: 0 },
            tuning,
            next_id: 1,
        }
    }

    /// Reset to a fresh running session, keeping metrics and tuning
    ///
    /// The new seed is drawn from the session RNG so a restarted run is
    /// still reproducible from the original seed.
    pub fn restart(&mut self) {
        let seed = self.rng.next_u64();
        *self = GameState::new(seed, self.metrics, self.tuning);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Horizontal advance per tick (px), scaling with viewport and speed_base
    #[inline]
    pub fn scroll_speed(&self) -> f32 {
        self.metrics.width * self.speed_base
    }

    /// Recompute layout for new playfield dimensions
    ///
    /// Re-seats the character on the new ground level only when it is not
    /// mid-jump and the run is still live; wave vertical placement is derived
    /// from `center_line` and follows automatically.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.metrics = Metrics::new(width, height);
        if !self.plankton.is_airborne() && self.phase == GamePhase::Running {
            self.plankton.top = self.metrics.ground_level;
        }
    }
}
