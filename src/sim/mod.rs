//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Box2, plankton_hitbox};
pub use state::{
    GamePhase, GameState, JumpState, Metrics, Obstacle, ObstacleKind, Plankton, SpawnTimer,
};
pub use tick::{TickInput, spawn_wave, tick};
