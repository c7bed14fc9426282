//! Platform abstraction layer
//!
//! Browser/native differences kept out of the simulation. Input mapping
//! lives here so the sim only ever sees the single activate action.

pub mod input;

pub use input::is_activate_key;
