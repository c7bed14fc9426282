//! Data-driven game balance
//!
//! Knobs that are feel decisions rather than rules live here, so they can be
//! adjusted without touching the simulation. Persisted in LocalStorage on
//! web; in-memory defaults elsewhere.

use serde::{Deserialize, Serialize};

/// Tunable gameplay parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Fraction of the character box forgiven on the leading (left) edge
    pub hitbox_inset_left: f32,
    /// Fraction of the character box forgiven on the trailing (right) edge
    pub hitbox_inset_right: f32,
    /// Freeze an in-flight jump the instant the run ends, instead of letting
    /// it settle back to ground level on its own
    pub freeze_jump_on_game_over: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hitbox_inset_left: 0.30,
            hitbox_inset_right: 0.20,
            freeze_jump_on_game_over: false,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "plankton_dash_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(tuning) = serde_json::from_str(&json) {
                    log::info!("Loaded tuning from LocalStorage");
                    return tuning;
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_forgiveness_margins() {
        let tuning = Tuning::default();
        assert_eq!(tuning.hitbox_inset_left, 0.30);
        assert_eq!(tuning.hitbox_inset_right, 0.20);
        assert!(!tuning.freeze_jump_on_game_over);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            hitbox_inset_left: 0.25,
            hitbox_inset_right: 0.1,
            freeze_jump_on_game_over: true,
        };
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(tuning, back);
    }
}
