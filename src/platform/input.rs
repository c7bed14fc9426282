//! Keyboard mapping for the single activate action
//!
//! Touch input maps to the same action at the event-listener level, so this
//! is the only binding table the game has.

/// Whether a `KeyboardEvent.key` value triggers the activate action
pub fn is_activate_key(key: &str) -> bool {
    matches!(key, " " | "Spacebar" | "ArrowUp")
}
