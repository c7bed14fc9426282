//! DOM rendering module
//!
//! The playfield is a tree of absolutely-positioned elements; rendering
//! means reconciling that tree with the current simulation state once per
//! frame. Browser-only.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;
