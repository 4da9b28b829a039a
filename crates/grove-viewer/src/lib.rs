//! Interaction controller: viewport, hide/restore and scene construction

pub mod config;
pub mod controller;
pub mod hidden;
pub mod scene;
pub mod viewport;

#[cfg(test)]
pub mod tests;

pub use config::ViewerConfig;
pub use controller::{ClassTarget, InteractionController, LayoutRequest, PointerButton};
pub use hidden::{Bookmark, HiddenSet, ToggleOutcome};
pub use scene::{EdgeEnd, Scene, SceneEdge, SceneNode};
pub use viewport::Viewport;
