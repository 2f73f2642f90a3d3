//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the 3D viewport.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`panel`] - The viewer screens: loading, error, empty states and the
//!   browsing layout with filter, navigation and load progress
//!
//! Input captured by the UI (for example a click on "Next") does not reach
//! the orbit camera.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{viewer_panel, PanelAction};
