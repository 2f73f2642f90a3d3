// src/lib.rs
//! Vitrine product viewer
//!
//! Fetches a product catalog over HTTP, lets the user filter and page
//! through it, and shows each product's 3D model framed in an orbit view.
//! Built on wgpu, winit and Dear ImGui.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gfx;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use error::ViewerError;
