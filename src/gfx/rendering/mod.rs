//! Core rendering functionality
//!
//! Handles the render pipeline, depth buffer and frame submission.

pub mod render_engine;

pub use render_engine::RenderEngine;
