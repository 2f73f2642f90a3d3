//! # Graphics Module
//!
//! Everything between a decoded model and pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orbit camera with mouse and keyboard controls
//! - **Framing** ([`framing`]) - Centers and scales a model into a canonical view
//! - **Geometry** ([`geometry`]) - Procedural meshes (the placeholder cube)
//! - **Rendering Pipeline** ([`rendering`]) - Lit wgpu pipeline with depth testing
//! - **Scene Management** ([`scene`]) - Current model or placeholder plus GPU buffers
//! - **Resource Management** ([`resources`]) - Depth texture and global uniforms
//!
//! ## Usage
//!
//! ```no_run
//! use vitrine::gfx::{camera::CameraManager, scene::Scene};
//!
//! // The render engine is created by the app once a window exists:
//! // let render_engine = RenderEngine::new(window, width, height).await?;
//! let scene = Scene::new(CameraManager::for_viewer(85.0, 1.5));
//! ```

pub mod camera;
pub mod framing;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
