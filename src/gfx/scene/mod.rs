//! # Scene Management Module
//!
//! The viewer scene holds the orbit camera and exactly one thing to look at:
//! a loaded product model, the placeholder cube, or nothing while a model
//! is loading.
//!
//! ## Key Components
//!
//! - [`Scene`] - Camera plus the current [`SceneContent`]
//! - [`Object`] - Meshes sharing one model transform, with GPU buffers
//! - [`Vertex3D`] - Position/normal vertex format
//!
//! ## Usage
//!
//! ```no_run
//! use vitrine::gfx::{camera::CameraManager, scene::Scene};
//!
//! let mut scene = Scene::new(CameraManager::for_viewer(85.0, 1.5));
//! scene.show_placeholder();
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, Mesh, Object};
pub use scene::{Scene, SceneContent};
pub use vertex::Vertex3D;
