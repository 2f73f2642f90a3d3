//! GPU resource management
//!
//! Depth buffer plus the global uniforms (camera and lights) bound at group 0.

pub mod global_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightRig};
pub use texture_resource::TextureResource;
