// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers

pub mod binding;
pub mod uniform_buffer;

// Re-export main types
pub use binding::{uniform_bind_group, uniform_layout};
pub use uniform_buffer::UniformBuffer;
