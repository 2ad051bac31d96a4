// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Textures, uniform buffers, and bind groups for rendering.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use material::{ObjectBindings, ObjectUBO, ObjectUniform};
pub use texture_resource::TextureResource;
