// src/gfx/rendering/mod.rs
//! Frame rendering: surface, Phong pipeline and draw calls

pub mod render_engine;

pub use render_engine::{RenderEngine, RenderError};
