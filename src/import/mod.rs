//! # Asset Import
//!
//! Turns text mesh (OBJ) and material (MTL) descriptions into flat,
//! GPU-ready vertex lists plus material records, and decodes the texture
//! maps those materials reference.
//!
//! ```no_run
//! use std::path::Path;
//! use waypath::import::{MeshImporter, TextureCache};
//!
//! let mut textures = TextureCache::new();
//! let mesh = MeshImporter::new(&mut textures)
//!     .import(Path::new("assets/cube.obj"), Path::new("assets/cube.mtl"))
//!     .expect("cube should load");
//! assert_eq!(mesh.vertex_count() % 3, 0);
//! ```

pub mod error;
mod lines;
pub mod mtl;
pub mod obj;
pub mod texture;

pub use error::{ElementKind, ImportError, TextureError};
pub use mtl::{load_material, parse_material, resolve_material, MaterialDescription};
pub use obj::{parse_mesh, ImportedMesh, MaterialTextures, MeshImporter};
pub use texture::{DecodedImage, FileImageDecoder, ImageDecoder, TextureCache, TextureHandle};
