//! Texture decoding and CPU-side texture handles
//!
//! Texture maps referenced by a material are decoded once at load time and
//! parked in a [`TextureCache`] until the renderer uploads them. Objects keep a
//! [`TextureHandle`]; handle `0` means "no texture".

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use image::GenericImageView;

use super::error::TextureError;

/// Identifier of a decoded texture. `TextureHandle::NONE` (0) is the null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const NONE: TextureHandle = TextureHandle(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Position of this handle inside the cache, `None` for the null handle
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

/// RGBA8 pixels ready for upload
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn solid_color(color: [u8; 4], name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 1,
            height: 1,
            rgba: color.to_vec(),
        }
    }
}

/// Source of decoded pixels for a texture map path
pub trait ImageDecoder {
    fn decode_image(&self, path: &Path) -> Result<DecodedImage, TextureError>;
}

/// Decodes images from disk with the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageDecoder;

impl ImageDecoder for FileImageDecoder {
    fn decode_image(&self, path: &Path) -> Result<DecodedImage, TextureError> {
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = img.dimensions();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(DecodedImage {
            name,
            width,
            height,
            rgba: img.to_rgba8().into_raw(),
        })
    }
}

/// Decoded textures keyed by handle, deduplicated by path
pub struct TextureCache<D: ImageDecoder = FileImageDecoder> {
    decoder: D,
    images: Vec<DecodedImage>,
    by_path: HashMap<PathBuf, TextureHandle>,
    /// Images before this index have handed their pixels to the GPU
    uploaded: usize,
}

impl TextureCache<FileImageDecoder> {
    pub fn new() -> Self {
        Self::with_decoder(FileImageDecoder)
    }
}

impl Default for TextureCache<FileImageDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ImageDecoder> TextureCache<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            images: Vec::new(),
            by_path: HashMap::new(),
            uploaded: 0,
        }
    }

    /// Decodes `path` (or reuses an earlier decode of the same path).
    pub fn request(&mut self, path: &Path) -> Result<TextureHandle, TextureError> {
        if let Some(handle) = self.by_path.get(path) {
            return Ok(*handle);
        }

        let image = self.decoder.decode_image(path)?;
        log::debug!(
            "Decoded texture {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        self.images.push(image);
        let handle = TextureHandle(self.images.len() as u32);
        self.by_path.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    /// Like [`request`](Self::request), but reports failures and yields the null handle
    pub fn request_or_none(&mut self, path: &Path) -> TextureHandle {
        match self.request(path) {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("{err}; continuing without this texture");
                TextureHandle::NONE
            }
        }
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&DecodedImage> {
        handle.index().and_then(|i| self.images.get(i))
    }

    /// Moves the pixels of every image decoded since the last call out of
    /// the cache, in handle order.
    ///
    /// Names and sizes stay behind, so handles and counts keep working; the
    /// returned images are meant to be uploaded and dropped.
    pub fn take_pending(&mut self) -> Vec<DecodedImage> {
        let pending = self.images[self.uploaded..]
            .iter_mut()
            .map(|image| DecodedImage {
                name: image.name.clone(),
                width: image.width,
                height: image.height,
                rgba: std::mem::take(&mut image.rgba),
            })
            .collect();
        self.uploaded = self.images.len();
        pending
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
