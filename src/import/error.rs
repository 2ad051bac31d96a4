//! Errors raised while importing mesh, material and texture descriptions

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// The kind of element a face reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Position => "position",
            ElementKind::TexCoord => "texture coordinate",
            ElementKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Failure to import a single mesh or material description.
///
/// Every variant is local to the one file being imported; callers drop the
/// affected object and keep loading the rest of the scene.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: face references {kind} {index} but only {available} declared so far")]
    DanglingReference {
        line: usize,
        kind: ElementKind,
        index: usize,
        available: usize,
    },

    #[error("line {line}: malformed `{directive}` directive: {reason}")]
    Malformed {
        line: usize,
        directive: &'static str,
        reason: String,
    },
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, directive: &'static str, reason: impl Into<String>) -> Self {
        ImportError::Malformed {
            line,
            directive,
            reason: reason.into(),
        }
    }
}

/// Failure to turn a texture map reference into pixels
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
