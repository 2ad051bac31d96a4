//! Material description (MTL) resolution
//!
//! A single forward pass over the description: every recognised directive
//! overrides the default, the last occurrence of a directive wins, and
//! anything unrecognised is skipped.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use cgmath::Vector3;

use super::{error::ImportError, lines::lossy_lines};

/// Reflectance coefficients and texture map references of one material
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescription {
    /// `Ka`
    pub ambient: Vector3<f32>,
    /// `Kd`
    pub diffuse: Vector3<f32>,
    /// `Ks`
    pub specular: Vector3<f32>,
    /// `Ns`, always > 0
    pub shininess: f32,
    /// `map_Kd`
    pub diffuse_map: Option<String>,
    /// `map_Bump` / `bump`
    pub bump_map: Option<String>,
    /// `map_Ks`
    pub specular_map: Option<String>,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            ambient: Vector3::new(1.0, 1.0, 1.0),
            diffuse: Vector3::new(1.0, 1.0, 1.0),
            specular: Vector3::new(1.0, 1.0, 1.0),
            shininess: 32.0,
            diffuse_map: None,
            bump_map: None,
            specular_map: None,
        }
    }
}

/// Reads a material description from disk.
///
/// I/O failures are returned; use [`resolve_material`] for the recoverable
/// variant that falls back to the default material.
pub fn load_material(path: &Path) -> Result<MaterialDescription, ImportError> {
    let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
    parse_material(BufReader::new(file)).map_err(|e| match e {
        ImportError::Io { source, .. } => ImportError::io(path, source),
        other => other,
    })
}

/// Reads a material description, falling back to the default material when
/// the file cannot be read. The scene can still render untextured.
pub fn resolve_material(path: &Path) -> MaterialDescription {
    match load_material(path) {
        Ok(material) => material,
        Err(err) => {
            log::warn!("{err}; using default material");
            MaterialDescription::default()
        }
    }
}

/// Parses a material description from any buffered reader
pub fn parse_material<R: BufRead>(reader: R) -> Result<MaterialDescription, ImportError> {
    let mut material = MaterialDescription::default();

    for line in lossy_lines(reader) {
        let (line_number, line) = line.map_err(|e| ImportError::io("<material>", e))?;
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };

        match directive {
            "Ka" | "Kd" | "Ks" => match parse_color(tokens) {
                Some(color) => match directive {
                    "Ka" => material.ambient = color,
                    "Kd" => material.diffuse = color,
                    _ => material.specular = color,
                },
                None => log::warn!(
                    "line {line_number}: `{directive}` needs three numbers, ignoring"
                ),
            },
            "Ns" => match tokens.next().and_then(|t| t.parse::<f32>().ok()) {
                Some(ns) if ns > 0.0 => material.shininess = ns,
                _ => log::warn!("line {line_number}: `Ns` must be a positive number, ignoring"),
            },
            "map_Kd" => material.diffuse_map = map_reference(tokens),
            "map_Bump" | "bump" => material.bump_map = map_reference(tokens),
            "map_Ks" => material.specular_map = map_reference(tokens),
            _ => {}
        }
    }

    Ok(material)
}

fn parse_color<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vector3<f32>> {
    let mut next = || tokens.next().and_then(|t| t.parse::<f32>().ok());
    Some(Vector3::new(next()?, next()?, next()?))
}

// Option flags such as `-bm 1.0` precede the file name, so the last token is the file.
fn map_reference<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<String> {
    tokens.last().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> MaterialDescription {
        parse_material(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_empty_description_is_default() {
        let material = parse("");
        assert_eq!(material.ambient, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(material.diffuse, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(material.specular, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(material.shininess, 32.0);
        assert!(material.diffuse_map.is_none());
        assert!(material.bump_map.is_none());
        assert!(material.specular_map.is_none());
    }

    #[test]
    fn test_directives_override_defaults() {
        let material = parse(
            "# exported\n\
             newmtl Suzanne\n\
             Ka 0.1 0.2 0.3\n\
             Kd 0.4 0.5 0.6\n\
             Ks 0.7 0.8 0.9\n\
             Ns 96.0\n\
             map_Kd suzanne.png\n\
             bump suzanne_n.png\n\
             map_Ks suzanne_s.png\n",
        );
        assert_eq!(material.ambient, Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(material.diffuse, Vector3::new(0.4, 0.5, 0.6));
        assert_eq!(material.specular, Vector3::new(0.7, 0.8, 0.9));
        assert_eq!(material.shininess, 96.0);
        assert_eq!(material.diffuse_map.as_deref(), Some("suzanne.png"));
        assert_eq!(material.bump_map.as_deref(), Some("suzanne_n.png"));
        assert_eq!(material.specular_map.as_deref(), Some("suzanne_s.png"));
    }

    #[test]
    fn test_last_directive_wins() {
        let material = parse("Kd 1 0 0\nKd 0 0 1\nmap_Bump a.png\nmap_Bump b.png\n");
        assert_eq!(material.diffuse, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(material.bump_map.as_deref(), Some("b.png"));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let material = parse("Kd 0.5 0.5\nNs -4\nNs abc\nKa 0.2 0.2 0.2\n");
        assert_eq!(material.diffuse, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(material.shininess, 32.0);
        assert_eq!(material.ambient, Vector3::new(0.2, 0.2, 0.2));
    }

    #[test]
    fn test_empty_map_reference_means_no_texture() {
        let material = parse("map_Kd\nillum 2\nd 1.0\n");
        assert!(material.diffuse_map.is_none());
    }

    #[test]
    fn test_map_options_are_skipped() {
        let material = parse("map_Bump -bm 0.5 normal.png\n");
        assert_eq!(material.bump_map.as_deref(), Some("normal.png"));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = Path::new("/definitely/not/here.mtl");
        assert!(matches!(load_material(path), Err(ImportError::Io { .. })));
        assert_eq!(resolve_material(path), MaterialDescription::default());
    }

    #[test]
    fn test_non_utf8_names_and_comments_are_skipped() {
        let material = parse_material(
            &b"# Cr\xe9\xe9 par exporter\nnewmtl Mat\xe9riau\nKd 0.2 0.4 0.6\nNs 10\n"[..],
        )
        .unwrap();
        assert_eq!(material.diffuse, Vector3::new(0.2, 0.4, 0.6));
        assert_eq!(material.shininess, 10.0);
    }
}
