//! Mesh description (OBJ) import
//!
//! Single-pass streaming parser: positions, texture coordinates and normals
//! are collected as they are declared, and every face reference is resolved
//! immediately against what has been declared so far. Forward references
//! are therefore rejected.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    num::IntErrorKind,
    path::{Path, PathBuf},
};

use crate::gfx::scene::vertex::Vertex3D;

use super::{
    error::{ElementKind, ImportError},
    lines::lossy_lines,
    mtl::{resolve_material, MaterialDescription},
    texture::{ImageDecoder, TextureCache, TextureHandle},
};

/// Texture handles realised for the three material maps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialTextures {
    pub diffuse: TextureHandle,
    pub bump: TextureHandle,
    pub specular: TextureHandle,
}

/// A mesh ready for upload: flat vertex list plus its material
#[derive(Debug, Clone)]
pub struct ImportedMesh {
    pub name: String,
    pub vertices: Vec<Vertex3D>,
    pub material: MaterialDescription,
    pub textures: MaterialTextures,
}

impl ImportedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Loads mesh + material pairs and realises their texture maps
pub struct MeshImporter<'a, D: ImageDecoder> {
    textures: &'a mut TextureCache<D>,
}

impl<'a, D: ImageDecoder> MeshImporter<'a, D> {
    pub fn new(textures: &'a mut TextureCache<D>) -> Self {
        Self { textures }
    }

    /// Imports `mesh_path` using the material at `material_path`.
    ///
    /// A missing material or texture is reported and replaced by defaults;
    /// an unreadable or malformed mesh fails the whole import.
    pub fn import(
        &mut self,
        mesh_path: &Path,
        material_path: &Path,
    ) -> Result<ImportedMesh, ImportError> {
        let material = resolve_material(material_path);

        let file = File::open(mesh_path).map_err(|e| ImportError::io(mesh_path, e))?;
        let vertices = parse_mesh(BufReader::new(file)).map_err(|e| match e {
            ImportError::Io { source, .. } => ImportError::io(mesh_path, source),
            other => other,
        })?;

        let texture_dir = material_path.parent().unwrap_or_else(|| Path::new(""));
        let textures = MaterialTextures {
            diffuse: self.request_map(texture_dir, material.diffuse_map.as_deref()),
            bump: self.request_map(texture_dir, material.bump_map.as_deref()),
            specular: self.request_map(texture_dir, material.specular_map.as_deref()),
        };

        if textures.diffuse.is_none() {
            log::warn!("No diffuse texture for {}", mesh_path.display());
        }

        let name = mesh_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh")
            .to_string();

        log::info!(
            "Imported {} ({} triangles)",
            mesh_path.display(),
            vertices.len() / 3
        );

        Ok(ImportedMesh {
            name,
            vertices,
            material,
            textures,
        })
    }

    fn request_map(&mut self, dir: &Path, reference: Option<&str>) -> TextureHandle {
        match reference {
            Some(file) if !file.is_empty() => {
                let path: PathBuf = dir.join(file);
                self.textures.request_or_none(&path)
            }
            _ => TextureHandle::NONE,
        }
    }
}

/// Parses a mesh description into a flat vertex list in face order.
///
/// Each triangle face yields exactly three vertices. Polygons with more than
/// three references are split into a triangle fan.
pub fn parse_mesh<R: BufRead>(reader: R) -> Result<Vec<Vertex3D>, ImportError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut vertices = Vec::new();

    for line in lossy_lines(reader) {
        let (line_number, line) = line.map_err(|e| ImportError::io("<mesh>", e))?;
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };

        match directive {
            "v" => positions.push(parse_floats::<3>(tokens, line_number, "v")?),
            "vt" => tex_coords.push(parse_floats::<2>(tokens, line_number, "vt")?),
            "vn" => normals.push(parse_floats::<3>(tokens, line_number, "vn")?),
            "f" => {
                let corners = tokens
                    .map(|token| {
                        let reference = FaceReference::parse(token, line_number)?;
                        reference.resolve(&positions, &tex_coords, &normals, line_number)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                if corners.len() < 3 {
                    return Err(ImportError::malformed(
                        line_number,
                        "f",
                        format!("face needs at least 3 references, found {}", corners.len()),
                    ));
                }

                for i in 1..corners.len() - 1 {
                    vertices.extend([corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(vertices)
}

fn parse_floats<'a, const N: usize>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
    directive: &'static str,
) -> Result<[f32; N], ImportError> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        let token = tokens.next().ok_or_else(|| {
            ImportError::malformed(line, directive, format!("expected {N} components"))
        })?;
        *value = token.parse().map_err(|_| {
            ImportError::malformed(line, directive, format!("`{token}` is not a number"))
        })?;
    }
    Ok(values)
}

/// One `position/texcoord/normal` triple, 0-based after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceReference {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

impl FaceReference {
    fn parse(token: &str, line: usize) -> Result<Self, ImportError> {
        let mut parts = token.split('/');
        let position = parse_index(parts.next(), line)?.ok_or_else(|| {
            ImportError::malformed(line, "f", format!("`{token}` has no position index"))
        })?;
        let tex_coord = parse_index(parts.next(), line)?;
        let normal = parse_index(parts.next(), line)?;

        if parts.next().is_some() {
            return Err(ImportError::malformed(
                line,
                "f",
                format!("`{token}` has more than three components"),
            ));
        }

        Ok(Self {
            position,
            tex_coord,
            normal,
        })
    }

    fn resolve(
        &self,
        positions: &[[f32; 3]],
        tex_coords: &[[f32; 2]],
        normals: &[[f32; 3]],
        line: usize,
    ) -> Result<Vertex3D, ImportError> {
        let position = lookup(positions, self.position, ElementKind::Position, line)?;
        let tex_coords = match self.tex_coord {
            Some(index) => lookup(tex_coords, index, ElementKind::TexCoord, line)?,
            None => [0.0; 2],
        };
        let normal = match self.normal {
            Some(index) => lookup(normals, index, ElementKind::Normal, line)?,
            None => [0.0; 3],
        };

        Ok(Vertex3D {
            position,
            normal,
            tex_coords,
        })
    }
}

// Empty component means "no data"; anything else must be a positive 1-based index.
fn parse_index(component: Option<&str>, line: usize) -> Result<Option<usize>, ImportError> {
    match component {
        None | Some("") => Ok(None),
        Some(text) => match text.parse::<usize>() {
            Ok(index) if index > 0 => Ok(Some(index - 1)),
            // all digits but past usize, so beyond anything declared
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(Some(usize::MAX - 1)),
            _ => Err(ImportError::malformed(
                line,
                "f",
                format!("`{text}` is not a positive 1-based index"),
            )),
        },
    }
}

fn lookup<T: Copy>(
    elements: &[T],
    index: usize,
    kind: ElementKind,
    line: usize,
) -> Result<T, ImportError> {
    elements
        .get(index)
        .copied()
        .ok_or(ImportError::DanglingReference {
            line,
            kind,
            index: index + 1,
            available: elements.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::texture::tests::FakeDecoder;
    use std::fs;

    const QUAD: &str = "\
# two triangles
o Quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
s off
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    fn parse(text: &str) -> Result<Vec<Vertex3D>, ImportError> {
        parse_mesh(text.as_bytes())
    }

    #[test]
    fn test_three_vertices_per_face_in_face_order() {
        let vertices = parse(QUAD).unwrap();
        assert_eq!(vertices.len(), 6);

        let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ]
        );
        assert_eq!(vertices[2].tex_coords, [1.0, 1.0]);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_missing_components_use_defaults() {
        let vertices = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5 0.5\nvn 0 1 0\n\
             f 1 2/1 3//1\n",
        )
        .unwrap();

        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 0.0]);
        assert_eq!(vertices[1].tex_coords, [0.5, 0.5]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 0.0]);
        assert_eq!(vertices[2].tex_coords, [0.0, 0.0]);
        assert_eq!(vertices[2].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_forward_reference_is_dangling() {
        let err = parse("v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n").unwrap_err();
        match err {
            ImportError::DanglingReference {
                line,
                kind,
                index,
                available,
            } => {
                assert_eq!(line, 3);
                assert_eq!(kind, ElementKind::Position);
                assert_eq!(index, 3);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dangling_normal_is_reported() {
        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1\n").unwrap_err();
        assert!(matches!(
            err,
            ImportError::DanglingReference {
                kind: ElementKind::Normal,
                available: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_and_garbage_indices_are_malformed() {
        let base = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        for face in ["f 0 1 2", "f 1 2 x", "f -1 2 3", "f /1 2 3", "f 1/1/1/1 2 3"] {
            let err = parse(&format!("{base}{face}\n")).unwrap_err();
            assert!(
                matches!(err, ImportError::Malformed { line: 4, .. }),
                "{face}: {err}"
            );
        }
    }

    #[test]
    fn test_overflowing_index_is_dangling() {
        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 99999999999999999999999\n").unwrap_err();
        assert!(
            matches!(
                err,
                ImportError::DanglingReference {
                    line: 4,
                    kind: ElementKind::Position,
                    available: 3,
                    ..
                }
            ),
            "{err}"
        );

        let err = parse("v 0 0 0\nvn 0 0 1\nf 1//1 1//1 1//18446744073709551616\n").unwrap_err();
        assert!(matches!(
            err,
            ImportError::DanglingReference {
                kind: ElementKind::Normal,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_non_utf8_comments_and_names_are_skipped() {
        let vertices =
            parse_mesh(&b"# mod\xe8le\no M\xe9daille\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n"[..])
                .unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_short_face_is_malformed() {
        let err = parse("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, ImportError::Malformed { directive: "f", .. }));
    }

    #[test]
    fn test_polygon_is_fan_triangulated() {
        let vertices = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[3].position, [0.0, 0.0, 0.0]);
        assert_eq!(vertices[4].position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[5].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_bad_position_line_is_malformed() {
        let err = parse("v 0 zero 0\n").unwrap_err();
        assert!(matches!(
            err,
            ImportError::Malformed {
                line: 1,
                directive: "v",
                ..
            }
        ));
        assert!(parse("vt 0.5\n").is_err());
    }

    #[test]
    fn test_extra_components_are_ignored() {
        let vertices = parse("v 0 0 0 1\nv 1 0 0 1\nv 0 1 0 1\nvt 0.25 0.75 0\nf 1/1 2/1 3/1\n")
            .unwrap();
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].tex_coords, [0.25, 0.75]);
    }

    #[test]
    fn test_import_resolves_textures_next_to_material() {
        let dir = std::env::temp_dir().join(format!("waypath-obj-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mesh_path = dir.join("quad.obj");
        let material_path = dir.join("quad.mtl");
        fs::write(&mesh_path, QUAD).unwrap();
        fs::write(
            &material_path,
            "Kd 0.5 0.5 0.5\nmap_Kd quad.png\nmap_Ks quad_spec.tga\n",
        )
        .unwrap();

        let mut cache = TextureCache::with_decoder(FakeDecoder::default());
        let mesh = MeshImporter::new(&mut cache)
            .import(&mesh_path, &material_path)
            .unwrap();

        assert_eq!(mesh.name, "quad");
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.textures.diffuse, TextureHandle(1));
        assert_eq!(mesh.textures.bump, TextureHandle::NONE);
        // decode failure does not abort the import
        assert_eq!(mesh.textures.specular, TextureHandle::NONE);
        assert_eq!(cache.len(), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_import_missing_mesh_is_io_error() {
        let mut cache = TextureCache::with_decoder(FakeDecoder::default());
        let err = MeshImporter::new(&mut cache)
            .import(Path::new("/nope/mesh.obj"), Path::new("/nope/mesh.mtl"))
            .unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }
}
