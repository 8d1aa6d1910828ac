/// Wavefront OBJ parser producing one mesh per named object
use std::fs;
use std::path::Path;

use nom::{
    character::complete::{char, i32, multispace1},
    combinator::opt,
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};
use thiserror::Error;

use nalgebra::{Point3, Vector3};

use crate::geometry::{Mesh, Triangle, Vertex};

/// Errors produced while loading OBJ data
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read OBJ file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed OBJ data at line {line}: {text}")]
    Syntax { line: usize, text: String },
    #[error("face index {0} is out of range")]
    IndexOutOfRange(i32),
    #[error("no geometry found in OBJ data")]
    NoGeometry,
}

/// A mesh tagged with the object name it came from
#[derive(Debug, Clone)]
pub struct NamedMesh {
    pub name: String,
    pub mesh: Mesh,
}

/// One corner of a face: a position index and an optional normal index
struct FaceVertex {
    position: i32,
    normal: Option<i32>,
}

/// Read and parse an OBJ file from disk
pub fn load_obj(path: impl AsRef<Path>) -> Result<Vec<NamedMesh>, ObjError> {
    let text = fs::read_to_string(path)?;
    parse_obj(&text)
}

/// Parse OBJ text.
///
/// Supports `v`, `vn`, `f` (in the `i`, `i/t`, `i//n` and `i/t/n` index
/// forms, with 1-based or negative indices and fan triangulation for
/// larger faces) and `o`/`g` object naming. Texture coordinates,
/// materials and smoothing groups are skipped. Faces without normal
/// indices get the computed face normal.
pub fn parse_obj(input: &str) -> Result<Vec<NamedMesh>, ObjError> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut objects: Vec<NamedMesh> = Vec::new();
    let mut current = NamedMesh {
        name: "default".to_string(),
        mesh: Mesh::new(),
    };

    for (number, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let keyword = line.split_whitespace().next().unwrap_or("");

        match keyword {
            "v" => {
                let position = run_parser(parse_position, line, number)?;
                positions.push(position);
            }
            "vn" => {
                let normal = run_parser(parse_normal, line, number)?;
                normals.push(normal);
            }
            "f" => {
                let face = run_parser(parse_face, line, number)?;
                if face.len() < 3 {
                    return Err(ObjError::Syntax {
                        line: number + 1,
                        text: raw.to_string(),
                    });
                }
                add_face(&mut current.mesh, &positions, &normals, &face)?;
            }
            "o" | "g" => {
                if !current.mesh.triangles.is_empty() {
                    objects.push(current);
                }
                current = NamedMesh {
                    name: line[1..].trim().to_string(),
                    mesh: Mesh::new(),
                };
            }
            // Texture coordinates, materials and smoothing groups
            "vt" | "s" | "usemtl" | "mtllib" => {}
            _ => {
                return Err(ObjError::Syntax {
                    line: number + 1,
                    text: raw.to_string(),
                });
            }
        }
    }

    if !current.mesh.triangles.is_empty() {
        objects.push(current);
    }
    if objects.is_empty() {
        return Err(ObjError::NoGeometry);
    }
    Ok(objects)
}

fn run_parser<'a, T>(
    parser: impl Fn(&'a str) -> IResult<&'a str, T>,
    line: &'a str,
    number: usize,
) -> Result<T, ObjError> {
    match parser(line) {
        Ok((_, value)) => Ok(value),
        Err(_) => Err(ObjError::Syntax {
            line: number + 1,
            text: line.to_string(),
        }),
    }
}

fn parse_position(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = char('v')(input)?;
    let (input, (x, y, z)) = parse_triplet(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_normal(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, _) = char('v')(input)?;
    let (input, _) = char('n')(input)?;
    let (input, (x, y, z)) = parse_triplet(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn parse_triplet(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, (x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, Vec<FaceVertex>> {
    let (input, _) = char('f')(input)?;
    many1(preceded(multispace1, parse_face_vertex))(input)
}

fn parse_face_vertex(input: &str) -> IResult<&str, FaceVertex> {
    let (input, position) = i32(input)?;
    let (input, slashes) = opt(preceded(
        char('/'),
        pair(opt(i32), opt(preceded(char('/'), i32))),
    ))(input)?;
    let normal = slashes.and_then(|(_texture, normal)| normal);
    Ok((input, FaceVertex { position, normal }))
}

/// Map a 1-based (or negative, relative) OBJ index onto a slice
fn resolve(index: i32, len: usize) -> Result<usize, ObjError> {
    let resolved = if index > 0 {
        index as i64 - 1
    } else {
        len as i64 + index as i64
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(ObjError::IndexOutOfRange(index));
    }
    Ok(resolved as usize)
}

fn add_face(
    mesh: &mut Mesh,
    positions: &[Point3<f32>],
    normals: &[Vector3<f32>],
    face: &[FaceVertex],
) -> Result<(), ObjError> {
    // Fan triangulation around the first corner
    for i in 1..face.len() - 1 {
        let corners = [&face[0], &face[i], &face[i + 1]];
        let mut points = [Point3::origin(); 3];
        let mut corner_normals = [None; 3];
        for (slot, corner) in corners.iter().enumerate() {
            points[slot] = positions[resolve(corner.position, positions.len())?];
            if let Some(index) = corner.normal {
                corner_normals[slot] = Some(normals[resolve(index, normals.len())?]);
            }
        }

        let edge1 = points[1] - points[0];
        let edge2 = points[2] - points[0];
        let fallback = edge1.cross(&edge2).normalize();

        mesh.add_triangle(Triangle::new(
            Vertex::from_parts(points[0], corner_normals[0].unwrap_or(fallback)),
            Vertex::from_parts(points[1], corner_normals[1].unwrap_or(fallback)),
            Vertex::from_parts(points[2], corner_normals[2].unwrap_or(fallback)),
        ));
    }
    Ok(())
}
