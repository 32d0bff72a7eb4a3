//! Wavefront OBJ loader
//!
//! Only positions, texture coordinates and faces matter. Polygons are fan
//! triangulated and flattened into a triangle soup; texture v is flipped so
//! the atlas is addressed top-down.

use std::path::Path;
use crate::error::AssetError;
use crate::rasterizer::{Vec2, Vec3, Vec4, Vertex};
use super::geometry::Model;

pub fn load_model(path: &Path) -> Result<Model, AssetError> {
    let content = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&content).map_err(|(line, message)| AssetError::Obj {
        path: path.to_path_buf(),
        line,
        message,
    })
}

/// Parse OBJ text. Errors carry the 1-based line number.
pub fn parse_obj(content: &str) -> Result<Model, (usize, String)> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                let c = parse_floats(&parts[1..], 3).map_err(|e| (line_no, e))?;
                positions.push(Vec3::new(c[0], c[1], c[2]));
            }
            "vt" => {
                let c = parse_floats(&parts[1..], 2).map_err(|e| (line_no, e))?;
                uvs.push(Vec2::new(c[0], 1.0 - c[1]));
            }
            "f" => {
                if parts.len() < 4 {
                    return Err((line_no, "face needs at least 3 vertices".to_string()));
                }
                let corners = parts[1..]
                    .iter()
                    .map(|p| resolve_corner(p, &positions, &uvs))
                    .collect::<Result<Vec<Vertex>, String>>()
                    .map_err(|e| (line_no, e))?;

                for k in 1..corners.len() - 1 {
                    vertices.extend_from_slice(&[corners[0], corners[k], corners[k + 1]]);
                }
            }
            // Normals, groups, materials, smoothing: irrelevant here
            _ => {}
        }
    }

    Model::new(&vertices).map_err(|e| (0, e.to_string()))
}

fn parse_floats(parts: &[&str], count: usize) -> Result<Vec<f32>, String> {
    if parts.len() < count {
        return Err(format!("expected {} numbers, found {}", count, parts.len()));
    }
    parts[..count]
        .iter()
        .map(|p| p.parse::<f32>().map_err(|e| format!("bad number {:?}: {}", p, e)))
        .collect()
}

/// Resolve a 1-based (or negative, relative) OBJ index
fn resolve_index(raw: &str, len: usize) -> Result<usize, String> {
    let idx: i64 = raw.parse().map_err(|_| format!("bad index {:?}", raw))?;
    let resolved = if idx < 0 { len as i64 + idx } else { idx - 1 };
    if resolved < 0 || resolved >= len as i64 {
        return Err(format!("index {} out of range (have {})", idx, len));
    }
    Ok(resolved as usize)
}

/// Face corner: `v`, `v/vt`, `v/vt/vn` or `v//vn`
fn resolve_corner(corner: &str, positions: &[Vec3], uvs: &[Vec2]) -> Result<Vertex, String> {
    let mut fields = corner.split('/');
    let v = fields.next().unwrap_or_default();
    let pos = positions[resolve_index(v, positions.len())?];

    let uv = match fields.next() {
        Some(vt) if !vt.is_empty() => uvs[resolve_index(vt, uvs.len())?],
        _ => Vec2::default(),
    };

    Ok(Vertex::new(Vec4::from_vec3(pos, 1.0), uv))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_fan_triangulated() {
        let model = parse_obj(QUAD).unwrap();
        assert_eq!(model.triangle_count(), 2);
        let v = model.vertices();
        assert_eq!(v[0].pos, Vec4::point(0.0, 0.0, 0.0));
        assert_eq!(v[4].pos, Vec4::point(1.0, 1.0, 0.0));
        assert_eq!(v[5].pos, Vec4::point(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_texture_v_flipped() {
        let model = parse_obj(QUAD).unwrap();
        assert_eq!(model.vertices()[0].uv, Vec2::new(0.0, 1.0));
        assert_eq!(model.vertices()[2].uv, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_negative_and_bare_indices() {
        let model = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2//1 -1\n").unwrap();
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.vertices()[2].pos, Vec4::point(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let err = parse_obj("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert_eq!(err.0, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_model(Path::new("definitely/not/here.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
