//! Frustum culling
//!
//! Whole-triangle rejection only. A triangle is kept, unmodified, when any of
//! its vertices lies inside all six planes; nothing is clipped, so a kept
//! triangle may still reach behind the camera.

use super::math::{Mat4, Vec4};
use super::triangle_list::TriangleList;

/// Extract the six normalized frustum planes (left, right, bottom, top, near,
/// far) of a view-projection matrix. Plane normals point into the frustum.
pub fn frustum_planes(view_proj: &Mat4) -> [Vec4; 6] {
    let r0 = view_proj.row(0);
    let r1 = view_proj.row(1);
    let r2 = view_proj.row(2);
    let r3 = view_proj.row(3);

    [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2].map(normalize_plane)
}

fn normalize_plane(p: Vec4) -> Vec4 {
    let len = p.xyz().len();
    if len == 0.0 {
        return p;
    }
    p / len
}

/// True if the homogeneous point is on the inner side of every plane
pub fn in_frustum(planes: &[Vec4; 6], point: Vec4) -> bool {
    planes.iter().all(|plane| plane.dot(point) >= 0.0)
}

/// Copy every triangle of `front` with at least one vertex inside the frustum
/// into `back`, preserving order
pub fn frustum_cull(front: &TriangleList, back: &mut TriangleList, view_proj: &Mat4) {
    back.reset();
    back.guarantee_additional(front.len());

    let planes = frustum_planes(view_proj);
    for triangle in front.vertices().chunks_exact(3) {
        if triangle.iter().any(|v| in_frustum(&planes, v.pos)) {
            back.push_triangle(triangle);
        }
    }
}
