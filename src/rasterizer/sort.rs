//! Painter's algorithm ordering
//!
//! Triangles are drawn farthest first by the mean clip-space z of their
//! vertices (before the perspective divide). Equal depths have no defined
//! order. Interpenetrating triangles can composite wrongly; there is no
//! per-pixel depth.

use super::triangle_list::TriangleList;
use super::types::Vertex;

#[derive(Debug, Clone, Copy)]
struct TriangleDepth {
    index: usize,
    average_depth: f32,
}

/// Mean z of a triangle's three vertices
pub fn average_depth(triangle: &[Vertex]) -> f32 {
    (triangle[0].pos.z + triangle[1].pos.z + triangle[2].pos.z) / 3.0
}

/// Reorders triangles back to front. Keeps its scratch buffer between frames.
#[derive(Debug, Default)]
pub struct DepthSorter {
    depths: Vec<TriangleDepth>,
}

impl DepthSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangle indices of `list`, farthest first
    pub fn order(&mut self, list: &TriangleList) -> impl Iterator<Item = usize> + '_ {
        self.depths.clear();
        self.depths.extend(
            list.vertices()
                .chunks_exact(3)
                .enumerate()
                .map(|(index, tri)| TriangleDepth { index, average_depth: average_depth(tri) }),
        );
        self.depths
            .sort_unstable_by(|a, b| b.average_depth.total_cmp(&a.average_depth));
        self.depths.iter().map(|d| d.index)
    }

    /// Rebuild `front` from `back` in back-to-front order
    pub fn sort_into(&mut self, back: &TriangleList, front: &mut TriangleList) {
        front.reset();
        front.guarantee_additional(back.len());
        let vertices = back.vertices();
        for tri in self.order(back) {
            front.push_triangle(&vertices[tri * 3..tri * 3 + 3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{Mat4, Vec4};

    fn tri_at(z: [f32; 3], tag: f32) -> [Vertex; 3] {
        z.map(|z| Vertex::new(Vec4::new(tag, 0.0, z, 1.0), Default::default()))
    }

    #[test]
    fn test_average_depth() {
        let tri = tri_at([1.0, 2.0, 6.0], 0.0);
        assert!((average_depth(&tri) - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_sorted_depths_non_increasing() {
        let mut back = TriangleList::new();
        let depths = [[0.1, 0.2, 0.3], [0.9, 0.9, 0.9], [-0.5, 0.0, 0.5], [0.4, 0.8, 0.0], [0.95, 0.1, 0.2]];
        for (i, z) in depths.iter().enumerate() {
            back.add_object(&tri_at(*z, i as f32), &Mat4::IDENTITY);
        }
        let mut front = TriangleList::new();
        DepthSorter::new().sort_into(&back, &mut front);

        assert_eq!(front.triangle_count(), back.triangle_count());
        let sorted: Vec<f32> = front.vertices().chunks_exact(3).map(average_depth).collect();
        assert!(sorted.windows(2).all(|w| w[0] >= w[1]));
        // Farthest triangle (index 1) comes first with its vertices intact
        assert_eq!(&front.vertices()[..3], &back.vertices()[3..6]);
    }

    #[test]
    fn test_empty_back_buffer_empties_front() {
        let back = TriangleList::new();
        let mut front = TriangleList::new();
        front.add_object(&tri_at([0.0; 3], 0.0), &Mat4::IDENTITY);
        DepthSorter::new().sort_into(&back, &mut front);
        assert!(front.is_empty());
    }
}
