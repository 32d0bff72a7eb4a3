//! Growable triangle buffer
//!
//! Holds transformed vertices (three per triangle) and a parallel buffer of
//! display vertices filled at the end of the frame. Storage grows to
//! `capacity + 2n` on demand and is kept across frames; `reset` only rewinds
//! the count.

use super::math::{Mat4, Vec2};
use super::types::{Color, ScreenVertex, Vertex};
use crate::error::fatal;

#[derive(Debug, Default)]
pub struct TriangleList {
    vertices: Vec<Vertex>,
    screen: Vec<ScreenVertex>,
    capacity: usize,
    reallocations: usize,
}

impl TriangleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active vertex count (always a multiple of 3)
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the backing storage has grown
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Display vertices built by the last `build_screen_vertices`
    pub fn screen_vertices(&self) -> &[ScreenVertex] {
        &self.screen
    }

    /// Forget all vertices, keep the storage
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.screen.clear();
    }

    /// Release the storage entirely
    pub fn empty(&mut self) {
        self.vertices = Vec::new();
        self.screen = Vec::new();
        self.capacity = 0;
    }

    /// Make room for `n` more vertices. `n` must be whole triangles.
    pub fn guarantee_additional(&mut self, n: usize) {
        assert!(n % 3 == 0, "triangle list growth of {} vertices is not whole triangles", n);
        if self.capacity - self.vertices.len() < n {
            let new_capacity = self.capacity + n * 2;
            reserve_to(&mut self.vertices, new_capacity);
            reserve_to(&mut self.screen, new_capacity);
            self.capacity = new_capacity;
            self.reallocations += 1;
        }
    }

    /// Append a model's vertices, each position multiplied by `transform`
    pub fn add_object(&mut self, vertices: &[Vertex], transform: &Mat4) {
        self.guarantee_additional(vertices.len());
        self.vertices.extend(vertices.iter().map(|v| Vertex {
            pos: transform.mul_vec4(v.pos),
            uv: v.uv,
        }));
    }

    /// Append one triangle unmodified. Space must already be guaranteed.
    pub fn push_triangle(&mut self, triangle: &[Vertex]) {
        debug_assert_eq!(triangle.len(), 3);
        debug_assert!(self.vertices.len() + 3 <= self.capacity);
        self.vertices.extend_from_slice(triangle);
    }

    /// Multiply every position by `matrix` in place
    pub fn transform_in_place(&mut self, matrix: &Mat4) {
        for v in &mut self.vertices {
            v.pos = matrix.mul_vec4(v.pos);
        }
    }

    /// Perspective-divide every clip-space vertex and map it to pixels of a
    /// `width` x `height` target, tinted with `tint`
    pub fn build_screen_vertices(&mut self, width: f32, height: f32, tint: Color) {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        self.screen.clear();
        self.screen.extend(self.vertices.iter().map(|v| {
            let ndc_x = v.pos.x / v.pos.w;
            let ndc_y = v.pos.y / v.pos.w;
            ScreenVertex {
                position: Vec2::new(half_w + ndc_x * half_w, half_h - ndc_y * half_h),
                uv: v.uv,
                color: tint,
            }
        }));
    }
}

fn reserve_to<T>(buf: &mut Vec<T>, capacity: usize) {
    let additional = capacity.saturating_sub(buf.len());
    if let Err(e) = buf.try_reserve_exact(additional) {
        fatal(&format!("Growing triangle list to {} vertices", capacity), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{Vec3, Vec4};

    fn triangle() -> [Vertex; 3] {
        [
            Vertex::from_pos(0.0, 0.0, 0.0),
            Vertex::from_pos(1.0, 0.0, 0.0),
            Vertex::from_pos(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_count_stays_whole_triangles_within_capacity() {
        let mut list = TriangleList::new();
        let tri = triangle();
        let quad: Vec<Vertex> = tri.iter().chain(tri.iter()).copied().collect();
        for i in 0..50 {
            let verts: &[Vertex] = if i % 3 == 0 { &quad } else { &tri };
            list.add_object(verts, &Mat4::IDENTITY);
            assert_eq!(list.len() % 3, 0);
            assert!(list.len() <= list.capacity());
        }
        assert_eq!(list.triangle_count(), 17 * 2 + 33);
    }

    #[test]
    fn test_guarantee_twice_grows_once() {
        let mut list = TriangleList::new();
        list.guarantee_additional(9);
        list.guarantee_additional(9);
        assert_eq!(list.reallocations(), 1);
        assert_eq!(list.capacity(), 18);
    }

    #[test]
    fn test_growth_policy_doubles_request() {
        let mut list = TriangleList::new();
        list.add_object(&triangle(), &Mat4::IDENTITY);
        assert_eq!(list.capacity(), 6);
        list.add_object(&triangle(), &Mat4::IDENTITY);
        assert_eq!(list.reallocations(), 1);
        list.add_object(&triangle(), &Mat4::IDENTITY);
        assert_eq!(list.capacity(), 12);
        assert_eq!(list.reallocations(), 2);
    }

    #[test]
    #[should_panic]
    fn test_partial_triangle_rejected() {
        TriangleList::new().guarantee_additional(4);
    }

    #[test]
    fn test_reset_keeps_storage_empty_releases_it() {
        let mut list = TriangleList::new();
        list.add_object(&triangle(), &Mat4::IDENTITY);
        list.reset();
        assert_eq!(list.len(), 0);
        assert_eq!(list.capacity(), 6);
        list.add_object(&triangle(), &Mat4::IDENTITY);
        assert_eq!(list.reallocations(), 1);
        list.empty();
        assert_eq!(list.capacity(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_object_applies_transform() {
        let mut list = TriangleList::new();
        list.add_object(&triangle(), &Mat4::translation(Vec3::new(0.0, 0.0, 5.0)));
        assert!(list.vertices().iter().all(|v| (v.pos.z - 5.0).abs() < 0.001));
        assert!((list.vertices()[1].pos.x - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_screen_mapping_flips_y() {
        let mut list = TriangleList::new();
        list.guarantee_additional(3);
        list.push_triangle(&[
            Vertex::new(Vec4::new(0.0, 0.0, 0.0, 1.0), Default::default()),
            Vertex::new(Vec4::new(2.0, 2.0, 0.0, 2.0), Default::default()),
            Vertex::new(Vec4::new(-1.0, -1.0, 0.0, 1.0), Default::default()),
        ]);
        list.build_screen_vertices(200.0, 100.0, Color::WHITE);
        let s = list.screen_vertices();
        assert_eq!(s.len(), 3);
        assert!((s[0].position.x - 100.0).abs() < 0.001 && (s[0].position.y - 50.0).abs() < 0.001);
        assert!((s[1].position.x - 200.0).abs() < 0.001 && s[1].position.y.abs() < 0.001);
        assert!(s[2].position.x.abs() < 0.001 && (s[2].position.y - 100.0).abs() < 0.001);
    }
}
