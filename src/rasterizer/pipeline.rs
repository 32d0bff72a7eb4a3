//! Frame pipeline
//!
//! `begin_frame` rewinds the front list, gameplay appends geometry with
//! `draw_model`/`add_object`, and `end_frame` runs
//! cull -> clip transform -> depth sort -> screen mapping -> host draw.

use super::cull::frustum_cull;
use super::math::{Mat4, Vec3, Vec4};
use super::render::HostRasterizer;
use super::sort::DepthSorter;
use super::triangle_list::TriangleList;
use super::types::{Color, Texture, Vertex};
use crate::world::Model;

/// Yaw/pitch camera in a Z-up world
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub eyes: Vec3,
    /// Rotation about the vertical axis, 0 looks down +X
    pub yaw: f32,
    /// Elevation, negative looks down
    pub pitch: f32,
}

impl Camera {
    pub fn new(eyes: Vec3, yaw: f32, pitch: f32) -> Self {
        Self { eyes, yaw, pitch }
    }

    /// Unit look direction
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
        )
    }

    /// Turn to face `target` from the current position
    pub fn aim_at(&mut self, target: Vec3) {
        let d = self.eyes - target;
        self.yaw = d.y.atan2(d.x) + std::f32::consts::PI;
        self.pitch = -d.z.atan2((d.x * d.x + d.y * d.y).sqrt());
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.eyes, self.eyes + self.forward(), Vec3::UP)
    }
}

/// Perspective parameters
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self { fov_y_degrees: 45.0, near: 0.1, far: 100.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePhase {
    Idle,
    Recording,
}

/// What `end_frame` produced: the drawn surface and its logical size
pub struct FrameOutput<'a, S> {
    pub surface: &'a mut S,
    pub width: f32,
    pub height: f32,
}

/// Owns the triangle lists, camera and projection for one render target
pub struct RenderContext {
    front: TriangleList,
    back: TriangleList,
    sorter: DepthSorter,
    pub camera: Camera,
    projection: Mat4,
    logical_width: f32,
    logical_height: f32,
    atlas: Texture,
    triangle_count: usize,
    phase: FramePhase,
}

impl RenderContext {
    pub fn new(logical_width: f32, logical_height: f32, projection: Projection, atlas: Texture) -> Self {
        Self {
            front: TriangleList::new(),
            back: TriangleList::new(),
            sorter: DepthSorter::new(),
            camera: Camera::default(),
            projection: Mat4::perspective(
                projection.fov_y_degrees.to_radians(),
                logical_width / logical_height,
                projection.near,
                projection.far,
            ),
            logical_width,
            logical_height,
            atlas,
            triangle_count: 0,
            phase: FramePhase::Idle,
        }
    }

    /// Triangles handed to the rasterizer by the last `end_frame`
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.camera.view_matrix()
    }

    pub fn begin_frame(&mut self) {
        self.front.reset();
        self.phase = FramePhase::Recording;
    }

    /// Submit raw vertices transformed by `transform`
    pub fn add_object(&mut self, vertices: &[Vertex], transform: &Mat4) {
        debug_assert_eq!(self.phase, FramePhase::Recording, "geometry submitted outside a frame");
        self.front.add_object(vertices, transform);
    }

    pub fn draw_model(&mut self, model: &Model, transform: &Mat4) {
        self.add_object(model.vertices(), transform);
    }

    /// Cull, sort, project and draw everything submitted since `begin_frame`
    pub fn end_frame<'r, R: HostRasterizer>(
        &mut self,
        raster: &'r mut R,
        reset_target: bool,
    ) -> FrameOutput<'r, R::Surface> {
        let view_proj = self.view_projection();

        frustum_cull(&self.front, &mut self.back, &view_proj);
        self.back.transform_in_place(&view_proj);
        self.sorter.sort_into(&self.back, &mut self.front);
        self.triangle_count = self.front.triangle_count();

        self.front
            .build_screen_vertices(self.logical_width, self.logical_height, Color::WHITE);

        raster.bind_offscreen(
            self.logical_width as usize,
            self.logical_height as usize,
            Color::WHITE,
        );
        raster.draw_geometry(self.front.screen_vertices(), &self.atlas);
        if reset_target {
            raster.restore_default_target();
        }
        self.phase = FramePhase::Idle;

        FrameOutput {
            surface: raster.surface_mut(),
            width: self.logical_width,
            height: self.logical_height,
        }
    }

    /// Project a world point to pixel coordinates (None if behind the camera)
    pub fn project_point(&self, point: Vec3) -> Option<(f32, f32)> {
        let clip = self.view_projection().mul_vec4(Vec4::from_vec3(point, 1.0));
        if clip.w <= 0.0 {
            return None;
        }
        let half_w = self.logical_width / 2.0;
        let half_h = self.logical_height / 2.0;
        Some((half_w + clip.x / clip.w * half_w, half_h - clip.y / clip.w * half_h))
    }

    /// Release both triangle lists
    pub fn shutdown(&mut self) {
        self.front.empty();
        self.back.empty();
        self.phase = FramePhase::Idle;
    }
}
