//! Core geometry types: hitboxes and models
//!
//! Models are immutable once created. Drawing never mutates them; every frame
//! submits a freshly transformed copy to the renderer.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use crate::error::AssetError;
use crate::rasterizer::{Vec3, Vertex};

/// Axis-aligned bounding box in model-local space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hitbox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Hitbox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every vertex (None for no vertices)
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        let first = vertices.first()?.pos.xyz();
        let mut hitbox = Hitbox::new(first, first);
        for v in &vertices[1..] {
            hitbox.expand(v.pos.xyz());
        }
        Some(hitbox)
    }

    /// Check if a point is inside the box
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Expand bounds to include a point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn translated(&self, offset: Vec3) -> Hitbox {
        Hitbox::new(self.min + offset, self.max + offset)
    }

    /// Slab test: ranges overlap (touching counts) on all three axes
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
            && self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

/// Do two hitboxes collide once placed at their positions
pub fn collision(a: &Hitbox, pos_a: Vec3, b: &Hitbox, pos_b: Vec3) -> bool {
    a.translated(pos_a).overlaps(&b.translated(pos_b))
}

/// Immutable triangle soup plus its cached hitbox
#[derive(Debug, Clone)]
pub struct Model {
    vertices: Vec<Vertex>,
    hitbox: Option<Hitbox>,
}

impl Model {
    /// Copy a vertex list (three per triangle) into a model
    pub fn new(vertices: &[Vertex]) -> Result<Self, AssetError> {
        if vertices.len() % 3 != 0 {
            return Err(AssetError::InvalidModel(format!(
                "{} vertices is not a whole number of triangles",
                vertices.len()
            )));
        }
        Ok(Self {
            vertices: vertices.to_vec(),
            hitbox: Hitbox::from_vertices(vertices),
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Vertex extents; empty models have none
    pub fn hitbox(&self) -> Option<Hitbox> {
        self.hitbox
    }
}

/// Named registry of loaded models
#[derive(Default)]
pub struct ModelStore {
    models: HashMap<String, Rc<Model>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, model: Model) -> Rc<Model> {
        let model = Rc::new(model);
        self.models.insert(name.to_string(), Rc::clone(&model));
        model
    }

    /// Load an OBJ file and register it under `name`
    pub fn load_obj<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<Rc<Model>, AssetError> {
        let model = super::obj::load_model(path.as_ref())?;
        log::info!(
            "Loaded model {} ({} triangles) from {}",
            name,
            model.triangle_count(),
            path.as_ref().display()
        );
        Ok(self.insert(name, model))
    }

    pub fn get(&self, name: &str) -> Option<Rc<Model>> {
        self.models.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}
