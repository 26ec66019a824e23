use std::sync::Arc;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::resources::texture::TextureRef;

// ============================================================================
// 1. Uniform values
// ============================================================================

/// A single uniform value.
///
/// Values are owned, so cloning a [`UniformSet`] yields an independent copy.
/// Textures are shared by reference: the copy points at the same texture but
/// can be re-pointed without affecting the original.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    /// Linear RGB color.
    Color(Vec3),
    Mat3(Mat3),
    Mat4(Mat4),
    Texture(Option<TextureRef>),
    Array(Vec<UniformValue>),
}

impl UniformValue {
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_color(&self) -> Option<Vec3> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub value: UniformValue,
}

impl Uniform {
    #[inline]
    #[must_use]
    pub fn new(value: UniformValue) -> Self {
        Self { value }
    }
}

// ============================================================================
// 2. Uniform sets
// ============================================================================

/// Named uniforms of one program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformSet {
    uniforms: FxHashMap<String, Uniform>,
}

impl UniformSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from `(name, value)` pairs.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, UniformValue)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, value) in values {
            set.set(name, value);
        }
        set
    }

    /// Combines several sets into one; later sets override earlier ones.
    #[must_use]
    pub fn merged(sets: &[&UniformSet]) -> Self {
        let mut merged = Self::new();
        for set in sets {
            for (name, uniform) in &set.uniforms {
                merged.uniforms.insert(name.clone(), uniform.clone());
            }
        }
        merged
    }

    pub fn set(&mut self, name: impl Into<String>, value: UniformValue) {
        self.uniforms.insert(name.into(), Uniform::new(value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Uniform> {
        self.uniforms.get_mut(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.uniforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Uniform)> {
        self.uniforms.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn into_shared(self) -> SharedUniforms {
        Arc::new(RwLock::new(self))
    }
}

/// Uniform set shared between a material and the renderer.
pub type SharedUniforms = Arc<RwLock<UniformSet>>;
