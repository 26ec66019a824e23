//! Scene-side inputs to program selection: fog, environment, the drawn
//! object and the active lights.

pub mod light;

pub use light::{Light, LightKind, LightsState};

use glam::Vec3;

use crate::resources::geometry::GeometryLayout;
use crate::resources::texture::TextureRef;

#[derive(Debug, Clone, PartialEq)]
pub enum Fog {
    Linear { color: Vec3, near: f32, far: f32 },
    Exp2 { color: Vec3, density: f32 },
}

impl Fog {
    #[inline]
    #[must_use]
    pub fn is_exp2(&self) -> bool {
        matches!(self, Self::Exp2 { .. })
    }
}

/// Scene state relevant to the materials drawn in it.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub fog: Option<Fog>,
    /// Scene-wide environment, used by physically based materials without
    /// their own environment map.
    pub environment: Option<TextureRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectKind {
    #[default]
    Mesh,
    InstancedMesh {
        /// Per-instance colors are present.
        instance_color: bool,
    },
    SkinnedMesh,
    Line,
    Points,
    Sprite,
}

/// The object being drawn.
#[derive(Debug, Clone, Copy)]
pub struct RenderObject<'a> {
    pub kind: ObjectKind,
    pub geometry: &'a GeometryLayout,
}

impl<'a> RenderObject<'a> {
    #[must_use]
    pub fn new(kind: ObjectKind, geometry: &'a GeometryLayout) -> Self {
        Self { kind, geometry }
    }

    #[must_use]
    pub fn mesh(geometry: &'a GeometryLayout) -> Self {
        Self::new(ObjectKind::Mesh, geometry)
    }

    #[inline]
    #[must_use]
    pub fn is_instanced(&self) -> bool {
        matches!(self.kind, ObjectKind::InstancedMesh { .. })
    }

    #[inline]
    #[must_use]
    pub fn has_instance_color(&self) -> bool {
        matches!(self.kind, ObjectKind::InstancedMesh { instance_color: true })
    }

    #[inline]
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        self.kind == ObjectKind::SkinnedMesh
    }
}
