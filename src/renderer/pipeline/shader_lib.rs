//! Builtin Shader Library
//!
//! Maps builtin shader identities to their source and canonical default
//! uniforms. Source text is owned by the host (it is installed with
//! [`ShaderLib::set_source`]); uniform templates are built here from shared
//! groups, the same way every builtin shader composes them.
//!
//! | Material kind | Shader |
//! |---------------|--------|
//! | MeshBasic, LineBasic | `basic` |
//! | MeshStandard, MeshPhysical | `physical` |
//! | MeshDepth | `depth` |
//! | MeshDistance | `distanceRGBA` |
//! | ... | one shader per remaining kind |

use std::sync::Arc;

use glam::{Mat3, Vec2, Vec3};

use crate::resources::material::{CustomShader, MaterialKind};
use crate::resources::uniforms::{UniformSet, UniformValue};

/// Identity of a builtin shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShaderId {
    Basic,
    Lambert,
    Phong,
    Toon,
    Physical,
    Matcap,
    Depth,
    DistanceRgba,
    Normal,
    Dashed,
    Points,
    Shadow,
    Sprite,
}

/// Where the source of a material's program comes from.
#[derive(Debug, Clone, Copy)]
pub enum ShaderSource<'a> {
    Builtin(ShaderId),
    Custom(&'a CustomShader),
}

impl<'a> ShaderSource<'a> {
    #[must_use]
    pub fn of(kind: &'a MaterialKind) -> Self {
        Self::Builtin(match kind {
            MaterialKind::MeshBasic | MaterialKind::LineBasic => ShaderId::Basic,
            MaterialKind::MeshLambert => ShaderId::Lambert,
            MaterialKind::MeshPhong => ShaderId::Phong,
            MaterialKind::MeshToon => ShaderId::Toon,
            MaterialKind::MeshStandard | MaterialKind::MeshPhysical => ShaderId::Physical,
            MaterialKind::MeshMatcap => ShaderId::Matcap,
            MaterialKind::MeshDepth => ShaderId::Depth,
            MaterialKind::MeshDistance => ShaderId::DistanceRgba,
            MaterialKind::MeshNormal => ShaderId::Normal,
            MaterialKind::LineDashed => ShaderId::Dashed,
            MaterialKind::Points => ShaderId::Points,
            MaterialKind::Shadow => ShaderId::Shadow,
            MaterialKind::Sprite => ShaderId::Sprite,
            MaterialKind::Shader(shader) | MaterialKind::RawShader(shader) => {
                return Self::Custom(shader);
            }
        })
    }
}

impl ShaderId {
    pub const ALL: [ShaderId; 13] = [
        Self::Basic,
        Self::Lambert,
        Self::Phong,
        Self::Toon,
        Self::Physical,
        Self::Matcap,
        Self::Depth,
        Self::DistanceRgba,
        Self::Normal,
        Self::Dashed,
        Self::Points,
        Self::Shadow,
        Self::Sprite,
    ];

    /// The builtin shader backing a material kind; `None` for custom shaders.
    #[must_use]
    pub fn for_material(kind: &MaterialKind) -> Option<ShaderId> {
        match ShaderSource::of(kind) {
            ShaderSource::Builtin(id) => Some(id),
            ShaderSource::Custom(_) => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Lambert => "lambert",
            Self::Phong => "phong",
            Self::Toon => "toon",
            Self::Physical => "physical",
            Self::Matcap => "matcap",
            Self::Depth => "depth",
            Self::DistanceRgba => "distanceRGBA",
            Self::Normal => "normal",
            Self::Dashed => "dashed",
            Self::Points => "points",
            Self::Shadow => "shadow",
            Self::Sprite => "sprite",
        }
    }
}

impl std::fmt::Display for ShaderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Source and default uniforms of one builtin shader.
#[derive(Debug, Clone)]
pub struct ShaderEntry {
    pub vertex_shader: Arc<str>,
    pub fragment_shader: Arc<str>,
    pub uniforms: UniformSet,
}

#[derive(Debug, Clone)]
pub struct ShaderLib {
    entries: Vec<ShaderEntry>,
}

impl Default for ShaderLib {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderLib {
    #[must_use]
    pub fn new() -> Self {
        let entries = ShaderId::ALL
            .iter()
            .map(|&id| ShaderEntry {
                vertex_shader: Arc::from(""),
                fragment_shader: Arc::from(""),
                uniforms: default_uniforms(id),
            })
            .collect();
        Self { entries }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: ShaderId) -> &ShaderEntry {
        &self.entries[id as usize]
    }

    /// Installs the source of a builtin shader.
    pub fn set_source(
        &mut self,
        id: ShaderId,
        vertex_shader: impl Into<Arc<str>>,
        fragment_shader: impl Into<Arc<str>>,
    ) {
        let entry = &mut self.entries[id as usize];
        entry.vertex_shader = vertex_shader.into();
        entry.fragment_shader = fragment_shader.into();
    }
}

// ─── Uniform groups ───────────────────────────────────────────────────────────

fn tex() -> UniformValue {
    UniformValue::Texture(None)
}

fn common() -> UniformSet {
    UniformSet::from_values([
        ("diffuse", UniformValue::Color(Vec3::ONE)),
        ("opacity", UniformValue::Float(1.0)),
        ("map", tex()),
        ("uvTransform", UniformValue::Mat3(Mat3::IDENTITY)),
        ("uv2Transform", UniformValue::Mat3(Mat3::IDENTITY)),
        ("alphaMap", tex()),
        ("alphaTest", UniformValue::Float(0.0)),
    ])
}

fn specular_map() -> UniformSet {
    UniformSet::from_values([("specularMap", tex())])
}

fn env_map() -> UniformSet {
    UniformSet::from_values([
        ("envMap", tex()),
        ("flipEnvMap", UniformValue::Float(-1.0)),
        ("reflectivity", UniformValue::Float(1.0)),
        ("ior", UniformValue::Float(1.5)),
        ("refractionRatio", UniformValue::Float(0.98)),
    ])
}

fn ao_map() -> UniformSet {
    UniformSet::from_values([
        ("aoMap", tex()),
        ("aoMapIntensity", UniformValue::Float(1.0)),
    ])
}

fn light_map() -> UniformSet {
    UniformSet::from_values([
        ("lightMap", tex()),
        ("lightMapIntensity", UniformValue::Float(1.0)),
    ])
}

fn emissive() -> UniformSet {
    UniformSet::from_values([
        ("emissive", UniformValue::Color(Vec3::ZERO)),
        ("emissiveMap", tex()),
    ])
}

fn bump_map() -> UniformSet {
    UniformSet::from_values([
        ("bumpMap", tex()),
        ("bumpScale", UniformValue::Float(1.0)),
    ])
}

fn normal_map() -> UniformSet {
    UniformSet::from_values([
        ("normalMap", tex()),
        ("normalScale", UniformValue::Vec2(Vec2::ONE)),
    ])
}

fn displacement_map() -> UniformSet {
    UniformSet::from_values([
        ("displacementMap", tex()),
        ("displacementScale", UniformValue::Float(1.0)),
        ("displacementBias", UniformValue::Float(0.0)),
    ])
}

fn roughness_metalness() -> UniformSet {
    UniformSet::from_values([
        ("roughness", UniformValue::Float(1.0)),
        ("metalness", UniformValue::Float(0.0)),
        ("roughnessMap", tex()),
        ("metalnessMap", tex()),
        ("envMapIntensity", UniformValue::Float(1.0)),
    ])
}

fn gradient_map() -> UniformSet {
    UniformSet::from_values([("gradientMap", tex())])
}

fn fog() -> UniformSet {
    UniformSet::from_values([
        ("fogDensity", UniformValue::Float(0.000_25)),
        ("fogNear", UniformValue::Float(1.0)),
        ("fogFar", UniformValue::Float(2000.0)),
        ("fogColor", UniformValue::Color(Vec3::ONE)),
    ])
}

fn lights() -> UniformSet {
    let empty = || UniformValue::Array(Vec::new());
    UniformSet::from_values([
        ("ambientLightColor", UniformValue::Color(Vec3::ZERO)),
        ("lightProbe", UniformValue::Array(vec![UniformValue::Vec3(Vec3::ZERO); 9])),
        ("directionalLights", empty()),
        ("directionalLightShadows", empty()),
        ("directionalShadowMap", empty()),
        ("directionalShadowMatrix", empty()),
        ("spotLights", empty()),
        ("spotLightShadows", empty()),
        ("spotLightMap", empty()),
        ("spotShadowMap", empty()),
        ("spotLightMatrix", empty()),
        ("pointLights", empty()),
        ("pointLightShadows", empty()),
        ("pointShadowMap", empty()),
        ("pointShadowMatrix", empty()),
        ("hemisphereLights", empty()),
        ("rectAreaLights", empty()),
        ("ltc_1", tex()),
        ("ltc_2", tex()),
    ])
}

fn points() -> UniformSet {
    UniformSet::from_values([
        ("diffuse", UniformValue::Color(Vec3::ONE)),
        ("opacity", UniformValue::Float(1.0)),
        ("size", UniformValue::Float(1.0)),
        ("scale", UniformValue::Float(1.0)),
        ("map", tex()),
        ("alphaMap", tex()),
        ("alphaTest", UniformValue::Float(0.0)),
        ("uvTransform", UniformValue::Mat3(Mat3::IDENTITY)),
    ])
}

fn sprite() -> UniformSet {
    UniformSet::from_values([
        ("diffuse", UniformValue::Color(Vec3::ONE)),
        ("opacity", UniformValue::Float(1.0)),
        ("center", UniformValue::Vec2(Vec2::splat(0.5))),
        ("rotation", UniformValue::Float(0.0)),
        ("map", tex()),
        ("alphaMap", tex()),
        ("alphaTest", UniformValue::Float(0.0)),
        ("uvTransform", UniformValue::Mat3(Mat3::IDENTITY)),
    ])
}

fn physical_extras() -> UniformSet {
    UniformSet::from_values([
        ("clearcoat", UniformValue::Float(0.0)),
        ("clearcoatMap", tex()),
        ("clearcoatRoughness", UniformValue::Float(0.0)),
        ("clearcoatRoughnessMap", tex()),
        ("clearcoatNormalScale", UniformValue::Vec2(Vec2::ONE)),
        ("clearcoatNormalMap", tex()),
        ("iridescence", UniformValue::Float(0.0)),
        ("iridescenceMap", tex()),
        ("iridescenceIOR", UniformValue::Float(1.3)),
        ("iridescenceThicknessMinimum", UniformValue::Float(100.0)),
        ("iridescenceThicknessMaximum", UniformValue::Float(400.0)),
        ("iridescenceThicknessMap", tex()),
        ("sheen", UniformValue::Float(0.0)),
        ("sheenColor", UniformValue::Color(Vec3::ZERO)),
        ("sheenColorMap", tex()),
        ("sheenRoughness", UniformValue::Float(1.0)),
        ("sheenRoughnessMap", tex()),
        ("transmission", UniformValue::Float(0.0)),
        ("transmissionMap", tex()),
        ("transmissionSamplerSize", UniformValue::Vec2(Vec2::ZERO)),
        ("transmissionSamplerMap", tex()),
        ("thickness", UniformValue::Float(0.0)),
        ("thicknessMap", tex()),
        ("attenuationDistance", UniformValue::Float(0.0)),
        ("attenuationColor", UniformValue::Color(Vec3::ZERO)),
        ("specularIntensity", UniformValue::Float(1.0)),
        ("specularIntensityMap", tex()),
        ("specularColor", UniformValue::Color(Vec3::ONE)),
        ("specularColorMap", tex()),
    ])
}

/// Canonical default uniforms of a builtin shader.
fn default_uniforms(id: ShaderId) -> UniformSet {
    match id {
        ShaderId::Basic => UniformSet::merged(&[
            &common(),
            &specular_map(),
            &env_map(),
            &ao_map(),
            &light_map(),
            &fog(),
        ]),
        ShaderId::Lambert => UniformSet::merged(&[
            &common(),
            &specular_map(),
            &env_map(),
            &ao_map(),
            &light_map(),
            &emissive(),
            &bump_map(),
            &normal_map(),
            &displacement_map(),
            &fog(),
            &lights(),
        ]),
        ShaderId::Phong => UniformSet::merged(&[
            &common(),
            &specular_map(),
            &env_map(),
            &ao_map(),
            &light_map(),
            &emissive(),
            &bump_map(),
            &normal_map(),
            &displacement_map(),
            &fog(),
            &lights(),
            &UniformSet::from_values([
                ("specular", UniformValue::Color(Vec3::splat(0.066_666))),
                ("shininess", UniformValue::Float(30.0)),
            ]),
        ]),
        ShaderId::Toon => UniformSet::merged(&[
            &common(),
            &ao_map(),
            &light_map(),
            &emissive(),
            &bump_map(),
            &normal_map(),
            &displacement_map(),
            &gradient_map(),
            &fog(),
            &lights(),
        ]),
        ShaderId::Physical => UniformSet::merged(&[
            &common(),
            &env_map(),
            &ao_map(),
            &light_map(),
            &emissive(),
            &bump_map(),
            &normal_map(),
            &displacement_map(),
            &roughness_metalness(),
            &fog(),
            &lights(),
            &physical_extras(),
        ]),
        ShaderId::Matcap => UniformSet::merged(&[
            &common(),
            &bump_map(),
            &normal_map(),
            &displacement_map(),
            &fog(),
            &UniformSet::from_values([("matcap", tex())]),
        ]),
        ShaderId::Depth => UniformSet::merged(&[&common(), &displacement_map()]),
        ShaderId::DistanceRgba => UniformSet::merged(&[
            &common(),
            &displacement_map(),
            &UniformSet::from_values([
                ("referencePosition", UniformValue::Vec3(Vec3::ZERO)),
                ("nearDistance", UniformValue::Float(1.0)),
                ("farDistance", UniformValue::Float(1000.0)),
            ]),
        ]),
        ShaderId::Normal => UniformSet::merged(&[
            &bump_map(),
            &normal_map(),
            &displacement_map(),
            &UniformSet::from_values([("opacity", UniformValue::Float(1.0))]),
        ]),
        ShaderId::Dashed => UniformSet::merged(&[
            &common(),
            &fog(),
            &UniformSet::from_values([
                ("scale", UniformValue::Float(1.0)),
                ("dashSize", UniformValue::Float(1.0)),
                ("totalSize", UniformValue::Float(2.0)),
            ]),
        ]),
        ShaderId::Points => UniformSet::merged(&[&points(), &fog()]),
        ShaderId::Shadow => UniformSet::merged(&[
            &lights(),
            &fog(),
            &UniformSet::from_values([
                ("color", UniformValue::Color(Vec3::ZERO)),
                ("opacity", UniformValue::Float(1.0)),
            ]),
        ]),
        ShaderId::Sprite => UniformSet::merged(&[&sprite(), &fog()]),
    }
}
