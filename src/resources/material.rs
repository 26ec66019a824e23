//! Material Model
//!
//! Materials are a single struct tagged with a [`MaterialKind`] fixed at
//! construction. The kind decides whether the material is backed by a
//! builtin shader (see [`ShaderId`]) or carries its own shader source.
//!
//! Everything program selection needs from a material is plain data here:
//! texture slots ([`MaterialMaps`]), pipeline-affecting settings
//! ([`MaterialSettings`]), physically based extras ([`PhysicalProperties`]),
//! user defines and an opaque cache key fragment.
//!
//! [`ShaderId`]: crate::renderer::pipeline::ShaderId

use std::borrow::Cow;
use std::sync::Arc;

use uuid::Uuid;

use crate::resources::shader_defines::ShaderDefines;
use crate::resources::texture::TextureRef;
use crate::resources::uniforms::{SharedUniforms, UniformSet};

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blending {
    No,
    #[default]
    Normal,
    Additive,
    Subtractive,
    Multiply,
    Custom,
}

/// How the environment map is combined with the surface color
/// (Basic / Lambert / Phong only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Combine {
    #[default]
    Multiply,
    Mix,
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormalMapType {
    #[default]
    TangentSpace,
    ObjectSpace,
}

/// Depth encoding used by depth materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DepthPacking {
    #[default]
    Basic,
    Rgba,
}

/// Shader arithmetic precision, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Precision {
    Low,
    Medium,
    #[default]
    High,
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Low => "lowp",
            Self::Medium => "mediump",
            Self::High => "highp",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlslVersion {
    Glsl1,
    Glsl3,
}

// ============================================================================
// Custom shader source
// ============================================================================

/// User supplied shader stages for [`MaterialKind::Shader`] and
/// [`MaterialKind::RawShader`].
///
/// Cloning copies the uniform values into a new set; the clone does not
/// share uniforms with the original.
#[derive(Debug)]
pub struct CustomShader {
    pub vertex_shader: Arc<str>,
    pub fragment_shader: Arc<str>,
    /// Owned by the material; handed out by reference, never copied.
    pub uniforms: SharedUniforms,
    pub glsl_version: Option<GlslVersion>,
    pub index0_attribute_name: Option<String>,
}

impl CustomShader {
    #[must_use]
    pub fn new(vertex_shader: impl Into<Arc<str>>, fragment_shader: impl Into<Arc<str>>) -> Self {
        Self {
            vertex_shader: vertex_shader.into(),
            fragment_shader: fragment_shader.into(),
            uniforms: UniformSet::new().into_shared(),
            glsl_version: None,
            index0_attribute_name: None,
        }
    }

    #[must_use]
    pub fn with_uniforms(mut self, uniforms: UniformSet) -> Self {
        self.uniforms = uniforms.into_shared();
        self
    }
}

impl Clone for CustomShader {
    fn clone(&self) -> Self {
        Self {
            vertex_shader: Arc::clone(&self.vertex_shader),
            fragment_shader: Arc::clone(&self.fragment_shader),
            uniforms: self.uniforms.read().clone().into_shared(),
            glsl_version: self.glsl_version,
            index0_attribute_name: self.index0_attribute_name.clone(),
        }
    }
}

// ============================================================================
// Material kind
// ============================================================================

/// The shading model of a material.
#[derive(Debug, Clone)]
pub enum MaterialKind {
    MeshBasic,
    MeshLambert,
    MeshPhong,
    MeshToon,
    MeshStandard,
    MeshPhysical,
    MeshMatcap,
    MeshDepth,
    MeshDistance,
    MeshNormal,
    LineBasic,
    LineDashed,
    Points,
    Shadow,
    Sprite,
    /// Custom source, wrapped with the engine's shader prelude.
    Shader(CustomShader),
    /// Custom source compiled as-is.
    RawShader(CustomShader),
}

impl MaterialKind {
    /// Type name of the material, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::MeshBasic => "MeshBasicMaterial",
            Self::MeshLambert => "MeshLambertMaterial",
            Self::MeshPhong => "MeshPhongMaterial",
            Self::MeshToon => "MeshToonMaterial",
            Self::MeshStandard => "MeshStandardMaterial",
            Self::MeshPhysical => "MeshPhysicalMaterial",
            Self::MeshMatcap => "MeshMatcapMaterial",
            Self::MeshDepth => "MeshDepthMaterial",
            Self::MeshDistance => "MeshDistanceMaterial",
            Self::MeshNormal => "MeshNormalMaterial",
            Self::LineBasic => "LineBasicMaterial",
            Self::LineDashed => "LineDashedMaterial",
            Self::Points => "PointsMaterial",
            Self::Shadow => "ShadowMaterial",
            Self::Sprite => "SpriteMaterial",
            Self::Shader(_) => "ShaderMaterial",
            Self::RawShader(_) => "RawShaderMaterial",
        }
    }

    /// Whether the material takes part in physically based shading.
    #[inline]
    #[must_use]
    pub fn is_standard(&self) -> bool {
        matches!(self, Self::MeshStandard | Self::MeshPhysical)
    }

    #[inline]
    #[must_use]
    pub fn is_raw_shader(&self) -> bool {
        matches!(self, Self::RawShader(_))
    }

    #[inline]
    #[must_use]
    pub fn custom_shader(&self) -> Option<&CustomShader> {
        match self {
            Self::Shader(s) | Self::RawShader(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Material data groups
// ============================================================================

/// Texture slots. A slot influences program selection only by being set.
#[derive(Debug, Clone, Default)]
pub struct MaterialMaps {
    pub map: Option<TextureRef>,
    pub matcap: Option<TextureRef>,
    pub env_map: Option<TextureRef>,
    pub light_map: Option<TextureRef>,
    pub ao_map: Option<TextureRef>,
    pub emissive_map: Option<TextureRef>,
    pub bump_map: Option<TextureRef>,
    pub normal_map: Option<TextureRef>,
    pub displacement_map: Option<TextureRef>,
    pub roughness_map: Option<TextureRef>,
    pub metalness_map: Option<TextureRef>,
    pub alpha_map: Option<TextureRef>,
    pub gradient_map: Option<TextureRef>,
    pub specular_map: Option<TextureRef>,
    pub specular_intensity_map: Option<TextureRef>,
    pub specular_color_map: Option<TextureRef>,
    pub clearcoat_map: Option<TextureRef>,
    pub clearcoat_roughness_map: Option<TextureRef>,
    pub clearcoat_normal_map: Option<TextureRef>,
    pub iridescence_map: Option<TextureRef>,
    pub iridescence_thickness_map: Option<TextureRef>,
    pub sheen_color_map: Option<TextureRef>,
    pub sheen_roughness_map: Option<TextureRef>,
    pub transmission_map: Option<TextureRef>,
    pub thickness_map: Option<TextureRef>,
}

/// Settings that change generated code or pipeline state.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSettings {
    pub side: Side,
    pub transparent: bool,
    pub blending: Blending,
    pub premultiplied_alpha: bool,
    pub dithering: bool,
    pub tone_mapped: bool,
    /// Whether the material reacts to scene fog.
    pub fog: bool,
    pub flat_shading: bool,
    pub vertex_colors: bool,
    pub alpha_test: f32,
    /// Requested precision; `None` uses the device default.
    pub precision: Option<Precision>,
    pub normal_map_type: NormalMapType,
    pub combine: Option<Combine>,
    pub size_attenuation: Option<bool>,
    pub depth_packing: Option<DepthPacking>,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            side: Side::Front,
            transparent: false,
            blending: Blending::Normal,
            premultiplied_alpha: false,
            dithering: false,
            tone_mapped: true,
            fog: false,
            flat_shading: false,
            vertex_colors: false,
            alpha_test: 0.0,
            precision: None,
            normal_map_type: NormalMapType::TangentSpace,
            combine: None,
            size_attenuation: None,
            depth_packing: None,
        }
    }
}

/// Strength of the physically based layers. A layer is active when > 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalProperties {
    pub clearcoat: f32,
    pub iridescence: f32,
    pub sheen: f32,
    pub transmission: f32,
}

/// Optional language extensions a custom shader asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderExtensions {
    pub derivatives: bool,
    pub frag_depth: bool,
    pub draw_buffers: bool,
    pub shader_texture_lod: bool,
}

// ============================================================================
// Material
// ============================================================================

/// Stable identity of a material instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub Uuid);

/// A material instance.
///
/// A clone is a new material: it gets its own [`MaterialId`] and, for
/// custom shaders, its own uniform set.
#[derive(Debug)]
pub struct Material {
    id: MaterialId,
    pub name: Option<Cow<'static, str>>,
    kind: MaterialKind,
    pub defines: ShaderDefines,
    pub maps: MaterialMaps,
    pub settings: MaterialSettings,
    pub physical: PhysicalProperties,
    pub extensions: ShaderExtensions,
    /// State not modeled above that still changes the generated program,
    /// e.g. code injected at runtime.
    pub program_cache_key: String,
}

impl Clone for Material {
    fn clone(&self) -> Self {
        Self {
            id: MaterialId(Uuid::new_v4()),
            name: self.name.clone(),
            kind: self.kind.clone(),
            defines: self.defines.clone(),
            maps: self.maps.clone(),
            settings: self.settings.clone(),
            physical: self.physical,
            extensions: self.extensions,
            program_cache_key: self.program_cache_key.clone(),
        }
    }
}

impl Material {
    /// Creates a material with the defaults of its kind.
    #[must_use]
    pub fn new(kind: MaterialKind) -> Self {
        let mut settings = MaterialSettings::default();
        let mut defines = ShaderDefines::new();

        match &kind {
            MaterialKind::MeshBasic | MaterialKind::MeshLambert | MaterialKind::MeshPhong => {
                settings.fog = true;
                settings.combine = Some(Combine::Multiply);
            }
            MaterialKind::MeshToon
            | MaterialKind::MeshMatcap
            | MaterialKind::LineBasic
            | MaterialKind::LineDashed => {
                settings.fog = true;
            }
            MaterialKind::MeshStandard => {
                settings.fog = true;
                defines.set("STANDARD", "");
            }
            MaterialKind::MeshPhysical => {
                settings.fog = true;
                defines.set("STANDARD", "");
                defines.set("PHYSICAL", "");
            }
            MaterialKind::Points => {
                settings.fog = true;
                settings.size_attenuation = Some(true);
            }
            MaterialKind::Sprite => {
                settings.fog = true;
                settings.transparent = true;
                settings.size_attenuation = Some(true);
            }
            MaterialKind::Shadow => {
                settings.fog = true;
                settings.transparent = true;
            }
            MaterialKind::MeshDepth => {
                settings.depth_packing = Some(DepthPacking::Basic);
            }
            MaterialKind::MeshDistance
            | MaterialKind::MeshNormal
            | MaterialKind::Shader(_)
            | MaterialKind::RawShader(_) => {}
        }

        Self {
            id: MaterialId(Uuid::new_v4()),
            name: None,
            kind,
            defines,
            maps: MaterialMaps::default(),
            settings,
            physical: PhysicalProperties::default(),
            extensions: ShaderExtensions::default(),
            program_cache_key: String::new(),
        }
    }

    #[must_use]
    pub fn new_basic() -> Self {
        Self::new(MaterialKind::MeshBasic)
    }

    #[must_use]
    pub fn new_standard() -> Self {
        Self::new(MaterialKind::MeshStandard)
    }

    #[must_use]
    pub fn new_physical() -> Self {
        Self::new(MaterialKind::MeshPhysical)
    }

    #[must_use]
    pub fn new_shader(shader: CustomShader) -> Self {
        Self::new(MaterialKind::Shader(shader))
    }

    #[must_use]
    pub fn new_raw_shader(shader: CustomShader) -> Self {
        Self::new(MaterialKind::RawShader(shader))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &MaterialKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    #[inline]
    #[must_use]
    pub fn custom_shader(&self) -> Option<&CustomShader> {
        self.kind.custom_shader()
    }

    /// Mutable access to custom shader source; `None` for builtin materials.
    pub fn custom_shader_mut(&mut self) -> Option<&mut CustomShader> {
        match &mut self.kind {
            MaterialKind::Shader(s) | MaterialKind::RawShader(s) => Some(s),
            _ => None,
        }
    }

    /// The material's own contribution to its program cache key.
    #[inline]
    #[must_use]
    pub fn custom_program_cache_key(&self) -> &str {
        &self.program_cache_key
    }

    #[must_use]
    pub fn with_map(mut self, map: TextureRef) -> Self {
        self.maps.map = Some(map);
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.settings.side = side;
        self
    }
}
