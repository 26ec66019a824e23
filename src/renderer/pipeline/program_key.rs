//! Program Cache Key
//!
//! [`ProgramCacheKey`] is the structural identity of a compiled program. Two
//! draws share a program exactly when their keys compare equal.
//!
//! The key is composed in a fixed order:
//!
//! 1. shader identity (builtin id, or the custom stage ids)
//! 2. material defines
//! 3. for everything but raw shader materials: the scalar parameters, the
//!    two feature masks and the renderer output encoding
//! 4. the material's own cache key fragment
//!
//! Boolean parameters are packed into [`ProgramFeatures`] and
//! [`ProgramStateFlags`]. The bit positions are part of the key format and
//! must stay stable.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use crate::renderer::pipeline::parameters::ProgramParameters;
use crate::renderer::pipeline::shader_cache::ShaderStageId;
use crate::renderer::pipeline::shader_lib::ShaderId;
use crate::renderer::settings::{ShadowMapType, ToneMapping};
use crate::resources::material::{Combine, DepthPacking, Precision};
use crate::resources::shader_defines::ShaderDefines;
use crate::resources::texture::{TextureEncoding, TextureMapping};

bitflags! {
    /// Texture slot and vertex feature bits.
    ///
    /// 64 bits wide so every feature gets its own bit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ProgramFeatures: u64 {
        const WEBGL2                     = 1 << 0;
        const VERTEX_TEXTURES            = 1 << 1;
        const INSTANCING                 = 1 << 2;
        const INSTANCING_COLOR           = 1 << 3;
        const MAP                        = 1 << 4;
        const MATCAP                     = 1 << 5;
        const ENV_MAP                    = 1 << 6;
        const LIGHT_MAP                  = 1 << 7;
        const AO_MAP                     = 1 << 8;
        const EMISSIVE_MAP               = 1 << 9;
        const BUMP_MAP                   = 1 << 10;
        const NORMAL_MAP                 = 1 << 11;
        const OBJECT_SPACE_NORMAL_MAP    = 1 << 12;
        const TANGENT_SPACE_NORMAL_MAP   = 1 << 13;
        const CLEARCOAT                  = 1 << 14;
        const CLEARCOAT_MAP              = 1 << 15;
        const CLEARCOAT_ROUGHNESS_MAP    = 1 << 16;
        const CLEARCOAT_NORMAL_MAP       = 1 << 17;
        const IRIDESCENCE                = 1 << 18;
        const IRIDESCENCE_MAP            = 1 << 19;
        const IRIDESCENCE_THICKNESS_MAP  = 1 << 20;
        const DISPLACEMENT_MAP           = 1 << 21;
        const SPECULAR_MAP               = 1 << 22;
        const ROUGHNESS_MAP              = 1 << 23;
        const METALNESS_MAP              = 1 << 24;
        const GRADIENT_MAP               = 1 << 25;
        const ALPHA_MAP                  = 1 << 26;
        const ALPHA_TEST                 = 1 << 27;
        const VERTEX_COLORS              = 1 << 28;
        const VERTEX_ALPHAS              = 1 << 29;
        const VERTEX_UVS                 = 1 << 30;
        const VERTEX_TANGENTS            = 1 << 31;
        const UVS_VERTEX_ONLY            = 1 << 32;
    }
}

bitflags! {
    /// Scene, object and render state bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ProgramStateFlags: u32 {
        const FOG                        = 1 << 0;
        const USE_FOG                    = 1 << 1;
        const FLAT_SHADING               = 1 << 2;
        const LOGARITHMIC_DEPTH_BUFFER   = 1 << 3;
        const SKINNING                   = 1 << 4;
        const MORPH_TARGETS              = 1 << 5;
        const MORPH_NORMALS              = 1 << 6;
        const MORPH_COLORS               = 1 << 7;
        const PREMULTIPLIED_ALPHA        = 1 << 8;
        const SHADOW_MAP_ENABLED         = 1 << 9;
        const PHYSICALLY_CORRECT_LIGHTS  = 1 << 10;
        const DOUBLE_SIDED               = 1 << 11;
        const FLIP_SIDED                 = 1 << 12;
        const USE_DEPTH_PACKING          = 1 << 13;
        const DITHERING                  = 1 << 14;
        const SPECULAR_INTENSITY_MAP     = 1 << 15;
        const SPECULAR_COLOR_MAP         = 1 << 16;
        const TRANSMISSION               = 1 << 17;
        const TRANSMISSION_MAP           = 1 << 18;
        const THICKNESS_MAP              = 1 << 19;
        const SHEEN                      = 1 << 20;
        const SHEEN_COLOR_MAP            = 1 << 21;
        const SHEEN_ROUGHNESS_MAP        = 1 << 22;
        const DECODE_VIDEO_TEXTURE       = 1 << 23;
        const OPAQUE                     = 1 << 24;
        const MULTIVIEW                  = 1 << 25;
    }
}

impl ProgramFeatures {
    #[must_use]
    pub fn from_parameters(p: &ProgramParameters) -> Self {
        let mut f = Self::empty();
        f.set(Self::WEBGL2, p.is_webgl2);
        f.set(Self::VERTEX_TEXTURES, p.supports_vertex_textures);
        f.set(Self::INSTANCING, p.instancing);
        f.set(Self::INSTANCING_COLOR, p.instancing_color);
        f.set(Self::MAP, p.map);
        f.set(Self::MATCAP, p.matcap);
        f.set(Self::ENV_MAP, p.env_map);
        f.set(Self::LIGHT_MAP, p.light_map);
        f.set(Self::AO_MAP, p.ao_map);
        f.set(Self::EMISSIVE_MAP, p.emissive_map);
        f.set(Self::BUMP_MAP, p.bump_map);
        f.set(Self::NORMAL_MAP, p.normal_map);
        f.set(Self::OBJECT_SPACE_NORMAL_MAP, p.object_space_normal_map);
        f.set(Self::TANGENT_SPACE_NORMAL_MAP, p.tangent_space_normal_map);
        f.set(Self::CLEARCOAT, p.clearcoat);
        f.set(Self::CLEARCOAT_MAP, p.clearcoat_map);
        f.set(Self::CLEARCOAT_ROUGHNESS_MAP, p.clearcoat_roughness_map);
        f.set(Self::CLEARCOAT_NORMAL_MAP, p.clearcoat_normal_map);
        f.set(Self::IRIDESCENCE, p.iridescence);
        f.set(Self::IRIDESCENCE_MAP, p.iridescence_map);
        f.set(Self::IRIDESCENCE_THICKNESS_MAP, p.iridescence_thickness_map);
        f.set(Self::DISPLACEMENT_MAP, p.displacement_map);
        f.set(Self::SPECULAR_MAP, p.specular_map);
        f.set(Self::ROUGHNESS_MAP, p.roughness_map);
        f.set(Self::METALNESS_MAP, p.metalness_map);
        f.set(Self::GRADIENT_MAP, p.gradient_map);
        f.set(Self::ALPHA_MAP, p.alpha_map);
        f.set(Self::ALPHA_TEST, p.alpha_test);
        f.set(Self::VERTEX_COLORS, p.vertex_colors);
        f.set(Self::VERTEX_ALPHAS, p.vertex_alphas);
        f.set(Self::VERTEX_UVS, p.vertex_uvs);
        f.set(Self::VERTEX_TANGENTS, p.vertex_tangents);
        f.set(Self::UVS_VERTEX_ONLY, p.uvs_vertex_only);
        f
    }
}

impl ProgramStateFlags {
    #[must_use]
    pub fn from_parameters(p: &ProgramParameters) -> Self {
        let mut f = Self::empty();
        f.set(Self::FOG, p.fog);
        f.set(Self::USE_FOG, p.use_fog);
        f.set(Self::FLAT_SHADING, p.flat_shading);
        f.set(Self::LOGARITHMIC_DEPTH_BUFFER, p.logarithmic_depth_buffer);
        f.set(Self::SKINNING, p.skinning);
        f.set(Self::MORPH_TARGETS, p.morph_targets);
        f.set(Self::MORPH_NORMALS, p.morph_normals);
        f.set(Self::MORPH_COLORS, p.morph_colors);
        f.set(Self::PREMULTIPLIED_ALPHA, p.premultiplied_alpha);
        f.set(Self::SHADOW_MAP_ENABLED, p.shadow_map_enabled);
        f.set(Self::PHYSICALLY_CORRECT_LIGHTS, p.physically_correct_lights);
        f.set(Self::DOUBLE_SIDED, p.double_sided);
        f.set(Self::FLIP_SIDED, p.flip_sided);
        f.set(Self::USE_DEPTH_PACKING, p.use_depth_packing);
        f.set(Self::DITHERING, p.dithering);
        f.set(Self::SPECULAR_INTENSITY_MAP, p.specular_intensity_map);
        f.set(Self::SPECULAR_COLOR_MAP, p.specular_color_map);
        f.set(Self::TRANSMISSION, p.transmission);
        f.set(Self::TRANSMISSION_MAP, p.transmission_map);
        f.set(Self::THICKNESS_MAP, p.thickness_map);
        f.set(Self::SHEEN, p.sheen);
        f.set(Self::SHEEN_COLOR_MAP, p.sheen_color_map);
        f.set(Self::SHEEN_ROUGHNESS_MAP, p.sheen_roughness_map);
        f.set(Self::DECODE_VIDEO_TEXTURE, p.decode_video_texture);
        f.set(Self::OPAQUE, p.opaque);
        f.set(Self::MULTIVIEW, p.num_multiview_views > 0);
        f
    }
}

// ─── Key parts ────────────────────────────────────────────────────────────────

/// Which shader source a program is compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderIdentity {
    Builtin(ShaderId),
    Custom {
        vertex: Option<ShaderStageId>,
        fragment: Option<ShaderStageId>,
    },
}

/// Key section covering everything a non-raw material derives from its
/// parameters. Raw shader materials carry no variant section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub precision: Precision,
    pub output_encoding: TextureEncoding,
    pub env_map_mode: Option<TextureMapping>,
    pub env_map_cube_uv_height: Option<u32>,
    pub combine: Option<Combine>,
    pub vertex_uvs: bool,
    pub fog_exp2: bool,
    pub size_attenuation: Option<bool>,
    pub morph_targets_count: u32,

    pub num_dir_lights: u32,
    pub num_point_lights: u32,
    pub num_spot_lights: u32,
    pub num_spot_light_maps: u32,
    pub num_hemi_lights: u32,
    pub num_rect_area_lights: u32,
    pub num_dir_light_shadows: u32,
    pub num_point_light_shadows: u32,
    pub num_spot_light_shadows: u32,
    pub num_spot_light_shadows_with_maps: u32,

    pub shadow_map_type: ShadowMapType,
    pub tone_mapping: ToneMapping,
    pub num_clipping_planes: u32,
    pub num_clip_intersection: u32,
    pub depth_packing: Option<DepthPacking>,

    pub features: ProgramFeatures,
    pub state: ProgramStateFlags,
    pub renderer_output_encoding: TextureEncoding,
}

impl VariantKey {
    #[must_use]
    pub fn from_parameters(p: &ProgramParameters) -> Self {
        Self {
            precision: p.precision,
            output_encoding: p.output_encoding,
            env_map_mode: p.env_map_mode,
            env_map_cube_uv_height: p.env_map_cube_uv_height,
            combine: p.combine,
            vertex_uvs: p.vertex_uvs,
            fog_exp2: p.fog_exp2,
            size_attenuation: p.size_attenuation,
            morph_targets_count: p.morph_targets_count,

            num_dir_lights: p.lights.directional,
            num_point_lights: p.lights.point,
            num_spot_lights: p.lights.spot,
            num_spot_light_maps: p.lights.spot_light_map,
            num_hemi_lights: p.lights.hemi,
            num_rect_area_lights: p.lights.rect_area,
            num_dir_light_shadows: p.lights.directional_shadow_map,
            num_point_light_shadows: p.lights.point_shadow_map,
            num_spot_light_shadows: p.lights.spot_shadow_map,
            num_spot_light_shadows_with_maps: p.lights.spot_shadows_with_maps,

            shadow_map_type: p.shadow_map_type,
            tone_mapping: p.tone_mapping,
            num_clipping_planes: p.num_clipping_planes,
            num_clip_intersection: p.num_clip_intersection,
            depth_packing: p.depth_packing,

            features: ProgramFeatures::from_parameters(p),
            state: ProgramStateFlags::from_parameters(p),
            renderer_output_encoding: p.renderer_output_encoding,
        }
    }
}

// ─── ProgramCacheKey ──────────────────────────────────────────────────────────

/// Identity of a compiled program.
///
/// Equal keys mean interchangeable programs. [`Display`](fmt::Display)
/// renders the key as a comma separated list for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramCacheKey {
    pub shader: ShaderIdentity,
    pub defines: ShaderDefines,
    pub variant: Option<VariantKey>,
    pub custom: String,
}

impl ProgramCacheKey {
    /// Derives the key of a parameter record. Pure: equal parameters always
    /// yield equal keys.
    #[must_use]
    pub fn from_parameters(p: &ProgramParameters) -> Self {
        let shader = match p.shader_id {
            Some(id) => ShaderIdentity::Builtin(id),
            None => ShaderIdentity::Custom {
                vertex: p.custom_vertex_shader_id,
                fragment: p.custom_fragment_shader_id,
            },
        };

        let variant = if p.is_raw_shader_material {
            None
        } else {
            Some(VariantKey::from_parameters(p))
        };

        Self {
            shader,
            defines: p.defines.clone(),
            variant,
            custom: p.custom_program_cache_key.clone(),
        }
    }

    /// 64-bit `FxHash` of the key, for logs and external lookup tables.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = rustc_hash::FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

fn write_opt<T: fmt::Debug>(f: &mut fmt::Formatter<'_>, value: Option<T>) -> fmt::Result {
    match value {
        Some(v) => write!(f, ",{v:?}"),
        None => f.write_str(","),
    }
}

impl fmt::Display for ProgramCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shader {
            ShaderIdentity::Builtin(id) => write!(f, "{id}")?,
            ShaderIdentity::Custom { vertex, fragment } => {
                if let Some(v) = vertex {
                    write!(f, "{v}")?;
                }
                write_opt(f, fragment.map(|id| id.0))?;
            }
        }

        for (name, value) in self.defines.iter_strings() {
            write!(f, ",{name},{value}")?;
        }

        if let Some(v) = &self.variant {
            write!(f, ",{},{:?}", v.precision, v.output_encoding)?;
            write_opt(f, v.env_map_mode)?;
            write_opt(f, v.env_map_cube_uv_height)?;
            write_opt(f, v.combine)?;
            write!(
                f,
                ",{},{},",
                u8::from(v.vertex_uvs),
                u8::from(v.fog_exp2)
            )?;
            if let Some(size_attenuation) = v.size_attenuation {
                write!(f, "{}", u8::from(size_attenuation))?;
            }
            write!(
                f,
                ",{},{},{},{},{},{},{},{},{},{},{}",
                v.morph_targets_count,
                v.num_dir_lights,
                v.num_point_lights,
                v.num_spot_lights,
                v.num_spot_light_maps,
                v.num_hemi_lights,
                v.num_rect_area_lights,
                v.num_dir_light_shadows,
                v.num_point_light_shadows,
                v.num_spot_light_shadows,
                v.num_spot_light_shadows_with_maps,
            )?;
            write!(
                f,
                ",{:?},{:?},{},{}",
                v.shadow_map_type, v.tone_mapping, v.num_clipping_planes, v.num_clip_intersection
            )?;
            write_opt(f, v.depth_packing)?;
            write!(
                f,
                ",{},{},{:?}",
                v.features.bits(),
                v.state.bits(),
                v.renderer_output_encoding
            )?;
        }

        write!(f, ",{}", self.custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pipeline::parameters::{ParameterExtractor, ProgramInputs};
    use crate::renderer::pipeline::shader_cache::CustomShaderCache;
    use crate::renderer::pipeline::shader_lib::ShaderLib;
    use crate::renderer::settings::{ClippingState, ProgramCacheSettings, RendererState};
    use crate::resources::geometry::GeometryLayout;
    use crate::resources::material::Material;
    use crate::scene::{LightsState, RenderObject, SceneState};

    fn standard_parameters() -> ProgramParameters {
        let material = Material::new_standard();
        let geometry = GeometryLayout::default();
        let inputs = ProgramInputs {
            material: &material,
            lights: &LightsState::default(),
            shadows: &[],
            scene: &SceneState::default(),
            object: RenderObject::mesh(&geometry),
            renderer: &RendererState::default(),
            clipping: &ClippingState::default(),
        };
        ParameterExtractor::new(ProgramCacheSettings::default()).extract(
            &inputs,
            &ShaderLib::new(),
            &mut CustomShaderCache::new(),
        )
    }

    fn other_encoding(e: TextureEncoding) -> TextureEncoding {
        match e {
            TextureEncoding::Linear => TextureEncoding::Srgb,
            TextureEncoding::Srgb => TextureEncoding::Linear,
        }
    }

    type Flip = (&'static str, fn(&mut ProgramParameters));

    /// One change per keyed field.
    const KEYED_FIELD_FLIPS: &[Flip] = &[
        // Shader identity, defines, custom fragment
        ("shader_id", |p| p.shader_id = Some(ShaderId::Lambert)),
        ("defines", |p| p.defines.set("USE_EXTRA", "1")),
        ("custom_program_cache_key", |p| p.custom_program_cache_key.push('x')),
        // Scalars
        ("precision", |p| {
            p.precision = if p.precision == Precision::Low {
                Precision::High
            } else {
                Precision::Low
            };
        }),
        ("output_encoding", |p| p.output_encoding = other_encoding(p.output_encoding)),
        ("renderer_output_encoding", |p| {
            p.renderer_output_encoding = other_encoding(p.renderer_output_encoding);
        }),
        ("env_map_mode", |p| {
            p.env_map_mode = match p.env_map_mode {
                Some(TextureMapping::CubeReflection) => Some(TextureMapping::CubeRefraction),
                _ => Some(TextureMapping::CubeReflection),
            };
        }),
        ("env_map_cube_uv_height", |p| {
            p.env_map_cube_uv_height = Some(p.env_map_cube_uv_height.unwrap_or(0) + 256);
        }),
        ("combine", |p| {
            p.combine = match p.combine {
                Some(Combine::Add) => Some(Combine::Mix),
                _ => Some(Combine::Add),
            };
        }),
        ("fog_exp2", |p| p.fog_exp2 = !p.fog_exp2),
        ("size_attenuation", |p| {
            p.size_attenuation = Some(!p.size_attenuation.unwrap_or(false));
        }),
        ("morph_targets_count", |p| p.morph_targets_count += 1),
        ("lights.directional", |p| p.lights.directional += 1),
        ("lights.point", |p| p.lights.point += 1),
        ("lights.spot", |p| p.lights.spot += 1),
        ("lights.spot_light_map", |p| p.lights.spot_light_map += 1),
        ("lights.hemi", |p| p.lights.hemi += 1),
        ("lights.rect_area", |p| p.lights.rect_area += 1),
        ("lights.directional_shadow_map", |p| p.lights.directional_shadow_map += 1),
        ("lights.point_shadow_map", |p| p.lights.point_shadow_map += 1),
        ("lights.spot_shadow_map", |p| p.lights.spot_shadow_map += 1),
        ("lights.spot_shadows_with_maps", |p| p.lights.spot_shadows_with_maps += 1),
        ("shadow_map_type", |p| {
            p.shadow_map_type = if p.shadow_map_type == ShadowMapType::Vsm {
                ShadowMapType::Basic
            } else {
                ShadowMapType::Vsm
            };
        }),
        ("tone_mapping", |p| {
            p.tone_mapping = if p.tone_mapping == ToneMapping::AcesFilmic {
                ToneMapping::Linear
            } else {
                ToneMapping::AcesFilmic
            };
        }),
        ("num_clipping_planes", |p| p.num_clipping_planes += 1),
        ("num_clip_intersection", |p| p.num_clip_intersection += 1),
        ("depth_packing", |p| {
            p.depth_packing = match p.depth_packing {
                Some(DepthPacking::Rgba) => Some(DepthPacking::Basic),
                _ => Some(DepthPacking::Rgba),
            };
        }),
        // ProgramFeatures
        ("is_webgl2", |p| p.is_webgl2 = !p.is_webgl2),
        ("supports_vertex_textures", |p| p.supports_vertex_textures = !p.supports_vertex_textures),
        ("instancing", |p| p.instancing = !p.instancing),
        ("instancing_color", |p| p.instancing_color = !p.instancing_color),
        ("map", |p| p.map = !p.map),
        ("matcap", |p| p.matcap = !p.matcap),
        ("env_map", |p| p.env_map = !p.env_map),
        ("light_map", |p| p.light_map = !p.light_map),
        ("ao_map", |p| p.ao_map = !p.ao_map),
        ("emissive_map", |p| p.emissive_map = !p.emissive_map),
        ("bump_map", |p| p.bump_map = !p.bump_map),
        ("normal_map", |p| p.normal_map = !p.normal_map),
        ("object_space_normal_map", |p| p.object_space_normal_map = !p.object_space_normal_map),
        ("tangent_space_normal_map", |p| p.tangent_space_normal_map = !p.tangent_space_normal_map),
        ("clearcoat", |p| p.clearcoat = !p.clearcoat),
        ("clearcoat_map", |p| p.clearcoat_map = !p.clearcoat_map),
        ("clearcoat_roughness_map", |p| p.clearcoat_roughness_map = !p.clearcoat_roughness_map),
        ("clearcoat_normal_map", |p| p.clearcoat_normal_map = !p.clearcoat_normal_map),
        ("iridescence", |p| p.iridescence = !p.iridescence),
        ("iridescence_map", |p| p.iridescence_map = !p.iridescence_map),
        ("iridescence_thickness_map", |p| {
            p.iridescence_thickness_map = !p.iridescence_thickness_map;
        }),
        ("displacement_map", |p| p.displacement_map = !p.displacement_map),
        ("specular_map", |p| p.specular_map = !p.specular_map),
        ("roughness_map", |p| p.roughness_map = !p.roughness_map),
        ("metalness_map", |p| p.metalness_map = !p.metalness_map),
        ("gradient_map", |p| p.gradient_map = !p.gradient_map),
        ("alpha_map", |p| p.alpha_map = !p.alpha_map),
        ("alpha_test", |p| p.alpha_test = !p.alpha_test),
        ("vertex_colors", |p| p.vertex_colors = !p.vertex_colors),
        ("vertex_alphas", |p| p.vertex_alphas = !p.vertex_alphas),
        ("vertex_uvs", |p| p.vertex_uvs = !p.vertex_uvs),
        ("vertex_tangents", |p| p.vertex_tangents = !p.vertex_tangents),
        ("uvs_vertex_only", |p| p.uvs_vertex_only = !p.uvs_vertex_only),
        // ProgramStateFlags
        ("fog", |p| p.fog = !p.fog),
        ("use_fog", |p| p.use_fog = !p.use_fog),
        ("flat_shading", |p| p.flat_shading = !p.flat_shading),
        ("logarithmic_depth_buffer", |p| p.logarithmic_depth_buffer = !p.logarithmic_depth_buffer),
        ("skinning", |p| p.skinning = !p.skinning),
        ("morph_targets", |p| p.morph_targets = !p.morph_targets),
        ("morph_normals", |p| p.morph_normals = !p.morph_normals),
        ("morph_colors", |p| p.morph_colors = !p.morph_colors),
        ("premultiplied_alpha", |p| p.premultiplied_alpha = !p.premultiplied_alpha),
        ("shadow_map_enabled", |p| p.shadow_map_enabled = !p.shadow_map_enabled),
        ("physically_correct_lights", |p| {
            p.physically_correct_lights = !p.physically_correct_lights;
        }),
        ("double_sided", |p| p.double_sided = !p.double_sided),
        ("flip_sided", |p| p.flip_sided = !p.flip_sided),
        ("use_depth_packing", |p| p.use_depth_packing = !p.use_depth_packing),
        ("dithering", |p| p.dithering = !p.dithering),
        ("specular_intensity_map", |p| p.specular_intensity_map = !p.specular_intensity_map),
        ("specular_color_map", |p| p.specular_color_map = !p.specular_color_map),
        ("transmission", |p| p.transmission = !p.transmission),
        ("transmission_map", |p| p.transmission_map = !p.transmission_map),
        ("thickness_map", |p| p.thickness_map = !p.thickness_map),
        ("sheen", |p| p.sheen = !p.sheen),
        ("sheen_color_map", |p| p.sheen_color_map = !p.sheen_color_map),
        ("sheen_roughness_map", |p| p.sheen_roughness_map = !p.sheen_roughness_map),
        ("decode_video_texture", |p| p.decode_video_texture = !p.decode_video_texture),
        ("opaque", |p| p.opaque = !p.opaque),
        ("num_multiview_views", |p| {
            p.num_multiview_views = if p.num_multiview_views == 0 { 2 } else { 0 };
        }),
    ];

    #[test]
    fn every_keyed_field_changes_the_key() {
        let base = standard_parameters();
        let base_key = ProgramCacheKey::from_parameters(&base);

        let keys: Vec<(&str, ProgramCacheKey)> = KEYED_FIELD_FLIPS
            .iter()
            .map(|&(name, flip)| {
                let mut params = base.clone();
                flip(&mut params);
                (name, ProgramCacheKey::from_parameters(&params))
            })
            .collect();

        for (name, key) in &keys {
            assert_ne!(*key, base_key, "changing {name} left the key unchanged");
        }
        for (i, (a_name, a)) in keys.iter().enumerate() {
            for (b_name, b) in &keys[i + 1..] {
                assert_ne!(a, b, "changing {a_name} and changing {b_name} gave the same key");
            }
        }
    }

    #[test]
    fn raw_shader_key_ignores_variant_fields() {
        let mut base = standard_parameters();
        base.shader_id = None;
        base.is_raw_shader_material = true;
        let base_key = ProgramCacheKey::from_parameters(&base);
        assert!(base_key.variant.is_none());

        for &(name, flip) in KEYED_FIELD_FLIPS {
            if matches!(name, "shader_id" | "defines" | "custom_program_cache_key") {
                continue;
            }
            let mut params = base.clone();
            flip(&mut params);
            assert_eq!(
                ProgramCacheKey::from_parameters(&params),
                base_key,
                "raw shader key changed with {name}"
            );
        }
    }

    #[test]
    fn feature_bits_are_distinct() {
        let mut seen = 0u64;
        for flag in ProgramFeatures::all().iter() {
            assert_eq!(seen & flag.bits(), 0);
            seen |= flag.bits();
        }
        assert_eq!(ProgramFeatures::all().iter().count(), 33);
        assert_eq!(ProgramStateFlags::all().iter().count(), 26);
    }

    #[test]
    fn bit_positions_are_stable() {
        assert_eq!(ProgramFeatures::MAP.bits(), 1 << 4);
        assert_eq!(ProgramFeatures::UVS_VERTEX_ONLY.bits(), 1 << 32);
        assert_eq!(ProgramStateFlags::OPAQUE.bits(), 1 << 24);
        assert_eq!(ProgramStateFlags::MULTIVIEW.bits(), 1 << 25);
    }

    #[test]
    fn display_of_raw_key() {
        let key = ProgramCacheKey {
            shader: ShaderIdentity::Custom {
                vertex: Some(ShaderStageId(3)),
                fragment: Some(ShaderStageId(4)),
            },
            defines: ShaderDefines::from(&[("USE_FOO", "1")][..]),
            variant: None,
            custom: "extra".to_owned(),
        };
        assert_eq!(key.to_string(), "3,4,USE_FOO,1,extra");
    }

    #[test]
    fn fingerprint_follows_equality() {
        let a = ProgramCacheKey {
            shader: ShaderIdentity::Builtin(ShaderId::Basic),
            defines: ShaderDefines::new(),
            variant: None,
            custom: String::new(),
        };
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.custom.push('x');
        assert_ne!(a, b);
    }
}
