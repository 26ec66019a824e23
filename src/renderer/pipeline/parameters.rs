//! Parameter Extractor
//!
//! Projects a draw's inputs (material, object, lights, scene, renderer state,
//! clipping) into a flat [`ProgramParameters`] record. The record is a value
//! built fresh on every call, so nothing leaks from one draw into the next.
//!
//! Every field is a pure function of the inputs. The only side effects are a
//! warning when a requested precision is unavailable, and recording custom
//! shader stages in the [`CustomShaderCache`].

use std::sync::Arc;

use crate::renderer::pipeline::shader_cache::{CustomShaderCache, ShaderStageId};
use crate::renderer::pipeline::shader_lib::{ShaderId, ShaderLib, ShaderSource};
use crate::renderer::settings::{
    ClippingState, GpuExtensions, ProgramCacheSettings, RendererState, ShadowMapType, ToneMapping,
};
use crate::resources::material::{
    Blending, Combine, DepthPacking, GlslVersion, Material, MaterialMaps, NormalMapType,
    Precision, Side,
};
use crate::resources::shader_defines::ShaderDefines;
use crate::resources::texture::{TextureEncoding, TextureMapping, TextureRef};
use crate::scene::{Light, LightsState, RenderObject, SceneState};

// ─── Environment map resolution ──────────────────────────────────────────────

/// Layout an environment map is converted to before sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvMapTarget {
    /// Cube map, for classic (non physically based) materials.
    Cube,
    /// Prefiltered cube-UV layout, for physically based materials.
    CubeUv,
}

/// Converts environment textures into the layout a material samples.
///
/// Implemented by the renderer's cube map / prefilter managers. Returning
/// `None` means no usable environment map (e.g. conversion still pending).
pub trait EnvMapResolver {
    fn resolve(&mut self, texture: &TextureRef, target: EnvMapTarget) -> Option<TextureRef>;
}

/// Uses environment textures as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughEnvMaps;

impl EnvMapResolver for PassthroughEnvMaps {
    fn resolve(&mut self, texture: &TextureRef, _target: EnvMapTarget) -> Option<TextureRef> {
        Some(Arc::clone(texture))
    }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Everything one draw contributes to program selection.
#[derive(Debug, Clone, Copy)]
pub struct ProgramInputs<'a> {
    pub material: &'a Material,
    pub lights: &'a LightsState,
    /// Lights casting shadows in the current render state.
    pub shadows: &'a [Light],
    pub scene: &'a SceneState,
    pub object: RenderObject<'a>,
    pub renderer: &'a RendererState,
    pub clipping: &'a ClippingState,
}

// ─── ProgramParameters ───────────────────────────────────────────────────────

/// Canonical shading parameters of one draw.
///
/// Fields fed into the program cache key are listed in
/// [`ProgramCacheKey::from_parameters`]; the remaining fields (shader source,
/// extension requests, attribute names, morph stride) are consumed by the
/// program backend only.
///
/// [`ProgramCacheKey::from_parameters`]: super::program_key::ProgramCacheKey::from_parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramParameters {
    // Shader identity & source
    pub shader_id: Option<ShaderId>,
    pub shader_name: &'static str,
    pub vertex_shader: Arc<str>,
    pub fragment_shader: Arc<str>,
    pub defines: ShaderDefines,
    pub custom_vertex_shader_id: Option<ShaderStageId>,
    pub custom_fragment_shader_id: Option<ShaderStageId>,
    pub is_raw_shader_material: bool,
    pub glsl_version: Option<GlslVersion>,

    // Device
    pub is_webgl2: bool,
    pub precision: Precision,
    pub supports_vertex_textures: bool,
    pub logarithmic_depth_buffer: bool,

    // Object
    pub instancing: bool,
    pub instancing_color: bool,
    pub skinning: bool,

    // Output
    pub output_encoding: TextureEncoding,
    pub renderer_output_encoding: TextureEncoding,
    pub num_multiview_views: u32,
    pub tone_mapping: ToneMapping,

    // Texture slots
    pub map: bool,
    pub matcap: bool,
    pub env_map: bool,
    pub env_map_mode: Option<TextureMapping>,
    pub env_map_cube_uv_height: Option<u32>,
    pub light_map: bool,
    pub ao_map: bool,
    pub emissive_map: bool,
    pub bump_map: bool,
    pub normal_map: bool,
    pub object_space_normal_map: bool,
    pub tangent_space_normal_map: bool,
    pub decode_video_texture: bool,
    pub displacement_map: bool,
    pub roughness_map: bool,
    pub metalness_map: bool,
    pub specular_map: bool,
    pub specular_intensity_map: bool,
    pub specular_color_map: bool,
    pub alpha_map: bool,
    pub gradient_map: bool,

    // Physically based layers
    pub clearcoat: bool,
    pub clearcoat_map: bool,
    pub clearcoat_roughness_map: bool,
    pub clearcoat_normal_map: bool,
    pub iridescence: bool,
    pub iridescence_map: bool,
    pub iridescence_thickness_map: bool,
    pub sheen: bool,
    pub sheen_color_map: bool,
    pub sheen_roughness_map: bool,
    pub transmission: bool,
    pub transmission_map: bool,
    pub thickness_map: bool,

    // Material settings
    pub opaque: bool,
    pub alpha_test: bool,
    pub combine: Option<Combine>,
    pub flat_shading: bool,
    pub size_attenuation: Option<bool>,
    pub dithering: bool,
    pub premultiplied_alpha: bool,
    pub double_sided: bool,
    pub flip_sided: bool,
    pub use_depth_packing: bool,
    pub depth_packing: Option<DepthPacking>,

    // Vertex attributes
    pub vertex_tangents: bool,
    pub vertex_colors: bool,
    pub vertex_alphas: bool,
    pub vertex_uvs: bool,
    pub uvs_vertex_only: bool,

    // Fog
    pub fog: bool,
    pub use_fog: bool,
    pub fog_exp2: bool,

    // Morph targets
    pub morph_targets: bool,
    pub morph_normals: bool,
    pub morph_colors: bool,
    pub morph_targets_count: u32,
    pub morph_texture_stride: u32,

    // Lights & shadows
    pub lights: LightsState,
    pub shadow_map_enabled: bool,
    pub shadow_map_type: ShadowMapType,
    pub physically_correct_lights: bool,

    // Clipping
    pub num_clipping_planes: u32,
    pub num_clip_intersection: u32,

    // Extensions
    pub index0_attribute_name: Option<String>,
    pub extension_derivatives: bool,
    pub extension_frag_depth: bool,
    pub extension_draw_buffers: bool,
    pub extension_shader_texture_lod: bool,
    pub renderer_extension_frag_depth: bool,
    pub renderer_extension_draw_buffers: bool,
    pub renderer_extension_shader_texture_lod: bool,

    pub custom_program_cache_key: String,
}

/// Whether any texture slot requiring UV coordinates is set.
fn needs_vertex_uvs(maps: &MaterialMaps) -> bool {
    maps.map.is_some()
        || maps.bump_map.is_some()
        || maps.normal_map.is_some()
        || maps.specular_map.is_some()
        || maps.alpha_map.is_some()
        || maps.emissive_map.is_some()
        || maps.roughness_map.is_some()
        || maps.metalness_map.is_some()
        || maps.clearcoat_map.is_some()
        || maps.clearcoat_roughness_map.is_some()
        || maps.clearcoat_normal_map.is_some()
        || maps.iridescence_map.is_some()
        || maps.iridescence_thickness_map.is_some()
        || maps.displacement_map.is_some()
        || maps.transmission_map.is_some()
        || maps.thickness_map.is_some()
        || maps.specular_intensity_map.is_some()
        || maps.specular_color_map.is_some()
        || maps.sheen_color_map.is_some()
        || maps.sheen_roughness_map.is_some()
}

/// Whether UVs are needed only by displacement, i.e. only in the vertex stage.
fn uvs_vertex_only(material: &Material) -> bool {
    let maps = &material.maps;
    let physical = &material.physical;

    let fragment_uvs = maps.map.is_some()
        || maps.bump_map.is_some()
        || maps.normal_map.is_some()
        || maps.specular_map.is_some()
        || maps.alpha_map.is_some()
        || maps.emissive_map.is_some()
        || maps.roughness_map.is_some()
        || maps.metalness_map.is_some()
        || maps.clearcoat_normal_map.is_some()
        || maps.iridescence_map.is_some()
        || maps.iridescence_thickness_map.is_some()
        || physical.transmission > 0.0
        || maps.transmission_map.is_some()
        || maps.thickness_map.is_some()
        || maps.specular_intensity_map.is_some()
        || maps.specular_color_map.is_some()
        || physical.sheen > 0.0
        || maps.sheen_color_map.is_some()
        || maps.sheen_roughness_map.is_some();

    !fragment_uvs && maps.displacement_map.is_some()
}

// ─── ParameterExtractor ──────────────────────────────────────────────────────

/// Builds [`ProgramParameters`] from draw inputs.
pub struct ParameterExtractor {
    settings: ProgramCacheSettings,
    env_maps: Box<dyn EnvMapResolver>,
}

impl std::fmt::Debug for ParameterExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterExtractor")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ParameterExtractor {
    #[must_use]
    pub fn new(settings: ProgramCacheSettings) -> Self {
        Self {
            settings,
            env_maps: Box::new(PassthroughEnvMaps),
        }
    }

    pub fn set_env_map_resolver(&mut self, resolver: Box<dyn EnvMapResolver>) {
        self.env_maps = resolver;
    }

    #[must_use]
    pub fn settings(&self) -> &ProgramCacheSettings {
        &self.settings
    }

    /// Precision for a material: the requested one clamped to what the
    /// device supports, or the device default when none is requested.
    ///
    /// Evaluated per material; a clamp for one material never affects
    /// another.
    #[must_use]
    pub fn resolve_precision(&self, material: &Material) -> Precision {
        let capabilities = &self.settings.capabilities;
        match material.settings.precision {
            Some(requested) => {
                let precision = capabilities.max_precision_for(requested);
                if precision != requested {
                    log::warn!(
                        "ShaderPrograms::get_parameters: {requested} not supported, using {precision} instead."
                    );
                }
                precision
            }
            None => capabilities.precision,
        }
    }

    fn resolve_env_map(&mut self, inputs: &ProgramInputs<'_>) -> Option<TextureRef> {
        let material = inputs.material;
        let is_standard = material.kind().is_standard();

        let source = material.maps.env_map.as_ref().or_else(|| {
            if is_standard {
                inputs.scene.environment.as_ref()
            } else {
                None
            }
        })?;

        let target = if is_standard {
            EnvMapTarget::CubeUv
        } else {
            EnvMapTarget::Cube
        };
        self.env_maps.resolve(source, target)
    }

    /// Extracts the parameters of one draw.
    ///
    /// Custom shader materials get their stages recorded in
    /// `custom_shaders`; builtin materials take their source from
    /// `shader_lib`.
    pub fn extract(
        &mut self,
        inputs: &ProgramInputs<'_>,
        shader_lib: &ShaderLib,
        custom_shaders: &mut CustomShaderCache,
    ) -> ProgramParameters {
        let material = inputs.material;
        let maps = &material.maps;
        let settings = &material.settings;
        let physical = &material.physical;
        let geometry = inputs.object.geometry;
        let morph = &geometry.morph_attributes;
        let renderer = inputs.renderer;
        let capabilities = self.settings.capabilities;
        let extensions = self.settings.extensions;

        let env_map = self.resolve_env_map(inputs);
        let env_map_mode = env_map.as_ref().map(|t| t.mapping);
        let env_map_cube_uv_height = env_map
            .as_ref()
            .filter(|t| t.mapping == TextureMapping::CubeUvReflection)
            .map(|t| t.image.height);

        let source = ShaderSource::of(material.kind());
        let precision = self.resolve_precision(material);

        let (
            shader_id,
            vertex_shader,
            fragment_shader,
            custom_vertex_shader_id,
            custom_fragment_shader_id,
        ) = match source {
            ShaderSource::Builtin(id) => {
                let entry = shader_lib.get(id);
                (
                    Some(id),
                    Arc::clone(&entry.vertex_shader),
                    Arc::clone(&entry.fragment_shader),
                    None,
                    None,
                )
            }
            ShaderSource::Custom(shader) => {
                custom_shaders.update(material);
                (
                    None,
                    Arc::clone(&shader.vertex_shader),
                    Arc::clone(&shader.fragment_shader),
                    custom_shaders.vertex_shader_id(material),
                    custom_shaders.fragment_shader_id(material),
                )
            }
        };

        let custom = material.custom_shader();

        let use_clearcoat = physical.clearcoat > 0.0;
        let use_iridescence = physical.iridescence > 0.0;

        let is_webgl2 = capabilities.is_webgl2;

        ProgramParameters {
            shader_id,
            shader_name: material.type_name(),
            vertex_shader,
            fragment_shader,
            defines: material.defines.clone(),
            custom_vertex_shader_id,
            custom_fragment_shader_id,
            is_raw_shader_material: material.kind().is_raw_shader(),
            glsl_version: custom.and_then(|s| s.glsl_version),

            is_webgl2,
            precision,
            supports_vertex_textures: capabilities.vertex_textures,
            logarithmic_depth_buffer: capabilities.logarithmic_depth_buffer,

            instancing: inputs.object.is_instanced(),
            instancing_color: inputs.object.has_instance_color(),
            skinning: inputs.object.is_skinned(),

            output_encoding: renderer.target_encoding(),
            renderer_output_encoding: renderer.output_encoding,
            num_multiview_views: renderer.multiview_views(),
            tone_mapping: if settings.tone_mapped {
                renderer.tone_mapping
            } else {
                ToneMapping::None
            },

            map: maps.map.is_some(),
            matcap: maps.matcap.is_some(),
            env_map: env_map.is_some(),
            env_map_mode,
            env_map_cube_uv_height,
            light_map: maps.light_map.is_some(),
            ao_map: maps.ao_map.is_some(),
            emissive_map: maps.emissive_map.is_some(),
            bump_map: maps.bump_map.is_some(),
            normal_map: maps.normal_map.is_some(),
            object_space_normal_map: settings.normal_map_type == NormalMapType::ObjectSpace,
            tangent_space_normal_map: settings.normal_map_type == NormalMapType::TangentSpace,
            decode_video_texture: maps
                .map
                .as_ref()
                .is_some_and(|t| t.is_video() && t.encoding == TextureEncoding::Srgb),
            displacement_map: maps.displacement_map.is_some(),
            roughness_map: maps.roughness_map.is_some(),
            metalness_map: maps.metalness_map.is_some(),
            specular_map: maps.specular_map.is_some(),
            specular_intensity_map: maps.specular_intensity_map.is_some(),
            specular_color_map: maps.specular_color_map.is_some(),
            alpha_map: maps.alpha_map.is_some(),
            gradient_map: maps.gradient_map.is_some(),

            clearcoat: use_clearcoat,
            clearcoat_map: use_clearcoat && maps.clearcoat_map.is_some(),
            clearcoat_roughness_map: use_clearcoat && maps.clearcoat_roughness_map.is_some(),
            clearcoat_normal_map: use_clearcoat && maps.clearcoat_normal_map.is_some(),
            iridescence: use_iridescence,
            iridescence_map: use_iridescence && maps.iridescence_map.is_some(),
            iridescence_thickness_map: use_iridescence
                && maps.iridescence_thickness_map.is_some(),
            sheen: physical.sheen > 0.0,
            sheen_color_map: maps.sheen_color_map.is_some(),
            sheen_roughness_map: maps.sheen_roughness_map.is_some(),
            transmission: physical.transmission > 0.0,
            transmission_map: maps.transmission_map.is_some(),
            thickness_map: maps.thickness_map.is_some(),

            opaque: !settings.transparent && settings.blending == Blending::Normal,
            alpha_test: settings.alpha_test > 0.0,
            combine: settings.combine,
            flat_shading: settings.flat_shading,
            size_attenuation: settings.size_attenuation,
            dithering: settings.dithering,
            premultiplied_alpha: settings.premultiplied_alpha,
            double_sided: settings.side == Side::Double,
            flip_sided: settings.side == Side::Back,
            use_depth_packing: settings.depth_packing.is_some(),
            depth_packing: settings.depth_packing,

            vertex_tangents: maps.normal_map.is_some() && geometry.has_tangent,
            vertex_colors: settings.vertex_colors,
            vertex_alphas: settings.vertex_colors && geometry.color_item_size == Some(4),
            vertex_uvs: needs_vertex_uvs(maps),
            uvs_vertex_only: uvs_vertex_only(material),

            fog: inputs.scene.fog.is_some(),
            use_fog: settings.fog,
            fog_exp2: inputs.scene.fog.as_ref().is_some_and(|f| f.is_exp2()),

            morph_targets: morph.position.is_some(),
            morph_normals: morph.normal.is_some(),
            morph_colors: morph.color.is_some(),
            morph_targets_count: morph.targets_count(),
            morph_texture_stride: morph.texture_stride(),

            lights: *inputs.lights,
            shadow_map_enabled: renderer.shadow_map.enabled && !inputs.shadows.is_empty(),
            shadow_map_type: renderer.shadow_map.kind,
            physically_correct_lights: renderer.physically_correct_lights,

            num_clipping_planes: inputs.clipping.num_planes,
            num_clip_intersection: inputs.clipping.num_intersection,

            index0_attribute_name: custom.and_then(|s| s.index0_attribute_name.clone()),
            extension_derivatives: material.extensions.derivatives,
            extension_frag_depth: material.extensions.frag_depth,
            extension_draw_buffers: material.extensions.draw_buffers,
            extension_shader_texture_lod: material.extensions.shader_texture_lod,
            renderer_extension_frag_depth: is_webgl2
                || extensions.has(GpuExtensions::FRAG_DEPTH),
            renderer_extension_draw_buffers: is_webgl2
                || extensions.has(GpuExtensions::DRAW_BUFFERS),
            renderer_extension_shader_texture_lod: is_webgl2
                || extensions.has(GpuExtensions::SHADER_TEXTURE_LOD),

            custom_program_cache_key: material.custom_program_cache_key().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::settings::{Capabilities, RenderTarget};
    use crate::resources::geometry::{GeometryLayout, MorphAttributes};
    use crate::resources::material::{CustomShader, MaterialKind};
    use crate::resources::texture::Texture;
    use crate::scene::{Fog, LightKind, ObjectKind};
    use glam::Vec3;

    struct Fixture {
        lights: LightsState,
        scene: SceneState,
        geometry: GeometryLayout,
        renderer: RendererState,
        clipping: ClippingState,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                lights: LightsState::default(),
                scene: SceneState::default(),
                geometry: GeometryLayout::default(),
                renderer: RendererState::default(),
                clipping: ClippingState::default(),
            }
        }

        fn extract_with(
            &self,
            extractor: &mut ParameterExtractor,
            material: &Material,
            shadows: &[Light],
        ) -> ProgramParameters {
            let inputs = ProgramInputs {
                material,
                lights: &self.lights,
                shadows,
                scene: &self.scene,
                object: RenderObject::mesh(&self.geometry),
                renderer: &self.renderer,
                clipping: &self.clipping,
            };
            extractor.extract(&inputs, &ShaderLib::new(), &mut CustomShaderCache::new())
        }

        fn extract(&self, material: &Material) -> ProgramParameters {
            let mut extractor = ParameterExtractor::new(ProgramCacheSettings::default());
            self.extract_with(&mut extractor, material, &[])
        }
    }

    #[test]
    fn basic_material_defaults() {
        let fx = Fixture::new();
        let params = fx.extract(&Material::new_basic());

        assert_eq!(params.shader_id, Some(ShaderId::Basic));
        assert_eq!(params.shader_name, "MeshBasicMaterial");
        assert!(!params.map);
        assert!(!params.vertex_uvs);
        assert!(params.opaque);
        assert!(params.use_fog);
        assert!(!params.fog);
        assert_eq!(params.combine, Some(Combine::Multiply));
        assert_eq!(params.precision, Precision::High);
        assert!(params.custom_vertex_shader_id.is_none());
    }

    #[test]
    fn precision_is_clamped_per_material() {
        let fx = Fixture::new();
        let mut extractor = ParameterExtractor::new(ProgramCacheSettings {
            capabilities: Capabilities {
                max_precision: Precision::Medium,
                precision: Precision::Medium,
                ..Default::default()
            },
            ..Default::default()
        });

        let mut high = Material::new_basic();
        high.settings.precision = Some(Precision::High);
        let mut low = Material::new_basic();
        low.settings.precision = Some(Precision::Low);

        assert_eq!(fx.extract_with(&mut extractor, &high, &[]).precision, Precision::Medium);
        // No ratchet: a later material gets its own request
        assert_eq!(fx.extract_with(&mut extractor, &low, &[]).precision, Precision::Low);
        assert_eq!(
            fx.extract_with(&mut extractor, &Material::new_basic(), &[]).precision,
            Precision::Medium
        );
    }

    #[test]
    fn scene_environment_only_for_standard_materials() {
        let mut fx = Fixture::new();
        fx.scene.environment = Some(Texture::new_cube_uv(768, 1024).into_ref());

        let standard = fx.extract(&Material::new_standard());
        assert!(standard.env_map);
        assert_eq!(standard.env_map_mode, Some(TextureMapping::CubeUvReflection));
        assert_eq!(standard.env_map_cube_uv_height, Some(1024));

        let phong = fx.extract(&Material::new(MaterialKind::MeshPhong));
        assert!(!phong.env_map);
        assert_eq!(phong.env_map_mode, None);
        assert_eq!(phong.env_map_cube_uv_height, None);
    }

    #[test]
    fn cube_env_map_has_no_height() {
        let fx = Fixture::new();
        let mut mat = Material::new(MaterialKind::MeshPhong);
        mat.maps.env_map = Some(
            Texture::new_2d(512, 512)
                .with_mapping(TextureMapping::CubeReflection)
                .into_ref(),
        );

        let params = fx.extract(&mat);
        assert!(params.env_map);
        assert_eq!(params.env_map_mode, Some(TextureMapping::CubeReflection));
        assert_eq!(params.env_map_cube_uv_height, None);
    }

    #[test]
    fn displacement_only_uvs() {
        let fx = Fixture::new();
        let mut mat = Material::new_standard();
        mat.maps.displacement_map = Some(Texture::new_2d(4, 4).into_ref());

        let params = fx.extract(&mat);
        assert!(params.vertex_uvs);
        assert!(params.uvs_vertex_only);

        mat.maps.map = Some(Texture::new_2d(4, 4).into_ref());
        let params = fx.extract(&mat);
        assert!(params.vertex_uvs);
        assert!(!params.uvs_vertex_only);

        // Sheen needs fragment UVs even without a sheen map
        mat.maps.map = None;
        mat.physical.sheen = 1.0;
        assert!(!fx.extract(&mat).uvs_vertex_only);
    }

    #[test]
    fn clearcoat_maps_require_clearcoat() {
        let fx = Fixture::new();
        let mut mat = Material::new_physical();
        mat.maps.clearcoat_map = Some(Texture::new_2d(4, 4).into_ref());

        let params = fx.extract(&mat);
        assert!(!params.clearcoat);
        assert!(!params.clearcoat_map);
        // The slot still asks for UVs
        assert!(params.vertex_uvs);

        mat.physical.clearcoat = 1.0;
        let params = fx.extract(&mat);
        assert!(params.clearcoat);
        assert!(params.clearcoat_map);
    }

    #[test]
    fn morph_and_vertex_attributes() {
        let mut fx = Fixture::new();
        fx.geometry = GeometryLayout::new()
            .with_tangents()
            .with_colors(4)
            .with_morph_attributes(MorphAttributes {
                position: Some(3),
                normal: Some(3),
                color: None,
            });

        let mut mat = Material::new_standard();
        mat.settings.vertex_colors = true;
        mat.maps.normal_map = Some(Texture::new_2d(4, 4).into_ref());

        let params = fx.extract(&mat);
        assert!(params.morph_targets);
        assert!(params.morph_normals);
        assert!(!params.morph_colors);
        assert_eq!(params.morph_targets_count, 3);
        assert_eq!(params.morph_texture_stride, 2);
        assert!(params.vertex_tangents);
        assert!(params.vertex_colors);
        assert!(params.vertex_alphas);
    }

    #[test]
    fn renderer_state_projection() {
        let mut fx = Fixture::new();
        fx.renderer.tone_mapping = ToneMapping::AcesFilmic;
        fx.renderer.output_encoding = TextureEncoding::Srgb;
        fx.renderer.shadow_map.enabled = true;
        fx.renderer.render_target = Some(RenderTarget::Multiview { num_views: 2 });
        fx.scene.fog = Some(Fog::Exp2 { color: Vec3::ONE, density: 0.1 });

        let mut mat = Material::new_standard();
        let shadow_casters = [Light::new(LightKind::Directional).with_shadows()];
        let mut extractor = ParameterExtractor::new(ProgramCacheSettings::default());

        let params = fx.extract_with(&mut extractor, &mat, &shadow_casters);
        assert_eq!(params.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(params.output_encoding, TextureEncoding::Linear);
        assert_eq!(params.renderer_output_encoding, TextureEncoding::Srgb);
        assert_eq!(params.num_multiview_views, 2);
        assert!(params.shadow_map_enabled);
        assert!(params.fog);
        assert!(params.fog_exp2);

        mat.settings.tone_mapped = false;
        let params = fx.extract_with(&mut extractor, &mat, &[]);
        assert_eq!(params.tone_mapping, ToneMapping::None);
        assert!(!params.shadow_map_enabled);
    }

    #[test]
    fn object_kind_flags() {
        let fx = Fixture::new();
        let mat = Material::new_basic();
        let mut extractor = ParameterExtractor::new(ProgramCacheSettings::default());

        let inputs = ProgramInputs {
            material: &mat,
            lights: &fx.lights,
            shadows: &[],
            scene: &fx.scene,
            object: RenderObject::new(ObjectKind::InstancedMesh { instance_color: true }, &fx.geometry),
            renderer: &fx.renderer,
            clipping: &fx.clipping,
        };
        let params = extractor.extract(&inputs, &ShaderLib::new(), &mut CustomShaderCache::new());
        assert!(params.instancing);
        assert!(params.instancing_color);
        assert!(!params.skinning);
    }

    #[test]
    fn custom_shader_records_stage_ids() {
        let fx = Fixture::new();
        let mat = Material::new_raw_shader(CustomShader::new("vs", "fs"));
        let mut extractor = ParameterExtractor::new(ProgramCacheSettings::default());
        let mut custom = CustomShaderCache::new();

        let inputs = ProgramInputs {
            material: &mat,
            lights: &fx.lights,
            shadows: &[],
            scene: &fx.scene,
            object: RenderObject::mesh(&fx.geometry),
            renderer: &fx.renderer,
            clipping: &fx.clipping,
        };
        let params = extractor.extract(&inputs, &ShaderLib::new(), &mut custom);

        assert_eq!(params.shader_id, None);
        assert!(params.is_raw_shader_material);
        assert_eq!(params.vertex_shader.as_ref(), "vs");
        assert!(params.custom_vertex_shader_id.is_some());
        assert_eq!(params.custom_vertex_shader_id, custom.vertex_shader_id(&mat));
    }
}
