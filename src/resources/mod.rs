pub mod geometry;
pub mod material;
pub mod shader_defines;
pub mod texture;
pub mod uniforms;

pub use geometry::{GeometryLayout, MorphAttributes};
pub use material::{
    Blending, Combine, CustomShader, DepthPacking, GlslVersion, Material, MaterialId,
    MaterialKind, MaterialMaps, MaterialSettings, NormalMapType, PhysicalProperties, Precision,
    ShaderExtensions, Side,
};
pub use shader_defines::ShaderDefines;
pub use texture::{Texture, TextureEncoding, TextureMapping, TextureRef};
pub use uniforms::{SharedUniforms, Uniform, UniformSet, UniformValue};
