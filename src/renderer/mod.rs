pub mod pipeline;
pub mod settings;

pub use pipeline::{ProgramCacheKey, ProgramId, ProgramParameters, ShaderPrograms};
pub use settings::{
    Capabilities, ClippingState, GpuExtensions, ProgramCacheSettings, RenderTarget,
    RendererState, ShadowMapSettings, ShadowMapType, ToneMapping,
};
