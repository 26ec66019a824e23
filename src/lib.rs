#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod utils;

pub use errors::{ProgramError, Result};
pub use renderer::pipeline::{
    ProgramBackend, ProgramCacheKey, ProgramId, ProgramInputs, ProgramParameters, ShaderId,
    ShaderPrograms,
};
pub use renderer::{ProgramCacheSettings, RendererState};
pub use resources::{CustomShader, Material, MaterialKind, ShaderDefines, Texture};
pub use scene::{Light, LightsState, RenderObject, SceneState};
pub use utils::interner;
