//! Program selection pipeline
//!
//! - `parameters`: draw inputs → [`ProgramParameters`]
//! - `shader_cache`: content identities of custom shader stages
//! - `program_key`: [`ProgramParameters`] → [`ProgramCacheKey`]
//! - `program_pool`: reference counted compiled programs
//! - `shader_lib`: builtin shader source and default uniforms
//! - `programs`: the [`ShaderPrograms`] entry point

pub mod parameters;
pub mod program_key;
pub mod program_pool;
pub mod programs;
pub mod shader_cache;
pub mod shader_lib;

pub use parameters::{
    EnvMapResolver, EnvMapTarget, ParameterExtractor, PassthroughEnvMaps, ProgramInputs,
    ProgramParameters,
};
pub use program_key::{
    ProgramCacheKey, ProgramFeatures, ProgramStateFlags, ShaderIdentity, VariantKey,
};
pub use program_pool::{CompiledProgram, ProgramBackend, ProgramId, ProgramPool};
pub use programs::ShaderPrograms;
pub use shader_cache::{CustomShaderCache, ShaderStageId};
pub use shader_lib::{ShaderEntry, ShaderId, ShaderLib, ShaderSource};
