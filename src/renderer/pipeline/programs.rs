//! Shader Programs
//!
//! [`ShaderPrograms`] is the renderer-scoped entry point of program
//! selection. One draw goes through it as:
//!
//! ```rust,ignore
//! let parameters = programs.get_parameters(&inputs);
//! let key = programs.get_program_cache_key(&parameters);
//! let program = programs.acquire_program(&parameters, &key)?;
//! let uniforms = programs.get_uniforms(&material);
//! // ... draw ...
//! programs.release_program(program);
//! ```
//!
//! Disposed materials are reported with
//! [`release_shader_cache`](ShaderPrograms::release_shader_cache).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::Result;
use crate::renderer::pipeline::parameters::{
    EnvMapResolver, ParameterExtractor, ProgramInputs, ProgramParameters,
};
use crate::renderer::pipeline::program_key::ProgramCacheKey;
use crate::renderer::pipeline::program_pool::{
    CompiledProgram, ProgramBackend, ProgramId, ProgramPool,
};
use crate::renderer::pipeline::shader_cache::CustomShaderCache;
use crate::renderer::pipeline::shader_lib::{ShaderLib, ShaderSource};
use crate::renderer::settings::ProgramCacheSettings;
use crate::resources::material::Material;
use crate::resources::uniforms::SharedUniforms;
use crate::utils::interner;

pub struct ShaderPrograms<B: ProgramBackend> {
    extractor: ParameterExtractor,
    shader_lib: ShaderLib,
    custom_shaders: CustomShaderCache,
    pool: ProgramPool<B>,
}

impl<B: ProgramBackend> ShaderPrograms<B> {
    #[must_use]
    pub fn new(backend: B, settings: ProgramCacheSettings) -> Self {
        interner::preload_common_defines();
        Self {
            extractor: ParameterExtractor::new(settings),
            shader_lib: ShaderLib::new(),
            custom_shaders: CustomShaderCache::new(),
            pool: ProgramPool::new(backend),
        }
    }

    #[must_use]
    pub fn with_shader_lib(mut self, shader_lib: ShaderLib) -> Self {
        self.shader_lib = shader_lib;
        self
    }

    pub fn set_env_map_resolver(&mut self, resolver: Box<dyn EnvMapResolver>) {
        self.extractor.set_env_map_resolver(resolver);
    }

    #[must_use]
    pub fn settings(&self) -> &ProgramCacheSettings {
        self.extractor.settings()
    }

    #[must_use]
    pub fn shader_lib(&self) -> &ShaderLib {
        &self.shader_lib
    }

    pub fn shader_lib_mut(&mut self) -> &mut ShaderLib {
        &mut self.shader_lib
    }

    #[must_use]
    pub fn custom_shaders(&self) -> &CustomShaderCache {
        &self.custom_shaders
    }

    // ── Parameters & keys ────────────────────────────────────────────────────

    pub fn get_parameters(&mut self, inputs: &ProgramInputs<'_>) -> ProgramParameters {
        self.extractor
            .extract(inputs, &self.shader_lib, &mut self.custom_shaders)
    }

    #[must_use]
    pub fn get_program_cache_key(&self, parameters: &ProgramParameters) -> ProgramCacheKey {
        ProgramCacheKey::from_parameters(parameters)
    }

    // ── Uniforms ─────────────────────────────────────────────────────────────

    /// Uniforms for a material.
    ///
    /// Builtin materials get an independent copy of their shader's default
    /// uniforms. Custom shader materials get their own uniform set, shared.
    #[must_use]
    pub fn get_uniforms(&self, material: &Material) -> SharedUniforms {
        match ShaderSource::of(material.kind()) {
            ShaderSource::Builtin(id) => {
                Arc::new(RwLock::new(self.shader_lib.get(id).uniforms.clone()))
            }
            ShaderSource::Custom(shader) => Arc::clone(&shader.uniforms),
        }
    }

    // ── Program pool ─────────────────────────────────────────────────────────

    pub fn acquire_program(
        &mut self,
        parameters: &ProgramParameters,
        cache_key: &ProgramCacheKey,
    ) -> Result<ProgramId> {
        self.pool.acquire(parameters, cache_key)
    }

    /// # Panics
    ///
    /// Panics if `program` was already released as often as it was acquired.
    pub fn release_program(&mut self, program: ProgramId) {
        self.pool.release(program);
    }

    #[must_use]
    pub fn program(&self, id: ProgramId) -> Option<&CompiledProgram<B::Program>> {
        self.pool.get(id)
    }

    /// Live programs, for resource accounting.
    pub fn programs(&self) -> impl Iterator<Item = (ProgramId, &CompiledProgram<B::Program>)> {
        self.pool.programs()
    }

    #[must_use]
    pub fn program_count(&self) -> usize {
        self.pool.program_count()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        self.pool.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.pool.backend_mut()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Forgets the custom shader stages of a disposed material.
    pub fn release_shader_cache(&mut self, material: &Material) {
        self.custom_shaders.remove(material.id());
    }

    /// Renderer teardown: drops custom shader state and destroys every
    /// remaining program.
    pub fn dispose(&mut self) {
        self.custom_shaders.dispose();
        self.pool.clear();
    }
}

impl<B: ProgramBackend> std::fmt::Debug for ShaderPrograms<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderPrograms")
            .field("extractor", &self.extractor)
            .field("custom_shaders", &self.custom_shaders)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
