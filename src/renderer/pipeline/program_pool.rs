//! Program Pool
//!
//! Owner of every compiled program. Programs are stored in a [`SlotMap`] and
//! addressed through [`ProgramId`] handles; a hash index from
//! [`ProgramCacheKey`] to handle deduplicates compilation.
//!
//! Each program carries a usage count. [`ProgramPool::acquire`] increments
//! it (compiling on first use) and [`ProgramPool::release`] decrements it;
//! a program whose count reaches zero is evicted and handed back to the
//! backend for destruction.

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::errors::Result;
use crate::renderer::pipeline::parameters::ProgramParameters;
use crate::renderer::pipeline::program_key::ProgramCacheKey;

new_key_type! {
    /// Handle to a compiled program in a [`ProgramPool`].
    pub struct ProgramId;
}

/// GPU side of program management.
///
/// Implemented by the renderer on top of its graphics API; tests use a
/// recording mock.
pub trait ProgramBackend {
    type Program;

    /// Generates, compiles and links a program for `parameters`.
    fn compile(
        &mut self,
        parameters: &ProgramParameters,
        cache_key: &ProgramCacheKey,
    ) -> Result<Self::Program>;

    /// Frees a program evicted from the pool.
    fn destroy(&mut self, program: Self::Program);
}

/// A pooled program and its bookkeeping.
#[derive(Debug)]
pub struct CompiledProgram<P> {
    pub cache_key: ProgramCacheKey,
    /// Number of live [`ProgramPool::acquire`] calls not yet released.
    pub used_times: u32,
    /// Shader name of the material that first compiled the program.
    pub name: &'static str,
    pub program: P,
}

pub struct ProgramPool<B: ProgramBackend> {
    backend: B,
    programs: SlotMap<ProgramId, CompiledProgram<B::Program>>,
    lookup: FxHashMap<ProgramCacheKey, ProgramId>,
}

impl<B: ProgramBackend> ProgramPool<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            programs: SlotMap::with_key(),
            lookup: FxHashMap::default(),
        }
    }

    /// Returns the program for `cache_key`, compiling it if absent, and
    /// increments its usage count.
    ///
    /// On error nothing is inserted and no count changes.
    pub fn acquire(
        &mut self,
        parameters: &ProgramParameters,
        cache_key: &ProgramCacheKey,
    ) -> Result<ProgramId> {
        if let Some(&id) = self.lookup.get(cache_key) {
            let program = &mut self.programs[id];
            program.used_times += 1;
            log::trace!(
                "Program cache hit: {} ({:?}, used {} times)",
                program.name,
                id,
                program.used_times
            );
            return Ok(id);
        }

        let program = self
            .backend
            .compile(parameters, cache_key)
            .inspect_err(|e| log::error!("{e}"))?;

        let id = self.programs.insert(CompiledProgram {
            cache_key: cache_key.clone(),
            used_times: 1,
            name: parameters.shader_name,
            program,
        });
        self.lookup.insert(cache_key.clone(), id);

        log::debug!(
            "Compiled program {} ({:?}) key {:016x}",
            parameters.shader_name,
            id,
            cache_key.fingerprint()
        );

        Ok(id)
    }

    /// Decrements the usage count of `id`, evicting the program at zero.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the pool; releasing more often than
    /// acquiring is a caller bug.
    pub fn release(&mut self, id: ProgramId) {
        let Some(program) = self.programs.get_mut(id) else {
            panic!("released unknown program {id:?}");
        };

        program.used_times -= 1;
        if program.used_times > 0 {
            return;
        }

        if let Some(evicted) = self.programs.remove(id) {
            self.lookup.remove(&evicted.cache_key);
            log::debug!("Evicted program {} ({:?})", evicted.name, id);
            self.backend.destroy(evicted.program);
        }
    }

    /// Destroys every program regardless of usage counts.
    pub fn clear(&mut self) {
        self.lookup.clear();
        for (_, evicted) in self.programs.drain() {
            self.backend.destroy(evicted.program);
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: ProgramId) -> Option<&CompiledProgram<B::Program>> {
        self.programs.get(id)
    }

    #[must_use]
    pub fn find(&self, cache_key: &ProgramCacheKey) -> Option<ProgramId> {
        self.lookup.get(cache_key).copied()
    }

    /// All live programs, for resource accounting.
    pub fn programs(&self) -> impl Iterator<Item = (ProgramId, &CompiledProgram<B::Program>)> {
        self.programs.iter()
    }

    #[inline]
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ProgramBackend> std::fmt::Debug for ProgramPool<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramPool")
            .field("program_count", &self.programs.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProgramError;
    use crate::renderer::pipeline::parameters::{ParameterExtractor, ProgramInputs};
    use crate::renderer::pipeline::program_key::ShaderIdentity;
    use crate::renderer::pipeline::shader_cache::CustomShaderCache;
    use crate::renderer::pipeline::shader_lib::{ShaderId, ShaderLib};
    use crate::renderer::settings::{ClippingState, ProgramCacheSettings, RendererState};
    use crate::resources::geometry::GeometryLayout;
    use crate::resources::material::Material;
    use crate::resources::shader_defines::ShaderDefines;
    use crate::scene::{LightsState, RenderObject, SceneState};

    #[derive(Default)]
    struct CountingBackend {
        compiled: u32,
        destroyed: Vec<u32>,
        fail: bool,
    }

    impl ProgramBackend for CountingBackend {
        type Program = u32;

        fn compile(&mut self, _: &ProgramParameters, _: &ProgramCacheKey) -> Result<u32> {
            if self.fail {
                return Err(ProgramError::Backend("lost context".into()));
            }
            self.compiled += 1;
            Ok(self.compiled)
        }

        fn destroy(&mut self, program: u32) {
            self.destroyed.push(program);
        }
    }

    fn parameters() -> ProgramParameters {
        let material = Material::new_basic();
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

    fn key(custom: &str) -> ProgramCacheKey {
        ProgramCacheKey {
            shader: ShaderIdentity::Builtin(ShaderId::Basic),
            defines: ShaderDefines::new(),
            variant: None,
            custom: custom.to_owned(),
        }
    }

    #[test]
    fn equal_keys_share_one_program() {
        let params = parameters();
        let mut pool = ProgramPool::new(CountingBackend::default());

        let a = pool.acquire(&params, &key("a")).unwrap();
        let b = pool.acquire(&params, &key("a")).unwrap();
        let c = pool.acquire(&params, &key("c")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.backend().compiled, 2);
        assert_eq!(pool.get(a).unwrap().used_times, 2);
        assert_eq!(pool.get(a).unwrap().name, "MeshBasicMaterial");
    }

    #[test]
    fn eviction_at_zero_uses() {
        let params = parameters();
        let mut pool = ProgramPool::new(CountingBackend::default());

        let id = pool.acquire(&params, &key("a")).unwrap();
        pool.acquire(&params, &key("a")).unwrap();

        pool.release(id);
        assert_eq!(pool.program_count(), 1);
        assert!(pool.backend().destroyed.is_empty());

        pool.release(id);
        assert_eq!(pool.program_count(), 0);
        assert_eq!(pool.backend().destroyed, vec![1]);
        assert!(pool.find(&key("a")).is_none());

        // A fresh acquire recompiles
        pool.acquire(&params, &key("a")).unwrap();
        assert_eq!(pool.backend().compiled, 2);
    }

    #[test]
    fn failed_compile_leaves_pool_untouched() {
        let params = parameters();
        let mut pool = ProgramPool::new(CountingBackend {
            fail: true,
            ..Default::default()
        });

        let result = pool.acquire(&params, &key("a"));
        assert!(matches!(result, Err(ProgramError::Backend(_))));
        assert_eq!(pool.program_count(), 0);
        assert!(pool.find(&key("a")).is_none());
    }

    #[test]
    #[should_panic(expected = "released unknown program")]
    fn over_release_panics() {
        let params = parameters();
        let mut pool = ProgramPool::new(CountingBackend::default());
        let id = pool.acquire(&params, &key("a")).unwrap();
        pool.release(id);
        pool.release(id);
    }

    #[test]
    fn clear_destroys_all() {
        let params = parameters();
        let mut pool = ProgramPool::new(CountingBackend::default());
        pool.acquire(&params, &key("a")).unwrap();
        pool.acquire(&params, &key("b")).unwrap();

        pool.clear();
        assert_eq!(pool.program_count(), 0);
        assert_eq!(pool.backend().destroyed.len(), 2);
    }
}
