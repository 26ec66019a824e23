//! Custom Shader Registry
//!
//! Assigns stable identities to the vertex / fragment stages of custom
//! shader materials. Stages are deduplicated by content: the source text is
//! hashed with xxh3-128, so two materials with byte-identical source share
//! one [`ShaderStageId`] and, through the cache key, one compiled program.
//!
//! Each stage is reference counted by the materials currently using it and
//! forgotten once the last of them is updated to other source or removed.

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_128;

use crate::resources::material::{Material, MaterialId};

/// Content-derived identity of a custom shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderStageId(pub(crate) u32);

impl std::fmt::Display for ShaderStageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct ShaderStage {
    id: ShaderStageId,
    used_times: u32,
}

#[derive(Debug, Clone, Copy)]
struct StageRef {
    code_hash: u128,
    id: ShaderStageId,
}

#[derive(Debug, Clone, Copy)]
struct MaterialStages {
    vertex: StageRef,
    fragment: StageRef,
}

#[derive(Debug, Default)]
pub struct CustomShaderCache {
    /// xxh3-128 of stage source → stage.
    stages: FxHashMap<u128, ShaderStage>,
    materials: FxHashMap<MaterialId, MaterialStages>,
    next_id: u32,
}

impl CustomShaderCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current source of a custom shader material.
    ///
    /// A stage whose source changed since the last update is swapped for the
    /// stage matching the new source. Builtin materials are ignored.
    pub fn update(&mut self, material: &Material) {
        let Some(shader) = material.custom_shader() else {
            return;
        };

        let vertex_hash = xxh3_128(shader.vertex_shader.as_bytes());
        let fragment_hash = xxh3_128(shader.fragment_shader.as_bytes());

        match self.materials.get(&material.id()).copied() {
            Some(current) => {
                let vertex = if current.vertex.code_hash == vertex_hash {
                    current.vertex
                } else {
                    let stage = self.acquire_stage(vertex_hash);
                    self.release_stage(current.vertex.code_hash);
                    stage
                };
                let fragment = if current.fragment.code_hash == fragment_hash {
                    current.fragment
                } else {
                    let stage = self.acquire_stage(fragment_hash);
                    self.release_stage(current.fragment.code_hash);
                    stage
                };
                self.materials
                    .insert(material.id(), MaterialStages { vertex, fragment });
            }
            None => {
                let vertex = self.acquire_stage(vertex_hash);
                let fragment = self.acquire_stage(fragment_hash);
                self.materials
                    .insert(material.id(), MaterialStages { vertex, fragment });
            }
        }
    }

    /// Vertex stage identity recorded by the last [`update`](Self::update).
    #[must_use]
    pub fn vertex_shader_id(&self, material: &Material) -> Option<ShaderStageId> {
        self.materials.get(&material.id()).map(|s| s.vertex.id)
    }

    /// Fragment stage identity recorded by the last [`update`](Self::update).
    #[must_use]
    pub fn fragment_shader_id(&self, material: &Material) -> Option<ShaderStageId> {
        self.materials.get(&material.id()).map(|s| s.fragment.id)
    }

    /// Forgets a disposed material. No-op if it was never recorded.
    pub fn remove(&mut self, material: MaterialId) {
        if let Some(stages) = self.materials.remove(&material) {
            self.release_stage(stages.vertex.code_hash);
            self.release_stage(stages.fragment.code_hash);
        }
    }

    /// Clears all state.
    pub fn dispose(&mut self) {
        self.stages.clear();
        self.materials.clear();
    }

    /// Number of distinct stage sources alive.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Number of materials with recorded stages.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn acquire_stage(&mut self, code_hash: u128) -> StageRef {
        let next_id = &mut self.next_id;
        let stage = self.stages.entry(code_hash).or_insert_with(|| {
            let id = ShaderStageId(*next_id);
            *next_id += 1;
            log::trace!("New custom shader stage {id}");
            ShaderStage { id, used_times: 0 }
        });
        stage.used_times += 1;
        StageRef {
            code_hash,
            id: stage.id,
        }
    }

    fn release_stage(&mut self, code_hash: u128) {
        if let Some(stage) = self.stages.get_mut(&code_hash) {
            stage.used_times -= 1;
            if stage.used_times == 0 {
                log::trace!("Custom shader stage {} no longer used", stage.id);
                self.stages.remove(&code_hash);
            }
        }
    }
}
