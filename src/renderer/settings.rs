//! Renderer Settings & Device Capabilities
//!
//! Inputs that program selection reads from the renderer:
//!
//! - [`ProgramCacheSettings`]: fixed at construction (device capabilities and
//!   available GPU extensions).
//! - [`RendererState`]: per-frame state (render target, output encoding,
//!   tone mapping, shadow map configuration).
//! - [`ClippingState`]: active user clipping planes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_programs::renderer::{Capabilities, ProgramCacheSettings};
//! use myth_programs::resources::Precision;
//!
//! // Defaults: WebGL2-class device, highp, vertex textures available
//! let settings = ProgramCacheSettings::default();
//!
//! // A mobile device that tops out at mediump
//! let settings = ProgramCacheSettings {
//!     capabilities: Capabilities {
//!         precision: Precision::Medium,
//!         max_precision: Precision::Medium,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! ```

use bitflags::bitflags;

use crate::resources::material::Precision;
use crate::resources::texture::TextureEncoding;

// ---------------------------------------------------------------------------
// Renderer enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ToneMapping {
    #[default]
    None,
    Linear,
    Reinhard,
    Cineon,
    AcesFilmic,
    Custom,
}

/// Shadow filtering algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ShadowMapType {
    Basic,
    #[default]
    Pcf,
    PcfSoft,
    Vsm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShadowMapSettings {
    pub enabled: bool,
    pub kind: ShadowMapType,
}

/// The render target currently bound, when not drawing to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// A regular offscreen target; always written in linear encoding.
    Offscreen,
    /// An XR session target, written in its texture's encoding.
    Xr { encoding: TextureEncoding },
    /// A multiview target rendering `num_views` views per draw.
    Multiview { num_views: u32 },
}

// ---------------------------------------------------------------------------
// RendererState
// ---------------------------------------------------------------------------

/// Per-frame renderer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RendererState {
    pub render_target: Option<RenderTarget>,
    /// Output encoding used when drawing to the canvas.
    pub output_encoding: TextureEncoding,
    pub tone_mapping: ToneMapping,
    pub shadow_map: ShadowMapSettings,
    pub physically_correct_lights: bool,
}

impl RendererState {
    /// Encoding of the surface the current draw writes to.
    #[must_use]
    pub fn target_encoding(&self) -> TextureEncoding {
        match self.render_target {
            None => self.output_encoding,
            Some(RenderTarget::Xr { encoding }) => encoding,
            Some(RenderTarget::Offscreen | RenderTarget::Multiview { .. }) => {
                TextureEncoding::Linear
            }
        }
    }

    /// View count of a multiview target, 0 otherwise.
    #[must_use]
    pub fn multiview_views(&self) -> u32 {
        match self.render_target {
            Some(RenderTarget::Multiview { num_views }) => num_views,
            _ => 0,
        }
    }
}

/// Active user clipping planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClippingState {
    pub num_planes: u32,
    pub num_intersection: u32,
}

// ---------------------------------------------------------------------------
// Device capabilities
// ---------------------------------------------------------------------------

bitflags! {
    /// Optional GPU extensions reported by the device.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct GpuExtensions: u32 {
        const FRAG_DEPTH         = 1 << 0;
        const DRAW_BUFFERS       = 1 << 1;
        const SHADER_TEXTURE_LOD = 1 << 2;
        const DERIVATIVES        = 1 << 3;
    }
}

impl GpuExtensions {
    #[inline]
    #[must_use]
    pub fn has(self, extension: GpuExtensions) -> bool {
        self.contains(extension)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub is_webgl2: bool,
    /// Precision used when a material does not request one.
    pub precision: Precision,
    /// Highest precision the device supports in both shader stages.
    pub max_precision: Precision,
    pub vertex_textures: bool,
    pub logarithmic_depth_buffer: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            is_webgl2: true,
            precision: Precision::High,
            max_precision: Precision::High,
            vertex_textures: true,
            logarithmic_depth_buffer: false,
        }
    }
}

impl Capabilities {
    /// Best precision the device offers that does not exceed `requested`.
    #[inline]
    #[must_use]
    pub fn max_precision_for(&self, requested: Precision) -> Precision {
        requested.min(self.max_precision)
    }
}

/// Construction-time configuration of the program cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProgramCacheSettings {
    pub capabilities: Capabilities,
    pub extensions: GpuExtensions,
}
