use std::sync::Arc;

use uuid::Uuid;

/// How a texture is projected onto geometry.
///
/// Environment maps use the cube / equirectangular variants; the cube-UV
/// layout is the packed mip chain produced by prefiltering, whose sampling
/// code depends on the texel height of the packed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TextureMapping {
    #[default]
    Uv,
    CubeReflection,
    CubeRefraction,
    EquirectangularReflection,
    EquirectangularRefraction,
    CubeUvReflection,
}

impl TextureMapping {
    #[inline]
    #[must_use]
    pub fn is_cube(self) -> bool {
        matches!(self, Self::CubeReflection | Self::CubeRefraction)
    }

    #[inline]
    #[must_use]
    pub fn is_equirectangular(self) -> bool {
        matches!(
            self,
            Self::EquirectangularReflection | Self::EquirectangularRefraction
        )
    }
}

/// Color encoding of texel data or of the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TextureEncoding {
    #[default]
    Linear,
    Srgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    Repeat,
    #[default]
    ClampToEdge,
    MirroredRepeat,
}

/// Sampling and upload state of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSampler {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub wrap_r: WrapMode,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub generate_mipmaps: bool,
    pub flip_y: bool,
    pub unpack_alignment: u32,
}

impl Default for TextureSampler {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::ClampToEdge,
            wrap_r: WrapMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::LinearMipmapLinear,
            generate_mipmaps: true,
            flip_y: true,
            unpack_alignment: 4,
        }
    }
}

/// Image dimensions. `depth` is the layer count for array textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageExtent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Default for ImageExtent {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            depth: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureKind {
    #[default]
    Image,
    Video,
    Array,
}

/// CPU-side description of a texture as seen by program selection.
///
/// Only the properties that influence program variants are modeled here;
/// pixel storage and upload belong to the texture manager.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: Option<String>,
    pub kind: TextureKind,
    pub mapping: TextureMapping,
    pub encoding: TextureEncoding,
    pub image: ImageExtent,
    pub sampler: TextureSampler,
}

impl Default for Texture {
    fn default() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: None,
            kind: TextureKind::Image,
            mapping: TextureMapping::Uv,
            encoding: TextureEncoding::Linear,
            image: ImageExtent::default(),
            sampler: TextureSampler::default(),
        }
    }
}

impl Texture {
    #[must_use]
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self {
            image: ImageExtent {
                width,
                height,
                depth: 1,
            },
            ..Default::default()
        }
    }

    /// A video frame texture.
    #[must_use]
    pub fn new_video(width: u32, height: u32, encoding: TextureEncoding) -> Self {
        Self {
            kind: TextureKind::Video,
            encoding,
            sampler: TextureSampler {
                generate_mipmaps: false,
                min_filter: FilterMode::Linear,
                ..Default::default()
            },
            ..Self::new_2d(width, height)
        }
    }

    /// A 2D array texture of `depth` layers.
    ///
    /// Array textures are sampled unfiltered, are not mipmapped, are not
    /// flipped on upload and are tightly packed.
    #[must_use]
    pub fn new_array(width: u32, height: u32, depth: u32) -> Self {
        Self {
            kind: TextureKind::Array,
            image: ImageExtent {
                width,
                height,
                depth,
            },
            sampler: TextureSampler {
                mag_filter: FilterMode::Nearest,
                min_filter: FilterMode::Nearest,
                wrap_r: WrapMode::ClampToEdge,
                generate_mipmaps: false,
                flip_y: false,
                unpack_alignment: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A prefiltered environment in the packed cube-UV layout.
    #[must_use]
    pub fn new_cube_uv(width: u32, height: u32) -> Self {
        Self {
            mapping: TextureMapping::CubeUvReflection,
            sampler: TextureSampler {
                generate_mipmaps: false,
                flip_y: false,
                ..Default::default()
            },
            ..Self::new_2d(width, height)
        }
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: TextureMapping) -> Self {
        self.mapping = mapping;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: TextureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind == TextureKind::Video
    }

    #[must_use]
    pub fn into_ref(self) -> TextureRef {
        Arc::new(self)
    }
}

/// Shared texture reference held by materials, scenes and uniforms.
pub type TextureRef = Arc<Texture>;
