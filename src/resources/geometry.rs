//! Geometry attribute layout as consumed by program selection.
//!
//! Only presence and shape of attributes matter here; vertex data itself
//! lives in the geometry buffers.

/// Morph target attributes, by channel. Each entry is the number of morph
/// targets stored for that channel, `None` when the channel is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MorphAttributes {
    pub position: Option<usize>,
    pub normal: Option<usize>,
    pub color: Option<usize>,
}

impl MorphAttributes {
    /// Number of morph targets, read from the first present channel
    /// (position, then normal, then color).
    #[must_use]
    pub fn targets_count(&self) -> u32 {
        self.position
            .or(self.normal)
            .or(self.color)
            .map_or(0, |count| count as u32)
    }

    /// How many morph channels are packed per vertex when morph data is
    /// stored in a texture: 0 none, 1 position, 2 position + normal,
    /// 3 position + normal + color. The highest present channel wins.
    #[must_use]
    pub fn texture_stride(&self) -> u32 {
        if self.color.is_some() {
            3
        } else if self.normal.is_some() {
            2
        } else if self.position.is_some() {
            1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryLayout {
    pub morph_attributes: MorphAttributes,
    pub has_tangent: bool,
    /// Item size of the vertex color attribute (3 or 4), `None` if absent.
    pub color_item_size: Option<u32>,
}

impl GeometryLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tangents(mut self) -> Self {
        self.has_tangent = true;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, item_size: u32) -> Self {
        self.color_item_size = Some(item_size);
        self
    }

    #[must_use]
    pub fn with_morph_attributes(mut self, morph: MorphAttributes) -> Self {
        self.morph_attributes = morph;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morph_stride_follows_highest_channel() {
        let none = MorphAttributes::default();
        assert_eq!(none.texture_stride(), 0);
        assert_eq!(none.targets_count(), 0);

        let pos = MorphAttributes { position: Some(4), ..Default::default() };
        assert_eq!(pos.texture_stride(), 1);
        assert_eq!(pos.targets_count(), 4);

        let pos_normal = MorphAttributes { position: Some(4), normal: Some(4), color: None };
        assert_eq!(pos_normal.texture_stride(), 2);

        let all = MorphAttributes { position: Some(2), normal: Some(2), color: Some(2) };
        assert_eq!(all.texture_stride(), 3);
    }

    #[test]
    fn morph_count_falls_back_to_other_channels() {
        let color_only = MorphAttributes { color: Some(5), ..Default::default() };
        assert_eq!(color_only.targets_count(), 5);
        assert_eq!(color_only.texture_stride(), 3);
    }
}
