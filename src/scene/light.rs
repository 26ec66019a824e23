use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Spot {
        /// Whether the spot light projects a texture.
        has_map: bool,
    },
    RectArea,
    Hemisphere,
}

/// A light as seen by program selection: its type and whether it casts
/// shadows. Colors and transforms only feed uniforms.
#[derive(Debug, Clone)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
    pub cast_shadows: bool,
}

impl Light {
    #[must_use]
    pub fn new(kind: LightKind) -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            kind,
            cast_shadows: false,
        }
    }

    #[must_use]
    pub fn with_shadows(mut self) -> Self {
        self.cast_shadows = true;
        self
    }
}

/// Per-type light and shadow counts of the current render state.
///
/// Ambient lights only contribute to a uniform and are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LightsState {
    pub directional: u32,
    pub point: u32,
    pub spot: u32,
    pub spot_light_map: u32,
    pub rect_area: u32,
    pub hemi: u32,

    pub directional_shadow_map: u32,
    pub point_shadow_map: u32,
    pub spot_shadow_map: u32,
    pub spot_shadows_with_maps: u32,
}

impl LightsState {
    /// Tallies a light list into per-type counts.
    pub fn collect<'a>(lights: impl IntoIterator<Item = &'a Light>) -> Self {
        let mut state = Self::default();

        for light in lights {
            match light.kind {
                LightKind::Ambient => {}
                LightKind::Directional => {
                    state.directional += 1;
                    if light.cast_shadows {
                        state.directional_shadow_map += 1;
                    }
                }
                LightKind::Point => {
                    state.point += 1;
                    if light.cast_shadows {
                        state.point_shadow_map += 1;
                    }
                }
                LightKind::Spot { has_map } => {
                    state.spot += 1;
                    if has_map {
                        state.spot_light_map += 1;
                    }
                    if light.cast_shadows {
                        state.spot_shadow_map += 1;
                        if has_map {
                            state.spot_shadows_with_maps += 1;
                        }
                    }
                }
                LightKind::RectArea => state.rect_area += 1,
                LightKind::Hemisphere => state.hemi += 1,
            }
        }

        state
    }
}
