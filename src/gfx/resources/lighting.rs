//! Directional lighting constants, uploaded every frame.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParameters {
    pub ambient_light: [f32; 3],
    pub light_direction: [f32; 3],
    pub light_color: [f32; 3],
    pub half_vector: [f32; 3],
    pub shininess: f32,
    pub strength: f32,
}

impl LightingParameters {
    pub const DEFAULT: Self = Self {
        ambient_light: [0.4, 0.4, 0.4],
        light_direction: [0.0, 0.7071, 0.7071],
        light_color: [0.5, 0.5, 0.5],
        half_vector: [0.0, 0.45514, 0.9240],
        shininess: 25.0,
        strength: 1.0,
    };
}

impl Default for LightingParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}
