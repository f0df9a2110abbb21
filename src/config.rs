/// All tunable parameters for the preview layers, exposed as UI sliders in
/// the frontend and as CLI defaults.
#[derive(Clone, Debug)]
pub struct Params {
    // Fractal terrain
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
    /// Base frequency: world units per pixel fed into the noise.
    pub frequency: f32,

    // Sparse point layer
    pub gap: i32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            octaves: 6,
            lacunarity: 2.0,
            gain: 0.5,
            frequency: 0.005,
            gap: 15,
        }
    }
}
