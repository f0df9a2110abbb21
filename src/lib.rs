pub mod config;
pub mod error;
pub mod hash;
pub mod random;
pub mod render;
pub mod rng;
pub mod simplex;
pub mod sparse;

use std::time::Instant;

use rayon::prelude::*;

use config::Params;

pub use error::{Error, Result};
pub use hash::{Coord, GOLDEN32, GOLDEN64, hash_coords, mix64};
pub use simplex::{Fbm, Simplex, fbm1, fbm2, noise1, noise2};
pub use sparse::{Ssi1, Ssi2, sparse1, sparse2, ssi1, ssi2};

/// One rendered preview layer.
pub struct Layer {
    pub name: &'static str,
    pub rgba: Vec<u8>,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Builds the full preview layer set for a seed: fractal terrain, raw fBM
/// heightmap, white noise, and the sparse point plot, with per-stage
/// timings.
pub fn generate(seed: u32, w: usize, h: usize, params: &Params) -> (Vec<Layer>, Vec<Timing>) {
    // Zero-area requests produce no layers; the renderers chunk rows by w.
    if w == 0 || h == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut layers = Vec::new();
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. fBM field, evaluated once and reused by two layers
    let t = Instant::now();
    let fbm = Fbm::new(seed);
    let mut field = vec![0.0f32; w * h];
    field.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let cx = x as f32 * params.frequency;
            let cy = y as f32 * params.frequency;
            *out = fbm
                .eval(params.octaves, params.lacunarity, params.gain, &[cx, cy])
                .unwrap_or(0.0);
        }
    });
    timings.push(Timing {
        name: "fbm_field",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Tone-mapped terrain + grayscale heightmap
    let t = Instant::now();
    layers.push(Layer {
        name: "terrain",
        rgba: render::render_terrain(&field, w, h),
    });
    layers.push(Layer {
        name: "heightmap",
        rgba: render::render_grayscale(&field, w, h),
    });
    timings.push(Timing {
        name: "render_fbm",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 3. White noise field
    let t = Instant::now();
    layers.push(Layer {
        name: "white",
        rgba: render::render_white(seed, w, h),
    });
    timings.push(Timing {
        name: "render_white",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 4. Sparse points
    let t = Instant::now();
    let points: Vec<[i32; 2]> = sparse2(seed, w as i32, h as i32, params.gap).collect();
    layers.push(Layer {
        name: "sparse",
        rgba: render::render_points(&points, w, h),
    });
    timings.push(Timing {
        name: "sparse_points",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    (layers, timings)
}
