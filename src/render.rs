//! Tone-mapping of noise fields and point sets into RGBA buffers. Pure
//! consumers of the core: they supply coordinates and map floats to colors,
//! nothing more.

use rayon::prelude::*;

use crate::random::white;

// Terrain palette: water through sand, grass, rock, snow.
const PALETTE: [[u8; 4]; 9] = [
    [41, 128, 185, 255],
    [52, 152, 219, 255],
    [255, 234, 167, 255],
    [253, 203, 110, 255],
    [248, 194, 145, 255],
    [184, 233, 148, 255],
    [120, 224, 143, 255],
    [189, 195, 199, 255],
    [236, 240, 241, 255],
];

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
        255,
    ]
}

#[inline]
fn palette_color(v: f32) -> [u8; 4] {
    const CUTOFF: f32 = 0.5;
    if v <= CUTOFF {
        return PALETTE[0];
    }
    let count = PALETTE.len() - 1;
    let norm = ((v - CUTOFF) / (1.0 - CUTOFF)).clamp(0.0, 1.0);
    let pos = norm * (count - 1) as f32;
    let bracket = (pos as usize).min(count - 2);
    lerp_color(
        PALETTE[bracket + 1],
        PALETTE[bracket + 2],
        pos - bracket as f32,
    )
}

/// Island-style tone map of an fBM field in [-1, 1]: normalize, blend with
/// a radial falloff from the image center, gamma-squish, then bucket into
/// the terrain palette.
pub fn render_terrain(field: &[f32], w: usize, h: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; w * h * 4];

    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let n = field[y * w + x];
            let mut v = (1.0 + n) / 2.0;

            let dx = x as f64 / w as f64 - 0.5;
            let dy = y as f64 / h as f64 - 0.5;
            let d = ((dx * dx + dy * dy).sqrt() * 2.0).powf(1.5);
            v = (1.0 - d as f32 + v) / 2.0;
            v = v.max(0.0).powf(0.6);

            row[x * 4..x * 4 + 4].copy_from_slice(&palette_color(v));
        }
    });

    rgba
}

/// Grayscale of an arbitrary scalar field, normalized to its own range.
pub fn render_grayscale(field: &[f32], w: usize, h: usize) -> Vec<u8> {
    let min_v = field.iter().cloned().fold(f32::INFINITY, f32::min);
    let max_v = field.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let range = (max_v - min_v).max(1e-6);

    let mut rgba = vec![0u8; w * h * 4];
    for i in 0..w * h {
        let t = (field[i] - min_v) / range;
        let v = (t * 255.0).clamp(0.0, 255.0) as u8;
        rgba[i * 4..i * 4 + 4].copy_from_slice(&[v, v, v, 255]);
    }
    rgba
}

/// Grayscale white-noise field: one independent hash per pixel.
pub fn render_white(seed: u32, w: usize, h: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; w * h * 4];

    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let n = white(seed, &[(x as f32).into(), (y as f32).into()]).unwrap_or(0.0);
            let v = (((n + 1.0) / 2.0) * 255.0).clamp(0.0, 255.0) as u8;
            row[x * 4..x * 4 + 4].copy_from_slice(&[v, v, v, 255]);
        }
    });

    rgba
}

/// Black crosses on white: plots integer sample positions.
pub fn render_points(points: &[[i32; 2]], w: usize, h: usize) -> Vec<u8> {
    let mut rgba = vec![255u8; w * h * 4];

    let mut dot = |x: i32, y: i32| {
        if x >= 0 && (x as usize) < w && y >= 0 && (y as usize) < h {
            let i = (y as usize * w + x as usize) * 4;
            rgba[i..i + 3].copy_from_slice(&[0, 0, 0]);
        }
    };

    for &[x, y] in points {
        dot(x, y);
        dot(x - 1, y);
        dot(x + 1, y);
        dot(x, y - 1);
        dot(x, y + 1);
    }

    rgba
}
