//! Simple Sequential Inhibition point sampling with a bit-set acceleration
//! grid, plus the integer pixel projection on top of it.
//!
//! Each sampler is a lazy pull iterator: one jittered candidate set per
//! lattice cell, visited center-out, accepted only when the occupancy grid
//! shows no previously accepted point within unit distance. Dropping the
//! iterator cancels the sweep and frees the grid. Every call builds its own
//! grid, so concurrent sweeps never share state.

use crate::hash::{cell_key2, mix64};
use crate::random::float32;

/// Half the minimum inter-point distance: the occupancy grid resolution.
const CELL_SIZE: f32 = 0.5;

/// Flat bit-per-cell occupancy index. A 5-cell (1D) or 5x5 (2D)
/// neighborhood at this resolution covers the full 1.0-unit exclusion
/// radius, so a clear neighborhood proves no accepted point is within unit
/// distance; occupied cells may over-reject, never under-reject.
struct BitGrid {
    words: Vec<u64>,
    w: i32,
    h: i32,
}

impl BitGrid {
    fn new(w: i32, h: i32) -> Self {
        let cells = (w as usize) * (h as usize);
        Self {
            words: vec![0u64; cells.div_ceil(64)],
            w,
            h,
        }
    }

    #[inline]
    fn contains(&self, gx: i32, gy: i32) -> bool {
        let i = (gy * self.w + gx) as usize;
        self.words[i >> 6] & (1 << (i & 63)) != 0
    }

    #[inline]
    fn set(&mut self, gx: i32, gy: i32) {
        if gx >= 0 && gx < self.w && gy >= 0 && gy < self.h {
            let i = (gy * self.w + gx) as usize;
            self.words[i >> 6] |= 1 << (i & 63);
        }
    }

    /// True when the ±2 neighborhood around (gx, gy) is unoccupied.
    fn neighborhood_clear(&self, gx: i32, gy: i32) -> bool {
        for dy in -2..=2 {
            let ny = gy + dy;
            if ny < 0 || ny >= self.h {
                continue;
            }
            for dx in -2..=2 {
                let nx = gx + dx;
                if nx >= 0 && nx < self.w && self.contains(nx, ny) {
                    return false;
                }
            }
        }
        true
    }
}

#[inline]
fn to_grid(v: f32, offset: i32) -> i32 {
    (v / CELL_SIZE).floor() as i32 + offset
}

/// 1D hard-core point sequence: one jittered candidate per integer cell in
/// [-r1, r1], visited 0, +1, -1, +2, -2, ..., with at least 1.0 between any
/// two emitted points. Deterministic per seed.
pub struct Ssi1 {
    seed: u32,
    r1: i32,
    step: i32,
    grid: BitGrid,
    offset: i32,
}

/// Starts a 1D SSI sweep. `r1 <= 0` yields an empty sequence.
pub fn ssi1(seed: u32, r1: i32) -> Ssi1 {
    // Padding past 4x leaves room for jitter at the boundary cells.
    let size = if r1 > 0 { r1 * 4 + 10 } else { 0 };
    Ssi1 {
        seed,
        r1,
        step: 0,
        grid: BitGrid::new(size.max(1), 1),
        offset: size / 2,
    }
}

impl Ssi1 {
    /// Up to 3 jittered candidates for one cell; at most one is accepted.
    fn try_cell(&mut self, ix: i32) -> Option<f32> {
        for t in 0..3u64 {
            let h = mix64(ix as i64 as u64, self.seed as u64 ^ t);
            let x = ix as f32 + (float32(self.seed, h) - 0.5);
            let gx = to_grid(x, self.offset);
            if self.grid.neighborhood_clear(gx, 0) {
                self.grid.set(gx, 0);
                return Some(x);
            }
        }
        None
    }
}

impl Iterator for Ssi1 {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.r1 <= 0 {
            return None;
        }
        // step k maps to the center-out cell order 0, +1, -1, +2, -2, ...
        while self.step <= 2 * self.r1 {
            let k = self.step;
            self.step += 1;
            let ix = if k % 2 == 1 { (k + 1) / 2 } else { -(k / 2) };
            if let Some(x) = self.try_cell(ix) {
                return Some(x);
            }
        }
        None
    }
}

/// Center-out traversal of the integer lattice rectangle
/// [-r1, r1] x [-r2, r2] in expanding square rings. Within a ring: top edge,
/// bottom edge, then the left and right columns between them, each swept in
/// increasing coordinate order and clipped to the rectangle.
struct RingWalker {
    r1: i32,
    r2: i32,
    max_r: i32,
    r: i32,
    edge: u8,
    pos: Option<i32>,
    started: bool,
}

impl RingWalker {
    fn new(r1: i32, r2: i32) -> Self {
        Self {
            r1,
            r2,
            max_r: r1.max(r2),
            r: 1,
            edge: 0,
            pos: None,
            started: false,
        }
    }
}

impl Iterator for RingWalker {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if !self.started {
            self.started = true;
            return Some((0, 0));
        }
        while self.r <= self.max_r {
            let r = self.r;
            let horizontal = self.edge < 2;
            // Row edges span the clipped x range; column edges cover the
            // remaining y values so corners are not visited twice.
            let active = if horizontal { r <= self.r2 } else { r <= self.r1 };
            let (lo, hi) = if horizontal {
                ((-r).max(-self.r1), r.min(self.r1))
            } else {
                ((-r + 1).max(-self.r2), (r - 1).min(self.r2))
            };
            if active {
                let p = *self.pos.get_or_insert(lo);
                if p <= hi {
                    self.pos = Some(p + 1);
                    return Some(match self.edge {
                        0 => (p, -r),
                        1 => (p, r),
                        2 => (-r, p),
                        _ => (r, p),
                    });
                }
            }
            self.pos = None;
            self.edge += 1;
            if self.edge == 4 {
                self.edge = 0;
                self.r += 1;
            }
        }
        None
    }
}

/// 2D hard-core point sequence over [-r1, r1] x [-r2, r2], visited in
/// expanding square rings, with at least 1.0 Euclidean distance between any
/// two emitted points. Deterministic per seed.
pub struct Ssi2 {
    seed: u32,
    walker: RingWalker,
    grid: BitGrid,
    off_x: i32,
    off_y: i32,
    empty: bool,
}

/// Starts a 2D SSI sweep. Nonpositive radii yield an empty sequence.
pub fn ssi2(seed: u32, r1: i32, r2: i32) -> Ssi2 {
    let empty = r1 <= 0 || r2 <= 0;
    let (gw, gh) = if empty { (1, 1) } else { (r1 * 4 + 10, r2 * 4 + 10) };
    Ssi2 {
        seed,
        walker: RingWalker::new(r1, r2),
        grid: BitGrid::new(gw, gh),
        off_x: gw / 2,
        off_y: gh / 2,
        empty,
    }
}

impl Ssi2 {
    /// Up to 2 jittered candidates per cell (the 2D conflict area is larger
    /// than in 1D, so extra attempts rarely pay off).
    fn try_cell(&mut self, ix: i32, iy: i32) -> Option<[f32; 2]> {
        for t in 0..2u64 {
            let h = mix64(cell_key2(ix, iy), self.seed as u64 ^ t);
            let x = ix as f32 + (float32(self.seed, h) - 0.5);
            let y = iy as f32 + (float32(self.seed ^ 1, h) - 0.5);
            let gx = to_grid(x, self.off_x);
            let gy = to_grid(y, self.off_y);
            if self.grid.neighborhood_clear(gx, gy) {
                self.grid.set(gx, gy);
                return Some([x, y]);
            }
        }
        None
    }
}

impl Iterator for Ssi2 {
    type Item = [f32; 2];

    fn next(&mut self) -> Option<[f32; 2]> {
        if self.empty {
            return None;
        }
        while let Some((ix, iy)) = self.walker.next() {
            if let Some(pt) = self.try_cell(ix, iy) {
                return Some(pt);
            }
        }
        None
    }
}

/// Projects the 1D SSI lattice into integer pixels across [0, w): scale by
/// gap, center on w/2, drop anything out of bounds. Nonpositive w or gap
/// yields an empty sequence, never an error.
pub fn sparse1(seed: u32, w: i32, gap: i32) -> impl Iterator<Item = i32> {
    let r1 = if w > 0 && gap > 0 {
        (w as f64 / (2 * gap) as f64).ceil() as i32
    } else {
        0
    };
    let center = w as f32 / 2.0;
    let gap_f = gap as f32;
    ssi1(seed, r1).filter_map(move |x| {
        let ix = (x * gap_f + center) as i32;
        (ix >= 0 && ix < w).then_some(ix)
    })
}

/// Projects the 2D SSI lattice into integer pixels across [0, w) x [0, h).
pub fn sparse2(seed: u32, w: i32, h: i32, gap: i32) -> impl Iterator<Item = [i32; 2]> {
    let (r1, r2) = if w > 0 && h > 0 && gap > 0 {
        (
            (w as f64 / (2 * gap) as f64).ceil() as i32,
            (h as f64 / (2 * gap) as f64).ceil() as i32,
        )
    } else {
        (0, 0)
    };
    let center_x = w as f32 / 2.0;
    let center_y = h as f32 / 2.0;
    let gap_f = gap as f32;
    ssi2(seed, r1, r2).filter_map(move |pt| {
        let ix = (pt[0] * gap_f + center_x) as i32;
        let iy = (pt[1] * gap_f + center_y) as i32;
        (ix >= 0 && ix < w && iy >= 0 && iy < h).then_some([ix, iy])
    })
}
